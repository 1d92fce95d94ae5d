#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Folder traversal and stream resolution against a mocked Seedr API.

use {
    secrecy::Secret,
    seedstream_seedr::{Error, SeedrClient, collect_files, resolve_streams},
};

fn client(base: &str) -> SeedrClient {
    SeedrClient::new(reqwest::Client::new(), base, Secret::new("tok_abc".into()))
}

#[tokio::test]
async fn resolves_playable_files_within_depth() {
    let mut server = mockito::Server::new_async().await;
    let _root = server
        .mock("GET", "/folder")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "folders": [{"id": 7, "name": "Movies"}],
                "files": [
                    {"name": "Trailer.MP4", "folder_file_id": 1},
                    {"name": "notes.txt", "folder_file_id": 2}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _movies = server
        .mock("GET", "/folder/7")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "folders": [{"id": 8, "name": "Extras"}],
                "files": [
                    {"name": "feature.bin", "folder_file_id": 3, "play_video": true},
                    {"name": "cdn.mkv", "stream_url": "https://cdn.example/cdn.mkv"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let extras = server
        .mock("GET", "/folder/8")
        .with_status(200)
        .with_body(r#"{"folders": [], "files": [{"name": "deep.mp4", "folder_file_id": 4}]}"#)
        .expect(0)
        .create_async()
        .await;

    let base = server.url();
    let streams = resolve_streams(&client(&base), 1).await.unwrap();

    let titles: Vec<&str> = streams.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Trailer.MP4", "feature.bin", "cdn.mkv"]);
    assert!(streams.iter().all(|s| s.name == "Seedr"));
    assert_eq!(streams[0].url, format!("{base}/file/1?token=tok_abc"));
    assert_eq!(streams[2].url, "https://cdn.example/cdn.mkv");
    extras.assert_async().await;
}

#[tokio::test]
async fn depth_zero_lists_root_only() {
    let mut server = mockito::Server::new_async().await;
    let _root = server
        .mock("GET", "/folder")
        .with_status(200)
        .with_body(
            r#"{"folders": [{"id": 7, "name": "Movies"}], "files": [{"name": "a.mp4", "id": 5}]}"#,
        )
        .create_async()
        .await;
    let sub = server
        .mock("GET", "/folder/7")
        .expect(0)
        .create_async()
        .await;

    let files = collect_files(&client(&server.url()), 0).await.unwrap();
    assert_eq!(files.len(), 1);
    sub.assert_async().await;
}

#[tokio::test]
async fn subfolder_failure_fails_the_whole_listing() {
    let mut server = mockito::Server::new_async().await;
    let _root = server
        .mock("GET", "/folder")
        .with_status(200)
        .with_body(r#"{"folders": [{"id": 7, "name": "Movies"}], "files": []}"#)
        .create_async()
        .await;
    let _sub = server
        .mock("GET", "/folder/7")
        .with_status(500)
        .create_async()
        .await;

    let err = resolve_streams(&client(&server.url()), 1).await.unwrap_err();
    assert!(matches!(err, Error::Status { .. }));
}
