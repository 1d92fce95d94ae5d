//! Turning a Seedr folder tree into Stremio stream entries.

use std::collections::VecDeque;

use {
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{
    client::{SeedrClient, SeedrFile},
    error::Result,
};

/// Extensions treated as playable when the listing does not flag the file.
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mkv", ".avi", ".mov", ".webm", ".m4v"];

/// One entry of a Stremio stream response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub name: String,
    pub title: String,
    pub url: String,
}

/// Body of `/stream/...` responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamResponse {
    pub streams: Vec<Stream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamResponse {
    pub fn ok(streams: Vec<Stream>) -> Self {
        Self {
            streams,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            streams: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Whether Seedr can play `file` as video.
pub fn is_playable(file: &SeedrFile) -> bool {
    if file.play_video {
        return true;
    }
    let name = file.name.to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Collect every file from the root folder and subfolders up to `max_depth`
/// levels below it, breadth first, in listing order.
pub async fn collect_files(client: &SeedrClient, max_depth: usize) -> Result<Vec<SeedrFile>> {
    let mut files = Vec::new();
    let mut queue = VecDeque::from([(None, 0usize)]);

    while let Some((folder_id, depth)) = queue.pop_front() {
        let contents = client.list_folder(folder_id).await?;
        files.extend(contents.files);
        if depth < max_depth {
            queue.extend(
                contents
                    .folders
                    .into_iter()
                    .map(|folder| (Some(folder.id), depth + 1)),
            );
        }
    }

    Ok(files)
}

/// Streams for every playable file reachable within `max_depth`.
pub async fn resolve_streams(client: &SeedrClient, max_depth: usize) -> Result<Vec<Stream>> {
    let files = collect_files(client, max_depth).await?;
    let streams: Vec<Stream> = files
        .iter()
        .filter(|file| is_playable(file))
        .filter_map(|file| {
            client.stream_url(file).map(|url| Stream {
                name: "Seedr".into(),
                title: file.name.clone(),
                url,
            })
        })
        .collect();
    debug!(files = files.len(), streams = streams.len(), "resolved seedr streams");
    Ok(streams)
}
