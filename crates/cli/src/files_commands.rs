use {
    anyhow::Result,
    seedstream_config::SeedstreamConfig,
    seedstream_seedr::{SeedrClient, collect_files, is_playable},
};

pub async fn run(config: &SeedstreamConfig, playable_only: bool) -> Result<()> {
    let http = seedstream_gateway::build_http_client(config)?;
    let client = SeedrClient::from_config(http, &config.seedr)?;
    let files = collect_files(&client, config.seedr.max_depth).await?;

    let mut shown = 0usize;
    for file in &files {
        let playable = is_playable(file);
        if playable_only && !playable {
            continue;
        }
        let marker = if playable { "*" } else { " " };
        println!("{marker} {:>9}  {}", human_size(file.size), file.name);
        shown += 1;
    }

    if shown == 0 {
        println!("No files found.");
    }
    Ok(())
}

fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
