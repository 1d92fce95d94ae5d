use std::sync::Arc;

use {
    anyhow::Result,
    secrecy::ExposeSecret,
    seedstream_config::SeedstreamConfig,
    seedstream_oauth::{DeviceFlow, DeviceFlowConfig, InMemoryDeviceCodeStore, TokenExchangeResult},
    tokio::io::{AsyncBufReadExt, BufReader},
};

/// Issue one device code, then poll each time the operator presses Enter.
pub async fn run(config: &SeedstreamConfig, open_browser: bool) -> Result<()> {
    let http = seedstream_gateway::build_http_client(config)?;
    let flow = DeviceFlow::new(
        http,
        DeviceFlowConfig::from(&config.seedr),
        Arc::new(InMemoryDeviceCodeStore::new()),
    );

    let request = flow.issue().await?;
    println!("Your code: {}", request.user_code);
    if !open_browser || open::that(&request.verification_uri).is_err() {
        println!("Enter it at:\n{}", request.verification_uri);
    } else {
        println!("Opened {} in your browser.", request.verification_uri);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("Press Enter once you have approved the device (Ctrl-D to give up).");
        if lines.next_line().await?.is_none() {
            anyhow::bail!("authorization aborted before the device was approved");
        }

        match flow.poll().await? {
            TokenExchangeResult::Pending => println!("Device not approved yet."),
            TokenExchangeResult::Authorized { access_token } => {
                println!("Authorized. Save this token as SEEDR_TOKEN:");
                println!("{}", access_token.expose_secret());
                return Ok(());
            },
        }
    }
}
