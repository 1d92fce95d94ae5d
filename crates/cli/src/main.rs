mod auth_commands;
mod files_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    seedstream_config::{SeedstreamConfig, Severity},
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "seedstream", about = "Seedr files as a Stremio addon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value and `PORT`).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Config file to load instead of searching the default locations.
    #[arg(long, global = true, env = "SEEDSTREAM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the addon server (default when no subcommand is provided).
    Serve,
    /// Obtain a Seedr token with the device flow from this terminal.
    Auth {
        /// Print the verification URL instead of opening a browser.
        #[arg(long, default_value_t = false)]
        no_browser: bool,
    },
    /// List files in the Seedr account.
    Files {
        /// Only show files that can be streamed.
        #[arg(long, default_value_t = false)]
        playable: bool,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load config, apply CLI overrides and report validation diagnostics.
fn load_config(cli: &Cli) -> anyhow::Result<SeedstreamConfig> {
    let mut config = seedstream_config::load_from(cli.config.as_deref())?;
    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let result = seedstream_config::validate(&config);
    for diag in &result.diagnostics {
        match diag.severity {
            Severity::Error => error!(path = %diag.path, "{}", diag.message),
            Severity::Warning => warn!(path = %diag.path, "{}", diag.message),
        }
    }
    if result.has_errors() {
        anyhow::bail!("invalid configuration");
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "seedstream starting");

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => seedstream_gateway::start_gateway(config).await,
        Some(Commands::Auth { no_browser }) => auth_commands::run(&config, !no_browser).await,
        Some(Commands::Files { playable }) => files_commands::run(&config, playable).await,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["seedstream", "--port", "8080"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.port, Some(8080));
    }

    #[test]
    fn port_env_is_left_to_config_loader() {
        let cmd = Cli::command();
        let port = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "port")
            .unwrap();
        assert!(port.get_env().is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["seedstream", "files", "--playable", "--json-logs"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Files { playable: true })));
        assert!(cli.json_logs);
    }
}
