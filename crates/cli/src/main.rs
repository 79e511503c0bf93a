use std::sync::Arc;

use {
    clap::{Parser, Subcommand},
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    slack_mcp_config::SlackMcpConfig,
    slack_mcp_provider::{ChannelsCache, SlackAuth, SlackClient, UsersCache},
    slack_mcp_server::{McpServer, ToolContext, default_router},
};

#[derive(Parser)]
#[command(
    name = "slack-mcp",
    about = "Slack conversations over the Model Context Protocol"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file path (overrides discovery).
    #[arg(long, global = true, env = "SLACK_MCP_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default when no subcommand is provided).
    Serve,
    /// Validate config and report cache state.
    Doctor,
}

/// Initialise tracing. Everything goes to stderr: stdout is the protocol
/// channel.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<SlackMcpConfig> {
    match &cli.config {
        Some(path) => {
            let mut config = slack_mcp_config::load_config(path)?;
            config.overlay_env();
            Ok(config)
        },
        None => Ok(slack_mcp_config::discover_and_load()),
    }
}

async fn serve(config: SlackMcpConfig) -> anyhow::Result<()> {
    let problems = slack_mcp_config::validate(&config);
    if !problems.is_empty() {
        for problem in &problems {
            error!(%problem, "config problem");
        }
        anyhow::bail!("configuration is not usable ({} problem(s))", problems.len());
    }

    let auth = SlackAuth::from_config(&config.auth)?;
    info!(mode = auth.mode(), "authenticating to slack");
    let client = SlackClient::new(auth)?;

    let users = UsersCache::warm(&client, &config.cache.users_path).await?;
    let channels = ChannelsCache::warm(&client, &config.cache.channels_path).await?;
    info!(
        users = users.len(),
        channels = channels.len(),
        "caches warm"
    );

    let ctx = Arc::new(ToolContext {
        client,
        users,
        channels,
        history: config.history.clone(),
    });

    info!("serving MCP over stdio");
    McpServer::new(default_router(ctx)).run_stdio().await?;
    Ok(())
}

fn doctor(config: &SlackMcpConfig) -> anyhow::Result<()> {
    let problems = slack_mcp_config::validate(config);
    if problems.is_empty() {
        println!("config: ok");
    } else {
        for problem in &problems {
            println!("config: {problem}");
        }
    }

    match SlackAuth::from_config(&config.auth) {
        Ok(auth) => println!("auth: {} mode", auth.mode()),
        Err(e) => println!("auth: {e}"),
    }

    for (label, path) in [
        ("users cache", &config.cache.users_path),
        ("channels cache", &config.cache.channels_path),
    ] {
        if path.exists() {
            println!("{label}: present at {}", path.display());
        } else {
            println!("{label}: absent (fetched on first serve)");
        }
    }

    if !problems.is_empty() {
        anyhow::bail!("{} problem(s) found", problems.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(Commands::Doctor) => doctor(&config),
    }
}
