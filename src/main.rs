use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

use cogbot::application::errors::BotError;
use cogbot::application::messaging::{MessageDispatcher, MessageParser};
use cogbot::domain::traits::Gateway;
use cogbot::extensions::{ExtensionCatalog, ExtensionManager};
use cogbot::infrastructure::adapters::console::ConsoleAdapter;
use cogbot::infrastructure::adapters::discord::DiscordAdapter;
use cogbot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "cogbot")]
#[command(about = "A minimal extension-driven chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Use the console adapter instead of Discord
        #[arg(long)]
        console: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("[%Y-%m-%d %H:%M:%S%.6f %z]".to_string()))
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { console } => {
            if let Err(e) = run_bot(&cli.config, cli.token, console) {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("cogbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = Config::default().save(&cli.config) {
                error!("{}", e);
                std::process::exit(1);
            }
            println!("Wrote default config to {}", cli.config);
        }
    }
}

fn run_bot(config_path: &str, token_override: Option<String>, console: bool) -> Result<(), BotError> {
    // Configuration failures are fatal; no partial config is usable.
    let config = Config::load(config_path)?;
    info!("Starting cogbot");

    let manager = ExtensionManager::new(ExtensionCatalog::builtin());
    let dispatcher = MessageDispatcher::new(
        manager,
        &config.command_prefix,
        config.owner_id,
        config.debug,
    );
    let parser = MessageParser::new(&config.command_prefix);

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(async {
        if console {
            let gateway = ConsoleAdapter::new(parser, config.owner_id);
            serve(gateway, dispatcher, &config).await
        } else {
            let token = token_override.unwrap_or_else(|| config.token.clone());
            let gateway = DiscordAdapter::new(token, parser, config.channels.clone());
            serve(gateway, dispatcher, &config).await
        }
    })
}

/// Connect, load the configured extensions, then serve commands until the
/// process is terminated.
async fn serve(
    mut gateway: impl Gateway,
    mut dispatcher: MessageDispatcher,
    config: &Config,
) -> Result<(), BotError> {
    let identity = gateway.connect().await?;
    info!("Logged in as {}", identity);
    info!("Latency: {}ms", gateway.latency_ms());

    info!("Loading extensions...");
    dispatcher
        .manager_mut()
        .load_all(&config.extensions, config.debug)?;
    info!("Bot ready!");

    loop {
        let batch = match gateway.poll_messages().await {
            Ok(batch) => batch,
            Err(e) => {
                error!("Polling failed: {}", e);
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                continue;
            }
        };

        for message in batch {
            let latency = gateway.latency_ms();
            match dispatcher.handle(&message, latency) {
                Ok(Some(reply)) => {
                    if let Err(e) = gateway.send_message(&message.channel_id, &reply).await {
                        warn!("Failed to send reply: {}", e);
                    }
                }
                Ok(None) => {}
                Err(err @ BotError::ExtensionSetup { .. }) => {
                    // Debug-mode escalation: report, then abort.
                    let _ = gateway
                        .send_message(&message.channel_id, &format!(":x: {}", err))
                        .await;
                    return Err(err);
                }
                Err(err) => error!("Command failed: {}", err),
            }
        }
    }
}
