// # purged - Purge Notification Daemon
//
// Thin integration layer around purge-core. All purge logic lives in the
// library; this binary only:
// 1. Reads configuration from environment variables
// 2. Initializes logging and the runtime
// 3. Registers transports
// 4. Runs a one-shot command or the engine over stdin
//
// ## Configuration
//
// - `PURGE_BASE_URL`: Public base URL of the site (required)
// - `PURGE_PATH`: Purge endpoint path (default: /__wp_cache/purge)
// - `PURGE_KEY`: Shared purge key (required)
// - `PURGE_KEY_HEADER`: Header carrying the key (default: X-Purge-Key)
// - `PURGE_TIMEOUT_SECS`: HTTP request timeout (default: 10)
// - `PURGE_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Usage
//
// ```bash
// export PURGE_BASE_URL=https://example.com
// export PURGE_PATH=/purge
// export PURGE_KEY=your_key
//
// purged purge hello-world about   # purge two slugs and exit
// purged flush                     # drop the whole cache
// purged list                      # print cached keys
// purged                           # read one slug per line from stdin
// ```

use anyhow::Result;
use purge_core::config::{DEFAULT_KEY_HEADER, DEFAULT_PURGE_PATH};
use purge_core::source::LinesContentSource;
use purge_core::{PurgeConfig, PurgeEngine, PurgeEvent, PurgeNotifier, TransportConfig, TransportRegistry};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown / all purges accepted
/// - 1: Configuration or startup error
/// - 2: Runtime error, or a one-shot purge that was not accepted
#[derive(Debug, Clone, Copy)]
enum PurgeExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<PurgeExitCode> for ExitCode {
    fn from(code: PurgeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What to do once configured
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Read slugs from stdin until EOF or a signal
    Watch,
    /// Purge the given slugs and exit
    Purge(Vec<String>),
    /// Flush the whole cache and exit
    Flush,
    /// Print cached keys and exit
    List,
}

impl Command {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let Some(command) = args.next() else {
            return Ok(Command::Watch);
        };

        match command.as_str() {
            "watch" => Ok(Command::Watch),
            "purge" => {
                let slugs: Vec<String> = args.collect();
                if slugs.is_empty() {
                    anyhow::bail!("`purge` needs at least one slug. Usage: purged purge <slug>...");
                }
                Ok(Command::Purge(slugs))
            }
            "flush" => Ok(Command::Flush),
            "list" => Ok(Command::List),
            other => anyhow::bail!(
                "Unknown command '{}'. Commands: watch, purge <slug>..., flush, list",
                other
            ),
        }
    }
}

/// Application configuration
struct Config {
    base_url: String,
    purge_path: String,
    purge_key: String,
    key_header: String,
    timeout_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let timeout_secs = match env::var("PURGE_TIMEOUT_SECS") {
            Ok(value) => value.trim().parse().map_err(|_| {
                anyhow::anyhow!("PURGE_TIMEOUT_SECS must be a whole number of seconds. Got: {}", value)
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            base_url: env::var("PURGE_BASE_URL").map_err(|_| {
                anyhow::anyhow!(
                    "PURGE_BASE_URL is required. \
                    Set it via: export PURGE_BASE_URL=https://example.com"
                )
            })?,
            purge_path: env::var("PURGE_PATH").unwrap_or_else(|_| DEFAULT_PURGE_PATH.to_string()),
            purge_key: env::var("PURGE_KEY").map_err(|_| {
                anyhow::anyhow!(
                    "PURGE_KEY is required. \
                    Set it via: export PURGE_KEY=your_key"
                )
            })?,
            key_header: env::var("PURGE_KEY_HEADER")
                .unwrap_or_else(|_| DEFAULT_KEY_HEADER.to_string()),
            timeout_secs,
            log_level: env::var("PURGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the daemon-level settings
    ///
    /// URL, path and key checks are done by `PurgeConfig::validate`.
    fn validate(&self) -> Result<()> {
        if !(1..=300).contains(&self.timeout_secs) {
            anyhow::bail!(
                "PURGE_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            );
        }

        if self.base_url.starts_with("http://") {
            eprintln!(
                "WARNING: PURGE_BASE_URL uses HTTP (not HTTPS). \
                The purge key will travel in clear text."
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "PURGE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.purge_config().validate()?;

        Ok(())
    }

    fn purge_config(&self) -> PurgeConfig {
        PurgeConfig::new(&self.base_url, &self.purge_path, &self.purge_key)
            .with_key_header(&self.key_header)
            .with_transport(TransportConfig::Http {
                timeout_secs: self.timeout_secs,
            })
    }
}

fn main() -> ExitCode {
    let command = match Command::from_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return PurgeExitCode::ConfigError.into();
        }
    };

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return PurgeExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return PurgeExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so `list` output stays clean on stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PurgeExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PurgeExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config, command).await {
            Ok(code) => code,
            Err(e) => {
                error!("purged error: {}", e);
                PurgeExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build the notifier and execute the command
async fn run(config: Config, command: Command) -> Result<PurgeExitCode> {
    let registry = TransportRegistry::new();

    #[cfg(feature = "http")]
    {
        info!("Registering HTTP transport");
        purge_transport_http::register(&registry);
    }

    let purge_config = config.purge_config();
    let transport = registry.create_transport(&purge_config.transport)?;
    let (notifier, mut event_rx) = PurgeNotifier::new(purge_config, transport)?;

    info!(
        "Purge endpoint: {}{}",
        config.base_url.trim_end_matches('/'),
        config.purge_path
    );

    match command {
        Command::Purge(slugs) => Ok(purge_slugs(&notifier, &slugs).await),
        Command::Flush => match notifier.try_flush_all().await {
            Ok(_) => Ok(PurgeExitCode::CleanShutdown),
            Err(_) => Ok(PurgeExitCode::RuntimeError),
        },
        Command::List => {
            let listing = notifier.list_cache().await?;
            for key in &listing.mem {
                println!("mem\t{}", key);
            }
            for key in &listing.disk {
                println!("disk\t{}", key);
            }
            Ok(PurgeExitCode::CleanShutdown)
        }
        Command::Watch => {
            // Keep the monitoring channel drained while the engine runs
            let monitor = tokio::spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    if let PurgeEvent::Stopped { reason } = event {
                        info!("Engine stopped: {}", reason);
                    }
                }
            });

            let engine = PurgeEngine::new(Box::new(LinesContentSource::stdin()), notifier);
            info!("Reading content identifiers from stdin");
            engine.run().await?;

            // Dropping the engine drops the last notifier and closes the channel
            drop(engine);
            let _ = monitor.await;

            Ok(PurgeExitCode::CleanShutdown)
        }
    }
}

/// Purge each slug in turn; the command succeeds only if every purge did
///
/// Outcomes are counted as they come back, not read off the monitoring
/// channel, which drops events once it is full.
async fn purge_slugs(notifier: &PurgeNotifier, slugs: &[String]) -> PurgeExitCode {
    let mut failed = 0usize;
    for slug in slugs {
        if notifier.try_notify(slug).await.is_err() {
            failed += 1;
        }
    }

    if failed == 0 {
        PurgeExitCode::CleanShutdown
    } else {
        error!("{} of {} purges were not accepted", failed, slugs.len());
        PurgeExitCode::RuntimeError
    }
}
