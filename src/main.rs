//! probekit - deployment smoke-test toolkit
//!
//! Runs capability checks and HTTP probes against a deployed service and
//! reports a deterministic pass/fail verdict, exit code included, for CI use.

// External crate imports
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use anyhow::Result;
use is_terminal::IsTerminal;
use url::Url;

// Internal imports
use probekit::checks::capability::{
    ConfiguredGenerator, GeneratorCheck, NameGenerator, ReqwestTransport, ScratchStore,
    StorageCheck, TransportCheck,
};
use probekit::checks::probe::{GenerateProbe, HealthProbe, PageProbe};
use probekit::config::{Config, ConfigManager};
use probekit::error::ProbeKitResult;
use probekit::runner::ProbeRunner;

/// probekit - deployment smoke-test CLI
#[derive(Parser)]
#[command(name = "probekit")]
#[command(about = "Deployment smoke-test toolkit - capability checks and HTTP probes with CI-friendly exit codes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Run the probe suite against the configured target
    Run {
        /// Base URL of the deployment under test
        #[arg(short, long)]
        base_url: Option<String>,

        /// Per-probe timeout in milliseconds
        #[arg(short, long)]
        timeout_ms: Option<u64>,
    },

    /// Configure the probe suite
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,

        /// Export configuration to JSON
        #[arg(long)]
        export: Option<PathBuf>,

        /// Import configuration from JSON
        #[arg(long)]
        import: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Main application state
struct ProbeKit {
    config_manager: ConfigManager,
}

impl ProbeKit {
    /// Initialize the probe environment
    fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let mut config_manager = ConfigManager::new(config_path)
            .map_err(|e| anyhow::anyhow!("Failed to initialize config: {}", e))?;
        config_manager.load()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        Ok(Self { config_manager })
    }

    /// Assemble the suite and run it, returning the process exit code.
    async fn run_suite(
        &self,
        base_url: Option<String>,
        timeout_ms: Option<u64>,
    ) -> ProbeKitResult<i32> {
        let config: &Config = self.config_manager.config();

        let base_url = base_url.unwrap_or_else(|| config.target.base_url.clone());
        let base = Url::parse(&base_url)?;
        let timeout = Duration::from_millis(timeout_ms.unwrap_or(config.target.timeout_ms));

        let mut runner = ProbeRunner::new();

        // Capability checks first, in the order the report should show them.
        let store = ScratchStore::new()?;
        runner.register(Box::new(StorageCheck::new(Arc::new(store))))?;

        let transport = Arc::new(ReqwestTransport::new(timeout));
        runner.register(Box::new(TransportCheck::new(transport.clone())))?;

        let generator = config.generator.command.as_ref().map(|command| {
            Arc::new(ConfiguredGenerator::new(command.clone())) as Arc<dyn NameGenerator>
        });
        runner.register(Box::new(GeneratorCheck::new(generator)))?;

        // Probes need a working client; without one the transport check above
        // already reports the failure.
        if let Some(client) = transport.client() {
            let generate_url = base.join(&config.probes.generate_path)?;
            runner.register(Box::new(GenerateProbe::new(
                client.clone(),
                generate_url.to_string(),
                timeout,
            )))?;

            let health_url = base.join(&config.probes.health_path)?;
            runner.register(Box::new(HealthProbe::new(
                client.clone(),
                health_url.to_string(),
                timeout,
            )))?;

            runner.register(Box::new(PageProbe::new(
                client.clone(),
                base.to_string(),
                config.probes.page_markers.clone(),
                timeout,
            )))?;
        }

        info!(url = %base, checks = runner.len(), "starting probe run");
        let report = runner.run().await;

        if !std::io::stdout().is_terminal() {
            colored::control::set_override(false);
        }
        print!("{}", report.render());

        Ok(report.exit_code())
    }

    /// Handle configuration commands
    fn handle_config_command(
        &mut self,
        show: bool,
        reset: bool,
        export: Option<PathBuf>,
        import: Option<PathBuf>,
    ) -> Result<()> {
        if show {
            let json = self.config_manager.export_as_json()
                .map_err(|e| anyhow::anyhow!("Failed to render config: {}", e))?;
            println!("{}", json);
            return Ok(());
        }

        if reset {
            self.config_manager.reset_to_default();
            self.config_manager.save()
                .map_err(|e| anyhow::anyhow!("Failed to save config: {}", e))?;
            println!("Configuration reset to defaults");
            return Ok(());
        }

        if let Some(export_path) = export {
            let json = self.config_manager.export_as_json()
                .map_err(|e| anyhow::anyhow!("Failed to export config: {}", e))?;
            std::fs::write(&export_path, json)?;
            println!("Configuration exported to: {:?}", export_path);
            return Ok(());
        }

        if let Some(import_path) = import {
            let json = std::fs::read_to_string(&import_path)?;
            self.config_manager.import_from_json(&json)
                .map_err(|e| anyhow::anyhow!("Failed to import config: {}", e))?;
            self.config_manager.save()
                .map_err(|e| anyhow::anyhow!("Failed to save config: {}", e))?;
            println!("Configuration imported from: {:?}", import_path);
            return Ok(());
        }

        println!("Use --show, --reset, --export <path>, or --import <path>");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    let mut env = ProbeKit::new(cli.config)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run { base_url, timeout_ms }) => {
            let code = env.run_suite(base_url, timeout_ms).await?;
            if code != 0 {
                std::process::exit(code);
            }
        },
        Some(Commands::Config { show, reset, export, import }) => {
            env.handle_config_command(show, reset, export, import)?
        },
        Some(Commands::Version) => {
            println!("probekit v{}", env!("CARGO_PKG_VERSION"));
            println!("From Infer No Dev - deployment smoke-test toolkit");
        },
        None => {
            // Default to running the suite with configured settings
            let code = env.run_suite(None, None).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
