//! ETHelper - dataset generator and local environment helper for the ETM
//!
//! Without a subcommand the web form is served. Every operation of the form
//! is also available as a subcommand for scripting.
//!
//! # Usage
//!
//! ```bash
//! # Serve the form on the configured address (default 127.0.0.1:8501)
//! ethelper
//!
//! # Generate output/data.csv for a preset, filling empty values with zeros
//! ethelper generate --preset fiji --fill zeros
//!
//! # Copy the dataset into the most recent ETLocal migration
//! ethelper migrate update
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ethelper::cli::{
    CliResult, CompletionArgs, ConfigArgs, DoctorArgs, EnvArgs, GenerateArgs, MigrateArgs,
    PresetsArgs, ShowArgs,
};

/// ETHelper - build ETM datasets from CSV presets and set up local services
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data root (overrides paths.data_root from config.toml)
    #[arg(long, global = true, value_name = "DIR")]
    data_root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web form (default)
    #[cfg(feature = "web")]
    Serve(ServeArgs),
    /// List available presets
    Presets(PresetsArgs),
    /// Show completion and form sections of a preset
    Completion(CompletionArgs),
    /// Write the dataset of a preset to output/data.csv
    Generate(GenerateArgs),
    /// Show output/data.csv as key/value pairs
    Show(ShowArgs),
    /// Export the dataset into an ETLocal migration
    Migrate(MigrateArgs),
    /// Set up ETEngine and ETModel locally
    Env(EnvArgs),
    /// Check the working environment
    Doctor(DoctorArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

/// Serve the web form
#[cfg(feature = "web")]
#[derive(clap::Args, Debug, Default)]
struct ServeArgs {
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides server.host)
    #[arg(long)]
    host: Option<String>,
}

#[cfg(feature = "web")]
impl ServeArgs {
    fn execute(&self, data_root: Option<&std::path::Path>) -> CliResult<()> {
        use ethelper::cli::common::load_config;
        use ethelper::cli::CliError;
        use std::net::SocketAddr;

        let config = load_config(data_root)?;
        let host = self.host.as_deref().unwrap_or(&config.server.host);
        let port = self.port.unwrap_or(config.server.port);

        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| CliError::validation(format!("Invalid address {host}:{port}: {e}")))?;

        tracing::info!("Data root: {}", config.paths.data_root.display());

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| CliError::io(format!("Failed to start runtime: {e}")))?;
        runtime
            .block_on(ethelper::web::run_server(config, addr))
            .map_err(|e| CliError::io(format!("Server error: {e:#}")))
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let data_root = cli.data_root.as_deref();

    match &cli.command {
        #[cfg(feature = "web")]
        Some(Command::Serve(args)) => args.execute(data_root),
        #[cfg(feature = "web")]
        None => ServeArgs::default().execute(data_root),
        #[cfg(not(feature = "web"))]
        None => {
            let _ = <Cli as clap::CommandFactory>::command().print_help();
            Ok(())
        }
        Some(Command::Presets(args)) => args.execute(data_root),
        Some(Command::Completion(args)) => args.execute(data_root),
        Some(Command::Generate(args)) => args.execute(data_root),
        Some(Command::Show(args)) => args.execute(data_root),
        Some(Command::Migrate(args)) => args.execute(data_root),
        Some(Command::Env(args)) => args.execute(data_root),
        Some(Command::Doctor(args)) => args.execute(data_root),
        Some(Command::Config(args)) => args.execute(data_root),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output on stdout stays parseable.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
