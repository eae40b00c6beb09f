//! Verisign CLI - attest and look up content fingerprints in a registry journal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;
mod config;
mod error;
mod keyfile;
mod output;
mod path;

use commands::{attest, check, content_fingerprint, hash, keygen, lookup};
use config::{Config, DEFAULT_LOG_LEVEL};
use error::CliError;

#[derive(Parser)]
#[command(name = "verisign")]
#[command(about = "Write-once content attestation registry CLI")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, env = "VERISIGN_CONFIG")]
    config: Option<PathBuf>,
    /// Log filter, e.g. warn, info, verisign_store=debug (default: warn)
    #[arg(long, global = true, env = "VERISIGN_LOG")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a signing key file and print its creator id
    Keygen {
        /// Path of the key file to create
        out: PathBuf,
        /// Replace an existing key file
        #[arg(long)]
        force: bool,
    },
    /// Print the SHA-256 fingerprint of a file
    Hash {
        /// File to hash
        file: PathBuf,
    },
    /// Attest content as the key holder
    Attest {
        /// File whose SHA-256 is attested
        #[arg(conflicts_with = "fingerprint")]
        input: Option<PathBuf>,
        /// Fingerprint as 64 hex digits, optionally 0x-prefixed
        #[arg(long)]
        fingerprint: Option<String>,
        /// Signing key file
        #[arg(long, env = "VERISIGN_KEY")]
        key: Option<PathBuf>,
        /// Registry journal
        #[arg(long, env = "VERISIGN_REGISTRY")]
        registry: Option<PathBuf>,
        /// Fsync the journal after the write
        #[arg(long)]
        sync: bool,
        /// Recover from a torn trailing frame instead of failing
        #[arg(long)]
        permissive: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show who attested content and when
    Lookup {
        /// File whose SHA-256 is looked up
        #[arg(conflicts_with = "fingerprint")]
        input: Option<PathBuf>,
        /// Fingerprint as 64 hex digits, optionally 0x-prefixed
        #[arg(long)]
        fingerprint: Option<String>,
        /// Registry journal
        #[arg(long, env = "VERISIGN_REGISTRY")]
        registry: Option<PathBuf>,
        /// Ignore a torn trailing frame instead of failing
        #[arg(long)]
        permissive: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify registry journal invariants
    Check {
        /// Registry journal
        #[arg(long, env = "VERISIGN_REGISTRY")]
        registry: Option<PathBuf>,
        /// Report a torn trailing frame instead of failing
        #[arg(long)]
        permissive: bool,
        /// Exit with error code if any invariant is violated
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, config: &Config) -> Result<(), CliError> {
    match command {
        Commands::Keygen { out, force } => keygen::run(out, force),
        Commands::Hash { file } => hash::run(file),
        Commands::Attest {
            input,
            fingerprint,
            key,
            registry,
            sync,
            permissive,
            json,
        } => attest::run(
            content_fingerprint(input, fingerprint)?,
            config.key(key)?,
            config.registry(registry)?,
            config.store_options(sync, permissive),
            json,
        ),
        Commands::Lookup {
            input,
            fingerprint,
            registry,
            permissive,
            json,
        } => lookup::run(
            content_fingerprint(input, fingerprint)?,
            config.registry(registry)?,
            config.read_mode(permissive),
            json,
        ),
        Commands::Check {
            registry,
            permissive,
            strict,
            json,
        } => check::run(
            config.registry(registry)?,
            config.read_mode(permissive),
            strict,
            json,
        ),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = Config::load(cli.config.as_deref()).and_then(|config| {
        init_tracing(&config.log_level(cli.log_level));
        run(cli.command, &config)
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
