use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod discover;
mod output;
mod run;
mod state;

use config::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "otpx",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("OTPX_BUILD_SHA"), ")"),
    about = "Extract transaction records from OTP bank statement PDFs"
)]
struct Cli {
    /// Config file (default: ~/.otpx/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from a PDF, a directory of PDFs, or a glob pattern
    Extract {
        source: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write a CSV header row
        #[arg(long)]
        header: bool,

        /// Documents processed concurrently
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Abort on the first unreadable document
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the statement term of each document
    Meta {
        source: String,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config (no-op if it exists)
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_file = cli.config.as_deref();

    match cli.command {
        Command::Extract {
            source,
            out,
            format,
            header,
            jobs,
            fail_fast,
        } => {
            let mut cfg = config::load_config(config_file)?;
            if let Some(format) = format {
                cfg.output.format = format;
            }
            if let Some(jobs) = jobs {
                cfg.run.jobs = jobs;
            }
            cfg.output.header |= header;
            cfg.run.fail_fast |= fail_fast;
            if cfg.run.jobs == 0 {
                bail!("--jobs must be at least 1");
            }

            let summary = run::extract_all(&source, out.as_deref(), &cfg)
                .await
                .with_context(|| format!("extracting {}", source))?;
            log::info!("{}", summary);
        }

        Command::Meta { source, out } => {
            let cfg = config::load_config(config_file)?;
            run::meta_all(&source, out.as_deref(), &cfg)
                .await
                .with_context(|| format!("reading {}", source))?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_file)?,
            ConfigCommand::Show => config::show_config(&config::load_config(config_file)?)?,
        },
    }

    Ok(())
}
