mod commands;
mod layout;
mod preset;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env, Target};

use preset::Preset;

#[derive(Parser)]
#[command(name = "calprint")]
#[command(about = "Generate printable calendar pages with events from ICS feeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render calendar pages for a date range
    Generate {
        /// Preset file (TOML or YAML)
        #[arg(short, long)]
        preset: PathBuf,

        /// First day to print (YYYY/MM/DD)
        #[arg(long)]
        start_date: String,

        /// Last day to print (YYYY/MM/DD)
        #[arg(long)]
        end_date: String,

        /// Output file, overriding the preset's
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the events the preset's feeds hold for a date range
    Events {
        /// Preset file (TOML or YAML)
        #[arg(short, long)]
        preset: PathBuf,

        /// Show events from this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            preset,
            start_date,
            end_date,
            output,
        } => {
            let preset = Preset::load(&preset)?;
            commands::generate::run(preset, &start_date, &end_date, output)
        }
        Commands::Events {
            preset,
            from,
            to,
            json,
        } => {
            let preset = Preset::load(&preset)?;
            commands::events::run(preset, from.as_deref(), to.as_deref(), json)
        }
    }
}
