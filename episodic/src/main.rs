use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a session
    Session {
        /// Parameter file, YAML or JSON
        #[arg(long)]
        config: PathBuf,

        /// SVG file of the reward plot, written if plotting is enabled
        #[arg(long, default_value = "rewards.svg")]
        plot_path: PathBuf,
    },

    /// Run sessions differing in some options and plot their rewards together
    Experiment {
        /// Parameter file, YAML or JSON
        #[arg(long)]
        config: PathBuf,

        /// SVG file of the reward plot
        #[arg(long, default_value = "experiment.svg")]
        plot_path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Session { config, plot_path } => {
            episodic::run_session(config, plot_path)?;
        }
        Command::Experiment { config, plot_path } => {
            episodic::run_experiment(config, plot_path)?;
        }
    }

    Ok(())
}
