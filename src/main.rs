use clap::{Parser, Subcommand};
use git_tutorial::commands::*;
use git_tutorial::core::{error::Result, print_error};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-tutorial")]
#[command(about = "Step through code tutorials stored in git history")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a tutorial from a local repository or a remote URL
    Load {
        /// Path to a working tree, or an http(s)/ssh/git URL to clone
        source: String,
    },
    /// Check a tutorial config file and report every problem
    Validate {
        /// tutorial.yaml, tutorial.yml or tutorial.json
        file: PathBuf,
    },
    /// Show the step tree with progress markers
    Steps,
    /// Check out a step
    Goto {
        step_id: String,
        /// Stash uncommitted changes first
        #[arg(long, conflicts_with = "discard")]
        stash: bool,
        /// Throw away uncommitted changes first
        #[arg(long)]
        discard: bool,
    },
    /// Check out the step after the current one
    Next {
        #[arg(long, conflicts_with = "discard")]
        stash: bool,
        #[arg(long)]
        discard: bool,
    },
    /// Show the changes a step introduces
    Diff {
        /// Step to show (defaults to the current step)
        step_id: Option<String>,
        /// Compare against this step instead of the parent
        #[arg(long)]
        from: Option<String>,
        /// Only list changed files
        #[arg(long)]
        stat: bool,
    },
    /// Print a step's explanation
    Explain {
        /// Step to explain (defaults to the current step)
        step_id: Option<String>,
    },
    /// Show completion progress
    Progress,
    /// Clear progress for the open tutorial
    Reset,
    /// Restore changes stashed by a navigation
    Unstash,
    /// Forget the open tutorial
    Close,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag, RUST_LOG still wins when set
    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli.command) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let paths = SessionPaths::from_env;
    match command {
        Commands::Load { source } => execute_load(&paths()?, &source),
        Commands::Validate { file } => execute_validate(&file),
        Commands::Steps => execute_steps(&paths()?),
        Commands::Goto {
            step_id,
            stash,
            discard,
        } => execute_goto(&paths()?, &step_id, resolution_from_flags(stash, discard)),
        Commands::Next { stash, discard } => {
            execute_next(&paths()?, resolution_from_flags(stash, discard))
        }
        Commands::Diff {
            step_id,
            from,
            stat,
        } => execute_diff(&paths()?, step_id, from, stat),
        Commands::Explain { step_id } => execute_explain(&paths()?, step_id),
        Commands::Progress => execute_progress(&paths()?),
        Commands::Reset => execute_reset(&paths()?),
        Commands::Unstash => execute_unstash(&paths()?),
        Commands::Close => execute_close(&paths()?),
    }
}
