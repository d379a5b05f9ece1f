mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::hook::HookSubcommand;
use cmd::skill::SkillSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillkit",
    about = "Skill-learning lifecycle hooks and skill-repo maintenance for AI coding sessions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect from .git/)
    #[arg(long, global = true, env = "SKILLKIT_ROOT")]
    root: Option<PathBuf>,

    /// Marker file path (default: ~/.claude/.pending-skill-learning.json)
    #[arg(long, global = true, env = "SKILLKIT_MARKER")]
    marker: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lifecycle hooks: JSON in on stdin, JSON out on stdout
    Hook {
        #[command(subcommand)]
        subcommand: HookSubcommand,
    },

    /// Manage skill repositories
    Skill {
        #[command(subcommand)]
        subcommand: SkillSubcommand,
    },

    /// Symlink skills and root files from a source repo into a target
    Sync {
        /// Source .claude folder (default: $SKILLKIT_DIR/.claude, else
        /// ~/Documents/skillkit/.claude)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Target directory (default: current working directory)
        #[arg(long)]
        target: Option<PathBuf>,

        /// Overwrite existing symlinks and real entries
        #[arg(long)]
        force: bool,

        /// Show what would be done without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Stash, rebase, resolve, commit, and push pending repo changes
    Autocommit,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Hook { subcommand } => cmd::hook::run(subcommand, cli.marker.as_deref()),
        Commands::Skill { subcommand } => {
            let root = root::resolve_root(cli.root.as_deref());
            cmd::skill::run(&root, subcommand)
        }
        Commands::Sync {
            source,
            target,
            force,
            dry_run,
        } => cmd::sync::run(source.as_deref(), target.as_deref(), force, dry_run),
        Commands::Autocommit => {
            let root = root::resolve_root(cli.root.as_deref());
            cmd::autocommit::run(&root)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
