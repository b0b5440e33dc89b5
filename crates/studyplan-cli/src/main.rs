//! studyplan CLI: plans, rankings and peer matches from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "studyplan",
    version,
    about = "Study plans, resource rankings and peer matches for students"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads a dataset.
#[derive(Args, Clone)]
pub struct DataArgs {
    /// Dataset file (.toml or .json) or directory
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate a study budget across a student's weak concepts
    Plan {
        #[command(flatten)]
        data: DataArgs,

        /// Student id
        #[arg(long)]
        student: String,

        /// Total minutes to allocate (overrides config)
        #[arg(long)]
        minutes: Option<u32>,

        /// Allocation slice in minutes (overrides config)
        #[arg(long)]
        slice: Option<u32>,
    },

    /// Rank the resources of a concept by fit
    Rank {
        #[command(flatten)]
        data: DataArgs,

        /// Concept id
        #[arg(long)]
        concept: String,

        /// Take mastery from this student's record for the concept
        #[arg(long, conflicts_with = "mastery")]
        student: Option<String>,

        /// Current mastery in [0, 1]
        #[arg(long)]
        mastery: Option<f64>,

        /// Preferred difficulty (1-5, overrides config; adapts to mastery when unset)
        #[arg(long)]
        target_difficulty: Option<f64>,

        /// Preferred tags, comma-separated (overrides config)
        #[arg(long)]
        tags: Option<String>,
    },

    /// List the most similar peers of a student
    Peers {
        #[command(flatten)]
        data: DataArgs,

        /// Student id
        #[arg(long)]
        student: String,
    },

    /// Search concepts by name and course title
    Search {
        #[command(flatten)]
        data: DataArgs,

        /// Free-text query
        #[arg(long)]
        query: String,

        /// Maximum number of hits
        #[arg(long, default_value = "5")]
        top_k: usize,

        /// Show this student's mastery next to each hit
        #[arg(long)]
        student: Option<String>,
    },

    /// Show courses, weakest concepts and the next free slot of a student
    Profile {
        #[command(flatten)]
        data: DataArgs,

        /// Student id
        #[arg(long)]
        student: String,

        /// Day to look for a free slot from (Mon..Sun, default today)
        #[arg(long)]
        day: Option<String>,

        /// Hour of day to look for a free slot from (default now)
        #[arg(long)]
        hour: Option<u32>,
    },

    /// Plan, resources and peers for a student in one report
    Recommend {
        #[command(flatten)]
        data: DataArgs,

        /// Student id
        #[arg(long)]
        student: String,
    },

    /// Validate a dataset
    Validate {
        /// Dataset file or directory
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Create starter config and example dataset
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyplan=info".parse().unwrap())
                .add_directive("studyplan_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            data,
            student,
            minutes,
            slice,
        } => commands::plan::execute(data, student, minutes, slice),
        Commands::Rank {
            data,
            concept,
            student,
            mastery,
            target_difficulty,
            tags,
        } => commands::rank::execute(data, concept, student, mastery, target_difficulty, tags),
        Commands::Peers { data, student } => commands::peers::execute(data, student),
        Commands::Search {
            data,
            query,
            top_k,
            student,
        } => commands::search::execute(data, query, top_k, student),
        Commands::Profile {
            data,
            student,
            day,
            hour,
        } => commands::profile::execute(data, student, day, hour),
        Commands::Recommend { data, student } => commands::recommend::execute(data, student),
        Commands::Validate { dataset } => commands::validate::execute(dataset),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
