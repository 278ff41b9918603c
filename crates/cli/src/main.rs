//! Lessonforge CLI — the main entry point.
//!
//! Commands:
//! - `generate` — Generate a lesson plan for a topic
//! - `show`     — Print a stored lesson plan
//! - `list`     — List stored lesson plans
//! - `ingest`   — Add course material to the knowledge base
//! - `feedback` — Record feedback on a lesson
//! - `status`   — Show configuration and store status

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lessonforge",
    about = "Lessonforge — personalized lesson plan generation",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a lesson plan for a topic
    Generate {
        /// The lesson topic
        topic: String,

        /// Lesson duration in minutes (15-180)
        #[arg(short, long, default_value_t = 60)]
        duration: u32,

        /// Target difficulty: beginner, intermediate, or advanced
        #[arg(long, default_value = "intermediate")]
        difficulty: String,

        /// Learner age group, e.g. "10-12"
        #[arg(long)]
        age_group: Option<String>,

        /// The learner's prior knowledge
        #[arg(long)]
        prior_knowledge: Option<String>,

        /// A specific learning objective (repeatable)
        #[arg(long = "objective")]
        objectives: Vec<String>,

        /// Additional free-form context
        #[arg(long)]
        context: Option<String>,
    },

    /// Print a stored lesson plan
    Show {
        /// The lesson id
        lesson_id: String,
    },

    /// List stored lesson plans
    List {
        /// Maximum number of lessons to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Add course material files to the knowledge base
    Ingest {
        /// Plain text files to ingest (split into paragraphs)
        files: Vec<std::path::PathBuf>,
    },

    /// Record feedback on a lesson
    Feedback {
        /// The lesson id
        lesson_id: String,

        /// Rating from 1 to 5
        #[arg(short, long)]
        rating: u8,

        /// Free-form feedback text
        #[arg(short, long, default_value = "")]
        text: String,

        /// Mark the lesson as helpful
        #[arg(long)]
        helpful: bool,
    },

    /// Show configuration and store status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Generate {
            topic,
            duration,
            difficulty,
            age_group,
            prior_knowledge,
            objectives,
            context,
        } => {
            commands::generate::run(
                topic,
                duration,
                difficulty,
                age_group,
                prior_knowledge,
                objectives,
                context,
            )
            .await?
        }
        Commands::Show { lesson_id } => commands::show::run(&lesson_id)?,
        Commands::List { limit } => commands::list::run(limit)?,
        Commands::Ingest { files } => commands::ingest::run(files).await?,
        Commands::Feedback {
            lesson_id,
            rating,
            text,
            helpful,
        } => commands::feedback::run(&lesson_id, rating, &text, helpful)?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
