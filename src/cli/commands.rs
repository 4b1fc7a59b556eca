use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "showquiz")]
#[command(version, about = "Trivia quiz API and venue booking site")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./showquiz.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the config
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and seed the default categories
    Init,

    /// List trivia categories, or add one
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage trivia questions
    Questions(QuestionsCommand),

    /// Find questions whose text contains a term (case-insensitive)
    Search {
        term: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw a random question that has not been asked yet
    Quiz {
        /// Category ID, 0 for any category
        #[arg(long, default_value_t = 0)]
        category: i64,

        /// IDs of questions already asked (can be specified multiple times)
        #[arg(long = "previous", short = 'p')]
        previous: Vec<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one of the HTTP servers
    Serve {
        #[arg(value_enum)]
        app: ServeApp,

        /// Host to bind, overriding the config
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding the config
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ServeApp {
    /// Trivia JSON API
    Trivia,
    /// Venue/artist/show booking site
    Booking,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesAction {
    /// Add a category
    Add {
        /// Category name, e.g. "Music"
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct QuestionsCommand {
    #[command(subcommand)]
    pub action: QuestionsAction,
}

#[derive(Subcommand, Debug)]
pub enum QuestionsAction {
    /// List one page of questions
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a question
    Add {
        /// Question text
        question: String,

        #[arg(long)]
        answer: String,

        /// Category ID
        #[arg(long)]
        category: i64,

        /// Difficulty score (1-5)
        #[arg(long)]
        difficulty: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a question by ID
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}
