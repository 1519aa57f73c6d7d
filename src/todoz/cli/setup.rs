use clap::{Parser, Subcommand};
use todoz::api::StatusFilter;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "todoz",
    bin_name = "todoz",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "A small todo list, seeded once from the web and kept locally", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Never fetch the remote seed
    #[arg(long, global = true, help_heading = "Options")]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List todos (default)
    #[command(alias = "ls")]
    List {
        /// Only open todos
        #[arg(long, conflicts_with = "completed")]
        active: bool,

        /// Only completed todos
        #[arg(long)]
        completed: bool,
    },

    /// Add a todo
    #[command(alias = "a")]
    Add {
        /// Title words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Mark todos done, or open again
    #[command(alias = "t")]
    Toggle {
        /// Ids of the todos (e.g. 1 4)
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        ids: Vec<i64>,
    },

    /// Delete todos
    #[command(alias = "rm")]
    Delete {
        /// Ids of the todos (e.g. 1 4)
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        ids: Vec<i64>,
    },

    /// Forget the local list; the next run fetches the seed again
    Reset,

    /// Re-render whenever another process changes the list
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },

    /// Print the path of the storage file
    Path,

    /// Get or set configuration
    Config {
        /// Configuration key (seed-url, seed-limit, fetch-timeout, storage-key)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

pub fn status_filter(active: bool, completed: bool) -> StatusFilter {
    match (active, completed) {
        (true, _) => StatusFilter::Active,
        (_, true) => StatusFilter::Completed,
        _ => StatusFilter::All,
    }
}
