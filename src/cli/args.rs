use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "habitual", version, author, about = "Track habits, streaks and community challenges from the terminal")]
pub struct Cli {
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a config file with the chosen storage backend
    Init {
        /// Storage backend: sqlite or file
        #[arg(long, default_value = "sqlite")]
        backend: String,
        /// User id recorded on challenges
        #[arg(long)]
        user: Option<String>,
    },
    /// Add a new habit
    Add {
        /// Habit name
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Frequency: daily, weekly or custom
        #[arg(long, default_value = "daily")]
        freq: String,
        /// Weekdays for custom frequency, 0 = Sunday (e.g. 1,3,5)
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,
    },
    /// List habits with today's status and streaks
    List {
        /// Only habits owned by the configured user
        #[arg(long)]
        mine: bool,
    },
    /// Toggle completion of a habit for today or a given date
    Toggle {
        /// Habit id or name
        habit: String,
        /// Date to toggle (YYYY-MM-DD), defaults to today
        #[arg(long)]
        on: Option<String>,
    },
    /// Delete a habit
    Remove {
        /// Habit id or name
        habit: String,
    },
    /// Show aggregate statistics
    Stats {
        /// Show a dot grid of recent days per habit
        #[arg(long)]
        week: bool,
    },
    /// Suggest habits for goal categories
    Suggest {
        /// Categories: health, productivity, learning, fitness, mindfulness, social, other
        categories: Vec<String>,
        /// Add the suggested habits instead of only listing them
        #[arg(long)]
        add: bool,
    },
    /// Print habits and challenges as JSON
    Export,
    /// Community challenges
    Challenge {
        #[command(subcommand)]
        action: ChallengeCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChallengeCommands {
    /// Create a challenge
    Create {
        title: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "other")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Visible to everyone
        #[arg(long)]
        public: bool,
    },
    /// List challenges
    List {
        /// Only public challenges
        #[arg(long)]
        public: bool,
    },
    /// Join a challenge
    Join { id: String },
    /// Leave a challenge
    Leave { id: String },
    /// Mark a challenge day as done (or undo it)
    Mark {
        id: String,
        /// Day to mark (YYYY-MM-DD), defaults to today
        #[arg(long)]
        on: Option<String>,
        /// Remove the mark instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a challenge
    Delete { id: String },
}
