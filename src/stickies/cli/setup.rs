use clap::{Parser, Subcommand, ValueEnum};
use stickies::query::SortMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stickies", bin_name = "stickies", version)]
#[command(about = "Sticky notes for the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the notes, their backup and config.json
    /// [default: $STICKIES_HOME, then the platform data directory]
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Only show notes whose text or timestamp contains TERM
    #[arg(
        short,
        long,
        global = true,
        value_name = "TERM",
        help_heading = "Options"
    )]
    pub search: Option<String>,

    /// Order of listed notes [default: from config, else date-desc]
    #[arg(long, global = true, value_enum, help_heading = "Options")]
    pub sort: Option<SortArg>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Newest first
    DateDesc,
    /// Oldest first
    DateAsc,
    /// By text, ignoring case
    Alpha,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::DateDesc => SortMode::DateDescending,
            SortArg::DateAsc => SortMode::DateAscending,
            SortArg::Alpha => SortMode::Alphabetical,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a note
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Note text (words are joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// List notes
    #[command(alias = "ls", display_order = 2)]
    List,

    /// List notes containing a term
    #[command(display_order = 3)]
    Search { term: String },

    /// Replace the text of a note
    #[command(alias = "e", display_order = 10)]
    Edit {
        /// Index of the note as shown by list (same --search/--sort)
        index: String,

        /// New text
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Delete one or more notes
    #[command(alias = "rm", display_order = 11)]
    Delete {
        /// Indexes of the notes (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Write every note to a file
    #[command(display_order = 20)]
    Export {
        path: PathBuf,

        /// Only the notes of the current listing (--search, --sort)
        #[arg(long)]
        listed: bool,
    },

    /// Append the notes of a JSON export
    #[command(display_order = 21)]
    Import { path: PathBuf },

    /// Print the notes file as stored
    #[command(display_order = 22)]
    Raw,

    /// Replace all notes with a text log read from FILE or stdin
    #[command(display_order = 23)]
    Replace { file: Option<PathBuf> },

    /// Delete every note
    #[command(display_order = 24)]
    Clear,

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (e.g. format, default-sort)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Show where notes, backup and config live
    #[command(display_order = 31)]
    Paths,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_joins_words() {
        let cli = Cli::try_parse_from(["stickies", "add", "buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Add { text }) => assert_eq!(text.join(" "), "buy milk"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["stickies", "list", "--sort", "alpha", "-s", "milk"]).unwrap();
        assert_eq!(cli.sort, Some(SortArg::Alpha));
        assert_eq!(cli.search.as_deref(), Some("milk"));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn sort_names_match_sort_modes() {
        for mode in SortMode::all() {
            let arg = SortArg::from_str(&mode.to_string(), false).unwrap();
            assert_eq!(SortMode::from(arg), *mode);
        }
    }

    #[test]
    fn delete_alias_takes_many_indexes() {
        let cli = Cli::try_parse_from(["stickies", "rm", "1", "3"]).unwrap();
        match cli.command {
            Some(Commands::Delete { indexes }) => assert_eq!(indexes, vec!["1", "3"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn no_command_means_list() {
        let cli = Cli::try_parse_from(["stickies"]).unwrap();
        assert!(cli.command.is_none());
    }
}
