use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recite", about = "Vocabulary drills with wrong-word retry and TTS")]
pub struct Cli {
    /// JSON config profile overriding env/default config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show an owner's wrong-word retry pool
    List {
        #[arg(long)]
        owner: String,
    },
    /// Empty an owner's wrong-word retry pool
    Clear {
        #[arg(long)]
        owner: String,
    },
    /// Run a drill over a unit data file, or over the retry pool itself
    Drill {
        /// JSON file holding an array of units
        #[arg(long, required_unless_present = "wrong_words")]
        data: Option<PathBuf>,

        /// Unit name to drill; defaults to the first unit in the file
        #[arg(long)]
        unit: Option<String>,

        /// Drill the wrong-word pool of --owner instead of a data file
        #[arg(long, requires = "owner")]
        wrong_words: bool,

        #[arg(long)]
        owner: Option<String>,
    },
    /// Resolve text to pronunciation audio and report the URL
    Say { text: String },
}
