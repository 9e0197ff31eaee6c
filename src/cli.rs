//! Command-line interface. Without a subcommand the TUI starts.

use clap::{Parser, Subcommand};

use crate::models::Language;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Dispatch a single topic brief and print it
    Track {
        /// Subject to investigate
        topic: String,

        /// Output language (English, Hindi, Marathi)
        #[arg(short, long)]
        language: Option<Language>,

        /// Restrict to a publication; repeat for several
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Also consult e-paper editions
        #[arg(long)]
        epapers: bool,

        /// Extra instructions for the brief
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Fetch the top-headlines wire digest
    Wire {
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Run the daily dispatch over active watchlist topics
    Dispatch,
}
