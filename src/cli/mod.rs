//! CLI module for kanflow
//!
//! Provides the command-line interface using clap.

pub mod commands;
mod context;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use context::BoardContext;

/// Kanflow - editorial Kanban workflow over a document store
#[derive(Parser, Debug)]
#[command(name = "kanflow")]
#[command(version)]
#[command(about = "Move documents through an editorial Kanban workflow")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preview operations without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a .kanflow board in the current directory
    Init {
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },

    /// Show every column and its documents in order
    Board {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Put a document on the board, in the first state
    Begin {
        /// Content document ID
        document: String,
    },

    /// Drag a document to a position in a column
    Move {
        /// Content document ID
        document: String,

        /// Destination state ID
        #[arg(long)]
        to: String,

        /// Position in the destination column (defaults to the end)
        #[arg(long)]
        index: Option<usize>,

        /// User performing the move
        #[arg(long = "as", value_name = "USER")]
        actor: String,
    },

    /// Change a document's state, keeping its position
    Transition {
        /// Content document ID
        document: String,

        /// Target state ID
        #[arg(long)]
        to: String,

        /// User performing the transition
        #[arg(long = "as", value_name = "USER")]
        actor: String,
    },

    /// Assign a user to a document
    Assign {
        /// Content document ID
        document: String,

        /// User ID
        user: String,
    },

    /// Remove a user from a document's assignees
    Unassign {
        /// Content document ID
        document: String,

        /// User ID
        user: String,
    },

    /// Remove every assignee from a document
    ClearAssignees {
        /// Content document ID
        document: String,
    },

    /// Take a document in the last state off the board
    Complete {
        /// Content document ID
        document: String,
    },

    /// Check workflow metadata and optionally repair one category
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Category to repair (undefinedState, invalidAssignees, missingRank,
        /// duplicateRank, orphanedMetadata) or resetOrder
        #[arg(long, value_name = "CATEGORY")]
        fix: Option<String>,
    },
}
