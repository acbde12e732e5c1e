//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Content-strategy workbench: keyword taxonomies, tri-state curation, and
/// versioned sub-project saves
#[derive(Parser, Debug)]
#[command(name = "keywork")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh taxonomy from seed keywords
    Generate {
        /// Seed keywords (repeatable)
        #[arg(short, long = "seed", required = true)]
        seeds: Vec<String>,

        /// Free-form generation instructions
        #[arg(short, long, default_value = "")]
        instructions: String,
    },

    /// Show the taxonomy tree with selection markers
    Tree {
        /// Only level-1 groups in this category
        #[arg(long)]
        category: Option<String>,

        /// Only level-1 groups with this page kind (legacy labels accepted)
        #[arg(long)]
        page_kind: Option<String>,

        /// Only level-2 keywords whose stage label starts with this prefix
        #[arg(long)]
        stage: Option<String>,
    },

    /// Toggle a node's selection (cascades to descendants and ancestors)
    Toggle {
        /// Node identifier, e.g. l1-0-l2-1
        node_id: String,

        /// Deselect instead of select
        #[arg(long)]
        off: bool,
    },

    /// Fetch supplementary LSI terms for a level-2 keyword
    Augment {
        /// Level-2 node identifier, e.g. l1-0-l2-1
        node_id: String,
    },

    /// Translate nodes into the configured target language
    Translate {
        /// Node identifiers; all nodes when omitted
        node_ids: Vec<String>,
    },

    /// Save the selected subset as a versioned sub-project
    Save {
        /// Sub-project name
        #[arg(short, long)]
        name: String,

        /// Existing parent project id
        #[arg(short, long, conflicts_with = "new_project")]
        project: Option<String>,

        /// Create a new parent project with this name
        #[arg(long)]
        new_project: Option<String>,
    },

    /// List projects and their saved sub-projects
    Projects,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default config file
    Init,
    /// Show effective settings
    Show,
}
