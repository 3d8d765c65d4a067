//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::ChartKind;

/// Evolution-tree viewer: explore AI innovation trees and export chart options
#[derive(Parser, Debug)]
#[command(name = "evotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect the evolution tree
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
    },

    /// Inspect the dashboard payload
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Show the visible tree
    Show {
        /// File path or http(s) URL (default: configured tree)
        #[arg(short, long)]
        source: Option<String>,
        /// Initial expansion depth (default: configured)
        #[arg(short, long)]
        depth: Option<usize>,
        /// Expand node (path like "Root/GPT" or "#0/1"), revealing its ancestors
        #[arg(short, long)]
        expand: Vec<String>,
        /// Collapse node
        #[arg(long)]
        collapse: Vec<String>,
        /// Expand every node first
        #[arg(short, long, conflicts_with = "collapse_all")]
        all: bool,
        /// Collapse every node first, leaving only the root
        #[arg(long)]
        collapse_all: bool,
        /// Append each node's symbol size
        #[arg(long)]
        sizes: bool,
    },

    /// Print a node's tooltip
    Tooltip {
        /// Node path
        path: String,
        #[arg(short, long)]
        source: Option<String>,
        /// Emit the chart markup instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Node counts per depth
    Stats {
        #[arg(short, long)]
        source: Option<String>,
    },

    /// List leaf models in tree order
    Leaves {
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Print the ECharts option for the tree
    #[command(name = "option")]
    ChartOption {
        #[arg(short, long)]
        source: Option<String>,
        /// Initial expansion depth (default: configured)
        #[arg(short, long)]
        depth: Option<usize>,
        #[arg(short, long)]
        pretty: bool,
    },

    /// Toggle nodes interactively (fzf)
    Browse {
        #[arg(short, long)]
        source: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DashboardCommands {
    /// Per-chart counts
    Summary {
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Print the ECharts option for one chart
    #[command(name = "option")]
    ChartOption {
        #[arg(value_enum)]
        chart: ChartArg,
        #[arg(short, long)]
        source: Option<String>,
        #[arg(short, long)]
        pretty: bool,
    },
}

/// Chart selector, named like the payload keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartArg {
    #[value(name = "evolution_l1", alias = "l1")]
    EvolutionL1,
    #[value(name = "evolution_nature", alias = "nature")]
    EvolutionNature,
    #[value(name = "model_influence", alias = "influence")]
    ModelInfluence,
    #[value(name = "sankey_flow", alias = "sankey")]
    SankeyFlow,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::EvolutionL1 => ChartKind::EvolutionL1,
            ChartArg::EvolutionNature => ChartKind::EvolutionNature,
            ChartArg::ModelInfluence => ChartKind::ModelInfluence,
            ChartArg::SankeyFlow => ChartKind::SankeyFlow,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,

    /// Edit config file
    Edit {
        /// Edit global config
        #[arg(short, long)]
        global: bool,
    },
}
