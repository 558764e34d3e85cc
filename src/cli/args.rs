//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::LayoutStrategy;

/// Binary tree and linked-list layout for algorithm visualizations
#[derive(Parser, Debug)]
#[command(name = "treeviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.treeviz.toml when present)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print node positions and arrows
    Layout {
        #[command(flatten)]
        source: TreeSource,
        #[command(flatten)]
        spacing: SpacingArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print a traversal order
    Traverse {
        #[command(flatten)]
        source: TreeSource,
        /// Traversal order
        #[arg(short, long, value_enum, default_value_t = Order::Bfs)]
        order: Order,
        /// Start at the first node with this label (left-first pre-order)
        #[arg(long)]
        from: Option<String>,
    },

    /// Draw the tree in the terminal
    Show {
        #[command(flatten)]
        source: TreeSource,
        /// Mark nodes whose label already appeared earlier (memoization hits)
        #[arg(long)]
        repeats: bool,
    },

    /// Lay out a linked list
    Chain {
        /// Item labels, head first
        items: Vec<String>,
        /// Distance between consecutive items
        #[arg(long)]
        buff: Option<f64>,
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

/// Where the tree comes from; exactly one source is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TreeSource {
    /// Tree expression, e.g. 'f(2) { f(1), f(0) }'
    #[arg(short, long)]
    pub expr: Option<String>,

    /// TOML tree file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Fibonacci call tree rooted at f(N)
    #[arg(long, value_name = "N")]
    pub fib: Option<u32>,
}

/// Overrides for the layout section of the settings.
#[derive(Args, Debug, Clone, Default)]
pub struct SpacingArgs {
    /// Horizontal spacing unit
    #[arg(long)]
    pub hbuff: Option<f64>,

    /// Vertical distance between levels
    #[arg(long)]
    pub vbuff: Option<f64>,

    /// Width allocation strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Center the bounding box on the origin (`--center false` overrides the config)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub center: Option<bool>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Halving,
    Compact,
}

impl From<StrategyArg> for LayoutStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Halving => LayoutStrategy::Halving,
            StrategyArg::Compact => LayoutStrategy::Compact,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// One line per breadth-first layer
    Layers,
    Bfs,
    DfsLeft,
    DfsRight,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config instead of ./.treeviz.toml
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
