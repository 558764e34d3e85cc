//! Command dispatch and the data each command prints

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::args::{
    Cli, Commands, ConfigCommands, Order, OutputFormat, SpacingArgs, TreeSource,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    fib_call_tree, parse_tree, BinaryTree, BinaryTreeLayout, ChainLayout, DomainError,
    DomainResult, LayoutStrategy, NodeId, Position, Side, TreeDisplay, TreeSpec,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Layout {
            source,
            spacing,
            format,
        }) => cmd_layout(cli, source, spacing, *format),
        Some(Commands::Traverse {
            source,
            order,
            from,
        }) => cmd_traverse(source, *order, from.as_deref()),
        Some(Commands::Show { source, repeats }) => cmd_show(source, *repeats),
        Some(Commands::Chain { items, buff }) => cmd_chain(cli, items, *buff),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Builds the tree named by exactly one source.
#[instrument(level = "debug")]
pub fn load_tree(source: &TreeSource) -> CliResult<BinaryTree> {
    let tree = match (&source.expr, &source.file, source.fib) {
        (Some(expr), None, None) => parse_tree(expr)?,
        (None, Some(path), None) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("read {}", path.display()), e))?;
            TreeSpec::from_toml(&content)?.build()?
        }
        (None, None, Some(n)) => fib_call_tree(n)?,
        _ => {
            return Err(CliError::InvalidArgs(
                "exactly one of --expr, --file or --fib is required".into(),
            ))
        }
    };
    debug!(nodes = tree.len(), depth = tree.depth(), "tree loaded");
    Ok(tree)
}

/// Loads the layered settings and applies command-line overrides.
pub fn resolve_settings(config_file: Option<&Path>, spacing: &SpacingArgs) -> CliResult<Settings> {
    let mut settings = Settings::load(config_file)?;
    if let Some(hbuff) = spacing.hbuff {
        settings.layout.hbuff = hbuff;
    }
    if let Some(vbuff) = spacing.vbuff {
        settings.layout.vbuff = vbuff;
    }
    if let Some(strategy) = spacing.strategy {
        settings.layout.strategy = strategy.into();
    }
    if let Some(center) = spacing.center {
        settings.layout.center = center;
    }
    Ok(settings)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub strategy: LayoutStrategy,
    pub hbuff: f64,
    pub vbuff: f64,
    pub nodes: Vec<NodeReport>,
    pub arrows: Vec<ArrowReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub label: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowReport {
    pub parent: String,
    pub child: String,
    pub side: Side,
    pub from: [f64; 2],
    pub to: [f64; 2],
}

/// Lays out `tree` with `settings` and collects nodes (breadth-first) and arrows.
#[instrument(level = "debug", skip(tree))]
pub fn layout_report(tree: &BinaryTree, settings: &Settings) -> DomainResult<LayoutReport> {
    let layout = BinaryTreeLayout::compute(tree, settings.spacing()?, settings.layout.strategy)?;
    let placed = if settings.layout.center {
        layout.centered()?
    } else {
        layout.positions()?
    };
    let by_id: HashMap<NodeId, Position> = placed.iter().copied().collect();
    let lookup = |id: NodeId| by_id.get(&id).copied().ok_or(DomainError::NotLaidOut(id));
    let label = |id: NodeId| tree.label(id).unwrap_or_default().to_string();

    let nodes = placed
        .iter()
        .map(|&(id, pos)| NodeReport {
            label: label(id),
            depth: tree.depth_of(id).unwrap_or_default(),
            x: pos.x,
            y: pos.y,
        })
        .collect();
    let arrows = tree
        .edges()
        .into_iter()
        .map(|edge| -> DomainResult<ArrowReport> {
            let from = lookup(edge.parent)?;
            let to = lookup(edge.child)?;
            Ok(ArrowReport {
                parent: label(edge.parent),
                child: label(edge.child),
                side: edge.side,
                from: [from.x, from.y],
                to: [to.x, to.y],
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(LayoutReport {
        strategy: layout.strategy(),
        hbuff: layout.spacing().hbuff(),
        vbuff: layout.spacing().vbuff(),
        nodes,
        arrows,
    })
}

/// Labels in the requested order, one entry per line (layers joined by spaces).
pub fn traversal_lines(tree: &BinaryTree, order: Order, from: Option<&str>) -> CliResult<Vec<String>> {
    let start = match from {
        Some(label) => tree.find_first(label).ok_or_else(|| {
            DomainError::invalid(format!("no node labelled '{}'", label))
        })?,
        None => match tree.root() {
            Some(root) => root,
            None => return Ok(Vec::new()),
        },
    };
    let label = |id: NodeId| tree.label(id).unwrap_or_default().to_string();

    let lines = match order {
        Order::Layers => tree
            .bfs_layers_from(start)
            .map(|layer| layer.into_iter().map(label).join(" "))
            .collect(),
        Order::Bfs => tree.bfs_from(start).map(label).collect(),
        Order::DfsLeft => tree.dfs_left_first_from(start).map(label).collect(),
        Order::DfsRight => tree.dfs_right_first_from(start).map(label).collect(),
    };
    Ok(lines)
}

#[instrument(level = "debug", skip(cli))]
fn cmd_layout(
    cli: &Cli,
    source: &TreeSource,
    spacing: &SpacingArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let tree = load_tree(source)?;
    let settings = resolve_settings(cli.config.as_deref(), spacing)?;
    let report = layout_report(&tree, &settings)?;

    match format {
        OutputFormat::Toml => {
            let text = toml::to_string(&report)
                .map_err(|e| DomainError::invalid(format!("serialize layout: {}", e)))?;
            output::info(&text);
        }
        OutputFormat::Text => {
            output::header(&format!(
                "Nodes ({}, hbuff={}, vbuff={})",
                report.strategy, report.hbuff, report.vbuff
            ));
            for node in &report.nodes {
                output::detail(&format!(
                    "{:<12} depth {:<3} {}",
                    node.label,
                    node.depth,
                    Position::new(node.x, node.y)
                ));
            }
            output::header("Arrows");
            for arrow in &report.arrows {
                output::detail(&format!(
                    "{} -> {} ({}) {} -> {}",
                    arrow.parent,
                    arrow.child,
                    arrow.side,
                    Position::new(arrow.from[0], arrow.from[1]),
                    Position::new(arrow.to[0], arrow.to[1])
                ));
            }
        }
    }
    Ok(())
}

#[instrument(level = "debug")]
fn cmd_traverse(source: &TreeSource, order: Order, from: Option<&str>) -> CliResult<()> {
    let tree = load_tree(source)?;
    for line in traversal_lines(&tree, order, from)? {
        output::info(&line);
    }
    Ok(())
}

#[instrument(level = "debug")]
fn cmd_show(source: &TreeSource, repeats: bool) -> CliResult<()> {
    let tree = load_tree(source)?;
    if !repeats {
        output::info(&tree.to_tree_string());
        return Ok(());
    }

    let repeated: HashSet<NodeId> = tree.repeated_subproblems().into_iter().collect();
    let rendered = tree.to_tree_string_with(|id| {
        let label = tree.label(id).unwrap_or_default();
        if repeated.contains(&id) {
            label.yellow().to_string()
        } else {
            label.to_string()
        }
    });
    output::info(&rendered);
    output::detail(&format!(
        "{} of {} calls repeat an earlier subproblem",
        repeated.len(),
        tree.len()
    ));
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_chain(cli: &Cli, items: &[String], buff: Option<f64>) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let chain = ChainLayout::new(items.iter().cloned(), buff.unwrap_or(settings.chain.buff))?;

    output::header(&format!("Items (buff={})", chain.buff()));
    for node in chain.nodes() {
        output::detail(&format!("{:<12} {}", node.label, node.position));
    }
    output::header("Links");
    for link in chain.links() {
        output::detail(&format!(
            "{} -> {} {} -> {}",
            chain.nodes()[link.from].label,
            chain.nodes()[link.to].label,
            link.start,
            link.end
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            let local = match &cli.config {
                Some(path) => path.clone(),
                None => local_config_path(&current_dir()?),
            };
            output::action("local", &local.display());
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("no global config directory on this platform".into())
                })?
            } else {
                local_config_path(&current_dir()?)
            };
            if path.exists() && !force {
                return Err(CliError::InvalidArgs(format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CliError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::default().to_toml()?)
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}

fn current_dir() -> CliResult<std::path::PathBuf> {
    std::env::current_dir().map_err(|e| CliError::io("resolve current directory", e))
}
