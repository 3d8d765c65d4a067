//! Command dispatch: one handler per subcommand, all I/O through the container.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{
    chart_option, ApplicationError, IoResultExt, LoadedTree, Source, TreeOptionBuilder,
    TreeRenderer,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, DashboardCommands, TreeCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{
    DashboardData, DomainError, EvolutionTree, TooltipFormatter, TooltipStyle,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;
use crate::infrastructure::InfraError;

/// Written by `config init` when neither `--global` nor `--config` is given.
pub const LOCAL_CONFIG_FILE: &str = "evotree.toml";

const BROWSE_PROMPT: &str = "toggle> ";

/// Labels for the levels the generator produces.
const DEPTH_LABELS: [&str; 4] = ["root", "base models", "level-1 topics", "models"];

pub fn execute(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { command }) => execute_tree(command, container),
        Some(Commands::Dashboard { command }) => execute_dashboard(command, container),
        Some(Commands::Config { command }) => {
            execute_config(command, cli.config.as_deref(), container)
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "evotree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `evotree --help`".to_string(),
        )),
    }
}

// ============================================================
// TREE
// ============================================================

fn execute_tree(command: &TreeCommands, container: &ServiceContainer) -> CliResult<()> {
    let settings = &container.settings;
    match command {
        TreeCommands::Show {
            source,
            depth,
            expand,
            collapse,
            all,
            collapse_all,
            sizes,
        } => {
            let mut loaded = load_tree(container, source.as_deref(), *depth)?;
            if *all {
                loaded.expansion.expand_all();
            }
            if *collapse_all {
                loaded.expansion.collapse_all();
            }
            for path in expand {
                loaded.expand(path)?;
            }
            for path in collapse {
                loaded.collapse(path)?;
            }
            let mut renderer = TreeRenderer::new();
            if *sizes {
                renderer = renderer.with_symbol_sizes(settings.symbol_policy());
            }
            output::info(&renderer.render(&loaded.tree, &loaded.expansion));
            Ok(())
        }
        TreeCommands::Tooltip { path, source, html } => {
            let loaded = load_tree(container, source.as_deref(), None)?;
            let style = if *html {
                TooltipStyle::Html
            } else {
                TooltipStyle::Plain
            };
            output::info(&tooltip(&loaded, path, style, settings.tree.max_desc_len)?);
            Ok(())
        }
        TreeCommands::Stats { source } => {
            let loaded = load_tree(container, source.as_deref(), None)?;
            let stats = loaded.tree.stats();
            output::header(&format!("{} ({} levels)", loaded.tree.root_name(), stats.depth()));
            for (depth, count) in stats.per_depth.iter().enumerate() {
                let label = DEPTH_LABELS.get(depth).copied().unwrap_or("deeper");
                output::detail(&format!("depth {depth} {label}: {count}"));
            }
            output::detail(&format!("leaves: {}", stats.leaves));
            output::detail(&format!("total: {}", stats.total));
            Ok(())
        }
        TreeCommands::Leaves { source } => {
            let loaded = load_tree(container, source.as_deref(), None)?;
            for line in leaf_lines(&loaded.tree) {
                output::info(&line);
            }
            Ok(())
        }
        TreeCommands::ChartOption {
            source,
            depth,
            pretty,
        } => {
            let loaded = load_tree(container, source.as_deref(), *depth)?;
            let mut chart = settings.tree.chart_settings();
            if let Some(depth) = depth {
                chart.initial_depth = *depth;
            }
            let option = TreeOptionBuilder::new(&loaded.tree, &loaded.expansion)
                .symbols(settings.symbol_policy())
                .max_desc_len(settings.tree.max_desc_len)
                .settings(chart)
                .build();
            output::info(&to_json(&option, *pretty)?);
            Ok(())
        }
        TreeCommands::Browse { source } => {
            let mut loaded = load_tree(container, source.as_deref(), None)?;
            browse(&mut loaded, container)?;
            output::info(&TreeRenderer::new().render(&loaded.tree, &loaded.expansion));
            Ok(())
        }
    }
}

fn tree_source(container: &ServiceContainer, source: Option<&str>) -> Source {
    source
        .map(Source::parse)
        .unwrap_or_else(|| container.settings.tree_source())
}

/// Mount a view, run its single load and take the tree out of it.
#[instrument(level = "debug", skip(container))]
fn load_tree(
    container: &ServiceContainer,
    source: Option<&str>,
    depth: Option<usize>,
) -> CliResult<LoadedTree> {
    let source = tree_source(container, source);
    let depth = depth.unwrap_or(container.settings.tree.initial_depth);
    let view = container.tree_service.open(&source, depth);
    if let Some(message) = view.state().status_message() {
        output::status(message);
    }
    Ok(view.into_loaded()?)
}

/// One tab-separated line per leaf: name path, positional path, year, topic.
/// Both paths resolve back to the leaf with `tree tooltip`.
pub fn leaf_lines(tree: &EvolutionTree) -> Vec<String> {
    tree.leaf_nodes()
        .into_iter()
        .filter_map(|idx| {
            let attrs = tree.get_node(idx)?.attributes()?;
            Some(format!(
                "{}\t{}\t{}\t{}",
                tree.path_of(idx)?,
                tree.index_path_of(idx)?,
                attrs.year,
                attrs.topic
            ))
        })
        .collect()
}

/// Tooltip text of the node at `path`.
pub fn tooltip(
    loaded: &LoadedTree,
    path: &str,
    style: TooltipStyle,
    max_desc_len: usize,
) -> CliResult<String> {
    let idx = loaded.tree.find(path)?;
    let node = loaded
        .tree
        .get_node(idx)
        .ok_or_else(|| DomainError::NodeNotFound(path.to_string()))?;
    Ok(TooltipFormatter::new(max_desc_len, style).format_in(&loaded.tree, node))
}

/// Picker entries for the visible nodes. The positional path keeps every
/// display line unique even when names repeat.
fn browse_items(loaded: &LoadedTree) -> Vec<SelectionItem> {
    loaded
        .expansion
        .visible_nodes(&loaded.tree)
        .into_iter()
        .filter_map(|idx| {
            let node = loaded.tree.get_node(idx)?;
            let index_path = loaded.tree.index_path_of(idx)?;
            let marker = match (node.children.is_empty(), loaded.expansion.is_expanded(idx)) {
                (true, _) => "   ",
                (false, true) => "[-]",
                (false, false) => "[+]",
            };
            Some(SelectionItem {
                display: format!(
                    "{}{} {}  {}",
                    "  ".repeat(node.depth),
                    marker,
                    node.name,
                    index_path
                ),
                value: index_path,
            })
        })
        .collect()
}

/// Toggle branches until the picker is cancelled; picking a leaf prints its tooltip.
#[instrument(level = "debug", skip_all)]
pub fn browse(loaded: &mut LoadedTree, container: &ServiceContainer) -> CliResult<()> {
    let max_desc_len = container.settings.tree.max_desc_len;
    loop {
        let items = browse_items(loaded);
        let selected = container
            .selector
            .select_one(&items, BROWSE_PROMPT)
            .map_err(|message| InfraError::Selector { message })?;
        let Some(item) = selected else {
            debug!("browse: cancelled");
            return Ok(());
        };
        let idx = loaded.tree.find(&item.value)?;
        let Some(node) = loaded.tree.get_node(idx) else {
            continue;
        };
        let (is_leaf, has_children) = (node.is_leaf(), !node.children.is_empty());
        if is_leaf {
            output::info(&tooltip(loaded, &item.value, TooltipStyle::Plain, max_desc_len)?);
        }
        if has_children || !is_leaf {
            let expanded = loaded.toggle(&item.value)?;
            debug!("browse: {} expanded={}", item.value, expanded);
        }
    }
}

// ============================================================
// DASHBOARD
// ============================================================

fn execute_dashboard(command: &DashboardCommands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        DashboardCommands::Summary { source } => {
            let data = load_dashboard(container, source.as_deref())?;
            let summary = container.dashboard_service.summary(&data);
            output::header("Dashboard");
            for line in summary.lines() {
                output::detail(&line);
            }
            Ok(())
        }
        DashboardCommands::ChartOption {
            chart,
            source,
            pretty,
        } => {
            let data = load_dashboard(container, source.as_deref())?;
            let option = chart_option(&data, (*chart).into());
            output::info(&to_json(&option, *pretty)?);
            Ok(())
        }
    }
}

fn load_dashboard(container: &ServiceContainer, source: Option<&str>) -> CliResult<DashboardData> {
    let source = source
        .map(Source::parse)
        .unwrap_or_else(|| container.settings.dashboard_source());
    Ok(container.dashboard_service.load(&source)?)
}

fn to_json(value: &serde_json::Value, pretty: bool) -> CliResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| {
        ApplicationError::OperationFailed {
            context: "serialize option".to_string(),
            source: Box::new(e),
        }
        .into()
    })
}

// ============================================================
// CONFIG
// ============================================================

fn execute_config(
    command: &ConfigCommands,
    explicit: Option<&Path>,
    container: &ServiceContainer,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = config_target(*global, explicit)?;
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .with_path_context("create config directory", &path)?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| describe_path(container, &p))
                .unwrap_or_else(|| "(no config directory)".to_string());
            output::action("global", &global);
            let local = explicit
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            output::action("local", &describe_path(container, &local));
            output::action(
                "env",
                &std::env::vars()
                    .map(|(k, _)| k)
                    .filter(|k| k.starts_with("EVOTREE_"))
                    .sorted()
                    .join(", "),
            );
            Ok(())
        }
        ConfigCommands::Edit { global } => {
            let path = config_target(*global, explicit)?;
            if !container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "no config at {}, run `evotree config init` first",
                    path.display()
                )));
            }
            container
                .editor
                .open(&path)
                .map_err(|e| InfraError::Editor {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }
}

fn config_target(global: bool, explicit: Option<&Path>) -> CliResult<PathBuf> {
    if global {
        return global_config_path().ok_or_else(|| {
            CliError::from(ApplicationError::Config {
                message: "cannot determine config directory".to_string(),
            })
        });
    }
    Ok(explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE)))
}

fn describe_path(container: &ServiceContainer, path: &Path) -> String {
    if container.fs.exists(path) {
        format!("{}", path.display())
    } else {
        format!("{} (not found)", path.display())
    }
}
