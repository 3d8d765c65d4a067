//! Tests for command dispatch with mocked I/O seams

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use tempfile::TempDir;

use evotree::cli::commands::{browse, leaf_lines};
use evotree::cli::{execute, Cli};
use evotree::config::Settings;
use evotree::infrastructure::di::ServiceContainer;
use evotree::infrastructure::traits::{
    Editor, HttpClient, RealFileSystem, SelectionItem, Selector,
};
use evotree::util::testing;

struct OfflineHttpClient;

impl HttpClient for OfflineHttpClient {
    fn get_text(&self, _url: &str) -> Result<String, String> {
        Err("connection refused".to_string())
    }
}

/// Mock selector that picks scripted values in order, then cancels
struct MockSelector {
    script: Mutex<Vec<String>>,
    offered: Mutex<Vec<Vec<SelectionItem>>>,
}

impl MockSelector {
    fn new(values: &[&str]) -> Self {
        Self {
            script: Mutex::new(values.iter().rev().map(|v| v.to_string()).collect()),
            offered: Mutex::new(Vec::new()),
        }
    }

    fn offered(&self) -> Vec<Vec<SelectionItem>> {
        self.offered.lock().unwrap().clone()
    }
}

impl Selector for MockSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        _prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        self.offered.lock().unwrap().push(items.to_vec());
        match self.script.lock().unwrap().pop() {
            Some(value) => items
                .iter()
                .find(|i| i.value == value)
                .cloned()
                .map(Some)
                .ok_or_else(|| format!("{} not offered", value)),
            None => Ok(None),
        }
    }
}

/// Mock editor that records what file was opened
#[derive(Default)]
struct MockEditor {
    opened_files: Mutex<Vec<PathBuf>>,
}

impl Editor for MockEditor {
    fn open(&self, path: &Path) -> io::Result<()> {
        self.opened_files.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn resources() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources")
}

fn container(selector: Arc<dyn Selector>, editor: Arc<dyn Editor>) -> ServiceContainer {
    testing::init_test_setup();
    let settings = Settings {
        data_dir: resources(),
        tree_file: "no_hints_tree.json".to_string(),
        ..Settings::default()
    };
    ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(OfflineHttpClient),
        selector,
        editor,
    )
}

#[test]
fn given_scripted_picks_when_browsing_then_branches_toggle_and_leaves_keep_state() {
    // Arrange
    let selector = Arc::new(MockSelector::new(&["#0/0", "#0/0/1", "#0"]));
    let container = container(selector.clone(), Arc::new(MockEditor::default()));
    let mut loaded = container
        .tree_service
        .open(&container.settings.tree_source(), 1)
        .into_loaded()
        .unwrap();

    // Act
    browse(&mut loaded, &container).unwrap();

    // Assert
    let a = loaded.tree.find("Root/A").unwrap();
    let a1 = loaded.tree.find("Root/A/A1").unwrap();
    assert!(!loaded.expansion.is_expanded(a));
    assert!(loaded.expansion.is_expanded(a1));
    let offered = selector.offered();
    assert_eq!(offered.len(), 4);
    assert_eq!(offered[0].len(), 6);
    assert_eq!(offered[1].len(), 8);
    assert_eq!(offered[3].len(), 4);
    assert!(offered[0][1].display.contains("[-] A"));
}

#[test]
fn given_unknown_node_when_requesting_tooltip_then_usage_exit_code() {
    let container = container(
        Arc::new(MockSelector::new(&[])),
        Arc::new(MockEditor::default()),
    );
    let cli = Cli::try_parse_from(["evotree", "tree", "tooltip", "Root/Nope"]).unwrap();

    let err = execute(&cli, &container).unwrap_err();

    assert_eq!(err.exit_code(), evotree::exitcode::USAGE);
}

#[test]
fn given_missing_source_when_showing_tree_then_unavailable_exit_code() {
    let container = container(
        Arc::new(MockSelector::new(&[])),
        Arc::new(MockEditor::default()),
    );
    let cli = Cli::try_parse_from(["evotree", "tree", "show", "--source", "/nowhere/tree.json"])
        .unwrap();

    let err = execute(&cli, &container).unwrap_err();

    assert_eq!(err.exit_code(), evotree::exitcode::UNAVAILABLE);
    assert_eq!(err.to_string(), "data unavailable: /nowhere/tree.json");
}

#[test]
fn given_no_config_when_init_then_template_written_and_second_init_refused() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/evotree.toml");
    let container = container(
        Arc::new(MockSelector::new(&[])),
        Arc::new(MockEditor::default()),
    );
    let cli = Cli::try_parse_from([
        "evotree",
        "-c",
        path.to_str().unwrap(),
        "config",
        "init",
    ])
    .unwrap();

    // Act
    execute(&cli, &container).unwrap();
    let second = execute(&cli, &container);

    // Assert
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# evotree configuration"));
    assert_eq!(
        second.unwrap_err().exit_code(),
        evotree::exitcode::USAGE
    );
}

#[test]
fn given_existing_config_when_editing_then_editor_opens_it() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("evotree.toml");
    std::fs::write(&path, Settings::template()).unwrap();
    let editor = Arc::new(MockEditor::default());
    let container = container(Arc::new(MockSelector::new(&[])), editor.clone());
    let cli = Cli::try_parse_from(["evotree", "-c", path.to_str().unwrap(), "config", "edit"])
        .unwrap();

    // Act
    execute(&cli, &container).unwrap();

    // Assert
    assert_eq!(*editor.opened_files.lock().unwrap(), vec![path]);
}

#[test]
fn given_fixture_when_exporting_tree_option_then_succeeds() {
    let container = container(
        Arc::new(MockSelector::new(&[])),
        Arc::new(MockEditor::default()),
    );
    let cli = Cli::try_parse_from(["evotree", "tree", "option", "--depth", "1"]).unwrap();

    assert!(execute(&cli, &container).is_ok());
}

#[test]
fn given_slashed_and_repeated_leaf_names_when_listing_leaves_then_every_path_resolves() {
    // Arrange
    let container = container(
        Arc::new(MockSelector::new(&[])),
        Arc::new(MockEditor::default()),
    );
    let fixture = resources().join("awkward_names_tree.json");
    let fixture = fixture.to_str().unwrap();
    let loaded = container
        .tree_service
        .open(&evotree::application::Source::parse(fixture), 1)
        .into_loaded()
        .unwrap();

    // Act
    let lines = leaf_lines(&loaded.tree);

    // Assert
    assert_eq!(
        lines,
        vec![
            "Root/训练\\/推理/Topic/m\t#0/0/0\t2023\tTopic",
            "Root/训练\\/推理/Topic/m~1\t#0/0/1\t2024\t",
            "Root/Hybrid\t#1\t2021\tT",
            "Root/Hybrid/Inner\t#1/0\t2022\tT",
        ]
    );
    for line in &lines {
        for path in line.split('\t').take(2) {
            let args = ["evotree", "tree", "tooltip", path, "--source", fixture];
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(execute(&cli, &container).is_ok(), "tooltip for {path}");
        }
    }
}

#[test]
fn given_collapse_all_with_expand_when_showing_then_runs() {
    let container = container(
        Arc::new(MockSelector::new(&[])),
        Arc::new(MockEditor::default()),
    );
    let cli = Cli::try_parse_from([
        "evotree",
        "tree",
        "show",
        "--collapse-all",
        "--expand",
        "Root/A/A1",
    ])
    .unwrap();

    assert!(execute(&cli, &container).is_ok());
    assert!(Cli::try_parse_from(["evotree", "tree", "show", "--all", "--collapse-all"]).is_err());
}
