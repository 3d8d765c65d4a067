//! Tests for expand/collapse state over a loaded tree

use std::path::Path;

use rstest::rstest;

use evotree::application::LoadedTree;
use evotree::domain::{EvolutionTree, ExpansionState};

fn no_hints_tree() -> EvolutionTree {
    let payload = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/no_hints_tree.json"),
    )
    .unwrap();
    EvolutionTree::from_json(&payload).unwrap()
}

fn visible_names(loaded: &LoadedTree) -> Vec<String> {
    loaded
        .expansion
        .visible_nodes(&loaded.tree)
        .into_iter()
        .map(|idx| loaded.tree.get_node(idx).unwrap().name.clone())
        .collect()
}

#[rstest]
#[case(0, 3)]
#[case(1, 6)]
#[case(2, 9)]
fn given_initial_depth_when_loading_then_nodes_up_to_depth_are_expanded(
    #[case] depth: usize,
    #[case] expected_visible: usize,
) {
    // Arrange
    let tree = no_hints_tree();

    // Act
    let state = ExpansionState::initial(&tree, depth);

    // Assert
    assert_eq!(state.visible_nodes(&tree).len(), expected_visible);
}

#[test]
fn given_expanded_subtree_when_ancestor_collapsed_and_reexpanded_then_subtree_restored() {
    // Arrange
    let mut loaded = LoadedTree::new(no_hints_tree(), 1);
    loaded.expand("Root/A/A1").unwrap();
    let before = visible_names(&loaded);

    // Act
    loaded.collapse("Root/A").unwrap();
    let collapsed = visible_names(&loaded);
    loaded.toggle("Root/A").unwrap();
    let after = visible_names(&loaded);

    // Assert
    assert_eq!(collapsed, vec!["Root", "A", "B", "B1"]);
    assert_eq!(before, after);
    assert!(after.contains(&"m1".to_string()));
}

#[test]
fn given_collapsed_ancestor_when_expanding_deep_node_then_path_revealed() {
    // Arrange
    let mut loaded = LoadedTree::new(no_hints_tree(), 0);

    // Act
    let idx = loaded.expand("Root/B/B1").unwrap();

    // Assert
    assert!(loaded.expansion.is_visible(&loaded.tree, idx));
    assert!(visible_names(&loaded).contains(&"m3".to_string()));
    assert!(!visible_names(&loaded).contains(&"A1".to_string()));
}

#[test]
fn given_positional_path_when_toggling_then_same_node_as_name_path() {
    // Arrange
    let mut loaded = LoadedTree::new(no_hints_tree(), 2);
    let by_name = loaded.tree.find("Root/A/A1").unwrap();

    // Act
    let expanded = loaded.toggle("#0/0").unwrap();

    // Assert
    assert!(!expanded);
    assert!(!loaded.expansion.is_expanded(by_name));
    assert_eq!(loaded.tree.index_path_of(by_name).unwrap(), "#0/0");
}

#[test]
fn given_hidden_subtree_when_counting_then_reports_descendants() {
    // Arrange
    let tree = no_hints_tree();
    let state = ExpansionState::initial(&tree, 0);

    // Act
    let hidden = state.hidden_below(&tree, tree.find("Root/A").unwrap());

    // Assert
    assert_eq!(hidden, 4);
}
