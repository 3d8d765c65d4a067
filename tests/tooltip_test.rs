//! Tests for tooltip text of the fixture tree

use std::path::Path;

use rstest::rstest;

use evotree::domain::{EvolutionTree, TooltipFormatter, TooltipStyle, DEFAULT_MAX_DESC_LEN};

fn fixture_tree() -> EvolutionTree {
    let payload = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/evolution_tree.json"),
    )
    .unwrap();
    EvolutionTree::from_json(&payload).unwrap()
}

fn plain(tree: &EvolutionTree, path: &str) -> String {
    let node = tree.get_node(tree.find(path).unwrap()).unwrap();
    TooltipFormatter::plain(DEFAULT_MAX_DESC_LEN).format_in(tree, node)
}

fn html(tree: &EvolutionTree, path: &str) -> String {
    let node = tree.get_node(tree.find(path).unwrap()).unwrap();
    TooltipFormatter::default().format_in(tree, node)
}

#[rstest]
#[case("AI 模型演化树", "AI 模型演化树")]
#[case("AI 模型演化树/Transformer", "Transformer\n2 children")]
#[case("AI 模型演化树/ResNet/架构创新", "架构创新\n1 children")]
#[case(
    "AI 模型演化树/Transformer/训练策略/T5",
    "T5\n2019 | 方法改进\ntopic: 文本到文本统一框架\n"
)]
fn given_node_role_when_formatting_plain_then_matches_branch(
    #[case] path: &str,
    #[case] expected: &str,
) {
    let tree = fixture_tree();

    assert_eq!(plain(&tree, path), expected);
}

#[test]
fn given_long_description_when_formatting_then_truncated_to_150_chars() {
    // Arrange
    let tree = fixture_tree();

    // Act
    let text = plain(&tree, "AI 模型演化树/Transformer/架构创新/BERT");

    // Assert
    let desc = text.lines().last().unwrap();
    assert_eq!(desc.chars().count(), 150 + 3);
    assert!(desc.ends_with("with a singl..."));
    assert!(text.starts_with("BERT\n2018 | 方法改进\ntopic: 双向注意力预训练\n"));
}

#[test]
fn given_markup_in_description_when_formatting_html_then_escaped() {
    // Arrange
    let tree = fixture_tree();

    // Act
    let markup = html(&tree, "AI 模型演化树/Transformer/架构创新/GPT-2");

    // Assert
    assert!(markup.contains("Zero-shot task transfer &lt;emergent&gt; from scale."));
    assert!(markup.contains("📅 2019"));
    assert!(markup.contains("📋 规模扩展"));
    assert!(!markup.contains("<emergent>"));
}

#[test]
fn given_branch_when_formatting_html_then_shows_child_count() {
    let tree = fixture_tree();

    let markup = html(&tree, "AI 模型演化树/ResNet");

    assert!(markup.contains(">ResNet</div>"));
    assert!(markup.contains("1 个子节点"));
}

#[test]
fn given_same_node_when_formatting_twice_then_identical_output() {
    let tree = fixture_tree();
    let node = tree
        .get_node(tree.find("AI 模型演化树/Transformer/架构创新/BERT").unwrap())
        .unwrap();
    let formatter = TooltipFormatter::new(40, TooltipStyle::Html);

    assert_eq!(
        formatter.format_in(&tree, node),
        formatter.format_in(&tree, node)
    );
}
