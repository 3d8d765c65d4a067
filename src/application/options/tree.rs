//! Option document for the interactive tree chart.

use generational_arena::Index;
use serde_json::{json, Map, Value};

use crate::domain::{
    EvolutionTree, ExpansionState, NodeKind, SymbolSizePolicy, TooltipFormatter, TooltipStyle,
};

/// Engine-side interaction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChartSettings {
    pub initial_depth: usize,
    /// Milliseconds for the first render
    pub animation_duration: u64,
    /// Milliseconds for expand/collapse transitions
    pub animation_duration_update: u64,
}

impl Default for TreeChartSettings {
    fn default() -> Self {
        Self {
            initial_depth: crate::domain::DEFAULT_INITIAL_DEPTH,
            animation_duration: 550,
            animation_duration_update: 750,
        }
    }
}

/// Builds the `tree` series option from a loaded tree and its current state.
pub struct TreeOptionBuilder<'a> {
    tree: &'a EvolutionTree,
    expansion: &'a ExpansionState,
    symbols: SymbolSizePolicy,
    tooltip: TooltipFormatter,
    settings: TreeChartSettings,
}

impl<'a> TreeOptionBuilder<'a> {
    pub fn new(tree: &'a EvolutionTree, expansion: &'a ExpansionState) -> Self {
        Self {
            tree,
            expansion,
            symbols: SymbolSizePolicy::default(),
            tooltip: TooltipFormatter::default(),
            settings: TreeChartSettings::default(),
        }
    }

    pub fn symbols(mut self, symbols: SymbolSizePolicy) -> Self {
        self.symbols = symbols;
        self
    }

    /// Tooltips are always emitted as markup; only the length limit is taken.
    pub fn max_desc_len(mut self, max_desc_len: usize) -> Self {
        self.tooltip = TooltipFormatter::new(max_desc_len, TooltipStyle::Html);
        self
    }

    pub fn settings(mut self, settings: TreeChartSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(&self) -> Value {
        json!({
            "title": {
                "text": "交互式技术演化树",
                "subtext": "从基础模型到具体创新的演化路径（可拖拽缩放，点击展开/折叠）",
                "left": "center",
                "textStyle": {"color": "#e2e8f0", "fontSize": 24, "fontWeight": "bold"},
                "subtextStyle": {"color": "#94a3b8", "fontSize": 14}
            },
            "tooltip": {
                "trigger": "item",
                "triggerOn": "mousemove",
                "backgroundColor": "rgba(30, 41, 59, 0.98)",
                "borderColor": "#3b82f6",
                "borderWidth": 2,
                "padding": 15,
                "textStyle": {"color": "#e2e8f0", "fontSize": 13}
            },
            "series": [{
                "type": "tree",
                "data": [self.node(self.tree.root())],
                "top": "10%",
                "left": "5%",
                "bottom": "5%",
                "right": "20%",
                "label": {
                    "position": "right",
                    "verticalAlign": "middle",
                    "align": "left",
                    "fontSize": 11,
                    "color": "#e2e8f0",
                    "distance": 8
                },
                "leaves": {
                    "label": {
                        "position": "right",
                        "verticalAlign": "middle",
                        "align": "left",
                        "fontSize": 10,
                        "color": "#cbd5e1"
                    }
                },
                "emphasis": {
                    "focus": "descendant",
                    "itemStyle": {
                        "borderColor": "#3b82f6",
                        "borderWidth": 2,
                        "shadowBlur": 10,
                        "shadowColor": "rgba(59, 130, 246, 0.5)"
                    },
                    "label": {"fontSize": 13, "fontWeight": "bold", "color": "#3b82f6"}
                },
                "expandAndCollapse": true,
                "animationDuration": self.settings.animation_duration,
                "animationDurationUpdate": self.settings.animation_duration_update,
                "initialTreeDepth": self.settings.initial_depth,
                "orient": "LR",
                "layout": "orthogonal",
                "lineStyle": {"color": "#475569", "width": 1.5, "curveness": 0.5},
                "itemStyle": {"borderWidth": 1.5, "borderColor": "#334155"},
                "roam": true
            }],
            "backgroundColor": "transparent"
        })
    }

    /// One data item. `collapsed` is always explicit so the engine shows the
    /// current state rather than re-deriving it from `initialTreeDepth`.
    fn node(&self, idx: Index) -> Value {
        let Some(node) = self.tree.get_node(idx) else {
            return Value::Null;
        };
        let root_name = self.tree.root_name();
        let mut item = Map::new();
        item.insert("name".into(), Value::from(node.name.clone()));
        item.insert(
            "symbolSize".into(),
            json!(self.symbols.size_of(node, root_name)),
        );
        item.insert(
            "collapsed".into(),
            Value::from(!self.expansion.is_expanded(idx)),
        );
        item.insert(
            "tooltip".into(),
            json!({"formatter": self.tooltip.format(node, root_name)}),
        );
        if let Some(color) = &node.color {
            item.insert("itemStyle".into(), json!({"color": color}));
        }
        if let NodeKind::Leaf(attrs) = &node.kind {
            item.insert("attributes".into(), json!(attrs));
        }
        if !node.is_leaf() || !node.children.is_empty() {
            let children: Vec<Value> = node.children.iter().map(|&c| self.node(c)).collect();
            item.insert("children".into(), Value::Array(children));
        }
        Value::Object(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "name": "Root",
        "children": [
            {"name": "GPT", "symbolSize": 30, "itemStyle": {"color": "#3b82f6"}, "children": [
                {"name": "Topic", "children": [
                    {"name": "m", "attributes": {"year": 2021, "type": "X", "topic": "T", "desc": "d"}}
                ]}
            ]}
        ]
    }"##;

    #[test]
    fn given_tree_when_building_option_then_series_carries_engine_settings() {
        let tree = EvolutionTree::from_json(SAMPLE).unwrap();
        let state = ExpansionState::initial(&tree, 2);

        let option = TreeOptionBuilder::new(&tree, &state).build();

        let series = &option["series"][0];
        assert_eq!(series["type"], "tree");
        assert_eq!(series["initialTreeDepth"], 2);
        assert_eq!(series["animationDuration"], 550);
        assert_eq!(series["animationDurationUpdate"], 750);
        assert_eq!(series["orient"], "LR");
        assert_eq!(series["roam"], true);
    }

    #[test]
    fn given_tree_when_building_option_then_nodes_resolve_size_and_state() {
        let tree = EvolutionTree::from_json(SAMPLE).unwrap();
        let mut state = ExpansionState::initial(&tree, 2);
        state.toggle(tree.find("Root/GPT").unwrap());

        let option = TreeOptionBuilder::new(&tree, &state).build();

        let root = &option["series"][0]["data"][0];
        assert_eq!(root["symbolSize"], 40.0);
        assert_eq!(root["collapsed"], false);
        let gpt = &root["children"][0];
        assert_eq!(gpt["symbolSize"], 30.0);
        assert_eq!(gpt["collapsed"], true);
        assert_eq!(gpt["itemStyle"]["color"], "#3b82f6");
        let topic = &gpt["children"][0];
        assert_eq!(topic["symbolSize"], 15.0);
        let leaf = &topic["children"][0];
        assert_eq!(leaf["symbolSize"], 10.0);
        assert_eq!(leaf["attributes"]["type"], "X");
        assert!(leaf.get("children").is_none());
        assert!(leaf["tooltip"]["formatter"]
            .as_str()
            .unwrap()
            .contains("📅 2021"));
    }

    #[test]
    fn given_custom_settings_when_building_then_applied() {
        let tree = EvolutionTree::from_json(SAMPLE).unwrap();
        let state = ExpansionState::initial(&tree, 1);

        let option = TreeOptionBuilder::new(&tree, &state)
            .settings(TreeChartSettings {
                initial_depth: 1,
                animation_duration: 100,
                animation_duration_update: 200,
            })
            .symbols(SymbolSizePolicy {
                root: 60.0,
                leaf: 4.0,
                default: 8.0,
            })
            .build();

        assert_eq!(option["series"][0]["initialTreeDepth"], 1);
        assert_eq!(option["series"][0]["data"][0]["symbolSize"], 60.0);
    }
}
