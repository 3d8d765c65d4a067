//! Chart payloads of `dashboard_data.json`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::domain::error::DomainError;

/// One named data series. Engine keys such as `type`, `stack`, `smooth`
/// or `areaStyle` are carried in `extra` and forwarded as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Category axis chart with one or more series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesChart {
    pub title: String,
    pub categories: Vec<Value>,
    pub series: Vec<Series>,
}

/// Category/value pairs for the influence bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub categories: Vec<Value>,
    pub values: Vec<Number>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: Number,
}

/// Base model to innovation topic flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyChart {
    pub title: String,
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

/// Chart identifiers, named after their payload keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    EvolutionL1,
    EvolutionNature,
    ModelInfluence,
    SankeyFlow,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::EvolutionL1,
        ChartKind::ModelInfluence,
        ChartKind::EvolutionNature,
        ChartKind::SankeyFlow,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::EvolutionL1 => "evolution_l1",
            ChartKind::EvolutionNature => "evolution_nature",
            ChartKind::ModelInfluence => "model_influence",
            ChartKind::SankeyFlow => "sankey_flow",
        }
    }
}

/// Whole dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub evolution_l1: SeriesChart,
    pub evolution_nature: SeriesChart,
    pub model_influence: BarChart,
    pub sankey_flow: SankeyChart,
}

/// Element counts per chart, for summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartCounts {
    pub kind: ChartKind,
    pub title: String,
    /// Series for line charts, bars for the bar chart, nodes for Sankey
    pub primary: usize,
    /// Categories for axis charts, links for Sankey
    pub secondary: usize,
}

impl DashboardData {
    /// Parse and validate a payload.
    pub fn from_json(payload: &str) -> Result<Self, DomainError> {
        let data: Self = serde_json::from_str(payload)
            .map_err(|e| DomainError::payload("dashboard", e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_series(ChartKind::EvolutionL1, &self.evolution_l1)?;
        validate_series(ChartKind::EvolutionNature, &self.evolution_nature)?;

        let bar = &self.model_influence;
        if bar.values.len() != bar.categories.len() {
            return Err(DomainError::payload(
                ChartKind::ModelInfluence.key(),
                format!(
                    "{} values for {} categories",
                    bar.values.len(),
                    bar.categories.len()
                ),
            ));
        }

        let sankey = &self.sankey_flow;
        let names: HashSet<&str> = sankey.nodes.iter().map(|n| n.name.as_str()).collect();
        for link in &sankey.links {
            for end in [&link.source, &link.target] {
                if !names.contains(end.as_str()) {
                    return Err(DomainError::payload(
                        ChartKind::SankeyFlow.key(),
                        format!("link references undeclared node '{}'", end),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn counts(&self) -> Vec<ChartCounts> {
        ChartKind::ALL
            .iter()
            .map(|&kind| match kind {
                ChartKind::EvolutionL1 | ChartKind::EvolutionNature => {
                    let chart = if kind == ChartKind::EvolutionL1 {
                        &self.evolution_l1
                    } else {
                        &self.evolution_nature
                    };
                    ChartCounts {
                        kind,
                        title: chart.title.clone(),
                        primary: chart.series.len(),
                        secondary: chart.categories.len(),
                    }
                }
                ChartKind::ModelInfluence => ChartCounts {
                    kind,
                    title: self.model_influence.title.clone(),
                    primary: self.model_influence.values.len(),
                    secondary: self.model_influence.categories.len(),
                },
                ChartKind::SankeyFlow => ChartCounts {
                    kind,
                    title: self.sankey_flow.title.clone(),
                    primary: self.sankey_flow.nodes.len(),
                    secondary: self.sankey_flow.links.len(),
                },
            })
            .collect()
    }
}

fn validate_series(kind: ChartKind, chart: &SeriesChart) -> Result<(), DomainError> {
    for series in &chart.series {
        if series.data.len() != chart.categories.len() {
            return Err(DomainError::payload(
                kind.key(),
                format!(
                    "series '{}' has {} points for {} categories",
                    series.name,
                    series.data.len(),
                    chart.categories.len()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(l1_data: &str, link_target: &str) -> String {
        format!(
            r#"{{
            "evolution_l1": {{"title": "L1", "categories": [2019, 2020],
                "series": [{{"name": "Arch", "type": "line", "stack": "Total", "areaStyle": {{}}, "data": {l1_data}}}]}},
            "evolution_nature": {{"title": "Nature", "categories": [2019, 2020],
                "series": [{{"name": "方法改进", "type": "line", "smooth": true, "data": [1, 2]}}]}},
            "model_influence": {{"title": "Influence", "categories": ["Transformer", "GAN"], "values": [12, 7]}},
            "sankey_flow": {{"title": "Flow", "nodes": [{{"name": "Transformer"}}, {{"name": "Arch"}}],
                "links": [{{"source": "Transformer", "target": "{link_target}", "value": 3}}]}}
        }}"#
        )
    }

    #[test]
    fn given_valid_payload_when_parsing_then_keeps_engine_keys() {
        let data = DashboardData::from_json(&payload("[3, 4]", "Arch")).unwrap();

        let series = &data.evolution_l1.series[0];
        assert_eq!(series.extra.get("stack"), Some(&Value::from("Total")));
        assert_eq!(data.model_influence.values.len(), 2);
    }

    #[test]
    fn given_ragged_series_when_parsing_then_invalid_payload() {
        let err = DashboardData::from_json(&payload("[3]", "Arch")).unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidPayload {
                chart: "evolution_l1".to_string(),
                reason: "series 'Arch' has 1 points for 2 categories".to_string()
            }
        );
    }

    #[test]
    fn given_dangling_sankey_link_when_parsing_then_invalid_payload() {
        let err = DashboardData::from_json(&payload("[3, 4]", "Nowhere")).unwrap_err();

        assert!(err.to_string().contains("sankey_flow"));
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn given_missing_chart_when_parsing_then_invalid_payload() {
        let err = DashboardData::from_json(r#"{"evolution_l1": {}}"#).unwrap_err();

        assert!(matches!(err, DomainError::InvalidPayload { .. }));
    }

    #[test]
    fn given_payload_when_counting_then_reports_each_chart() {
        let data = DashboardData::from_json(&payload("[3, 4]", "Arch")).unwrap();

        let counts = data.counts();

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].kind, ChartKind::EvolutionL1);
        assert_eq!((counts[0].primary, counts[0].secondary), (1, 2));
        assert_eq!((counts[3].primary, counts[3].secondary), (2, 1));
    }
}
