//! Tests for loading the dashboard payload and building chart options

use std::path::{Path, PathBuf};
use std::sync::Arc;

use evotree::application::services::DashboardService;
use evotree::application::{chart_option, ApplicationError, Source};
use evotree::domain::ChartKind;
use evotree::infrastructure::traits::{HttpClient, RealFileSystem};

struct OfflineHttpClient;

impl HttpClient for OfflineHttpClient {
    fn get_text(&self, _url: &str) -> Result<String, String> {
        Err("connection refused".to_string())
    }
}

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(name)
}

fn service() -> DashboardService {
    DashboardService::new(Arc::new(RealFileSystem), Arc::new(OfflineHttpClient))
}

#[test]
fn given_fixture_when_summarizing_then_counts_match_generator_output() {
    // Arrange
    let service = service();
    let data = service
        .load(&Source::File(resource("dashboard_data.json")))
        .unwrap();

    // Act
    let lines = service.summary(&data).lines();

    // Assert
    assert_eq!(
        lines,
        vec![
            "evolution_l1: 2 series, 3 categories (Level 1 Innovation Evolution)",
            "model_influence: 2 bars, 2 categories (Top Base Model Influence)",
            "evolution_nature: 3 series, 3 categories (Innovation Nature Evolution)",
            "sankey_flow: 4 nodes, 3 links (Base Model to Innovation Mapping)",
        ]
    );
}

#[test]
fn given_tree_payload_when_loading_as_dashboard_then_unavailable() {
    let service = service();

    let result = service.load(&Source::File(resource("evolution_tree.json")));

    assert!(matches!(result, Err(ApplicationError::Unavailable { .. })));
}

#[test]
fn given_unreachable_url_when_loading_then_unavailable() {
    let service = service();

    let err = service
        .load(&Source::parse("http://localhost:5173/data/dashboard_data.json"))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "data unavailable: http://localhost:5173/data/dashboard_data.json"
    );
}

#[test]
fn given_fixture_when_building_every_chart_then_titles_carried_over() {
    // Arrange
    let data = service()
        .load(&Source::File(resource("dashboard_data.json")))
        .unwrap();

    // Act
    let titles: Vec<String> = ChartKind::ALL
        .iter()
        .map(|&kind| chart_option(&data, kind)["title"]["text"].as_str().unwrap().to_string())
        .collect();

    // Assert
    assert_eq!(
        titles,
        vec![
            "Level 1 Innovation Evolution",
            "Top Base Model Influence",
            "Innovation Nature Evolution",
            "Base Model to Innovation Mapping",
        ]
    );
}

#[test]
fn given_stack_chart_when_building_then_payload_series_keys_preserved() {
    let data = service()
        .load(&Source::File(resource("dashboard_data.json")))
        .unwrap();

    let option = chart_option(&data, ChartKind::EvolutionL1);

    let first = &option["series"][0];
    assert_eq!(first["stack"], "Total");
    assert_eq!(first["emphasis"]["focus"], "series");
    assert_eq!(first["itemStyle"]["color"], "#3b82f6");
}
