//! Dashboard payload service
//!
//! Loads `dashboard_data.json` and reports what it contains.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::source::{ResourceReader, Source};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::dashboard::ChartCounts;
use crate::domain::{ChartKind, DashboardData};
use crate::infrastructure::traits::{FileSystem, HttpClient};

/// Per-chart element counts of a dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub charts: Vec<ChartCounts>,
}

impl DashboardSummary {
    /// One line per chart, e.g. `evolution_l1: 6 series, 13 categories`.
    pub fn lines(&self) -> Vec<String> {
        self.charts
            .iter()
            .map(|c| {
                let (first, second) = match c.kind {
                    ChartKind::ModelInfluence => ("bars", "categories"),
                    ChartKind::SankeyFlow => ("nodes", "links"),
                    _ => ("series", "categories"),
                };
                format!(
                    "{}: {} {}, {} {} ({})",
                    c.kind.key(),
                    c.primary,
                    first,
                    c.secondary,
                    second,
                    c.title
                )
            })
            .collect()
    }
}

/// Service for loading the dashboard payload.
pub struct DashboardService {
    reader: ResourceReader,
}

impl DashboardService {
    pub fn new(fs: Arc<dyn FileSystem>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            reader: ResourceReader::new(fs, http),
        }
    }

    /// Read and validate the payload. Any failure is reported as unavailable.
    #[instrument(level = "debug", skip(self, source), fields(source = %source))]
    pub fn load(&self, source: &Source) -> ApplicationResult<DashboardData> {
        let payload = self.reader.read(source)?;
        let data =
            DashboardData::from_json(&payload).map_err(|e| ApplicationError::Unavailable {
                resource: source.to_string(),
                reason: e.to_string(),
            })?;
        debug!(
            "load: charts {}",
            data.counts().iter().map(|c| c.kind.key()).join(", ")
        );
        Ok(data)
    }

    pub fn summary(&self, data: &DashboardData) -> DashboardSummary {
        DashboardSummary {
            charts: data.counts(),
        }
    }
}
