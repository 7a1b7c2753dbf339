use std::path::Path;

use anyhow::{Context, Result};

use crate::chart::DashboardCharts;
use crate::data::error::LoadError;
use crate::data::filter::SecurityViews;
use crate::data::loader;
use crate::data::model::RecordTable;

// ---------------------------------------------------------------------------
// Page state machine
// ---------------------------------------------------------------------------

/// Everything derived from one successful upload.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub file_name: String,
    pub table: RecordTable,
    pub views: SecurityViews,
    pub charts: DashboardCharts,
}

impl Dashboard {
    /// Filter, aggregate and build all charts for a freshly loaded table.
    pub fn build(file_name: &str, table: RecordTable) -> Self {
        let views = SecurityViews::derive(&table);
        let charts = DashboardCharts::build(&views);
        Dashboard {
            file_name: file_name.to_string(),
            table,
            views,
            charts,
        }
    }
}

/// `NoFile` → upload → `Loaded` | `LoadError`. Each upload starts over.
#[derive(Debug, Clone, Default)]
pub enum PageState {
    #[default]
    NoFile,
    Loaded(Box<Dashboard>),
    LoadError(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    pub page: PageState,

    /// Transient notice (e.g. export result) shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Handle an upload event: discard all derived state, then load.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) {
        self.reset();
        let result = loader::load_upload(file_name, bytes);
        self.finish_load(file_name, result);
    }

    /// Handle an upload picked from disk.
    pub fn upload_path(&mut self, path: &Path) {
        self.reset();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let result = loader::load_path(path);
        self.finish_load(&file_name, result);
    }

    fn reset(&mut self) {
        self.page = PageState::NoFile;
        self.status_message = None;
    }

    /// Write the current charts to `path` as JSON and report the outcome.
    pub fn export_charts(&mut self, path: &Path) {
        let Some(dashboard) = self.dashboard() else {
            self.status_message = Some("Nothing to export: load a file first.".to_string());
            return;
        };
        self.status_message = Some(match write_charts(&dashboard.charts, path) {
            Ok(()) => {
                log::info!("Exported charts to {}", path.display());
                format!("Charts exported to {}", path.display())
            }
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                format!("Export failed: {e:#}")
            }
        });
    }

    fn finish_load(&mut self, file_name: &str, result: Result<RecordTable, LoadError>) {
        self.page = match result {
            Ok(table) => {
                log::info!(
                    "Loaded {file_name}: {} rows, columns {:?}",
                    table.len(),
                    table.columns
                );
                let dashboard = Dashboard::build(file_name, table);
                log::info!(
                    "{} rows on or after cutoff, {} TA teams, {} sector/status groups, {} timed acceptances",
                    dashboard.views.security.len(),
                    dashboard.views.stat_sec.len(),
                    dashboard.views.acc_sector.len(),
                    dashboard.views.sec_nona.len()
                );
                PageState::Loaded(Box::new(dashboard))
            }
            Err(e) => {
                log::error!("Failed to load {file_name}: {e}");
                PageState::LoadError(e.to_string())
            }
        };
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.page {
            PageState::Loaded(d) => Some(&**d),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.page {
            PageState::LoadError(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

fn write_charts(charts: &DashboardCharts, path: &Path) -> Result<()> {
    let json = charts.to_json().context("serialising charts")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
