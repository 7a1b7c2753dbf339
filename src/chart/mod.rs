//! Chart builders: pure functions from derived views to [`ChartSpec`]s.
//!
//! Specs are plain values. Rendering them is the job of `ui::plot`; exporting
//! them is a `serde_json` call.

pub mod bar;
pub mod box_plot;
pub mod bubble;
pub mod spec;

use serde::Serialize;

use crate::data::filter::SecurityViews;
pub use spec::ChartSpec;

/// The dashboard's three charts, in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub bubble: ChartSpec,
    pub status_bar: ChartSpec,
    pub duration_box: ChartSpec,
}

impl DashboardCharts {
    pub fn build(views: &SecurityViews) -> Self {
        DashboardCharts {
            bubble: bubble::create_bubble_plot(&views.stat_sec),
            status_bar: bar::create_status_bar_chart(&views.acc_sector),
            duration_box: box_plot::create_duration_box_plot(&views.sec_nona),
        }
    }

    /// Charts in display order.
    pub fn in_order(&self) -> [&ChartSpec; 3] {
        [&self.bubble, &self.status_bar, &self.duration_box]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RecordTable;
    use spec::ChartKind;

    #[test]
    fn page_order_is_bubble_bar_box() {
        let charts = DashboardCharts::build(&SecurityViews::derive(&RecordTable::default()));
        let kinds: Vec<_> = charts.in_order().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, [ChartKind::Scatter, ChartKind::Bar, ChartKind::Box]);
        assert!(charts.in_order().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn json_export_uses_plotly_style_fields() {
        let charts = DashboardCharts::build(&SecurityViews::derive(&RecordTable::default()));
        let json: serde_json::Value = serde_json::from_str(&charts.to_json().unwrap()).unwrap();
        assert_eq!(json["bubble"]["kind"], "scatter");
        assert_eq!(json["status_bar"]["layout"]["bar_mode"], "stack");
        assert_eq!(json["status_bar"]["layout"]["y_axis"]["log_scale"], true);
        assert_eq!(json["duration_box"]["layout"]["legend"]["visible"], false);
        assert_eq!(json["bubble"]["layout"]["y_axis"]["tick_font"]["color"], "#000000");
        assert_eq!(json["bubble"]["layout"]["width"], 1400);
    }
}
