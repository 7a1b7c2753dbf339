use crate::color::ColorMap;
use crate::data::model::{RecordTable, DURATION, SECTOR};

use super::spec::{ChartKind, ChartSpec, Layout, Trace, STYLE};

pub const TITLE: &str = "Average Daily Working Hours per Position";

/// Box plot of `Duration` per sector. Coloured by sector, no legend.
pub fn create_duration_box_plot(sec_nona: &RecordTable) -> ChartSpec {
    let colors = ColorMap::new(sec_nona.records.iter().map(|r| r.get(SECTOR)));

    let traces = colors
        .entries()
        .map(|(sector, color)| {
            let y: Vec<f64> = sec_nona
                .records
                .iter()
                .filter(|r| r.get(SECTOR) == sector)
                .filter_map(|r| r.get(DURATION).as_f64())
                .collect();
            let name = sector.to_string();
            Trace {
                x: vec![name.clone(); y.len()],
                name,
                color,
                y,
                marker_size: Vec::new(),
                text: None,
            }
        })
        .collect();

    let mut layout = Layout::new(TITLE, &STYLE, STYLE.value_axis("Days Count", false));
    layout.legend.visible = false;
    layout.template = Some("plotly");

    ChartSpec {
        kind: ChartKind::Box,
        layout,
        traces,
    }
}

// ---------------------------------------------------------------------------
// Box statistics
// ---------------------------------------------------------------------------

/// Five-number summary with 1.5 × IQR whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Points beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when there are no finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|v| **v >= lo_fence && **v <= hi_fence);
        let lower_whisker = inside.iter().copied().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}
