use serde::Serialize;

use crate::color::Rgb;

// ---------------------------------------------------------------------------
// Fixed styling shared by every chart
// ---------------------------------------------------------------------------

/// Canvas and typography applied to all three dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// Ticks, legend and trace text.
    pub tick_font_size: u32,
    pub axis_title_font_size: u32,
    pub font_color: Rgb,
}

pub const STYLE: ChartStyle = ChartStyle {
    width: 1400,
    height: 800,
    tick_font_size: 20,
    axis_title_font_size: 22,
    font_color: Rgb::BLACK,
};

impl ChartStyle {
    pub fn tick_font(&self) -> Font {
        Font {
            size: self.tick_font_size,
            color: self.font_color,
        }
    }

    pub fn title_font(&self) -> Font {
        Font {
            size: self.axis_title_font_size,
            color: self.font_color,
        }
    }

    /// An unlabelled category axis.
    pub fn category_axis(&self) -> Axis {
        Axis {
            title: String::new(),
            title_font: self.title_font(),
            tick_font: self.tick_font(),
            log_scale: false,
        }
    }

    /// A value axis with a bold title.
    pub fn value_axis(&self, title: &str, log_scale: bool) -> Axis {
        Axis {
            title: format!("<b>{title}</b>"),
            title_font: self.title_font(),
            tick_font: self.tick_font(),
            log_scale,
        }
    }
}

// ---------------------------------------------------------------------------
// ChartSpec – declarative description handed to the renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Bar,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    /// May carry `<b>…</b>` markup.
    pub title: String,
    pub title_font: Font,
    pub tick_font: Font,
    pub log_scale: bool,
}

impl Axis {
    /// Title with bold markup stripped.
    pub fn plain_title(&self) -> &str {
        self.title
            .strip_prefix("<b>")
            .and_then(|t| t.strip_suffix("</b>"))
            .unwrap_or(&self.title)
    }

    pub fn is_bold(&self) -> bool {
        self.title.starts_with("<b>") && self.title.ends_with("</b>")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Legend placement in paper coordinates (0..1 spans the plot area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendAnchor {
    pub x: f64,
    pub y: f64,
    pub x_anchor: &'static str,
    pub y_anchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<LegendAnchor>,
}

impl Default for Legend {
    fn default() -> Self {
        Legend {
            visible: true,
            font: None,
            orientation: Orientation::Vertical,
            anchor: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    TopCenter,
    Inside,
}

/// Per-point labels drawn alongside the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceText {
    pub values: Vec<String>,
    pub position: TextPosition,
    pub font: Font,
}

/// One named, single-coloured series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub color: Rgb,
    /// Category per point.
    pub x: Vec<String>,
    pub y: Vec<f64>,
    /// Raw size values (bubble charts only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marker_size: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TraceText>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<&'static str>,
    /// Diameter in pixels of the largest bubble.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_max: Option<f64>,
}

impl Layout {
    pub fn new(title: &str, style: &ChartStyle, y_axis: Axis) -> Self {
        Layout {
            title: title.to_string(),
            width: style.width,
            height: style.height,
            x_axis: style.category_axis(),
            y_axis,
            legend: Legend::default(),
            bar_mode: None,
            template: None,
            size_max: None,
        }
    }
}

/// A complete, immutable chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub layout: Layout,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    /// Distinct x categories in order of first appearance across traces.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for x in self.traces.iter().flat_map(|t| t.x.iter()) {
            if !seen.contains(&x.as_str()) {
                seen.push(x);
            }
        }
        seen
    }

    /// Whether there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|t| t.y.is_empty())
    }

    /// Bubble diameter for `value`, scaled by area against the largest size.
    pub fn marker_diameter(&self, value: f64) -> f64 {
        let size_max = self.layout.size_max.unwrap_or(0.0);
        let max = self
            .traces
            .iter()
            .flat_map(|t| t.marker_size.iter().copied())
            .fold(0.0_f64, f64::max);
        if max <= 0.0 || value <= 0.0 {
            return 0.0;
        }
        size_max * (value / max).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_axis_wraps_title_in_bold() {
        let axis = STYLE.value_axis("Candidates Count", true);
        assert_eq!(axis.title, "<b>Candidates Count</b>");
        assert_eq!(axis.plain_title(), "Candidates Count");
        assert!(axis.is_bold());
        assert!(axis.log_scale);
        assert_eq!(axis.title_font.size, 22);
        assert_eq!(axis.tick_font.size, 20);
    }

    #[test]
    fn category_axis_is_untitled() {
        let axis = STYLE.category_axis();
        assert_eq!(axis.plain_title(), "");
        assert!(!axis.is_bold());
    }

    fn trace(name: &str, x: &[&str], sizes: &[f64]) -> Trace {
        Trace {
            name: name.to_string(),
            color: Rgb::BLACK,
            x: x.iter().map(|s| s.to_string()).collect(),
            y: sizes.to_vec(),
            marker_size: sizes.to_vec(),
            text: None,
        }
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            layout: Layout::new("t", &STYLE, STYLE.value_axis("v", false)),
            traces: vec![
                trace("a", &["Club", "Bank"], &[1.0, 2.0]),
                trace("b", &["Bank", "Company"], &[3.0, 4.0]),
            ],
        };
        assert_eq!(spec.categories(), ["Club", "Bank", "Company"]);
        assert!(!spec.is_empty());
    }

    #[test]
    fn marker_diameter_scales_by_area() {
        let mut layout = Layout::new("t", &STYLE, STYLE.value_axis("v", false));
        layout.size_max = Some(20.0);
        let spec = ChartSpec {
            kind: ChartKind::Scatter,
            layout,
            traces: vec![trace("a", &["x"], &[4.0]), trace("b", &["y"], &[1.0])],
        };
        assert_eq!(spec.marker_diameter(4.0), 20.0);
        assert_eq!(spec.marker_diameter(1.0), 10.0);
        assert_eq!(spec.marker_diameter(0.0), 0.0);
    }
}
