use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, FontId, RichText, Stroke, TextStyle, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Corner, GridMark, Legend, Plot, PlotPoint,
    PlotPoints, PlotUi, Points, Text,
};

use crate::chart::box_plot::BoxStats;
use crate::chart::spec::{Axis, ChartKind, ChartSpec, Legend as LegendSpec, TextPosition};
use crate::color::Rgb;

// ---------------------------------------------------------------------------
// Chart rendering (central panel)
// ---------------------------------------------------------------------------

pub fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

/// Render one chart spec as a titled egui_plot widget.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    let layout = &spec.layout;
    ui.add_space(12.0);
    ui.label(RichText::new(&layout.title).size(layout.x_axis.title_font.size as f32));
    if spec.is_empty() {
        ui.label(RichText::new("No data points").italics());
    }

    let categories: Vec<String> = spec.categories().into_iter().map(str::to_owned).collect();
    let log_y = layout.y_axis.log_scale;

    let mut plot = Plot::new(&layout.title)
        .width(layout.width as f32)
        .height(layout.height as f32)
        .x_axis_label(axis_label(&layout.x_axis))
        .y_axis_label(axis_label(&layout.y_axis))
        .x_axis_formatter(category_formatter(categories.clone()))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);
    if layout.legend.visible {
        plot = plot.legend(legend(&layout.legend));
    }
    if log_y {
        plot = plot.y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            log_tick_label(mark.value)
        });
    }

    let tick_size = layout.y_axis.tick_font.size as f32;
    ui.scope(|ui: &mut Ui| {
        let styles = &mut ui.style_mut().text_styles;
        styles.insert(TextStyle::Body, FontId::proportional(tick_size));
        styles.insert(TextStyle::Small, FontId::proportional(tick_size));

        plot.show(ui, |plot_ui| match spec.kind {
            ChartKind::Scatter => scatter(plot_ui, spec, &categories),
            ChartKind::Bar => stacked_bars(plot_ui, spec, &categories, log_y),
            ChartKind::Box => boxes(plot_ui, spec, &categories),
        });
    });
}

fn axis_label(axis: &Axis) -> RichText {
    let text = RichText::new(axis.plain_title())
        .size(axis.title_font.size as f32)
        .color(to_color32(axis.title_font.color));
    if axis.is_bold() { text.strong() } else { text }
}

fn legend(spec: &LegendSpec) -> Legend {
    let corner = match spec.anchor {
        Some(anchor) if anchor.x < 0.5 => Corner::LeftTop,
        _ => Corner::RightTop,
    };
    Legend::default().position(corner).text_style(TextStyle::Body)
}

/// Tick labels for a category axis placed at 0, 1, 2, …
fn category_formatter(
    categories: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| category_at(&categories, mark.value).unwrap_or_default()
}

fn category_at(categories: &[String], x: f64) -> Option<String> {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return None;
    }
    categories.get(idx as usize).cloned()
}

fn category_index(categories: &[String], name: &str) -> f64 {
    categories.iter().position(|c| c == name).unwrap_or(0) as f64
}

/// Label for a tick on a log10-transformed axis. Nothing below 10⁰.
pub fn log_tick_label(exponent: f64) -> String {
    if exponent < 0.0 {
        return String::new();
    }
    let value = 10f64.powf(exponent);
    if (value - value.round()).abs() < 1e-6 {
        format!("{}", value.round())
    } else {
        format!("{value:.2}")
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter(plot_ui: &mut PlotUi, spec: &ChartSpec, categories: &[String]) {
    for trace in &spec.traces {
        let color = to_color32(trace.color);
        for (i, (x, &y)) in trace.x.iter().zip(&trace.y).enumerate() {
            let xpos = category_index(categories, x);
            let size = trace.marker_size.get(i).copied().unwrap_or(y);
            let radius = (spec.marker_diameter(size) / 2.0).max(2.0) as f32;

            let points: PlotPoints = vec![[xpos, y]].into();
            plot_ui.points(
                Points::new(points)
                    .name(&trace.name)
                    .color(color)
                    .filled(true)
                    .radius(radius),
            );

            if let Some(text) = &trace.text {
                let label = text.values.get(i).cloned().unwrap_or_default();
                let y_per_pixel = plot_ui.transform().dvalue_dpos()[1].abs();
                let (label_y, anchor) =
                    label_placement(text.position, y, f64::from(radius) * y_per_pixel);
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(xpos, label_y),
                        RichText::new(label)
                            .size(text.font.size as f32)
                            .color(to_color32(text.font.color)),
                    )
                    .anchor(anchor),
                );
            }
        }
    }
}

/// Where a point label goes: `TopCenter` sits on top of the marker, whose
/// radius is given in plot units.
fn label_placement(position: TextPosition, y: f64, marker_radius: f64) -> (f64, Align2) {
    match position {
        TextPosition::TopCenter => (y + marker_radius, Align2::CENTER_BOTTOM),
        TextPosition::Inside => (y, Align2::CENTER_CENTER),
    }
}

// ---------------------------------------------------------------------------
// Stacked bars
// ---------------------------------------------------------------------------

/// One bar segment in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub x: f64,
    pub base: f64,
    pub height: f64,
}

/// Bottom of every stack on a log10 axis. Sits below 10⁰ so a count of 1
/// still gets a visible bar.
pub const LOG_FLOOR: f64 = -0.5;

fn log_position(value: f64) -> f64 {
    if value >= 1.0 { value.log10() } else { LOG_FLOOR }
}

/// Stack every trace on top of the previous ones, per category.
///
/// Stacking happens on raw counts; with `log_y` each segment spans
/// `log10(below)..log10(below + value)`, and the first one starts at
/// [`LOG_FLOOR`].
pub fn stack_segments(spec: &ChartSpec, categories: &[String], log_y: bool) -> Vec<Vec<Segment>> {
    let mut below = vec![0.0_f64; categories.len()];
    spec.traces
        .iter()
        .map(|trace| {
            trace
                .x
                .iter()
                .zip(&trace.y)
                .map(|(x, &value)| {
                    let xpos = category_index(categories, x);
                    let slot = &mut below[xpos as usize];
                    let (lo, hi) = if log_y {
                        (log_position(*slot), log_position(*slot + value))
                    } else {
                        (*slot, *slot + value)
                    };
                    *slot += value;
                    Segment {
                        x: xpos,
                        base: lo,
                        height: hi - lo,
                    }
                })
                .collect()
        })
        .collect()
}

fn stacked_bars(plot_ui: &mut PlotUi, spec: &ChartSpec, categories: &[String], log_y: bool) {
    let segments = stack_segments(spec, categories, log_y);
    for (trace, segs) in spec.traces.iter().zip(segments) {
        let color = to_color32(trace.color);
        let bars: Vec<Bar> = segs
            .iter()
            .map(|s| {
                Bar::new(s.x, s.height)
                    .base_offset(s.base)
                    .width(0.6)
                    .fill(color)
            })
            .collect();
        plot_ui.bar_chart(BarChart::new(bars).name(&trace.name).color(color));

        if let Some(text) = &trace.text {
            for (s, label) in segs.iter().zip(&text.values) {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(s.x, s.base + s.height / 2.0),
                        RichText::new(label)
                            .size(text.font.size as f32)
                            .color(to_color32(text.font.color)),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

fn boxes(plot_ui: &mut PlotUi, spec: &ChartSpec, categories: &[String]) {
    for trace in &spec.traces {
        let Some(stats) = BoxStats::from_values(&trace.y) else {
            continue;
        };
        let color = to_color32(trace.color);
        let xpos = category_index(categories, &trace.name);

        let spread = BoxSpread::new(
            stats.lower_whisker,
            stats.q1,
            stats.median,
            stats.q3,
            stats.upper_whisker,
        );
        let elem = BoxElem::new(xpos, spread)
            .name(&trace.name)
            .box_width(0.5)
            .fill(color.gamma_multiply(0.5))
            .stroke(Stroke::new(1.5, color));
        plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&trace.name).color(color));

        if !stats.outliers.is_empty() {
            let points: PlotPoints = stats.outliers.iter().map(|&y| [xpos, y]).collect();
            plot_ui.points(Points::new(points).color(color).radius(3.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::bar::create_status_bar_chart;
    use crate::data::filter::GroupCount;
    use crate::data::model::CellValue;

    fn group(sector: &str, status: &str, count: usize) -> GroupCount {
        GroupCount {
            keys: vec![CellValue::Text(sector.into()), CellValue::Text(status.into())],
            count,
        }
    }

    fn cats(spec: &ChartSpec) -> Vec<String> {
        spec.categories().into_iter().map(str::to_owned).collect()
    }

    #[test]
    fn linear_stack_accumulates_per_category() {
        let spec = create_status_bar_chart(&[
            group("Bank", "Accepted", 10),
            group("Bank", "Not Accepted", 5),
            group("Club", "Not Accepted", 2),
        ]);
        let segs = stack_segments(&spec, &cats(&spec), false);
        assert_eq!(segs[0], [Segment { x: 0.0, base: 0.0, height: 10.0 }]);
        assert_eq!(
            segs[1],
            [
                Segment { x: 0.0, base: 10.0, height: 5.0 },
                Segment { x: 1.0, base: 0.0, height: 2.0 },
            ]
        );
    }

    #[test]
    fn log_stack_tops_out_at_log_of_total() {
        let spec = create_status_bar_chart(&[
            group("Bank", "Accepted", 10),
            group("Bank", "Not Accepted", 90),
        ]);
        let segs = stack_segments(&spec, &cats(&spec), true);
        assert_eq!(segs[0][0].base, LOG_FLOOR);
        let first_top = segs[0][0].base + segs[0][0].height;
        assert!((first_top - 1.0).abs() < 1e-12);
        assert!((segs[1][0].base - 1.0).abs() < 1e-12);
        let top = segs[1][0].base + segs[1][0].height;
        assert!((top - 2.0).abs() < 1e-12);
    }

    #[test]
    fn single_count_still_has_a_bar_on_log_axis() {
        let spec = create_status_bar_chart(&[group("Club", "Accepted", 1)]);
        let segs = stack_segments(&spec, &cats(&spec), true);
        assert_eq!(segs[0][0].base, LOG_FLOOR);
        assert!(segs[0][0].height > 0.0);
        assert_eq!(segs[0][0].base + segs[0][0].height, 0.0);
    }

    #[test]
    fn top_center_label_clears_the_marker() {
        let (y, anchor) = label_placement(TextPosition::TopCenter, 10.0, 0.5);
        assert_eq!((y, anchor), (10.5, Align2::CENTER_BOTTOM));
        let (y, anchor) = label_placement(TextPosition::Inside, 10.0, 0.5);
        assert_eq!((y, anchor), (10.0, Align2::CENTER_CENTER));
    }

    #[test]
    fn log_ticks_show_powers_of_ten() {
        assert_eq!(log_tick_label(0.0), "1");
        assert_eq!(log_tick_label(2.0), "100");
        assert_eq!(log_tick_label(0.5), "3.16");
        assert_eq!(log_tick_label(LOG_FLOOR), "");
    }

    #[test]
    fn categories_only_on_integer_marks() {
        let categories = vec!["Bank".to_string(), "Club".to_string()];
        assert_eq!(category_at(&categories, 1.0).as_deref(), Some("Club"));
        assert_eq!(category_at(&categories, 0.5), None);
        assert_eq!(category_at(&categories, -1.0), None);
        assert_eq!(category_at(&categories, 2.0), None);
    }
}
