use crate::color::{ColorMap, Rgb};
use crate::data::filter::GroupCount;

use super::spec::{
    BarMode, ChartKind, ChartSpec, Font, Layout, LegendAnchor, Orientation, TextPosition, Trace,
    TraceText, STYLE,
};

pub const TITLE: &str = "Status for each Sector";

/// Stacked bar chart of candidates per sector, split by security status.
///
/// `acc_sector` keys are `(sector, status)`. The y-axis is logarithmic.
pub fn create_status_bar_chart(acc_sector: &[GroupCount]) -> ChartSpec {
    let colors = ColorMap::new(acc_sector.iter().map(|g| &g.keys[1]));

    let traces = colors
        .entries()
        .map(|(status, color)| {
            let groups: Vec<&GroupCount> =
                acc_sector.iter().filter(|g| &g.keys[1] == status).collect();
            Trace {
                name: status.to_string(),
                color,
                x: groups.iter().map(|g| g.keys[0].to_string()).collect(),
                y: groups.iter().map(|g| g.count as f64).collect(),
                marker_size: Vec::new(),
                text: Some(TraceText {
                    values: groups.iter().map(|g| g.count.to_string()).collect(),
                    position: TextPosition::Inside,
                    font: Font {
                        size: STYLE.tick_font_size,
                        color: Rgb::WHITE,
                    },
                }),
            }
        })
        .collect();

    let mut layout = Layout::new(TITLE, &STYLE, STYLE.value_axis("Candidates Count", true));
    layout.bar_mode = Some(BarMode::Stack);
    layout.legend.orientation = Orientation::Horizontal;
    layout.legend.anchor = Some(LegendAnchor {
        x: 0.70,
        y: 1.2,
        x_anchor: "center",
        y_anchor: "top",
    });

    ChartSpec {
        kind: ChartKind::Bar,
        layout,
        traces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn group(sector: &str, status: &str, count: usize) -> GroupCount {
        GroupCount {
            keys: vec![CellValue::Text(sector.into()), CellValue::Text(status.into())],
            count,
        }
    }

    #[test]
    fn one_series_per_status() {
        let spec = create_status_bar_chart(&[
            group("Bank", "Accepted", 10),
            group("Bank", "Not Accepted", 2),
            group("Club", "Accepted", 3),
            group("Club", "Pending", 1),
        ]);
        let names: Vec<_> = spec.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Accepted", "Not Accepted", "Pending"]);

        let accepted = &spec.traces[0];
        assert_eq!(accepted.x, ["Bank", "Club"]);
        assert_eq!(accepted.y, [10.0, 3.0]);
        assert_eq!(spec.categories(), ["Bank", "Club"]);
    }

    #[test]
    fn stacked_log_scale_with_white_inline_labels() {
        let spec = create_status_bar_chart(&[group("Bank", "Accepted", 10)]);
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.layout.bar_mode, Some(BarMode::Stack));
        assert!(spec.layout.y_axis.log_scale);
        assert_eq!(spec.layout.y_axis.title, "<b>Candidates Count</b>");
        let text = spec.traces[0].text.as_ref().unwrap();
        assert_eq!(text.values, ["10"]);
        assert_eq!(text.position, TextPosition::Inside);
        assert_eq!(text.font, Font { size: 20, color: Rgb::WHITE });
    }

    #[test]
    fn horizontal_legend_above_plot() {
        let spec = create_status_bar_chart(&[]);
        let legend = &spec.layout.legend;
        assert_eq!(legend.orientation, Orientation::Horizontal);
        let anchor = legend.anchor.unwrap();
        assert_eq!((anchor.x, anchor.y), (0.70, 1.2));
        assert_eq!((anchor.x_anchor, anchor.y_anchor), ("center", "top"));
        assert_eq!((spec.layout.width, spec.layout.height), (1400, 800));
        assert!(spec.is_empty());
    }
}
