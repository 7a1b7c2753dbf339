use crate::color::ColorMap;
use crate::data::filter::GroupCount;

use super::spec::{ChartKind, ChartSpec, Font, Layout, TextPosition, Trace, TraceText, STYLE};

pub const TITLE: &str = "Candidates count per TA team member";
const SIZE_MAX: f64 = 20.0;

/// Bubble chart of candidates per TA team.
///
/// One series per team, coloured by team and sized by count. Each bubble is
/// labelled with its count just above it, in the series colour.
pub fn create_bubble_plot(stat_sec: &[GroupCount]) -> ChartSpec {
    let colors = ColorMap::new(stat_sec.iter().map(GroupCount::key));

    let traces = stat_sec
        .iter()
        .map(|group| {
            let team = group.key().to_string();
            let color = colors.color_for(group.key());
            let count = group.count as f64;
            Trace {
                name: team.clone(),
                color,
                x: vec![team],
                y: vec![count],
                marker_size: vec![count],
                text: Some(TraceText {
                    values: vec![group.count.to_string()],
                    position: TextPosition::TopCenter,
                    font: Font {
                        size: STYLE.tick_font_size,
                        color,
                    },
                }),
            }
        })
        .collect();

    let mut layout = Layout::new(TITLE, &STYLE, STYLE.value_axis("Candidates Count", false));
    layout.legend.font = Some(STYLE.tick_font());
    layout.size_max = Some(SIZE_MAX);

    ChartSpec {
        kind: ChartKind::Scatter,
        layout,
        traces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn counts() -> Vec<GroupCount> {
        vec![
            GroupCount { keys: vec![CellValue::Text("Team A".into())], count: 4 },
            GroupCount { keys: vec![CellValue::Text("Team B".into())], count: 1 },
        ]
    }

    #[test]
    fn one_series_per_team() {
        let spec = create_bubble_plot(&counts());
        assert_eq!(spec.kind, ChartKind::Scatter);
        assert_eq!(spec.layout.title, TITLE);
        assert_eq!(spec.traces.len(), 2);
        assert_eq!(spec.traces[0].name, "Team A");
        assert_eq!(spec.traces[0].x, ["Team A"]);
        assert_eq!(spec.traces[0].y, [4.0]);
        assert_eq!(spec.traces[0].marker_size, [4.0]);
        assert_ne!(spec.traces[0].color, spec.traces[1].color);
    }

    #[test]
    fn labels_sit_above_points_in_series_colour() {
        let spec = create_bubble_plot(&counts());
        for trace in &spec.traces {
            let text = trace.text.as_ref().unwrap();
            assert_eq!(text.position, TextPosition::TopCenter);
            assert_eq!(text.font.size, 20);
            assert_eq!(text.font.color, trace.color);
        }
        assert_eq!(spec.traces[1].text.as_ref().unwrap().values, ["1"]);
    }

    #[test]
    fn fixed_layout() {
        let spec = create_bubble_plot(&counts());
        let layout = &spec.layout;
        assert_eq!((layout.width, layout.height), (1400, 800));
        assert_eq!(layout.y_axis.title, "<b>Candidates Count</b>");
        assert_eq!(layout.x_axis.title, "");
        assert_eq!(layout.legend.font.map(|f| f.size), Some(20));
        assert!(layout.legend.visible);
        assert!(!layout.y_axis.log_scale);
        assert_eq!(spec.marker_diameter(4.0), 20.0);
    }

    #[test]
    fn empty_counts_give_empty_chart() {
        let spec = create_bubble_plot(&[]);
        assert!(spec.traces.is_empty());
        assert!(spec.is_empty());
    }
}
