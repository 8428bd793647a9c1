use crate::tracker::types::MonthlyIssueCounts;
use colored::Colorize;
use serde::Serialize;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: u64 = 40;

/// One point of the issues-per-month chart.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub x: String,
    pub y: u64,
}

/// Reshapes the statistics object into chart points, keeping order and zero months.
pub fn chart_points(counts: &MonthlyIssueCounts) -> Vec<ChartPoint> {
    counts
        .0
        .iter()
        .map(|(month, count)| ChartPoint {
            x: month.to_owned(),
            y: *count,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartStyle {
    #[default]
    Line,
    Bar,
}

/// `value / max` of `steps`, widened so large counts cannot overflow
fn scale(value: u64, max: u64, steps: u64) -> usize {
    (u128::from(value) * u128::from(steps) / u128::from(max)) as usize
}

pub fn sparkline(points: &[ChartPoint]) -> String {
    let max = points.iter().map(|point| point.y).max().unwrap_or(0);
    points
        .iter()
        .map(|point| {
            if max == 0 {
                SPARKS[0]
            } else {
                SPARKS[scale(point.y, max, SPARKS.len() as u64 - 1)]
            }
        })
        .collect()
}

pub fn render_chart(points: &[ChartPoint], style: ChartStyle) -> String {
    if points.is_empty() {
        return "No data".dimmed().to_string();
    }

    let label_width = points.iter().map(|point| point.x.len()).max().unwrap_or(0);
    let max = points.iter().map(|point| point.y).max().unwrap_or(0).max(1);
    let mut out = String::new();

    if style == ChartStyle::Line {
        out += &format!("{}\n", sparkline(points).blue());
    }

    for point in points {
        let row = match style {
            ChartStyle::Line => format!("{:>5}", point.y),
            ChartStyle::Bar => format!(
                "{} {}",
                "█".repeat(scale(point.y, max, BAR_WIDTH)).blue(),
                point.y
            ),
        };
        out += &format!("{:<label_width$}  {row}\n", point.x);
    }

    out
}
