//! Terminal presentation of an evaluation: metrics, banners, schematic, charts

use crate::calculator::Evaluation;
use crate::models::{DerivedFactors, OutputResult};

/// Side of the square drawing canvas for the top view, in mm
pub const CANVAS_MM: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl std::fmt::Display for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            BannerLevel::Success => "[ OK ]",
            BannerLevel::Info => "[INFO]",
            BannerLevel::Warning => "[WARN]",
        };
        write!(f, "{} {}", tag, self.message)
    }
}

/// Banners for the conditions flagged during evaluation
pub fn banners(factors: &DerivedFactors) -> Vec<Banner> {
    let mut out: Vec<Banner> = factors
        .collapse_reasons
        .iter()
        .map(|reason| Banner {
            level: BannerLevel::Warning,
            message: format!("Collapse risk: {}", reason),
        })
        .collect();

    if factors.ideal_conditions {
        out.push(Banner {
            level: BannerLevel::Info,
            message: format!(
                "Ideal conditions: expansion bonus x{:.2} applied",
                factors.expansion
            ),
        });
    }

    if factors.thermal_warning {
        out.push(Banner {
            level: BannerLevel::Warning,
            message: format!(
                "Thermal asymmetry between mold sides: {:.0}% contraction applied",
                factors.contraction * 100.0
            ),
        });
    }

    if out.is_empty() {
        out.push(Banner {
            level: BannerLevel::Success,
            message: "Process parameters within normal range".to_string(),
        });
    }

    out
}

/// The three labeled piece metrics
pub fn format_metrics(output: &OutputResult) -> String {
    format!(
        "{:<20} {:>10.2}\n{:<20} {:>10.2}\n{:<20} {:>10.2}\n",
        "Piece weight (g)",
        output.weight_g,
        "Length (mm)",
        output.length_mm,
        "Width (mm)",
        output.width_mm
    )
}

/// Full report for `calc`: metrics, then banners
pub fn format_report(eval: &Evaluation) -> String {
    let mut output = String::new();
    output.push_str("=== Molded Piece ===\n");
    output.push_str(&format_metrics(&eval.output));
    output.push('\n');
    for banner in banners(&eval.factors) {
        output.push_str(&format!("{}\n", banner));
    }
    output
}

/// Top view of the piece, anchored at the origin of a 2000 x 2000 mm canvas
///
/// Width runs along x, length along y. Each character cell covers
/// `CANVAS_MM / cols` by `CANVAS_MM / rows` millimetres.
pub fn schematic(output: &OutputResult, cols: usize, rows: usize) -> String {
    let filled_cols = cells_for(output.width_mm, cols);
    let filled_rows = cells_for(output.length_mm, rows);

    let mut text = String::new();
    text.push_str("Top view of the molded piece\n");
    text.push_str(&format!("{:>6} +\n", CANVAS_MM as u32));

    for row in (0..rows).rev() {
        text.push_str("       |");
        for col in 0..cols {
            text.push(if row < filled_rows && col < filled_cols {
                '#'
            } else {
                ' '
            });
        }
        text.push('\n');
    }

    text.push_str(&format!("{:>6} +{}\n", 0, "-".repeat(cols)));
    text.push_str(&format!(
        "        0{:>width$}\n",
        CANVAS_MM as u32,
        width = cols.saturating_sub(1)
    ));
    text.push_str(&format!(
        "        width {:.2} mm x length {:.2} mm\n",
        output.width_mm, output.length_mm
    ));
    text
}

fn cells_for(mm: f64, cells: usize) -> usize {
    let scaled = (mm / CANVAS_MM * cells as f64).round();
    (scaled.max(0.0) as usize).min(cells)
}

/// ASCII line chart of `(x, y)` samples
///
/// Samples are plotted as `*`, one per column bucket; the y axis spans the
/// sample range (padded when flat).
pub fn line_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    samples: impl IntoIterator<Item = (f64, f64)>,
    cols: usize,
    rows: usize,
) -> String {
    let points: Vec<(f64, f64)> = samples.into_iter().collect();
    let mut text = format!("{}\n", title);

    if points.is_empty() || cols == 0 || rows == 0 {
        text.push_str("  (no data)\n");
        return text;
    }

    let (x_min, x_max) = bounds(points.iter().map(|p| p.0));
    let (mut y_min, mut y_max) = bounds(points.iter().map(|p| p.1));
    if y_max - y_min < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let mut grid = vec![vec![' '; cols]; rows];
    for (x, y) in &points {
        let col = scale(*x, x_min, x_max, cols);
        let row = scale(*y, y_min, y_max, rows);
        grid[rows - 1 - row][col] = '*';
    }

    text.push_str(&format!("  {} \n", y_label));
    for (i, line) in grid.iter().enumerate() {
        let tick = if i == 0 {
            format!("{:>10.3}", y_max)
        } else if i == rows - 1 {
            format!("{:>10.3}", y_min)
        } else {
            " ".repeat(10)
        };
        text.push_str(&format!("{} |{}\n", tick, line.iter().collect::<String>()));
    }
    text.push_str(&format!("{} +{}\n", " ".repeat(10), "-".repeat(cols)));
    text.push_str(&format!(
        "{} {:<w$}{:>8.2}\n",
        " ".repeat(10),
        format!("{:.2}", x_min),
        x_max,
        w = cols.saturating_sub(8)
    ));
    text.push_str(&format!("{} {}\n", " ".repeat(10), x_label));
    text
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn scale(value: f64, lo: f64, hi: f64, cells: usize) -> usize {
    if hi <= lo {
        return 0;
    }
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    ((t * (cells - 1) as f64).round() as usize).min(cells - 1)
}
