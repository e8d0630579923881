//! SVG serialization of a [`GridPlot`].

use std::fmt::Write as _;

use super::axis::{is_flat, value_ticks};
use super::{escape_text, Cell, CellState, GridPlot, SeriesPlot};

pub const CELL_WIDTH: f64 = 500.0;
pub const CELL_HEIGHT: f64 = 400.0;
const HEADER_HEIGHT: f64 = 48.0;

const PLOT_LEFT: f64 = 72.0;
const PLOT_RIGHT: f64 = 24.0;
const PLOT_TOP: f64 = 44.0;
const PLOT_BOTTOM: f64 = 84.0;

const FONT: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";
const SERIES_COLOR: &str = "#1f77b4";
const TREND_COLOR: &str = "#d62728";
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#e6e6e6";

/// Data-to-pixel mapping for one cell's plot area.
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn for_plot(plot: &SeriesPlot) -> Self {
        let (mut x_min, mut x_max) = min_max(plot.points.iter().map(|p| p.0));
        let (mut y_min, mut y_max) = min_max(plot.points.iter().map(|p| p.1));

        if let Some(trend) = &plot.trend {
            for y in [trend.evaluate(x_min), trend.evaluate(x_max)] {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if x_max - x_min < 1.0 {
            x_min -= 1.0;
            x_max += 1.0;
        }
        let pad = if is_flat(y_min, y_max) {
            (y_max.abs() * 0.05).max(1.0)
        } else {
            (y_max - y_min) * 0.05
        };

        Self {
            x_min,
            x_max,
            y_min: y_min - pad,
            y_max: y_max + pad,
            width: CELL_WIDTH - PLOT_LEFT - PLOT_RIGHT,
            height: CELL_HEIGHT - PLOT_TOP - PLOT_BOTTOM,
        }
    }

    fn px(&self, x: f64) -> f64 {
        PLOT_LEFT + (x - self.x_min) / (self.x_max - self.x_min) * self.width
    }

    fn py(&self, y: f64) -> f64 {
        PLOT_TOP + (self.y_max - y) / (self.y_max - self.y_min) * self.height
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn format_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.0}", v)
    } else if v.abs() >= 10.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Render all cells into one SVG document.
pub fn grid_svg(heading: &str, grid: &GridPlot) -> String {
    let width = CELL_WIDTH * grid.cols as f64;
    let height = HEADER_HEIGHT + CELL_HEIGHT * grid.rows as f64;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' viewBox='0 0 {width:.0} {height:.0}' role='img'>"
    );
    let _ = writeln!(svg, "  <rect width='{width:.0}' height='{height:.0}' fill='#ffffff'/>");
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='32' text-anchor='middle' fill='{AXIS_COLOR}' font-family='{FONT}' font-size='22' font-weight='600'>{}</text>",
        width / 2.0,
        escape_text(heading)
    );

    for cell in &grid.cells {
        let offset_x = cell.col as f64 * CELL_WIDTH;
        let offset_y = HEADER_HEIGHT + cell.row as f64 * CELL_HEIGHT;
        let _ = writeln!(
            svg,
            "  <g class='cell' data-row='{}' data-col='{}' transform='translate({offset_x:.0} {offset_y:.0})'>",
            cell.row, cell.col
        );
        write_cell(&mut svg, cell);
        let _ = writeln!(svg, "  </g>");
    }

    let _ = writeln!(svg, "</svg>");
    svg
}

fn write_title(svg: &mut String, title: &str) {
    let _ = writeln!(
        svg,
        "    <text class='title' x='{:.0}' y='28' text-anchor='middle' fill='{AXIS_COLOR}' font-family='{FONT}' font-size='15'>{}</text>",
        PLOT_LEFT + (CELL_WIDTH - PLOT_LEFT - PLOT_RIGHT) / 2.0,
        escape_text(title)
    );
}

fn write_cell(svg: &mut String, cell: &Cell) {
    match &cell.state {
        CellState::Unused => {}
        CellState::NoData { key } => {
            let _ = writeln!(svg, "    <desc>{}</desc>", escape_text(&key.to_string()));
            write_title(svg, cell.title());
        }
        CellState::Plotted(plot) => write_plot(svg, plot),
    }
}

fn write_plot(svg: &mut String, plot: &SeriesPlot) {
    let frame = Frame::for_plot(plot);
    let bottom = PLOT_TOP + frame.height;
    let right = PLOT_LEFT + frame.width;

    // Value gridlines and labels.
    for y in value_ticks(frame.y_min, frame.y_max, 5) {
        let py = frame.py(y);
        let _ = writeln!(
            svg,
            "    <line x1='{PLOT_LEFT:.1}' y1='{py:.2}' x2='{right:.1}' y2='{py:.2}' stroke='{GRID_COLOR}' stroke-width='1'/>"
        );
        let _ = writeln!(
            svg,
            "    <text x='{:.1}' y='{:.2}' text-anchor='end' fill='{AXIS_COLOR}' font-family='{FONT}' font-size='11'>{}</text>",
            PLOT_LEFT - 6.0,
            py + 4.0,
            format_value(y)
        );
    }

    // Minor ticks at month boundaries.
    for x in plot.minor_ticks.iter().filter(|x| **x >= frame.x_min && **x <= frame.x_max) {
        let px = frame.px(*x);
        let _ = writeln!(
            svg,
            "    <line class='minor-tick' x1='{px:.2}' y1='{bottom:.1}' x2='{px:.2}' y2='{:.1}' stroke='{AXIS_COLOR}' stroke-width='0.6'/>",
            bottom + 3.0
        );
    }

    // Major ticks with rotated YYYY-MM labels.
    for tick in plot.major_ticks.iter().filter(|t| t.x >= frame.x_min && t.x <= frame.x_max) {
        let px = frame.px(tick.x);
        let ly = bottom + 16.0;
        let _ = writeln!(
            svg,
            "    <line class='major-tick' x1='{px:.2}' y1='{bottom:.1}' x2='{px:.2}' y2='{:.1}' stroke='{AXIS_COLOR}' stroke-width='1'/>",
            bottom + 6.0
        );
        let _ = writeln!(
            svg,
            "    <text class='tick-label' x='{px:.2}' y='{ly:.1}' transform='rotate(45 {px:.2} {ly:.1})' fill='{AXIS_COLOR}' font-family='{FONT}' font-size='11'>{}</text>",
            escape_text(&tick.label)
        );
    }

    let _ = writeln!(
        svg,
        "    <rect x='{PLOT_LEFT:.1}' y='{PLOT_TOP:.1}' width='{:.1}' height='{:.1}' fill='none' stroke='{AXIS_COLOR}' stroke-width='1'/>",
        frame.width, frame.height
    );

    if let Some(trend) = &plot.trend {
        let (x0, x1) = (plot.points[0].0, plot.points[plot.points.len() - 1].0);
        let _ = writeln!(
            svg,
            "    <line class='trend' x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='{TREND_COLOR}' stroke-width='1.5' stroke-dasharray='6 4'/>",
            frame.px(x0),
            frame.py(trend.evaluate(x0)),
            frame.px(x1),
            frame.py(trend.evaluate(x1))
        );
    }

    if plot.points.len() == 1 {
        let (x, y) = plot.points[0];
        let _ = writeln!(
            svg,
            "    <circle class='series' cx='{:.2}' cy='{:.2}' r='3' fill='{SERIES_COLOR}'/>",
            frame.px(x),
            frame.py(y)
        );
    } else {
        let mut path = String::new();
        for (i, (x, y)) in plot.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{cmd}{:.2},{:.2} ", frame.px(*x), frame.py(*y));
        }
        let _ = writeln!(
            svg,
            "    <path class='series' d='{}' fill='none' stroke='{SERIES_COLOR}' stroke-width='1.5' stroke-linejoin='round'/>",
            path.trim_end()
        );
    }

    write_title(svg, &plot.title);
}
