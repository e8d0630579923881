//! Grid-of-charts rendering.
//!
//! [`layout_grid`] turns the series table into a fixed 4×3 [`GridPlot`]
//! model (dropping missing values, fitting trend lines, resolving titles and
//! axis ticks). [`render`] then serializes that model to SVG and the snapshot
//! table to HTML.

pub mod axis;
pub mod svg;
pub mod table;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{GRID_CELLS, GRID_COLS, GRID_ROWS};
use crate::models::{SeriesKey, SeriesTable, SnapshotTable};
use crate::trend::{fit_linear, LinearFit};

use axis::{date_to_ordinal, major_ticks, minor_ticks, DateTick};

pub const NO_DATA_TITLE: &str = "No recent data";

// ---------------------------------------------------------------------------
// Grid model
// ---------------------------------------------------------------------------

/// One plotted series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPlot {
    pub key: SeriesKey,
    pub title: String,
    pub dates: Vec<NaiveDate>,
    /// `(ordinal day, value)` pairs in date order.
    pub points: Vec<(f64, f64)>,
    pub trend: Option<TrendOverlay>,
    #[serde(skip)]
    pub major_ticks: Vec<DateTick>,
    #[serde(skip)]
    pub minor_ticks: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendOverlay {
    pub slope: f64,
    pub intercept: f64,
}

impl From<LinearFit> for TrendOverlay {
    fn from(fit: LinearFit) -> Self {
        Self {
            slope: fit.slope,
            intercept: fit.intercept,
        }
    }
}

impl TrendOverlay {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellState {
    /// No series assigned to this cell.
    Unused,
    /// The series had no observations once missing values were dropped.
    NoData { key: SeriesKey },
    Plotted(SeriesPlot),
}

#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub state: CellState,
}

impl Cell {
    pub fn title(&self) -> &str {
        match &self.state {
            CellState::Unused => "",
            CellState::NoData { .. } => NO_DATA_TITLE,
            CellState::Plotted(plot) => plot.title.as_str(),
        }
    }

    /// Axes are drawn only for plotted cells.
    pub fn axes_visible(&self) -> bool {
        matches!(self.state, CellState::Plotted(_))
    }

    pub fn plot(&self) -> Option<&SeriesPlot> {
        match &self.state {
            CellState::Plotted(plot) => Some(plot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridPlot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Cell>,
}

impl GridPlot {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn plotted(&self) -> impl Iterator<Item = &SeriesPlot> {
        self.cells.iter().filter_map(Cell::plot)
    }
}

/// Output of a full render pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDashboard {
    pub title: String,
    pub grid: GridPlot,
    pub svg: String,
    pub table_html: String,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Chart title for a series: the snapshot `Name`, else the raw identifier.
pub fn resolve_title(snapshot: &SnapshotTable, key: &SeriesKey) -> String {
    snapshot
        .name_of(key.instrument())
        .unwrap_or_else(|| key.instrument().to_string())
}

fn plot_series(snapshot: &SnapshotTable, series: &SeriesTable, index: usize) -> CellState {
    let Some(column) = series.columns().get(index) else {
        return CellState::Unused;
    };
    let observations = column.observations(series.dates());
    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        return CellState::NoData {
            key: column.key.clone(),
        };
    };

    let points: Vec<(f64, f64)> = observations
        .iter()
        .map(|o| (date_to_ordinal(o.date), o.value))
        .collect();
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let trend = fit_linear(&xs, &ys).map(TrendOverlay::from);

    CellState::Plotted(SeriesPlot {
        key: column.key.clone(),
        title: resolve_title(snapshot, &column.key),
        dates: observations.iter().map(|o| o.date).collect(),
        major_ticks: major_ticks(first.date, last.date),
        minor_ticks: minor_ticks(first.date, last.date),
        points,
        trend,
    })
}

/// Assign series column `i` to cell `(i / 3, i % 3)` of the 4×3 grid.
pub fn layout_grid(snapshot: &SnapshotTable, series: &SeriesTable) -> GridPlot {
    if series.width() > GRID_CELLS {
        tracing::warn!(
            columns = series.width(),
            cells = GRID_CELLS,
            "more series than grid cells; extra series are not drawn"
        );
    }

    let cells = (0..GRID_CELLS)
        .map(|index| Cell {
            row: index / GRID_COLS,
            col: index % GRID_COLS,
            state: plot_series(snapshot, series, index),
        })
        .collect();

    GridPlot {
        rows: GRID_ROWS,
        cols: GRID_COLS,
        cells,
    }
}

/// Lay out, draw and tabulate one category's data.
pub fn render(category_label: &str, snapshot: &SnapshotTable, series: &SeriesTable) -> RenderedDashboard {
    let grid = layout_grid(snapshot, series);
    let svg = svg::grid_svg(category_label, &grid);
    let table_html = table::snapshot_html(snapshot);
    RenderedDashboard {
        title: category_label.to_string(),
        grid,
        svg,
        table_html,
    }
}

/// Escape text for inclusion in XML/HTML content and attributes.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
