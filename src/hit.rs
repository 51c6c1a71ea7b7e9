//! Mapping of pointer coordinates onto the calendar panel.
//!
//! The panel is split vertically into a header band (1.5 cell heights) with
//! the month buttons at both ends, a week label band (1.5 cell heights) and
//! six rows of date cells.

use crate::grid::{GRID_ROWS, WEEK_DAYS};

const BAND_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        PanelGeometry {
            cell_width: 48.0,
            cell_height: 36.0,
        }
    }
}

impl PanelGeometry {
    /// Splits a measured panel into seven columns and nine unit rows.
    pub fn measure(width: f32, height: f32) -> Self {
        PanelGeometry {
            cell_width: width / WEEK_DAYS as f32,
            cell_height: height / Self::unit_rows(),
        }
    }

    fn unit_rows() -> f32 {
        2.0 * BAND_FACTOR + GRID_ROWS as f32
    }

    pub fn header_height(&self) -> f32 {
        BAND_FACTOR * self.cell_height
    }

    pub fn week_row_height(&self) -> f32 {
        BAND_FACTOR * self.cell_height
    }

    pub fn grid_top(&self) -> f32 {
        self.header_height() + self.week_row_height()
    }

    /// Width and height of the panel this geometry was measured from.
    pub fn panel_size(&self) -> (f32, f32) {
        (
            self.cell_width * WEEK_DAYS as f32,
            self.cell_height * Self::unit_rows(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    PrevButton,
    NextButton,
    DateCell(usize),
    None,
}

pub fn hit_test(
    x: f32,
    y: f32,
    geometry: &PanelGeometry,
    panel_width: f32,
    panel_height: f32,
) -> Region {
    // Buttons are square, their side is the header height.
    let button = geometry.header_height();
    let in_header = y > 0.0 && y < button;

    if in_header && x > 0.0 && x < button {
        Region::PrevButton
    } else if in_header && x > panel_width - button && x < panel_width {
        Region::NextButton
    } else if y > geometry.grid_top() && y < panel_height && x >= 0.0 && x < panel_width {
        // Division may round up to the next cell right at the far edges.
        let column = ((x / geometry.cell_width) as usize).min(WEEK_DAYS - 1);
        let row = (((y - geometry.grid_top()) / geometry.cell_height) as usize).min(GRID_ROWS - 1);

        Region::DateCell(row * WEEK_DAYS + column)
    } else {
        Region::None
    }
}
