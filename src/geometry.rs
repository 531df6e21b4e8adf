//! Geometry primitives and the column grid.
//!
//! The grid is the source of "rendered bounds": it places the nine bracket
//! columns side by side for a given viewport width, mirrored around the
//! championship column.
//!
//! ```text
//! L1 L2 L3 L4 C5 R4 R3 R2 R1
//! ```

use crate::config::LayoutConfig;
use crate::record::{Arm, Column, CHAMPIONSHIP_ROUND};

/// Number of columns in the grid.
pub const COLUMN_COUNT: usize = 2 * (CHAMPIONSHIP_ROUND as usize - 1) + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Midpoint of the left edge.
    #[inline]
    pub fn left_mid(&self) -> Point {
        Point::new(self.x, self.center_y())
    }

    /// Midpoint of the right edge.
    #[inline]
    pub fn right_mid(&self) -> Point {
        Point::new(self.right(), self.center_y())
    }
}

/// Horizontal placement of every column for one viewport width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnGrid {
    column_width: f32,
    gap: f32,
    top: f32,
}

impl ColumnGrid {
    /// Fit the grid into a viewport width.
    ///
    /// Columns shrink to share the width but stay between the configured
    /// minimum and preferred widths; narrower viewports scroll.
    pub fn fit(viewport_width: f32, config: &LayoutConfig) -> Self {
        let gaps = config.column_gap * (COLUMN_COUNT - 1) as f32;
        let share = (viewport_width - gaps) / COLUMN_COUNT as f32;
        let column_width = share
            .min(config.column_width)
            .max(config.min_column_width);
        Self {
            column_width,
            gap: config.column_gap,
            top: config.column_top,
        }
    }

    /// Position of a column in the left-to-right order, if it exists.
    pub fn column_index(column: Column) -> Option<usize> {
        let last = CHAMPIONSHIP_ROUND as usize - 1;
        let round = column.round as usize;
        match column.arm {
            Arm::Left if (1..=last).contains(&round) => Some(round - 1),
            Arm::Center if column.round == CHAMPIONSHIP_ROUND => Some(last),
            Arm::Right if (1..=last).contains(&round) => Some(COLUMN_COUNT - round),
            _ => None,
        }
    }

    /// Top-left corner of a column.
    pub fn column_origin(&self, column: Column) -> Option<Point> {
        let index = Self::column_index(column)?;
        let x = index as f32 * (self.column_width + self.gap);
        Some(Point::new(x, self.top))
    }

    #[inline]
    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    /// Total width spanned by all columns.
    pub fn width(&self) -> f32 {
        COLUMN_COUNT as f32 * self.column_width + (COLUMN_COUNT - 1) as f32 * self.gap
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }
}
