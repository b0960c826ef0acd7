//! Node placement.
//!
//! Every build owns an explicit [`LayoutCursor`] per column instead of
//! threading shared grid counters through the builder call chain. Columns
//! are fixed-width; texture stacks are vertically centered up front from
//! the map count so the finished graph reads left-to-right into the
//! shader regardless of how many maps resolved.

/// Horizontal distance between node columns.
pub const COLUMN_WIDTH: f32 = 300.0;
/// Vertical distance between stacked nodes in a column.
pub const ROW_HEIGHT: f32 = 300.0;

/// A write-once-downwards placement cursor for one node column.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    x: f32,
    y: f32,
}

impl LayoutCursor {
    /// Cursor for the texture-map column, vertically centered for
    /// `map_count` stacked image nodes. Column -2 keeps two mixer columns
    /// between the maps and the shader.
    pub fn maps(map_count: usize) -> Self {
        let count = map_count.max(1) as f32;
        Self {
            x: -2.0 * COLUMN_WIDTH,
            y: (count - 1.0) * ROW_HEIGHT / 2.0,
        }
    }

    /// Cursor at an arbitrary column index, starting at y = 0. Column 0 is
    /// the shader column; negative indices sit to its left.
    pub fn column(index: i32) -> Self {
        Self {
            x: index as f32 * COLUMN_WIDTH,
            y: 0.0,
        }
    }

    /// Returns the current position and steps one row down.
    pub fn place(&mut self) -> [f32; 2] {
        let at = [self.x, self.y];
        self.y -= ROW_HEIGHT;
        at
    }

    /// Current position without advancing.
    pub fn peek(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// A sibling cursor offset from this one; used for half-row side
    /// nodes (tiling groups next to their micro-normal texture).
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
