// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation: line and box grids over a dot lattice

use serde::{Deserialize, Serialize};

use crate::{Line, Orientation, PlayerId};

/// The three ownership grids over an R x C dot lattice.
///
/// Box (r, c) is bounded by horizontal[r][c] on top, horizontal[r+1][c]
/// on the bottom, vertical[r][c] on the left and vertical[r][c+1] on the
/// right. A box cell is owned iff all four bounding edges are owned, and
/// its owner never changes once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Dot rows
    rows: usize,
    /// Dot columns
    cols: usize,
    /// horizontal[r][c] for r in [0,rows), c in [0,cols-1)
    horizontal: Vec<Vec<Option<PlayerId>>>,
    /// vertical[r][c] for r in [0,rows-1), c in [0,cols)
    vertical: Vec<Vec<Option<PlayerId>>>,
    /// boxes[r][c] for r in [0,rows-1), c in [0,cols-1)
    boxes: Vec<Vec<Option<PlayerId>>>,
}

impl Board {
    /// Create an empty board over a lattice with the given dot dimensions.
    /// Requires at least a 2x2 lattice to hold a single box.
    pub fn new(rows: usize, cols: usize) -> Self {
        debug_assert!(rows >= 2 && cols >= 2, "lattice must hold at least one box");
        Self {
            rows,
            cols,
            horizontal: vec![vec![None; cols - 1]; rows],
            vertical: vec![vec![None; cols]; rows - 1],
            boxes: vec![vec![None; cols - 1]; rows - 1],
        }
    }

    /// Dot rows on the lattice
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Dot columns on the lattice
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Owner of an edge, if any. Out-of-bounds lines read as unowned;
    /// callers are expected to bounds-check before mutating.
    pub fn edge_owner(&self, line: Line) -> Option<PlayerId> {
        if !line.in_bounds(self.rows, self.cols) {
            return None;
        }
        match line.orientation {
            Orientation::Horizontal => self.horizontal[line.r][line.c],
            Orientation::Vertical => self.vertical[line.r][line.c],
        }
    }

    /// Whether an edge already has an owner
    pub fn is_edge_owned(&self, line: Line) -> bool {
        self.edge_owner(line).is_some()
    }

    /// Claim an edge for a player. Returns false and leaves the board
    /// untouched when the line is out of bounds or already owned.
    pub fn set_edge(&mut self, line: Line, player: PlayerId) -> bool {
        if !line.in_bounds(self.rows, self.cols) {
            return false;
        }
        let cell = match line.orientation {
            Orientation::Horizontal => &mut self.horizontal[line.r][line.c],
            Orientation::Vertical => &mut self.vertical[line.r][line.c],
        };
        if cell.is_some() {
            return false;
        }
        *cell = Some(player);
        true
    }

    /// Owner of box (r, c), if captured
    pub fn box_owner(&self, r: usize, c: usize) -> Option<PlayerId> {
        self.boxes.get(r).and_then(|row| row.get(c)).copied().flatten()
    }

    /// Whether all four edges bounding box (r, c) are owned
    pub fn box_edges_complete(&self, r: usize, c: usize) -> bool {
        self.horizontal[r][c].is_some()
            && self.horizontal[r + 1][c].is_some()
            && self.vertical[r][c].is_some()
            && self.vertical[r][c + 1].is_some()
    }

    /// Record the capture of box (r, c). The caller guarantees the box is
    /// unowned and its four edges are complete.
    pub(crate) fn claim_box(&mut self, r: usize, c: usize, player: PlayerId) {
        debug_assert!(self.boxes[r][c].is_none(), "box captured twice");
        debug_assert!(self.box_edges_complete(r, c));
        self.boxes[r][c] = Some(player);
    }

    /// Total number of box cells on this lattice
    pub fn total_boxes(&self) -> usize {
        (self.rows - 1) * (self.cols - 1)
    }

    /// Number of captured boxes
    pub fn claimed_boxes(&self) -> usize {
        self.boxes
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Whether every box is owned
    pub fn is_full(&self) -> bool {
        self.claimed_boxes() == self.total_boxes()
    }

    /// Iterate the coordinates of all box cells
    pub fn box_coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols - 1;
        (0..self.rows - 1).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::GRID_ROWS, crate::GRID_COLS)
    }
}
