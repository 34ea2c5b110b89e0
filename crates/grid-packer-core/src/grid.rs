use crate::model::Rect;

/// Row-major slot grid of `slots_per_side × slots_per_side` equal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    pub slots_per_side: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl SlotGrid {
    pub fn new(slots_per_side: u32, cell_width: u32, cell_height: u32) -> Self {
        Self {
            slots_per_side,
            cell_width,
            cell_height,
        }
    }

    pub fn capacity(&self) -> usize {
        (self.slots_per_side as usize) * (self.slots_per_side as usize)
    }

    /// Output image dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (
            self.slots_per_side * self.cell_width,
            self.slots_per_side * self.cell_height,
        )
    }

    /// `(row, col)` for slot `index`.
    pub fn cell(&self, index: usize) -> (u32, u32) {
        let n = self.slots_per_side as usize;
        ((index / n) as u32, (index % n) as u32)
    }

    /// Destination rectangle of slot `index`. Caller guarantees `index < capacity()`.
    pub fn slot_rect(&self, index: usize) -> Rect {
        let (row, col) = self.cell(index);
        Rect::new(
            col * self.cell_width,
            row * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}
