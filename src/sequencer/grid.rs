//! Pointer to grid mapping
//!
//! Maps window-space pointer positions onto `(tick, pitch)` cells and back,
//! and derives the NDC geometry the renderer needs for bands, buttons and the
//! hovered cell. NDC here is `[-1, 1]` per axis with y pointing down, the
//! same orientation as the pointer.

use crate::vec::Vec2f;

use super::{MAX_PITCHES, MAX_TICKS};

/// Per-frame geometry derived from window size and pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandInfo {
    pub bands_offset: Vec2f,
    pub bands_scale: Vec2f,
    pub button_back_offset: Vec2f,
    pub button_play_offset: Vec2f,
    pub button_scale: Vec2f,
    pub cell_index: [Option<usize>; 2],
    pub cell_offset: Vec2f,
    pub cell_scale: Vec2f,
    pub cell_start: Vec2f,
    pub pointer: Vec2f,
    pub window_size: Vec2f,
}

impl BandInfo {
    /// The hovered `(tick, pitch)` if the pointer is over a note cell on both axes.
    pub fn cell(&self) -> Option<(usize, usize)> {
        match self.cell_index {
            [Some(tick), Some(pitch)] => Some((tick, pitch)),
            _ => None,
        }
    }

    /// NDC center of a note cell.
    pub fn cell_center(&self, tick: usize, pitch: usize) -> Vec2f {
        self.cell_start + 2.0 * self.cell_scale * Vec2f::new(tick as f32, pitch as f32)
    }

    pub fn over_back_button(&self) -> bool {
        self.over_button(self.button_back_offset)
    }

    pub fn over_play_button(&self) -> bool {
        self.over_button(self.button_play_offset)
    }

    fn over_button(&self, offset: Vec2f) -> bool {
        let dist = (self.pointer - offset).abs();
        dist.x <= self.button_scale.x && dist.y <= self.button_scale.y
    }
}

/// Cell counts per axis, including the header column and row.
pub fn grid_count() -> Vec2f {
    Vec2f::new(MAX_TICKS as f32, MAX_PITCHES as f32) + 1.0
}

// Cell heights reserved above the grid for the button row.
fn margin_count() -> Vec2f {
    Vec2f::new(0.0, 2.0)
}

struct Layout {
    grid_count: Vec2f,
    margin: Vec2f,
    music_size: Vec2f,
}

impl Layout {
    fn new(window_size: Vec2f) -> Self {
        let grid_count = grid_count();
        let margin_count = margin_count();
        let margin = window_size / (grid_count + margin_count) * margin_count;
        let music_size = window_size - margin;
        Self {
            grid_count,
            margin,
            music_size,
        }
    }

    /// Float-valued cell coordinate, where -1 is the header.
    fn cell(&self, pointer: Vec2f) -> Vec2f {
        let music_pos_frac = (pointer - self.margin) / self.music_size;
        (music_pos_frac * self.grid_count).floor() - 1.0
    }

    /// Window-space center of a cell coordinate.
    fn grid_pos(&self, cell: Vec2f) -> Vec2f {
        let grid_pos_frac = (cell + 1.0) / self.grid_count + 0.5 / self.grid_count;
        grid_pos_frac * self.music_size + self.margin
    }
}

/// Window-space pixel center of the cell `(tick, pitch)`.
pub fn cell_position(window_size: Vec2f, tick: usize, pitch: usize) -> Vec2f {
    Layout::new(window_size).grid_pos(Vec2f::new(tick as f32, pitch as f32))
}

/// Map the pointer onto the grid and derive this frame's draw geometry.
///
/// `window_size` must be positive on both axes.
pub fn calc_bands(window_size: Vec2f, pointer: Vec2f) -> BandInfo {
    let layout = Layout::new(window_size);
    let grid_count = layout.grid_count;
    let margin = layout.margin;
    let music_size = layout.music_size;
    let cell = layout.cell(pointer);
    // Only the lower bounds gate both axes; upper bounds are per axis.
    let active = cell.x >= -1.0 && cell.y >= -1.0;
    let cell_index = cell.map(|axis, x| {
        (0.0 <= x && x < grid_count[axis] && active).then_some(x as usize)
    });
    let grid_pos = layout.grid_pos(cell);
    let table_size = Vec2f::new(window_size.x, music_size.y);
    let button_scale = margin.y / window_size;
    let cell_scale = music_size / grid_count / window_size;
    BandInfo {
        bands_offset: (2.0 * margin + table_size) / window_size - 1.0,
        bands_scale: table_size / window_size,
        button_back_offset: Vec2f::splat(-1.0) + button_scale * Vec2f::new(4.0, 1.0),
        button_play_offset: Vec2f::splat(-1.0) + button_scale * Vec2f::new(1.5, 1.0),
        button_scale,
        cell_index,
        cell_offset: 2.0 * (grid_pos / window_size) - 1.0,
        cell_scale,
        cell_start: 2.0 * margin / window_size - 1.0 + 3.0 * cell_scale,
        pointer: 2.0 * pointer / window_size - 1.0,
        window_size,
    }
}
