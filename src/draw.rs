/// Renderer-facing draw state built from the grid mapping, song and clock
use crate::sequencer::grid::BandInfo;
use crate::sequencer::playback::PlaybackState;
use crate::sequencer::{Song, MAX_PITCHES, MAX_TICKS};
use crate::vec::Vec2f;

// Notes, bands, marker, hover and buttons.
const MAX_EXTRA_RECTS: usize = MAX_PITCHES + 8;
pub const MAX_RECTS: usize = MAX_TICKS * MAX_PITCHES + MAX_EXTRA_RECTS;

/// One axis-aligned rect in NDC: `offset` is its center, `scale` its half extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstance {
    pub offset: Vec2f,
    pub scale: Vec2f,
    pub light: f32,
}

impl DrawInstance {
    pub fn new(offset: Vec2f, scale: Vec2f, light: f32) -> Self {
        Self {
            offset,
            scale,
            light,
        }
    }

    /// Window-space `(min, max)` corners.
    pub fn corners(&self, window_size: Vec2f) -> (Vec2f, Vec2f) {
        (
            ndc_to_window(self.offset - self.scale, window_size),
            ndc_to_window(self.offset + self.scale, window_size),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Vec2f; 3],
    pub light: f32,
}

pub fn ndc_to_window(ndc: Vec2f, window_size: Vec2f) -> Vec2f {
    (ndc + 1.0) / 2.0 * window_size
}

/// Rects in paint order.
pub fn build_instances(bands: &BandInfo, song: &Song, play: &PlaybackState) -> Vec<DrawInstance> {
    let mut instances = Vec::with_capacity(MAX_RECTS);
    instances.push(DrawInstance::new(bands.bands_offset, bands.bands_scale, 0.1));

    // Every other pitch row gets a lighter band.
    for pitch in (0..MAX_PITCHES).step_by(2) {
        let y = bands.cell_center(0, pitch).y;
        instances.push(DrawInstance::new(
            Vec2f::new(bands.bands_offset.x, y),
            Vec2f::new(bands.bands_scale.x, bands.cell_scale.y),
            0.15,
        ));
    }

    // Playhead column spanning all pitch rows.
    let rows = MAX_PITCHES as f32;
    let top = bands.cell_center(play.tick, 0) - bands.cell_scale;
    instances.push(DrawInstance::new(
        top + bands.cell_scale * Vec2f::new(1.0, rows),
        bands.cell_scale * Vec2f::new(1.0, rows),
        if play.playing { 0.35 } else { 0.25 },
    ));

    for (tick_index, tick) in song.ticks().iter().enumerate() {
        let light = if tick_index == play.tick { 1.0 } else { 0.75 };
        for pitch in tick.pitches() {
            instances.push(DrawInstance::new(
                bands.cell_center(tick_index, pitch),
                bands.cell_scale * 0.8,
                light,
            ));
        }
    }

    if bands.cell().is_some() {
        instances.push(DrawInstance::new(bands.cell_offset, bands.cell_scale, 0.5));
    }

    for (offset, hover) in [
        (bands.button_play_offset, bands.over_play_button()),
        (bands.button_back_offset, bands.over_back_button()),
    ] {
        let light = if hover { 0.4 } else { 0.2 };
        instances.push(DrawInstance::new(offset, bands.button_scale * 0.9, light));
    }

    instances
}

/// Play and rewind glyphs drawn over the button rects.
pub fn button_triangles(bands: &BandInfo, playing: bool) -> [Triangle; 2] {
    let glyph = |offset: Vec2f, dir: f32| {
        let s = bands.button_scale * 0.6;
        [
            offset + s * Vec2f::new(-0.8 * dir, -1.0),
            offset + s * Vec2f::new(dir, 0.0),
            offset + s * Vec2f::new(-0.8 * dir, 1.0),
        ]
    };
    [
        Triangle {
            points: glyph(bands.button_play_offset, 1.0),
            light: if playing { 1.0 } else { 0.7 },
        },
        Triangle {
            points: glyph(bands.button_back_offset, -1.0),
            light: 0.7,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::grid::{calc_bands, cell_position};
    use crate::sequencer::playback::PlaybackClock;

    const WINDOW: Vec2f = Vec2f::new(1000.0, 1000.0);

    #[test]
    fn test_instance_count() {
        let mut song = Song::default();
        song.insert(0, 0);
        song.insert(3, 9);
        let clock = PlaybackClock::default();

        let off_grid = calc_bands(WINDOW, Vec2f::new(900.0, 5.0));
        let instances = build_instances(&off_grid, &song, clock.state());
        // background + 13 bands + marker + 2 notes + 2 buttons
        assert_eq!(instances.len(), 1 + 13 + 1 + 2 + 2);

        let on_grid = calc_bands(WINDOW, cell_position(WINDOW, 4, 4));
        let instances = build_instances(&on_grid, &song, clock.state());
        assert_eq!(instances.len(), 1 + 13 + 1 + 2 + 1 + 2);
        assert!(instances.len() <= MAX_RECTS);
    }

    #[test]
    fn test_note_rect_covers_its_cell() {
        let mut song = Song::default();
        song.insert(7, 11);
        let clock = PlaybackClock::default();
        let bands = calc_bands(WINDOW, Vec2f::new(0.0, 0.0));
        let note = build_instances(&bands, &song, clock.state())
            .into_iter()
            .find(|instance| instance.light == 0.75)
            .unwrap();
        let (min, max) = note.corners(WINDOW);
        let center = cell_position(WINDOW, 7, 11);
        assert!(min.x < center.x && center.x < max.x);
        assert!(min.y < center.y && center.y < max.y);
    }

    #[test]
    fn test_marker_follows_tick() {
        let song = Song::default();
        let mut clock = PlaybackClock::new(1);
        clock.play();
        for _ in 0..6 {
            clock.frame(&song);
        }
        let bands = calc_bands(WINDOW, Vec2f::new(0.0, 0.0));
        let marker = build_instances(&bands, &song, clock.state())[14];
        let (min, max) = marker.corners(WINDOW);
        let x = cell_position(WINDOW, 6, 0).x;
        assert!(min.x < x && x < max.x);
        assert!((min.y - cell_position(WINDOW, 6, 0).y).abs() < 20.0);
    }

    #[test]
    fn test_triangles_sit_in_buttons() {
        let bands = calc_bands(WINDOW, Vec2f::new(0.0, 0.0));
        for (triangle, offset) in button_triangles(&bands, false)
            .iter()
            .zip([bands.button_play_offset, bands.button_back_offset])
        {
            for point in triangle.points {
                let dist = (point - offset).abs();
                assert!(dist.x <= bands.button_scale.x && dist.y <= bands.button_scale.y);
            }
        }
    }
}
