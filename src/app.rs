/// Application state and the per-event transition the host drives
use log::{debug, info};

use crate::config::Config;
use crate::sequencer::edit::EditController;
use crate::sequencer::grid::{calc_bands, BandInfo};
use crate::sequencer::playback::{PlaybackClock, PlaybackEvent, PlaybackState};
use crate::sequencer::{DrawMode, Note, Song};
use crate::vec::Vec2f;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowState {
    pub size: Vec2f,
    pub pointer: Vec2f,
    pub press: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Frame(WindowState),
    Key,
    SoundsLoaded,
}

/// Side effects the host performs after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    TriggerSound(Note),
    TickAdvanced(usize),
    Draw,
}

/// What the core needs from whoever runs it.
pub trait Host {
    fn window_state(&self) -> WindowState;
    fn trigger_sound(&mut self, note: &Note);
    fn tick_advanced(&mut self, _tick: usize) {}
    fn advance_draw_state(&mut self, bands: &BandInfo, song: &Song, play: &PlaybackState);
}

pub struct App {
    song: Song,
    clock: PlaybackClock,
    edit: EditController,
    bands: BandInfo,
    ready: bool,
}

impl App {
    pub fn new(song: Song, config: &Config) -> Self {
        let clock = PlaybackClock::new(config.frames_per_tick(&song));
        info!("{} ticks, {} frames per tick", song.len(), clock.frames_per_tick());
        Self {
            song,
            clock,
            edit: EditController::new(),
            bands: BandInfo::default(),
            ready: false,
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn bands(&self) -> &BandInfo {
        &self.bands
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.edit.draw_mode()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn handle_event(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Frame(window) => self.frame(window),
            Event::Key => Vec::new(),
            Event::SoundsLoaded => {
                info!("Sounds loaded");
                self.ready = true;
                Vec::new()
            }
        }
    }

    fn frame(&mut self, window: WindowState) -> Vec<Effect> {
        self.bands = calc_bands(window.size, window.pointer);
        // Decide against the song as it was at the start of the frame.
        let action = self.edit.update(&self.bands, window.press, &self.song);

        let mut effects = Vec::new();
        if self.ready {
            for event in self.clock.frame(&self.song) {
                effects.push(match event {
                    PlaybackEvent::TickAdvanced(tick) => {
                        debug!("Tick {tick}");
                        Effect::TickAdvanced(tick)
                    }
                    PlaybackEvent::NoteOn(note) => Effect::TriggerSound(note),
                });
            }
        }

        if let Some(action) = action {
            action.apply(&mut self.song, &mut self.clock);
        }
        effects.push(Effect::Draw);
        effects
    }
}

/// Poll the host once, run a frame, and perform the resulting effects.
pub fn run_frame(app: &mut App, host: &mut impl Host) {
    let window = host.window_state();
    for effect in app.handle_event(Event::Frame(window)) {
        match effect {
            Effect::TriggerSound(note) => host.trigger_sound(&note),
            Effect::TickAdvanced(tick) => host.tick_advanced(tick),
            Effect::Draw => host.advance_draw_state(&app.bands, &app.song, app.clock.state()),
        }
    }
}
