/// Playback clock - advances the song one tick per fixed number of frames
use super::{Note, Song, FRAMES_PER_TICK};

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    TickAdvanced(usize),
    NoteOn(Note),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub frames_until_tick: usize,
    pub playing: bool,
    pub tick: usize,
}

pub struct PlaybackClock {
    state: PlaybackState,
    frames_per_tick: usize,
}

impl PlaybackClock {
    pub fn new(frames_per_tick: usize) -> Self {
        let frames_per_tick = frames_per_tick.max(1);
        Self {
            state: PlaybackState {
                frames_until_tick: frames_per_tick,
                playing: false,
                tick: 0,
            },
            frames_per_tick,
        }
    }

    /// Clock whose tick rate follows the song's tempo at the given host frame rate.
    pub fn for_song(song: &Song, frame_rate: f32) -> Self {
        Self::new(frames_per_tick(frame_rate, song.ticks_per_second()))
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn frames_per_tick(&self) -> usize {
        self.frames_per_tick
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn tick(&self) -> usize {
        self.state.tick
    }

    pub fn play(&mut self) {
        self.state.playing = true;
    }

    pub fn stop(&mut self) {
        self.state.playing = false;
    }

    pub fn toggle_play(&mut self) {
        self.state.playing = !self.state.playing;
    }

    /// Back to the first tick. Leaves play/stop alone.
    pub fn rewind(&mut self) {
        self.state.tick = 0;
        self.state.frames_until_tick = self.frames_per_tick;
    }

    /// Advance by one host frame, returning what fired.
    pub fn frame(&mut self, song: &Song) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if !self.state.playing {
            return events;
        }

        self.state.frames_until_tick = self.state.frames_until_tick.saturating_sub(1);
        if self.state.frames_until_tick == 0 {
            let tick = self.state.tick % song.len();
            events.push(PlaybackEvent::TickAdvanced(tick));
            events.extend(song.tick(tick).notes().map(PlaybackEvent::NoteOn));

            self.state.tick = (tick + 1) % song.len();
            self.state.frames_until_tick = self.frames_per_tick;
        }
        events
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(FRAMES_PER_TICK)
    }
}

/// Whole frames per tick for a tempo, never less than one.
pub fn frames_per_tick(frame_rate: f32, ticks_per_second: f32) -> usize {
    if ticks_per_second <= 0.0 || !ticks_per_second.is_finite() {
        return FRAMES_PER_TICK;
    }
    ((frame_rate / ticks_per_second).round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::MAX_TICKS;

    fn run(clock: &mut PlaybackClock, song: &Song, frames: usize) -> Vec<PlaybackEvent> {
        (0..frames).flat_map(|_| clock.frame(song)).collect()
    }

    #[test]
    fn test_stopped_clock_does_not_advance() {
        let song = Song::default();
        let mut clock = PlaybackClock::default();
        assert!(run(&mut clock, &song, 100).is_empty());
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.state().frames_until_tick, FRAMES_PER_TICK);
    }

    #[test]
    fn test_tick_advances_every_frames_per_tick() {
        let song = Song::new(12.0, 16).unwrap();
        for start in [0, 5, 15] {
            let mut clock = PlaybackClock::default();
            clock.state.tick = start;
            clock.play();
            for k in 0..40 {
                assert_eq!(clock.tick(), (start + k) % 16);
                run(&mut clock, &song, FRAMES_PER_TICK);
            }
        }
    }

    #[test]
    fn test_fires_notes_of_current_tick_once() {
        let mut song = Song::new(12.0, 4).unwrap();
        song.insert(0, 0);
        song.insert(0, 3);
        song.insert(2, 1);
        let mut clock = PlaybackClock::new(2);
        clock.play();

        assert!(clock.frame(&song).is_empty());
        assert_eq!(
            clock.frame(&song),
            vec![
                PlaybackEvent::TickAdvanced(0),
                PlaybackEvent::NoteOn(Note { semitones: 11.0 }),
                PlaybackEvent::NoteOn(Note { semitones: 8.0 }),
            ]
        );
        assert_eq!(run(&mut clock, &song, 2), vec![PlaybackEvent::TickAdvanced(1)]);
        assert_eq!(
            run(&mut clock, &song, 2),
            vec![
                PlaybackEvent::TickAdvanced(2),
                PlaybackEvent::NoteOn(Note { semitones: 10.0 }),
            ]
        );
    }

    #[test]
    fn test_loops_over_song() {
        let mut song = Song::new(12.0, 3).unwrap();
        song.insert(0, 0);
        let mut clock = PlaybackClock::new(1);
        clock.play();
        let note_ons = run(&mut clock, &song, 9)
            .into_iter()
            .filter(|event| matches!(event, PlaybackEvent::NoteOn(_)))
            .count();
        assert_eq!(note_ons, 3);
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn test_pause_keeps_position() {
        let song = Song::default();
        let mut clock = PlaybackClock::default();
        clock.play();
        run(&mut clock, &song, FRAMES_PER_TICK * 3 + 2);
        clock.stop();
        run(&mut clock, &song, 50);
        assert_eq!(clock.tick(), 3);
        assert_eq!(clock.state().frames_until_tick, FRAMES_PER_TICK - 2);
        clock.toggle_play();
        assert!(clock.is_playing());
    }

    #[test]
    fn test_rewind() {
        let song = Song::default();
        for playing in [false, true] {
            let mut clock = PlaybackClock::default();
            clock.play();
            run(&mut clock, &song, FRAMES_PER_TICK * 7 + 1);
            clock.state.playing = playing;
            clock.rewind();
            assert_eq!(clock.tick(), 0);
            assert_eq!(clock.state().frames_until_tick, FRAMES_PER_TICK);
            assert_eq!(clock.is_playing(), playing);
        }
    }

    #[test]
    fn test_frames_per_tick_from_tempo() {
        assert_eq!(frames_per_tick(60.0, 12.0), 5);
        assert_eq!(frames_per_tick(60.0, 8.0), 8);
        assert_eq!(frames_per_tick(60.0, 1000.0), 1);
        assert_eq!(frames_per_tick(60.0, 0.0), FRAMES_PER_TICK);

        let song = Song::default();
        assert_eq!(PlaybackClock::for_song(&song, 60.0).frames_per_tick(), 5);
        assert_eq!(song.len(), MAX_TICKS);
    }
}
