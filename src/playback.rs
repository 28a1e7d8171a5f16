//! RSVP playback: a cursor walking a whitespace-split word list at a fixed
//! rate, either one word at a time (classic) or `chunk_size` words at a time
//! highlighted in a wall of text.

use std::ops::{Range, RangeInclusive};

use crate::scheduler::{Millis, Timer};

pub const WPM_RANGE: RangeInclusive<u32> = 50..=1200;
pub const CHUNK_RANGE: RangeInclusive<usize> = 1..=10;
pub const CLASSIC_DEFAULT_WPM: u32 = 300;
pub const WALL_DEFAULT_WPM: u32 = 400;
pub const WPM_STEP: u32 = 50;

pub fn clamp_wpm(wpm: u32) -> u32 {
    let clamped = wpm.clamp(*WPM_RANGE.start(), *WPM_RANGE.end());
    if clamped != wpm {
        tracing::debug!(requested = wpm, clamped, "wpm clamped");
    }
    clamped
}

pub fn clamp_chunk(chunk: usize) -> usize {
    let clamped = chunk.clamp(*CHUNK_RANGE.start(), *CHUNK_RANGE.end());
    if clamped != chunk {
        tracing::debug!(requested = chunk, clamped, "chunk size clamped");
    }
    clamped
}

/// Milliseconds between cursor steps
pub fn interval_ms(wpm: u32, chunk: usize) -> Millis {
    (60_000 / wpm.max(1) as Millis) * chunk as Millis
}

/// Words lit up in wall mode
pub fn highlight_window(cursor: usize, chunk: usize, len: usize) -> Range<usize> {
    let start = cursor.min(len);
    start..cursor.saturating_add(chunk).min(len)
}

#[derive(Debug)]
pub struct Playback {
    source: String,
    words: Vec<String>,
    cursor: usize,
    playing: bool,
    wpm: u32,
    chunk_size: usize,
    timer: Timer,
}

impl Playback {
    pub fn new(text: &str, wpm: u32, chunk_size: usize) -> Self {
        Self {
            source: text.to_string(),
            words: tokenize(text),
            cursor: 0,
            playing: false,
            wpm: clamp_wpm(wpm),
            chunk_size: clamp_chunk(chunk_size),
            timer: Timer::new(),
        }
    }

    /// Replaces the text. Unchanged text keeps the cursor where it is.
    pub fn set_text(&mut self, text: &str) {
        if text == self.source {
            return;
        }
        self.source = text.to_string();
        self.words = tokenize(text);
        self.cursor = 0;
        if self.playing && self.words.is_empty() {
            self.pause();
        }
    }

    pub fn play(&mut self, now: Millis) {
        if self.playing || self.is_at_end() {
            return;
        }
        self.playing = true;
        self.timer.arm(now, self.interval());
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.timer.cancel();
    }

    pub fn toggle(&mut self, now: Millis) {
        if self.playing {
            self.pause();
        } else {
            self.play(now);
        }
    }

    pub fn reset(&mut self) {
        self.pause();
        self.cursor = 0;
    }

    /// Steps the cursor once per elapsed interval, re-arming from the previous
    /// deadline with whatever rate is current at that moment.
    pub fn on_tick(&mut self, now: Millis) -> bool {
        let mut moved = false;
        while let Some(due) = self.timer.fire(now) {
            self.cursor = (self.cursor + self.chunk_size).min(self.words.len());
            moved = true;
            if self.is_at_end() {
                self.playing = false;
                break;
            }
            self.timer.arm(due, self.interval());
        }
        moved
    }

    pub fn set_wpm(&mut self, wpm: u32) {
        self.wpm = clamp_wpm(wpm);
    }

    pub fn faster(&mut self) {
        self.set_wpm(self.wpm.saturating_add(WPM_STEP));
    }

    pub fn slower(&mut self) {
        self.set_wpm(self.wpm.saturating_sub(WPM_STEP));
    }

    pub fn set_chunk_size(&mut self, chunk: usize) {
        self.chunk_size = clamp_chunk(chunk);
    }

    pub fn interval(&self) -> Millis {
        interval_ms(self.wpm, self.chunk_size)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn text(&self) -> &str {
        &self.source
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.words.len()
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Word under the cursor in classic mode, `None` past the end
    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.cursor).map(String::as_str)
    }

    pub fn highlight(&self) -> Range<usize> {
        highlight_window(self.cursor, self.chunk_size, self.words.len())
    }

    pub fn progress_percent(&self) -> u16 {
        if self.words.is_empty() {
            return 0;
        }
        ((self.cursor as f64 / self.words.len() as f64) * 100.0).round() as u16
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
