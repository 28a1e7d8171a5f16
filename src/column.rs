use std::ops::RangeInclusive;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const WIDTH_RANGE: RangeInclusive<usize> = 10..=100;
pub const DEFAULT_WIDTH: usize = 25;

pub fn clamp_width(width: usize) -> usize {
    let clamped = width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end());
    if clamped != width {
        tracing::debug!(requested = width, clamped, "column width clamped");
    }
    clamped
}

/// Greedy word wrap by display width. Paragraph breaks (blank lines) are kept
/// as empty lines; words wider than the column are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for (i, paragraph) in text.split("\n\n").enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            for piece in split_wide(word, width) {
                let needed = if line.is_empty() {
                    piece.width()
                } else {
                    line.width() + 1 + piece.width()
                };
                if needed > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&piece);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

fn split_wide(word: &str, width: usize) -> Vec<String> {
    if word.width() <= width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut used = 0;
    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            used = 0;
        }
        piece.push(c);
        used += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Column reading: the text wrapped to a narrow centred column, read top to
/// bottom with a single fixation per line.
#[derive(Debug, Clone)]
pub struct ColumnReader {
    text: String,
    width: usize,
    lines: Vec<String>,
    scroll: usize,
}

impl ColumnReader {
    pub fn new(text: &str, width: usize) -> Self {
        let width = clamp_width(width);
        Self {
            text: text.to_string(),
            width,
            lines: wrap(text, width),
            scroll: 0,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        if text == self.text {
            return;
        }
        self.text = text.to_string();
        self.lines = wrap(text, self.width);
        self.scroll = 0;
    }

    pub fn set_width(&mut self, width: usize) {
        let width = clamp_width(width);
        if width != self.width {
            self.width = width;
            self.lines = wrap(&self.text, width);
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }

    pub fn widen(&mut self) {
        self.set_width(self.width + 1);
    }

    pub fn narrow(&mut self) {
        self.set_width(self.width.saturating_sub(1));
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll.saturating_add_signed(delta);
        self.scroll = target.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Lines from the scroll offset on
    pub fn visible(&self, height: usize) -> &[String] {
        let end = (self.scroll + height).min(self.lines.len());
        &self.lines[self.scroll.min(end)..end]
    }
}
