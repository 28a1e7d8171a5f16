use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::column::ColumnReader;
use crate::playback::Playback;

use super::{accent, bold, dim, middle_cols, middle_rows};

fn status_line(playback: &Playback, chunked: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{} wpm", playback.wpm()), bold()),
        Span::styled(
            if playback.is_playing() {
                "  playing"
            } else if playback.is_at_end() {
                "  finished"
            } else {
                "  paused"
            },
            dim(),
        ),
    ];
    if chunked {
        spans.insert(
            1,
            Span::styled(format!("  {} words at a time", playback.chunk_size()), dim()),
        );
    }
    Line::from(spans)
}

fn split_with_progress(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status
            Constraint::Length(1), // padding
            Constraint::Min(1),    // text
            Constraint::Length(1), // progress
        ])
        .split(area);
    (chunks[0], chunks[2], chunks[3])
}

fn render_progress(playback: &Playback, area: Rect, buf: &mut Buffer) {
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(playback.progress_percent().min(100))
        .label(format!("{}/{}", playback.cursor(), playback.words().len()))
        .render(area, buf);
}

pub fn render_rsvp(playback: &Playback, area: Rect, buf: &mut Buffer) {
    let (status, text, progress) = split_with_progress(area);
    Paragraph::new(status_line(playback, false))
        .alignment(Alignment::Center)
        .render(status, buf);

    let word = match playback.current_word() {
        Some(word) => Span::styled(word.to_string(), accent()),
        None => Span::styled("end of text, r to start over", dim()),
    };
    Paragraph::new(Line::from(word))
        .alignment(Alignment::Center)
        .render(middle_rows(text, 1), buf);

    render_progress(playback, progress, buf);
}

/// The whole text with the current chunk highlighted
pub fn wall_spans(playback: &Playback) -> Vec<Span<'static>> {
    let window = playback.highlight();
    let mut spans = Vec::with_capacity(playback.words().len() * 2);
    for (i, word) in playback.words().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if window.contains(&i) { accent() } else { dim() };
        spans.push(Span::styled(word.clone(), style));
    }
    spans
}

pub fn render_wall(playback: &Playback, area: Rect, buf: &mut Buffer) {
    let (status, text, progress) = split_with_progress(area);
    Paragraph::new(status_line(playback, true))
        .alignment(Alignment::Center)
        .render(status, buf);

    // keep the highlighted line on screen: scroll by the share of text read
    let text_width: usize = playback.words().iter().map(|w| w.width() + 1).sum();
    let total_lines = text_width.div_ceil(text.width.max(1) as usize);
    let overflow = total_lines.saturating_sub(text.height as usize);
    let scroll = overflow * playback.cursor() / playback.words().len().max(1);
    Paragraph::new(Line::from(wall_spans(playback)))
        .wrap(Wrap { trim: true })
        .scroll((scroll as u16, 0))
        .render(text, buf);

    render_progress(playback, progress, buf);
}

pub fn render_column(reader: &ColumnReader, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("width {}", reader.width()), bold()),
        Span::styled(
            format!("  line {}/{}", reader.scroll() + 1, reader.lines().len()),
            dim(),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let body = middle_cols(chunks[2], reader.width() as u16);
    let lines: Vec<Line> = reader
        .visible(body.height as usize)
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), bold())))
        .collect();
    Paragraph::new(lines).render(body, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Activity, AppView};
    use crate::ui::tests::{press, render, test_app};
    use crossterm::event::KeyCode;

    #[test]
    fn wall_highlights_the_current_chunk() {
        let mut playback = Playback::new("a b c d", 120, 2);
        playback.play(0);
        playback.on_tick(1_000);
        let highlighted: Vec<String> = wall_spans(&playback)
            .into_iter()
            .filter(|s| s.style == accent())
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(highlighted, ["c", "d"]);
    }

    #[test]
    fn rsvp_shows_one_word_and_speed() {
        let mut app = test_app();
        app.open(AppView::Rsvp, 0);
        let first = match app.activity() {
            Activity::Rsvp(p) => p.current_word().unwrap().to_string(),
            _ => unreachable!(),
        };
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("300 wpm"));
        assert!(rendered.contains(&first));
        assert!(rendered.contains("paused"));

        press(&mut app, KeyCode::Char(' '), 0);
        press(&mut app, KeyCode::Up, 0);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("350 wpm"));
        assert!(rendered.contains("playing"));
    }

    #[test]
    fn column_text_fits_its_width() {
        let mut app = test_app();
        app.open(AppView::ColumnReading, 0);
        press(&mut app, KeyCode::Char('+'), 0);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("width 26"));
        assert!(rendered.contains("line 1/"));
    }
}
