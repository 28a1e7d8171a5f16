pub mod charting;
pub mod dashboard;
pub mod drills;
pub mod reading;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::App;
use crate::session_timer::format_clock;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn accent() -> Style {
    bold().fg(Color::Magenta)
}

pub(crate) fn good() -> Style {
    bold().fg(Color::Green)
}

pub(crate) fn bad() -> Style {
    bold().fg(Color::Red)
}

/// `height` rows in the vertical middle of `area`
pub(crate) fn middle_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

/// `width` columns in the horizontal middle of `area`
pub(crate) fn middle_cols(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(if area.height > 12 { VERTICAL_MARGIN } else { 0 })
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // padding
                Constraint::Min(1),    // body
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(self, chunks[0], buf);

        let screen = screen::current_screen(self.activity());
        screen.render(self, chunks[2], buf);

        let status = match (self.notice(), self.is_generating()) {
            (Some(notice), _) => Span::styled(notice.to_string(), bad()),
            (None, true) => Span::styled("generating text...", dim()),
            (None, false) => Span::raw(""),
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            screen.legend(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[4], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let timer = app.timer();
    let mut clocks = vec![
        Span::styled("session ", dim()),
        Span::styled(format_clock(timer.session_secs()), bold()),
        Span::styled("  exercise ", dim()),
        Span::styled(format_clock(timer.module_secs()), bold()),
    ];
    if !timer.is_active() {
        clocks.push(Span::styled("  paused", bad()));
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("glance", accent()),
        Span::styled(" / ", dim()),
        Span::styled(app.view().to_string(), bold()),
    ]))
    .render(halves[0], buf);

    Paragraph::new(Line::from(clocks))
        .alignment(Alignment::Right)
        .render(halves[1], buf);
}
