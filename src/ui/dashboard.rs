use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::app::{App, AppView};
use crate::results::ResultHistory;

use super::charting::{compute_chart_params, format_label, wpm_points};
use super::{accent, bold, dim};

/// Points shown on the history chart
pub const CHART_RESULTS: usize = 10;

/// "3 minutes ago" for a result taken at `taken_ms`, both epoch millis
pub fn taken_ago(taken_ms: i64, now_ms: i64) -> String {
    let secs = now_ms.saturating_sub(taken_ms).max(0) as u64 / 1000;
    if secs < 60 {
        return "just now".to_string();
    }
    HumanTime::from(Duration::from_secs(secs)).to_text_en(Accuracy::Rough, Tense::Past)
}

pub fn summary(history: &ResultHistory, now_ms: i64) -> Vec<Line<'static>> {
    let Some(last) = history.last() else {
        return vec![Line::from(Span::styled(
            "No speed tests yet. Press 1 to take one.",
            dim(),
        ))];
    };
    vec![
        Line::from(vec![
            Span::styled("last ", dim()),
            Span::styled(format!("{} wpm", last.wpm), bold()),
            Span::styled("  ", dim()),
            Span::styled(format!("{}% comprehension", last.comprehension), bold()),
            Span::styled(format!("  ({})", taken_ago(last.timestamp, now_ms)), dim()),
        ]),
        Line::from(vec![
            Span::styled("average ", dim()),
            Span::styled(format!("{} wpm", history.average_wpm()), bold()),
            Span::styled("  ", dim()),
            Span::styled(
                format!("{}% comprehension", history.average_comprehension()),
                bold(),
            ),
            Span::styled(format!("  over {} tests", history.len()), dim()),
        ]),
    ]
}

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(AppView::MENU.len() as u16 + 1),
            Constraint::Length(2), // summary
            Constraint::Length(1), // padding
            Constraint::Min(1),    // chart
        ])
        .split(area);

    let mut menu: Vec<Line> = AppView::MENU
        .iter()
        .enumerate()
        .map(|(i, view)| {
            Line::from(vec![
                Span::styled(format!("({}) ", i + 1), accent()),
                Span::raw(view.to_string()),
            ])
        })
        .collect();
    menu.push(Line::from(vec![
        Span::styled("reader age ", dim()),
        Span::styled(app.age().to_string(), bold()),
    ]));
    Paragraph::new(menu).render(chunks[0], buf);

    Paragraph::new(summary(app.history(), app.epoch_ms()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let recent = app.history().recent_series(CHART_RESULTS);
    if recent.len() < 2 {
        return;
    }
    let points = wpm_points(recent);
    let (x_max, y_max) = compute_chart_params(&points);
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("test")
                .bounds([1.0, x_max])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(format_label(x_max), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(format_label(y_max), bold()),
                ]),
        )
        .render(chunks[3], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TestResult;
    use crate::ui::tests::{render as render_app, test_app};

    #[test]
    fn menu_lists_every_exercise() {
        let rendered = render_app(&test_app(), 100, 30);
        for (i, view) in AppView::MENU.iter().enumerate() {
            assert!(rendered.contains(&format!("({}) {}", i + 1, view)), "{view}");
        }
        assert!(rendered.contains("reader age 25"));
        assert!(rendered.contains("No speed tests yet"));
    }

    #[test]
    fn summary_reports_last_and_average() {
        let history = ResultHistory::from_results(vec![
            TestResult::new(200, 60, 0),
            TestResult::new(300, 80, 30_000),
        ]);
        let text: String = summary(&history, 45_000)
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("last 300 wpm"));
        assert!(text.contains("80% comprehension"));
        assert!(text.contains("just now"));
        assert!(text.contains("average 250 wpm"));
        assert!(text.contains("70% comprehension"));
        assert!(text.contains("over 2 tests"));
    }

    #[test]
    fn older_results_are_humanized() {
        let ago = taken_ago(0, 3 * 3_600 * 1000);
        assert!(ago.contains("hours"), "{ago}");
        assert!(ago.contains("ago"), "{ago}");
        assert_eq!(taken_ago(10_000, 0), "just now");
    }
}
