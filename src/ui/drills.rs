use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::exercise::flash::FLASH_ROUNDS;
use crate::exercise::grid::GRID_ROUNDS;
use crate::exercise::{visible_word, FlashDrill, FlashPhase, PeripheralGrid, SchulteTable};
use crate::exercise::{ViewFieldPhase, ViewFieldTest};
use crate::session_timer::format_clock;
use crate::stimulus::letters::FIXATION_INDEX;

use super::{accent, bad, bold, dim, good, middle_rows};

fn centered(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(middle_rows(area, height), buf);
}

fn round_line(round: u32, max: u32) -> Line<'static> {
    Line::from(Span::styled(format!("round {round}/{max}"), dim()))
}

pub fn render_flash(drill: &FlashDrill, area: Rect, buf: &mut Buffer) {
    if drill.is_finished() {
        return centered(
            vec![
                Line::from(Span::styled("All rounds done.", good())),
                Line::from(Span::styled("space or r to go again", dim())),
            ],
            area,
            buf,
        );
    }

    let middle = match (drill.phase(), visible_word(drill)) {
        (FlashPhase::Ready, _) => Span::styled("press space to flash a word", dim()),
        (FlashPhase::Pause, _) => Span::styled("+", dim()),
        (_, Some(word)) => Span::styled(word.to_string(), accent()),
        (_, None) => Span::raw(""),
    };
    let hint = if drill.phase() == FlashPhase::Reveal {
        Span::styled("space for the next word", dim())
    } else {
        Span::raw("")
    };

    centered(
        vec![
            round_line(drill.round(), FLASH_ROUNDS),
            Line::raw(""),
            Line::from(middle),
            Line::raw(""),
            Line::from(hint),
        ],
        area,
        buf,
    );
}

/// One grid row with `spacing` blanks between letters
pub fn grid_row(row: &[char], spacing: u16) -> String {
    row.iter().join(&" ".repeat(spacing as usize))
}

pub fn render_grid(grid: &PeripheralGrid, area: Rect, buf: &mut Buffer) {
    if grid.is_finished() {
        return centered(
            vec![
                Line::from(Span::styled("All tables done.", good())),
                Line::from(Span::styled("space or r to go again", dim())),
            ],
            area,
            buf,
        );
    }
    let Some(letters) = grid.letters() else {
        return;
    };

    let gap = " ".repeat(grid.spacing() as usize);
    let mut lines = vec![round_line(grid.round(), GRID_ROUNDS), Line::raw("")];
    for (r, row) in letters.rows().enumerate() {
        let mut spans = Vec::new();
        for (c, letter) in row.iter().enumerate() {
            if c > 0 {
                spans.push(Span::raw(gap.clone()));
            }
            let style = if r * 3 + c == FIXATION_INDEX {
                accent()
            } else {
                bold()
            };
            spans.push(Span::styled(letter.to_string(), style));
        }
        lines.push(Line::from(spans));
        // vertical gap grows with the horizontal one, at half the rate
        for _ in 0..grid.spacing() / 2 {
            lines.push(Line::raw(""));
        }
    }
    lines.push(Line::from(Span::styled(
        format!("spacing {}", grid.spacing()),
        dim(),
    )));
    centered(lines, area, buf);
}

pub fn render_schulte(table: &SchulteTable, area: Rect, buf: &mut Buffer) {
    let Some(board) = table.board() else {
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{0}x{0}  ", table.size()), dim()),
        Span::styled(format_clock(table.elapsed_secs()), bold()),
    ])];
    lines.push(Line::raw(""));
    for row in board.rows() {
        let spans = row
            .iter()
            .map(|&n| {
                let style = if n < table.current() || table.is_complete() {
                    dim()
                } else {
                    bold()
                };
                Span::styled(format!("{n:>4}"), style)
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(""));
    if table.is_complete() {
        lines.push(Line::from(Span::styled(
            format!(
                "Done: 1 to {} in {}",
                table.total(),
                format_clock(table.elapsed_secs())
            ),
            good(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("find ", dim()),
            Span::styled(table.current().to_string(), accent()),
            Span::styled("   > ", dim()),
            Span::styled(format!("{}_", table.entry()), bold()),
        ]));
    }
    centered(lines, area, buf);
}

pub fn render_view_field(test: &ViewFieldTest, area: Rect, buf: &mut Buffer) {
    let status = Line::from(Span::styled(
        format!("level {}   best span {}", test.level(), test.max_span()),
        dim(),
    ));
    let body = match test.phase() {
        ViewFieldPhase::Ready => vec![Line::from(Span::styled(
            "fix your eyes on the centre and press space",
            dim(),
        ))],
        ViewFieldPhase::Show => vec![Line::from(Span::styled(
            test.visible().unwrap_or_default().to_string(),
            accent(),
        ))],
        ViewFieldPhase::Input => vec![
            Line::from(Span::styled("what did you see?", dim())),
            Line::from(Span::styled(format!("{}_", test.input()), bold())),
        ],
        ViewFieldPhase::Result => vec![
            Line::from(Span::styled("not quite, it was", bad())),
            Line::from(Span::styled(
                test.visible().unwrap_or_default().to_string(),
                accent(),
            )),
            Line::from(Span::styled(format!("you typed: {}", test.input()), dim())),
        ],
    };

    let mut lines = vec![status, Line::raw("")];
    lines.extend(body);
    centered(lines, area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Activity, AppView};
    use crate::ui::tests::{press, render, test_app};
    use crossterm::event::KeyCode;

    #[test]
    fn grid_rows_are_spaced() {
        assert_eq!(grid_row(&['A', 'B', 'C'], 1), "A B C");
        assert_eq!(grid_row(&['A', 'B', 'C'], 3), "A   B   C");
    }

    #[test]
    fn flash_word_shows_then_hides() {
        let mut app = test_app();
        app.open(AppView::FlashWords, 0);
        assert!(render(&app, 80, 24).contains("press space to flash a word"));

        press(&mut app, KeyCode::Char(' '), 0);
        let word = match app.activity() {
            Activity::Flash(drill) => visible_word(drill).unwrap().to_string(),
            _ => unreachable!(),
        };
        assert!(render(&app, 80, 24).contains(&word));

        app.on_tick(600);
        assert!(!render(&app, 80, 24).contains(&word));
        app.on_tick(4_600);
        assert!(render(&app, 80, 24).contains(&word));
    }

    #[test]
    fn grid_shows_letters_at_current_spacing() {
        let mut app = test_app();
        app.open(AppView::PeripheralGrid, 0);
        let top = match app.activity() {
            Activity::Grid(grid) => {
                let row = grid.letters().unwrap().rows().next().unwrap().to_vec();
                grid_row(&row, grid.spacing())
            }
            _ => unreachable!(),
        };
        let rendered = render(&app, 80, 30);
        assert!(rendered.contains(&top), "{top}");
        assert!(rendered.contains("round 1/9"));
    }

    #[test]
    fn schulte_shows_target_and_entry() {
        let mut app = test_app();
        app.open(AppView::SchulteTable, 0);
        press(&mut app, KeyCode::Char('1'), 0);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("5x5"));
        assert!(rendered.contains("find 1"));
        assert!(rendered.contains("> 1_"));
    }

    #[test]
    fn view_field_flashes_then_asks() {
        let mut app = test_app();
        app.open(AppView::ViewField, 0);
        press(&mut app, KeyCode::Char(' '), 0);
        assert!(!render(&app, 80, 24).contains("what did you see?"));
        app.on_tick(500);
        assert!(render(&app, 80, 24).contains("what did you see?"));
    }
}
