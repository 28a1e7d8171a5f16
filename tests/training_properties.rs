// Behavioural properties of the training core, exercised through the public
// library API only.

use std::collections::HashSet;

use rand::{rngs::StdRng, SeedableRng};

use glance::exercise::{Click, SchulteTable};
use glance::playback::Playback;
use glance::results::{comprehension_percent, words_per_minute, ResultHistory, TestResult};
use glance::session_timer::SessionTimer;
use glance::stimulus::letters::{LetterGrid, ALPHABET, FIXATION_INDEX, GRID_LETTERS};
use glance::stimulus::{answer_matches, LanguagePack, SchulteBoard, SpanSource, SupportedLanguage};

#[test]
fn rsvp_classic_steps_one_word_per_second_at_60_wpm() {
    let mut p = Playback::new("a b c d", 60, 1);
    p.play(0);
    for t in 1..=3 {
        p.on_tick(t * 1_000);
    }
    assert_eq!(p.cursor(), 3);
    assert_eq!(p.current_word(), Some("d"));
    assert!(p.is_playing());

    p.on_tick(4_000);
    assert!(!p.is_playing());
    assert_eq!(p.cursor(), 4);
    p.on_tick(10_000);
    assert_eq!(p.cursor(), 4);
}

#[test]
fn rsvp_wall_highlights_the_next_pair() {
    let mut p = Playback::new("a b c d", 120, 2);
    assert_eq!(p.interval(), 1_000);
    p.play(0);
    p.on_tick(1_000);
    assert_eq!(p.highlight(), 2..4);
}

#[test]
fn schulte_board_is_a_permutation() {
    let mut rng = StdRng::seed_from_u64(11);
    for n in 3..=6usize {
        let board = SchulteBoard::shuffled(n, &mut rng);
        let cells: HashSet<u32> = board.cells().iter().copied().collect();
        let expected: HashSet<u32> = (1..=(n * n) as u32).collect();
        assert_eq!(cells, expected);
        assert_eq!(board.cells().len(), n * n);
    }
}

#[test]
fn schulte_ignores_out_of_order_clicks() {
    let mut table = SchulteTable::seeded(3, 2, 0);
    assert_eq!(table.click(2, 0), Click::Ignored);
    assert_eq!(table.current(), 1);
    for n in 1..9 {
        assert_eq!(table.click(n, 0), Click::Advanced);
    }
    assert_eq!(table.click(9, 0), Click::Completed);
    assert!(table.is_complete());
}

#[test]
fn letter_grid_is_a_contiguous_window() {
    let mut rng = StdRng::seed_from_u64(4);
    let alphabet: Vec<char> = ALPHABET.chars().collect();
    for _ in 0..200 {
        let grid = LetterGrid::random(&mut rng);
        assert!(grid.start() <= alphabet.len() - GRID_LETTERS);
        assert_eq!(grid.letters(), &alphabet[grid.start()..grid.start() + GRID_LETTERS]);
        assert_eq!(grid.fixation(), grid.letters()[FIXATION_INDEX]);
    }
}

#[test]
fn span_levels_draw_from_the_right_word_sets() {
    let pack = LanguagePack::load(SupportedLanguage::Polish).unwrap();
    let short: HashSet<&str> = pack.span_words.short.iter().map(String::as_str).collect();
    let medium: HashSet<&str> = pack.span_words.medium.iter().map(String::as_str).collect();
    let source = SpanSource::new(pack.span_words.clone());
    let mut rng = StdRng::seed_from_u64(9);

    for level in [1, 2] {
        let s = source.string_for_level(level, &mut rng);
        let tokens: Vec<&str> = s.split(' ').collect();
        assert_eq!(tokens.len(), 1);
        assert!(short.contains(tokens[0]), "{s}");
    }
    let s = source.string_for_level(11, &mut rng);
    let tokens: Vec<&str> = s.split(' ').collect();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| medium.contains(t)), "{s}");
}

#[test]
fn span_answers_ignore_case_and_spaces() {
    assert!(answer_matches("kot dom", "Kot Dom"));
    assert!(answer_matches("kot dom", "kotdom"));
    assert!(!answer_matches("kot dom", "kot"));
}

#[test]
fn results_average_and_last() {
    let mut history = ResultHistory::new();
    assert!(history.last().is_none());
    assert_eq!(history.average_wpm(), 0);
    for wpm in [200, 300, 400] {
        history.record(TestResult::new(wpm, 50, 0));
    }
    assert_eq!(history.average_wpm(), 300);
    assert_eq!(history.last().unwrap().wpm, 400);
    assert_eq!(history.recent_series(2).len(), 2);
    assert_eq!(history.recent_series(2)[0].wpm, 300);
}

#[test]
fn derived_metrics() {
    assert_eq!(words_per_minute(500, 120_000), 250);
    assert_eq!(comprehension_percent(7, 10), 70);
    assert_eq!(comprehension_percent(2, 3), 67);
}

#[test]
fn session_timer_pauses_and_tracks_modules() {
    let mut timer = SessionTimer::new();
    timer.observe_module("flash");
    timer.on_time(0);
    timer.on_time(5_000);
    assert_eq!(timer.session_secs(), 5);

    timer.set_active(false, 5_000);
    timer.on_time(9_000);
    timer.tick();
    assert_eq!(timer.session_secs(), 5);
    assert_eq!(timer.module_secs(), 5);

    timer.set_active(true, 9_000);
    timer.observe_module("schulte");
    assert_eq!(timer.module_secs(), 0);
    timer.on_time(11_000);
    assert_eq!(timer.session_secs(), 7);
    assert_eq!(timer.module_secs(), 2);
}
