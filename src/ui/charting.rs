use crate::results::TestResult;

/// (test number, wpm) points for the history chart, numbered from 1
pub fn wpm_points(results: &[TestResult]) -> Vec<(f64, f64)> {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| ((i + 1) as f64, r.wpm as f64))
        .collect()
}

/// Compute X (test number) and Y (WPM) upper bounds for the history chart.
/// X never collapses below 2 so a single result still gets an axis.
pub fn compute_chart_params(points: &[(f64, f64)]) -> (f64, f64) {
    let highest_wpm = points.iter().map(|&(_, wpm)| wpm).fold(0.0, f64::max);
    let last_x = points.last().map_or(1.0, |p| p.0);
    // headroom keeps the top point off the frame
    (last_x.max(2.0), (highest_wpm * 1.1).round().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
