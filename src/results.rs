//! Speed-test results: the append-only history and the metrics derived from
//! a single test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::HistoryError;
use crate::store::{KeyValueStore, RESULTS_KEY};
use crate::util::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub wpm: u32,
    pub comprehension: u8,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl TestResult {
    pub fn new(wpm: u32, comprehension: u8, timestamp: i64) -> Self {
        Self {
            wpm: wpm.max(1),
            comprehension: comprehension.min(100),
            timestamp,
        }
    }

    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// `round(words / seconds * 60)`. Reading times under a second count as one
/// second; the result is at least 1.
pub fn words_per_minute(word_count: usize, elapsed_ms: u64) -> u32 {
    let secs = (elapsed_ms as f64 / 1000.0).max(1.0);
    ((word_count as f64 / secs) * 60.0).round().max(1.0) as u32
}

/// `round(correct / total * 100)`, 0 with no questions
pub fn comprehension_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((correct.min(total) as f64 / total as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultHistory {
    results: Vec<TestResult>,
}

#[derive(Serialize)]
struct CsvRow {
    taken_at: String,
    wpm: u32,
    comprehension: u8,
    timestamp: i64,
}

impl ResultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results(results: Vec<TestResult>) -> Self {
        Self { results }
    }

    pub fn record(&mut self, result: TestResult) {
        tracing::info!(
            wpm = result.wpm,
            comprehension = result.comprehension,
            "test result recorded"
        );
        self.results.push(result);
    }

    pub fn average_wpm(&self) -> u32 {
        let wpms: Vec<f64> = self.results.iter().map(|r| r.wpm as f64).collect();
        mean(&wpms).map_or(0, |m| m.round() as u32)
    }

    pub fn average_comprehension(&self) -> u8 {
        let scores: Vec<f64> = self
            .results
            .iter()
            .map(|r| r.comprehension as f64)
            .collect();
        mean(&scores).map_or(0, |m| m.round() as u8)
    }

    pub fn last(&self) -> Option<&TestResult> {
        self.results.last()
    }

    /// Up to `n` most recent results, oldest first
    pub fn recent_series(&self, n: usize) -> &[TestResult] {
        let start = self.results.len().saturating_sub(n);
        &self.results[start..]
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Reads the stored history. Anything unreadable yields an empty history
    /// and a warning; the user never sees the error.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match Self::try_load(store) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored result history");
                Self::new()
            }
        }
    }

    pub fn try_load(store: &dyn KeyValueStore) -> Result<Self, HistoryError> {
        match store.get(RESULTS_KEY)? {
            Some(raw) => Ok(Self::from_results(serde_json::from_str(&raw)?)),
            None => Ok(Self::new()),
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), HistoryError> {
        store.set(RESULTS_KEY, &serde_json::to_string(&self.results)?)?;
        Ok(())
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), HistoryError> {
        let mut csv = csv::Writer::from_writer(writer);
        for r in &self.results {
            csv.serialize(CsvRow {
                taken_at: r.taken_at().map(|t| t.to_rfc3339()).unwrap_or_default(),
                wpm: r.wpm,
                comprehension: r.comprehension,
                timestamp: r.timestamp,
            })?;
        }
        csv.flush()?;
        Ok(())
    }
}
