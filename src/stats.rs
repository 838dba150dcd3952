use std::time::Duration;

/// Characters that make up one "word" for WPM purposes.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Below this much elapsed time there is nothing meaningful to report.
pub const MIN_ELAPSED_SECS: f64 = 0.001;

/// Speed figures for one point in a test.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metrics {
    pub gross_wpm: u32,
    /// Gross WPM less the uncorrected error rate; negative when errors outpace typing.
    pub net_wpm: f64,
    pub cpm: u32,
}

/// Compute gross WPM, net WPM and CPM.
///
/// Returns all zeros when `elapsed` is too short to divide by.
pub fn compute(characters_typed: usize, elapsed: Duration, uncorrected_errors: usize) -> Metrics {
    let elapsed_secs = elapsed.as_secs_f64();
    if elapsed_secs < MIN_ELAPSED_SECS {
        return Metrics::default();
    }
    let elapsed_minutes = elapsed_secs / 60.0;

    let chars = characters_typed as f64;
    let gross_wpm = ((chars / CHARS_PER_WORD) / elapsed_minutes).floor() as u32;
    let net_wpm = gross_wpm as f64 - (uncorrected_errors as f64 / elapsed_minutes);
    let cpm = (chars / elapsed_minutes).floor() as u32;

    Metrics {
        gross_wpm,
        net_wpm,
        cpm,
    }
}

/// Running maxima of each metric. Never decrease until cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BestScores {
    pub gross_wpm: u32,
    pub net_wpm: f64,
    pub cpm: u32,
}

impl BestScores {
    pub fn update(&mut self, m: &Metrics) {
        self.gross_wpm = self.gross_wpm.max(m.gross_wpm);
        self.net_wpm = self.net_wpm.max(m.net_wpm);
        self.cpm = self.cpm.max(m.cpm);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
