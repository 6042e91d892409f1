use serde::Serialize;

/// Counters for one search run. Counters saturate instead of wrapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Candidates that reached scoring.
    pub comparisons: u64,
    pub rejected_length: u64,
    pub rejected_velocity: u64,
    pub rejected_range: u64,
}

impl RunStats {
    #[inline(always)]
    pub fn record_comparison(&mut self) {
        self.comparisons = self.comparisons.saturating_add(1);
    }

    #[inline(always)]
    pub fn reject_length(&mut self) {
        self.rejected_length = self.rejected_length.saturating_add(1);
    }

    #[inline(always)]
    pub fn reject_velocity(&mut self) {
        self.rejected_velocity = self.rejected_velocity.saturating_add(1);
    }

    #[inline(always)]
    pub fn reject_range(&mut self) {
        self.rejected_range = self.rejected_range.saturating_add(1);
    }

    /// Comparisons plus length and velocity rejections. Range rejections are
    /// reported separately and not part of the total; this asymmetry is kept
    /// from the calculator these counts are compared against. Use
    /// `candidates` for a count that includes them.
    pub fn total(&self) -> u64 {
        self.comparisons
            .saturating_add(self.rejected_length)
            .saturating_add(self.rejected_velocity)
    }

    /// Every candidate the run looked at.
    pub fn candidates(&self) -> u64 {
        self.total().saturating_add(self.rejected_range)
    }

    pub fn merge(&mut self, other: &RunStats) {
        self.comparisons = self.comparisons.saturating_add(other.comparisons);
        self.rejected_length = self.rejected_length.saturating_add(other.rejected_length);
        self.rejected_velocity = self.rejected_velocity.saturating_add(other.rejected_velocity);
        self.rejected_range = self.rejected_range.saturating_add(other.rejected_range);
    }
}
