use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How the best rail draw inside a feasible window is located.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DrawStrategy {
    /// Logarithmic search assuming a single peak.
    #[default]
    Bisection,
    /// Scores every integer draw. Exact for any score shape, linear cost.
    Exhaustive,
}

/// Ascending integer draws `0..=floor(min(config_max_draw, max_draw_input))`.
/// Empty when the cap is negative or NaN.
pub fn draw_domain(config_max_draw: f64, max_draw_input: f64) -> impl Iterator<Item = u32> {
    let cap = config_max_draw.min(max_draw_input).floor();
    let end = if cap >= 0.0 {
        cap.min((u32::MAX - 1) as f64) as u32 + 1
    } else {
        0
    };
    0..end
}

/// Inclusive window of integer draws that satisfy every floor and cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawWindow {
    pub min: u32,
    pub max: u32,
}

impl DrawWindow {
    /// Rounds `min` up and `max` down. `None` when nothing is left.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        let lo = min.max(0.0).ceil();
        let hi = max.floor();
        if hi >= lo && hi <= u32::MAX as f64 {
            Some(Self {
                min: lo as u32,
                max: hi as u32,
            })
        } else {
            None
        }
    }

    pub fn width(&self) -> u32 {
        self.max - self.min
    }
}

/// Best draw found and how many scores it cost to find it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptimum {
    pub draw: u32,
    pub score: f64,
    pub evaluations: u32,
}

struct Probe<F> {
    score: F,
    evaluations: u32,
}

impl<F: FnMut(u32) -> f64> Probe<F> {
    #[inline(always)]
    fn at(&mut self, draw: u32) -> f64 {
        self.evaluations += 1;
        (self.score)(draw)
    }

    fn done(self, draw: u32, score: f64) -> DrawOptimum {
        DrawOptimum {
            draw,
            score,
            evaluations: self.evaluations,
        }
    }
}

pub fn optimal_draw<F: FnMut(u32) -> f64>(
    strategy: DrawStrategy,
    window: DrawWindow,
    score: F,
) -> DrawOptimum {
    match strategy {
        DrawStrategy::Bisection => bisect(window, score),
        DrawStrategy::Exhaustive => scan(window, score),
    }
}

/// Finds the draw maximizing `score` over `window`, assuming the score is
/// unimodal in draw. Ties resolve to the lower draw.
///
/// Unimodality is not checked. A score with several peaks can return a local
/// optimum, the same as the calculator this search reproduces; use
/// [`DrawStrategy::Exhaustive`] to audit a catalog.
///
/// Both edges are checked first so a monotone score costs three evaluations.
/// Otherwise the window is halved by comparing adjacent draws at its midpoint
/// until two candidates remain.
pub fn bisect<F: FnMut(u32) -> f64>(window: DrawWindow, score: F) -> DrawOptimum {
    let mut probe = Probe {
        score,
        evaluations: 0,
    };
    let (lo, hi) = (window.min, window.max);

    let s_lo = probe.at(lo);
    if lo == hi {
        return probe.done(lo, s_lo);
    }
    let s_hi = probe.at(hi);
    if hi - lo == 1 {
        return if s_hi > s_lo {
            probe.done(hi, s_hi)
        } else {
            probe.done(lo, s_lo)
        };
    }

    if s_hi > s_lo {
        if s_hi > probe.at(hi - 1) {
            return probe.done(hi, s_hi);
        }
    } else if s_lo > probe.at(lo + 1) {
        return probe.done(lo, s_lo);
    }

    let (mut bottom, mut top) = (lo, hi);
    while top - bottom > 1 {
        let lower = bottom + (top - bottom) / 2;
        let upper = lower + 1;
        if probe.at(lower) >= probe.at(upper) {
            top = lower;
        } else {
            bottom = upper;
        }
    }

    let s_bottom = probe.at(bottom);
    if top == bottom {
        return probe.done(bottom, s_bottom);
    }
    let s_top = probe.at(top);
    if s_top > s_bottom {
        probe.done(top, s_top)
    } else {
        probe.done(bottom, s_bottom)
    }
}

/// Scores every draw in `window`; the lowest draw wins ties.
pub fn scan<F: FnMut(u32) -> f64>(window: DrawWindow, score: F) -> DrawOptimum {
    let mut probe = Probe {
        score,
        evaluations: 0,
    };
    let mut best = (window.min, f64::NEG_INFINITY);

    for draw in draw_domain(window.max as f64, f64::INFINITY).skip(window.min as usize) {
        let s = probe.at(draw);
        if s > best.1 {
            best = (draw, s);
        }
    }

    if best.1 == f64::NEG_INFINITY {
        // Every score was NaN; report the bottom of the window.
        let s = probe.at(window.min);
        return probe.done(window.min, s);
    }
    probe.done(best.0, best.1)
}
