//! Linear step controller shared by multi-step flows

use crate::core::{Navigator, Route};

/// Current position in a fixed list of steps. Stepping back from the first
/// step leaves the flow through the navigator.
#[derive(Debug)]
pub struct Wizard<N> {
    step: usize,
    total: usize,
    navigator: N,
}

impl<N: Navigator> Wizard<N> {
    pub fn new(total: usize, navigator: N) -> Self {
        Self {
            step: 0,
            total,
            navigator,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// One-based position for a stepper widget
    pub fn position(&self) -> (usize, usize) {
        ((self.step + 1).min(self.total), self.total)
    }

    /// Unbounded; the last step wires its forward action to `reset` instead
    pub fn advance(&mut self) {
        self.step += 1;
    }

    pub fn retreat(&mut self) {
        if self.step == 0 {
            tracing::debug!(path = Route::Dashboard.path(), "leaving wizard");
            self.navigator.navigate(Route::Dashboard);
        } else {
            self.step -= 1;
        }
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }
}
