//! `SourceStats` tracks how many units and decode errors one input produced.
//! It is only used for diagnostics.

use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    pub units: u64,
    pub errors: u64,
}

impl SourceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_units(&mut self, n: u64) {
        self.units += n;
    }

    pub fn tick_error(&mut self) {
        self.errors += 1;
    }

    pub fn report(&self, name: &str) {
        debug!(
            source = name,
            units = self.units,
            errors = self.errors,
            "finished source"
        );
    }
}
