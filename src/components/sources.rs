//! Fixed supply rails.

use crate::circuit::Signal;
use crate::components::Terminal;

/// Which supply rail a fixed source pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    Vdd,
    Gnd,
}

impl Rail {
    /// The level this rail drives.
    pub fn level(self) -> Signal {
        match self {
            Rail::Vdd => Signal::High,
            Rail::Gnd => Signal::Low,
        }
    }

    pub(crate) fn kind(self) -> &'static str {
        match self {
            Rail::Vdd => "vdd",
            Rail::Gnd => "gnd",
        }
    }
}

/// A fixed source: one terminal permanently driving its rail's level.
///
/// The output is pinned at reset and never recomputed; `update` is a no-op.
#[derive(Debug, Clone)]
pub struct FixedSource {
    name: String,
    rail: Rail,
    terminals: [Terminal; 1],
}

impl FixedSource {
    /// Create a new fixed source with its output already pinned.
    pub fn new(rail: Rail, name: impl Into<String>) -> Self {
        let mut source = Self {
            name: name.into(),
            rail,
            terminals: [Terminal::new(rail.kind())],
        };
        source.reset();
        source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rail(&self) -> Rail {
        self.rail
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub(crate) fn terminals_mut(&mut self) -> &mut [Terminal] {
        &mut self.terminals
    }

    pub(crate) fn reset(&mut self) {
        self.terminals[0].reset();
        self.terminals[0].set_output(self.rail.level());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rails_pin_their_levels() {
        let vdd = FixedSource::new(Rail::Vdd, "vdd");
        assert_eq!(vdd.terminals()[0].output(), Signal::High);
        assert_eq!(vdd.terminals()[0].name(), "vdd");

        let mut gnd = FixedSource::new(Rail::Gnd, "gnd");
        assert_eq!(gnd.terminals()[0].output(), Signal::Low);
        // Reset re-pins rather than floating.
        gnd.terminals_mut()[0].set_output(Signal::Float);
        gnd.reset();
        assert_eq!(gnd.terminals()[0].output(), Signal::Low);
    }
}
