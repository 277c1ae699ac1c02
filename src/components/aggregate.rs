//! Hierarchical components: a whole schematic behaving as one device.

use crate::circuit::{Schematic, Signal, TerminalId};
use crate::components::{Component, Terminal};
use crate::error::{LogicError, Result};

/// A component implemented by a nested schematic.
///
/// Boundary markers inside the inner schematic define the aggregate's
/// terminals, one per marker, named after the marker. From the outside an
/// aggregate is indistinguishable from a primitive: its update copies
/// boundary inputs onto marker outputs, runs the inner schematic's fixpoint
/// to convergence, and copies marker inputs back onto boundary outputs.
#[derive(Debug, Clone)]
pub struct Aggregate {
    name: String,
    kind: String,
    schematic: Schematic,
    terminals: Vec<Terminal>,
    /// Pairs an own terminal index with the inner marker terminal it mirrors.
    pairs: Vec<(usize, TerminalId)>,
}

impl Aggregate {
    /// Wrap a schematic, deriving one boundary terminal per marker found.
    ///
    /// Marker names must be non-empty and unique, since they become
    /// terminal names. The inner schematic is reset so the wrapped circuit starts
    /// settled-ready.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        schematic: Schematic,
    ) -> Result<Self> {
        let name = name.into();
        let mut terminals: Vec<Terminal> = Vec::new();
        let mut pairs = Vec::new();
        for (cid, component) in schematic.components() {
            if let Component::Boundary(marker) = component {
                let marker_name = marker.name();
                if marker_name.is_empty() || terminals.iter().any(|t| t.name() == marker_name) {
                    return Err(LogicError::invalid_boundary_name(name, marker_name));
                }
                pairs.push((terminals.len(), TerminalId::new(cid, 0)));
                terminals.push(Terminal::new(marker_name));
            }
        }

        let mut aggregate = Self {
            name,
            kind: kind.into(),
            schematic,
            terminals,
            pairs,
        };
        aggregate.schematic.reset();
        Ok(aggregate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device-kind label this aggregate was registered under.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Read-only view of the wrapped circuit.
    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub(crate) fn terminals_mut(&mut self) -> &mut [Terminal] {
        &mut self.terminals
    }

    pub(crate) fn update(&mut self) -> Result<()> {
        // Outer inputs become inner marker outputs; changed markers enqueue
        // their nets inside.
        for &(own, inner) in &self.pairs {
            let value = self.terminals[own].input();
            self.schematic.drive_terminal(inner, value)?;
        }

        self.schematic.tick()?;

        // Inner marker inputs become outer outputs.
        for &(own, inner) in &self.pairs {
            let value = self
                .schematic
                .terminal(inner)
                .map(Terminal::input)
                .unwrap_or(Signal::Float);
            self.terminals[own].set_output(value);
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.schematic.reset();
        for terminal in &mut self.terminals {
            terminal.reset();
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.schematic.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A pass-through module: two markers wired straight together.
    fn feedthrough() -> Aggregate {
        let mut s = Schematic::new();
        let a = s.add(Component::io("a"));
        let b = s.add(Component::io("b"));
        let at = s.sole_terminal(a).unwrap();
        let bt = s.sole_terminal(b).unwrap();
        s.connect(at, bt).unwrap();
        Aggregate::new("wire", "wire", s).unwrap()
    }

    #[test]
    fn markers_become_boundary_terminals() {
        let agg = feedthrough();
        assert_eq!(agg.terminals().len(), 2);
        assert_eq!(agg.terminals()[0].name(), "a");
        assert_eq!(agg.terminals()[1].name(), "b");
    }

    #[test]
    fn update_carries_signals_through() {
        let mut agg = feedthrough();
        agg.terminals_mut()[0].set_input(Signal::High);
        agg.update().unwrap();
        assert_eq!(agg.terminals()[1].output(), Signal::High);
        // And back the other way.
        agg.terminals_mut()[0].set_input(Signal::Float);
        agg.terminals_mut()[1].set_input(Signal::Low);
        agg.update().unwrap();
        assert_eq!(agg.terminals()[0].output(), Signal::Low);
    }

    #[test]
    fn duplicate_marker_names_are_rejected() {
        let mut s = Schematic::new();
        s.add(Component::io("in"));
        s.add(Component::io("in"));
        assert!(matches!(
            Aggregate::new("agg", "agg", s),
            Err(LogicError::InvalidBoundaryName { .. })
        ));
    }

    #[test]
    fn reset_recurses_into_inner_schematic() {
        let mut agg = feedthrough();
        agg.terminals_mut()[0].set_input(Signal::High);
        agg.update().unwrap();
        agg.reset();
        assert_eq!(agg.terminals()[1].output(), Signal::Float);
        let (_, marker) = agg.schematic().components().next().unwrap();
        assert_eq!(marker.terminals()[0].output(), Signal::Float);
    }
}
