//! Component models for logic simulation.
//!
//! This module provides models for all supported circuit components:
//! - Sources: Vdd, Gnd (fixed rails)
//! - Transistors: n-type and p-type pass transistors
//! - Controls: Switch (cyclable driver), Probe (observer)
//! - Hierarchy: BoundaryMarker, Aggregate (a component wrapping a whole
//!   nested schematic)
//!
//! Each component exposes an ordered list of named [`Terminal`]s and a pure
//! update from current terminal inputs to new terminal outputs.

mod aggregate;
mod boundary;
mod controls;
pub mod gates;
mod sources;
mod transistor;

pub use aggregate::Aggregate;
pub use boundary::BoundaryMarker;
pub use controls::{Probe, Switch, DEFAULT_SWITCH_CYCLE};
pub use sources::{FixedSource, Rail};
pub use transistor::{PassTransistor, Polarity};

use crate::circuit::{NetId, Signal};
use crate::error::Result;

/// A named connection point owned by exactly one component.
///
/// `output` is written only by the owner's update/reset (or an external
/// `drive_terminal` call); `input` is written only by net propagation.
#[derive(Debug, Clone)]
pub struct Terminal {
    name: String,
    output: Signal,
    input: Signal,
    net: Option<NetId>,
}

impl Terminal {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: Signal::Float,
            input: Signal::Float,
            net: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value this terminal drives onto its net.
    pub fn output(&self) -> Signal {
        self.output
    }

    /// The value this terminal hears from its net (all drivers but itself).
    pub fn input(&self) -> Signal {
        self.input
    }

    /// The net this terminal is wired to, if any.
    pub fn net(&self) -> Option<NetId> {
        self.net
    }

    pub(crate) fn set_output(&mut self, signal: Signal) {
        self.output = signal;
    }

    pub(crate) fn set_input(&mut self, signal: Signal) {
        self.input = signal;
    }

    pub(crate) fn attach(&mut self, net: NetId) {
        self.net = Some(net);
    }

    pub(crate) fn detach(&mut self) {
        self.net = None;
    }

    /// Float both directions. Keeps the net attachment.
    pub(crate) fn reset(&mut self) {
        self.output = Signal::Float;
        self.input = Signal::Float;
    }
}

/// A circuit component.
#[derive(Debug, Clone)]
pub enum Component {
    Source(FixedSource),
    Transistor(PassTransistor),
    Switch(Switch),
    Probe(Probe),
    Boundary(BoundaryMarker),
    Aggregate(Aggregate),
}

impl Component {
    /// A Vdd rail: one terminal pinned high.
    pub fn vdd(name: impl Into<String>) -> Self {
        Component::Source(FixedSource::new(Rail::Vdd, name))
    }

    /// A Gnd rail: one terminal pinned low.
    pub fn gnd(name: impl Into<String>) -> Self {
        Component::Source(FixedSource::new(Rail::Gnd, name))
    }

    /// An n-type pass transistor (conducts on a high gate).
    pub fn nmos(name: impl Into<String>) -> Self {
        Component::Transistor(PassTransistor::new(Polarity::Nmos, name))
    }

    /// A p-type pass transistor (conducts on a low gate).
    pub fn pmos(name: impl Into<String>) -> Self {
        Component::Transistor(PassTransistor::new(Polarity::Pmos, name))
    }

    /// A switch with the default output cycle.
    pub fn switch(name: impl Into<String>) -> Self {
        Component::Switch(Switch::new(name))
    }

    /// A switch cycling through a custom output sequence.
    pub fn switch_with_cycle(name: impl Into<String>, cycle: Vec<Signal>) -> Self {
        Component::Switch(Switch::with_cycle(name, cycle))
    }

    /// A probe: observes its net, never drives it.
    pub fn probe(name: impl Into<String>) -> Self {
        Component::Probe(Probe::new(name))
    }

    /// A boundary marker for use inside an aggregate's inner schematic.
    pub fn io(name: impl Into<String>) -> Self {
        Component::Boundary(BoundaryMarker::new(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Source(c) => c.name(),
            Component::Transistor(c) => c.name(),
            Component::Switch(c) => c.name(),
            Component::Probe(c) => c.name(),
            Component::Boundary(c) => c.name(),
            Component::Aggregate(c) => c.name(),
        }
    }

    /// Short device-kind label ("vdd", "nmos", "switch", a gate name, ...).
    pub fn kind(&self) -> &str {
        match self {
            Component::Source(c) => c.rail().kind(),
            Component::Transistor(c) => c.polarity().kind(),
            Component::Switch(_) => "switch",
            Component::Probe(_) => "probe",
            Component::Boundary(_) => "io",
            Component::Aggregate(c) => c.kind(),
        }
    }

    /// The ordered terminal list.
    pub fn terminals(&self) -> &[Terminal] {
        match self {
            Component::Source(c) => c.terminals(),
            Component::Transistor(c) => c.terminals(),
            Component::Switch(c) => c.terminals(),
            Component::Probe(c) => c.terminals(),
            Component::Boundary(c) => c.terminals(),
            Component::Aggregate(c) => c.terminals(),
        }
    }

    pub(crate) fn terminals_mut(&mut self) -> &mut [Terminal] {
        match self {
            Component::Source(c) => c.terminals_mut(),
            Component::Transistor(c) => c.terminals_mut(),
            Component::Switch(c) => c.terminals_mut(),
            Component::Probe(c) => c.terminals_mut(),
            Component::Boundary(c) => c.terminals_mut(),
            Component::Aggregate(c) => c.terminals_mut(),
        }
    }

    /// Look up a terminal by name.
    pub fn terminal(&self, name: &str) -> Option<&Terminal> {
        self.terminals().iter().find(|t| t.name() == name)
    }

    /// Position of a named terminal in the terminal list.
    pub fn terminal_index(&self, name: &str) -> Option<usize> {
        self.terminals().iter().position(|t| t.name() == name)
    }

    /// Compute new terminal outputs from current terminal inputs.
    ///
    /// Pure for every primitive variant; an aggregate recursively runs its
    /// inner schematic to fixpoint, which can report divergence.
    pub(crate) fn update(&mut self) -> Result<()> {
        match self {
            // Rails are pinned at reset; probes and markers never drive.
            Component::Source(_) | Component::Probe(_) | Component::Boundary(_) => Ok(()),
            Component::Transistor(c) => {
                c.update();
                Ok(())
            }
            Component::Switch(_) => Ok(()),
            Component::Aggregate(c) => c.update(),
        }
    }

    /// Re-initialize terminal state: everything floats except fixed-source
    /// outputs (pinned to their rail) and switch outputs (first cycle
    /// entry). Aggregates reset their inner schematic first.
    pub(crate) fn reset(&mut self) {
        match self {
            Component::Source(c) => c.reset(),
            Component::Transistor(c) => c.reset(),
            Component::Switch(c) => c.reset(),
            Component::Probe(c) => c.reset(),
            Component::Boundary(c) => c.reset(),
            Component::Aggregate(c) => c.reset(),
        }
    }

    /// Apply a user action. Only switches react; everything else ignores it.
    pub(crate) fn on_activate(&mut self) {
        if let Component::Switch(c) = self {
            c.on_activate();
        }
    }

    /// Check component-local invariants; aggregates validate their inner
    /// schematic.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Component::Aggregate(c) => c.validate(),
            _ => Ok(()),
        }
    }
}
