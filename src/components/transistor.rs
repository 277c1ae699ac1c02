//! Pass transistors.

use crate::circuit::Signal;
use crate::components::Terminal;

/// Transistor channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Conducts when the gate reads high.
    Nmos,
    /// Conducts when the gate reads low.
    Pmos,
}

impl Polarity {
    pub(crate) fn kind(self) -> &'static str {
        match self {
            Polarity::Nmos => "nmos",
            Polarity::Pmos => "pmos",
        }
    }
}

/// An idealized bidirectional pass transistor with terminals
/// `gate`, `source`, `drain`.
///
/// When active, each channel side mirrors the other side's current input.
/// The gate is purely a listener: its output is always Float, so a
/// transistor never drives its own gate net.
#[derive(Debug, Clone)]
pub struct PassTransistor {
    name: String,
    polarity: Polarity,
    terminals: [Terminal; 3],
}

impl PassTransistor {
    pub const GATE: usize = 0;
    pub const SOURCE: usize = 1;
    pub const DRAIN: usize = 2;

    pub fn new(polarity: Polarity, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polarity,
            terminals: [
                Terminal::new("gate"),
                Terminal::new("source"),
                Terminal::new("drain"),
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub(crate) fn terminals_mut(&mut self) -> &mut [Terminal] {
        &mut self.terminals
    }

    pub(crate) fn reset(&mut self) {
        for terminal in &mut self.terminals {
            terminal.reset();
        }
    }

    /// Recompute channel outputs from the current gate and channel inputs.
    ///
    /// Active: source and drain mirror each other's inputs. Definitely off
    /// (nmos + low gate, pmos + high gate): both sides float. Ambiguous
    /// gate (float or contention): a driven value on the far side may or
    /// may not be conducting, so that side reports contention instead of
    /// silently floating.
    pub(crate) fn update(&mut self) {
        let gate = self.terminals[Self::GATE].input();
        self.terminals[Self::GATE].set_output(Signal::Float);

        let source_in = self.terminals[Self::SOURCE].input();
        let drain_in = self.terminals[Self::DRAIN].input();

        let active = match self.polarity {
            Polarity::Nmos => gate == Signal::High,
            Polarity::Pmos => gate == Signal::Low,
        };

        let (source_out, drain_out) = if active {
            (drain_in, source_in)
        } else if matches!(gate, Signal::Float | Signal::Contention) {
            (ambiguous_pass(drain_in), ambiguous_pass(source_in))
        } else {
            (Signal::Float, Signal::Float)
        };

        self.terminals[Self::SOURCE].set_output(source_out);
        self.terminals[Self::DRAIN].set_output(drain_out);
    }
}

/// Pass-through value for a side whose gate state is ambiguous.
fn ambiguous_pass(value: Signal) -> Signal {
    if value == Signal::Float {
        Signal::Float
    } else {
        Signal::Contention
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn with_inputs(polarity: Polarity, gate: Signal, source: Signal, drain: Signal) -> PassTransistor {
        let mut t = PassTransistor::new(polarity, "t");
        t.terminals[PassTransistor::GATE].set_input(gate);
        t.terminals[PassTransistor::SOURCE].set_input(source);
        t.terminals[PassTransistor::DRAIN].set_input(drain);
        t.update();
        t
    }

    fn outputs(t: &PassTransistor) -> (Signal, Signal, Signal) {
        (
            t.terminals[PassTransistor::GATE].output(),
            t.terminals[PassTransistor::SOURCE].output(),
            t.terminals[PassTransistor::DRAIN].output(),
        )
    }

    #[test]
    fn active_nmos_mirrors_inputs() {
        let t = with_inputs(Polarity::Nmos, Signal::High, Signal::Low, Signal::High);
        assert_eq!(outputs(&t), (Signal::Float, Signal::High, Signal::Low));
    }

    #[test]
    fn active_pmos_mirrors_inputs() {
        let t = with_inputs(Polarity::Pmos, Signal::Low, Signal::High, Signal::Float);
        assert_eq!(outputs(&t), (Signal::Float, Signal::Float, Signal::High));
    }

    #[rstest]
    #[case(Polarity::Nmos, Signal::Low)]
    #[case(Polarity::Pmos, Signal::High)]
    fn definitely_off_floats_both_sides(#[case] polarity: Polarity, #[case] gate: Signal) {
        let t = with_inputs(polarity, gate, Signal::High, Signal::Low);
        assert_eq!(outputs(&t), (Signal::Float, Signal::Float, Signal::Float));
    }

    #[rstest]
    #[case(Signal::Float)]
    #[case(Signal::Contention)]
    fn ambiguous_gate_contends_driven_sides(#[case] gate: Signal) {
        // Drain sees a driven value, source side floats: only the side
        // whose pass-through would be driven reports contention.
        let t = with_inputs(Polarity::Nmos, gate, Signal::Float, Signal::Low);
        assert_eq!(
            outputs(&t),
            (Signal::Float, Signal::Contention, Signal::Float)
        );
    }

    #[test]
    fn gate_never_drives_its_net() {
        let mut t = PassTransistor::new(Polarity::Nmos, "t");
        t.terminals[PassTransistor::GATE].set_output(Signal::High);
        t.terminals[PassTransistor::GATE].set_input(Signal::High);
        t.update();
        assert_eq!(t.terminals[PassTransistor::GATE].output(), Signal::Float);
    }
}
