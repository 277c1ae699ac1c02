//! Standard logic gates as aggregate components.
//!
//! Every gate is a [`Aggregate`] wrapping a transistor-level schematic:
//! NOT is a CMOS pair, NAND/NOR are four-transistor networks, AND/OR wrap
//! NAND/NOR plus a NOT (aggregates of aggregates), and XOR/XNOR use eight
//! pass transistors fed by two internal inverters. Boundary markers are
//! named `in`/`in1`/`in2` and `out`.

use crate::circuit::{ComponentId, Endpoint, NetId, Schematic};
use crate::components::{Aggregate, Component};
use crate::error::Result;

/// Resolve `(component, terminal-name)` pins (an empty name selects the
/// sole terminal) and wire them as one net.
fn wire(s: &mut Schematic, pins: &[(ComponentId, &str)]) -> Result<NetId> {
    let mut endpoints = Vec::with_capacity(pins.len());
    for &(component, terminal) in pins {
        let id = if terminal.is_empty() {
            s.sole_terminal(component)?
        } else {
            s.terminal_id(component, terminal)?
        };
        endpoints.push(Endpoint::Terminal(id));
    }
    s.connect_all(&endpoints)
}

/// A CMOS inverter: boundary terminals `in` and `out`.
pub fn not_gate(name: impl Into<String>) -> Result<Component> {
    let mut s = Schematic::new();
    let vdd = s.add(Component::vdd("vdd"));
    let gnd = s.add(Component::gnd("gnd"));
    let io_in = s.add(Component::io("in"));
    let t1 = s.add(Component::nmos("t1"));
    let t2 = s.add(Component::pmos("t2"));
    let io_out = s.add(Component::io("out"));

    wire(&mut s, &[(vdd, ""), (t2, "source")])?;
    wire(&mut s, &[(gnd, ""), (t1, "drain")])?;
    wire(&mut s, &[(t1, "gate"), (io_in, ""), (t2, "gate")])?;
    wire(&mut s, &[(io_out, ""), (t1, "source"), (t2, "drain")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "not", s)?))
}

/// A two-input NAND: parallel pull-up pair, stacked pull-down pair.
pub fn nand_gate(name: impl Into<String>) -> Result<Component> {
    let mut s = Schematic::new();
    let vdd = s.add(Component::vdd("vdd"));
    let gnd = s.add(Component::gnd("gnd"));
    let io_in1 = s.add(Component::io("in1"));
    let io_in2 = s.add(Component::io("in2"));
    let io_out = s.add(Component::io("out"));
    let t1 = s.add(Component::pmos("t1"));
    let t2 = s.add(Component::pmos("t2"));
    let t3 = s.add(Component::nmos("t3"));
    let t4 = s.add(Component::nmos("t4"));

    wire(&mut s, &[(io_in1, ""), (t1, "gate"), (t3, "gate")])?;
    wire(&mut s, &[(io_in2, ""), (t2, "gate"), (t4, "gate")])?;
    wire(&mut s, &[(vdd, ""), (t1, "source"), (t2, "source")])?;
    wire(&mut s, &[(gnd, ""), (t3, "source")])?;
    wire(&mut s, &[(t3, "drain"), (t4, "source")])?;
    wire(&mut s, &[(io_out, ""), (t1, "drain"), (t2, "drain"), (t4, "drain")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "nand", s)?))
}

/// A two-input NOR: stacked pull-up pair, parallel pull-down pair.
pub fn nor_gate(name: impl Into<String>) -> Result<Component> {
    let mut s = Schematic::new();
    let vdd = s.add(Component::vdd("vdd"));
    let gnd = s.add(Component::gnd("gnd"));
    let io_in1 = s.add(Component::io("in1"));
    let io_in2 = s.add(Component::io("in2"));
    let io_out = s.add(Component::io("out"));
    let t1 = s.add(Component::pmos("t1"));
    let t2 = s.add(Component::pmos("t2"));
    let t3 = s.add(Component::nmos("t3"));
    let t4 = s.add(Component::nmos("t4"));

    wire(&mut s, &[(io_in1, ""), (t1, "gate"), (t3, "gate")])?;
    wire(&mut s, &[(io_in2, ""), (t2, "gate"), (t4, "gate")])?;
    wire(&mut s, &[(vdd, ""), (t1, "source")])?;
    wire(&mut s, &[(t1, "drain"), (t2, "source")])?;
    wire(&mut s, &[(gnd, ""), (t3, "drain"), (t4, "drain")])?;
    wire(&mut s, &[(t2, "drain"), (t3, "source"), (t4, "source"), (io_out, "")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "nor", s)?))
}

/// A two-input AND: a NAND feeding a NOT.
pub fn and_gate(name: impl Into<String>) -> Result<Component> {
    let mut s = Schematic::new();
    let nand = s.add(nand_gate("nand")?);
    let not = s.add(not_gate("not")?);
    let io_in1 = s.add(Component::io("in1"));
    let io_in2 = s.add(Component::io("in2"));
    let io_out = s.add(Component::io("out"));

    wire(&mut s, &[(nand, "in1"), (io_in1, "")])?;
    wire(&mut s, &[(nand, "in2"), (io_in2, "")])?;
    wire(&mut s, &[(nand, "out"), (not, "in")])?;
    wire(&mut s, &[(not, "out"), (io_out, "")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "and", s)?))
}

/// A two-input OR: a NOR feeding a NOT.
pub fn or_gate(name: impl Into<String>) -> Result<Component> {
    let mut s = Schematic::new();
    let nor = s.add(nor_gate("nor")?);
    let not = s.add(not_gate("not")?);
    let io_in1 = s.add(Component::io("in1"));
    let io_in2 = s.add(Component::io("in2"));
    let io_out = s.add(Component::io("out"));

    wire(&mut s, &[(nor, "in1"), (io_in1, "")])?;
    wire(&mut s, &[(nor, "in2"), (io_in2, "")])?;
    wire(&mut s, &[(nor, "out"), (not, "in")])?;
    wire(&mut s, &[(not, "out"), (io_out, "")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "or", s)?))
}

/// Shared transmission network of XOR/XNOR: eight pass transistors and two
/// internal inverters. The four gate-net hookups differ per gate.
struct XorNetwork {
    s: Schematic,
    not1: ComponentId,
    not2: ComponentId,
    io_in1: ComponentId,
    io_in2: ComponentId,
    t: [ComponentId; 8],
}

fn xor_network() -> Result<XorNetwork> {
    let mut s = Schematic::new();
    let vdd = s.add(Component::vdd("vdd"));
    let gnd = s.add(Component::gnd("gnd"));
    let not1 = s.add(not_gate("not1")?);
    let not2 = s.add(not_gate("not2")?);
    let io_in1 = s.add(Component::io("in1"));
    let io_in2 = s.add(Component::io("in2"));
    let io_out = s.add(Component::io("out"));
    let t1 = s.add(Component::pmos("t1"));
    let t2 = s.add(Component::pmos("t2"));
    let t3 = s.add(Component::pmos("t3"));
    let t4 = s.add(Component::pmos("t4"));
    let t5 = s.add(Component::nmos("t5"));
    let t6 = s.add(Component::nmos("t6"));
    let t7 = s.add(Component::nmos("t7"));
    let t8 = s.add(Component::nmos("t8"));

    wire(&mut s, &[(vdd, ""), (t1, "source"), (t3, "source")])?;
    wire(&mut s, &[(t1, "drain"), (t2, "source")])?;
    wire(&mut s, &[(t3, "drain"), (t4, "source")])?;
    wire(&mut s, &[(gnd, ""), (t6, "drain"), (t8, "drain")])?;
    wire(&mut s, &[(t5, "drain"), (t6, "source")])?;
    wire(&mut s, &[(t7, "drain"), (t8, "source")])?;
    wire(
        &mut s,
        &[
            (io_out, ""),
            (t2, "drain"),
            (t4, "drain"),
            (t5, "source"),
            (t7, "source"),
        ],
    )?;

    Ok(XorNetwork {
        s,
        not1,
        not2,
        io_in1,
        io_in2,
        t: [t1, t2, t3, t4, t5, t6, t7, t8],
    })
}

/// A two-input XOR from pass-transistor logic.
pub fn xor_gate(name: impl Into<String>) -> Result<Component> {
    let XorNetwork {
        mut s,
        not1,
        not2,
        io_in1,
        io_in2,
        t: [t1, t2, t3, t4, t5, t6, t7, t8],
    } = xor_network()?;

    wire(&mut s, &[(io_in1, ""), (not1, "in"), (t1, "gate"), (t5, "gate")])?;
    wire(&mut s, &[(io_in2, ""), (not2, "in"), (t4, "gate"), (t6, "gate")])?;
    wire(&mut s, &[(not1, "out"), (t3, "gate"), (t7, "gate")])?;
    wire(&mut s, &[(not2, "out"), (t2, "gate"), (t8, "gate")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "xor", s)?))
}

/// A two-input XNOR: the XOR network with the true/inverted inputs swapped
/// on the inner gate hookups.
pub fn xnor_gate(name: impl Into<String>) -> Result<Component> {
    let XorNetwork {
        mut s,
        not1,
        not2,
        io_in1,
        io_in2,
        t: [t1, t2, t3, t4, t5, t6, t7, t8],
    } = xor_network()?;

    wire(&mut s, &[(io_in1, ""), (not1, "in"), (t1, "gate"), (t5, "gate")])?;
    wire(&mut s, &[(io_in2, ""), (not2, "in"), (t2, "gate"), (t8, "gate")])?;
    wire(&mut s, &[(not1, "out"), (t3, "gate"), (t7, "gate")])?;
    wire(&mut s, &[(not2, "out"), (t4, "gate"), (t6, "gate")])?;

    Ok(Component::Aggregate(Aggregate::new(name, "xnor", s)?))
}
