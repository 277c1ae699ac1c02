//! Interactive console front-end for the CLI.
//!
//! A thin host over the simulation core: it builds a demo schematic,
//! relays toggle commands as `activate` + `tick`, and prints probe and net
//! readings. No simulation logic lives here.

use std::io::{self, BufRead, Write};

use crate::circuit::{Schematic, Signal};
use crate::components::{gates, Component};
use crate::error::{LogicError, Result};

/// Build one of the built-in demo circuits.
pub fn build_demo(name: &str) -> Result<Schematic> {
    match name {
        "inverter" => inverter_demo(),
        "nand" => gate_demo(gates::nand_gate("nand")?),
        "xor" => gate_demo(gates::xor_gate("xor")?),
        other => Err(LogicError::unknown_part_kind(other)),
    }
}

/// A CMOS inverter from discrete parts: switch in, probe out.
fn inverter_demo() -> Result<Schematic> {
    let mut s = Schematic::new();
    let vdd = s.add(Component::vdd("vdd"));
    let gnd = s.add(Component::gnd("gnd"));
    let nmos = s.add(Component::nmos("t1"));
    let pmos = s.add(Component::pmos("t2"));
    let input = s.add(Component::switch_with_cycle(
        "in",
        vec![Signal::Low, Signal::High],
    ));
    let probe = s.add(Component::probe("out"));

    let vdd_t = s.sole_terminal(vdd)?;
    let gnd_t = s.sole_terminal(gnd)?;
    let in_t = s.sole_terminal(input)?;
    let probe_t = s.sole_terminal(probe)?;
    let n_gate = s.terminal_id(nmos, "gate")?;
    let n_source = s.terminal_id(nmos, "source")?;
    let n_drain = s.terminal_id(nmos, "drain")?;
    let p_gate = s.terminal_id(pmos, "gate")?;
    let p_source = s.terminal_id(pmos, "source")?;
    let p_drain = s.terminal_id(pmos, "drain")?;

    s.connect(vdd_t, p_source)?;
    s.connect(gnd_t, n_drain)?;
    s.connect_all(&[in_t.into(), n_gate.into(), p_gate.into()])?;
    s.connect_all(&[probe_t.into(), n_source.into(), p_drain.into()])?;
    Ok(s)
}

/// A two-input gate bench: switches on the inputs, probe on the output.
fn gate_demo(gate: Component) -> Result<Schematic> {
    let mut s = Schematic::new();
    let g = s.add(gate);
    for name in ["in1", "in2"] {
        let sw = s.add(Component::switch_with_cycle(
            name,
            vec![Signal::Low, Signal::High],
        ));
        let sw_t = s.sole_terminal(sw)?;
        let g_t = s.terminal_id(g, name)?;
        s.connect(sw_t, g_t)?;
    }
    let probe = s.add(Component::probe("out"));
    let probe_t = s.sole_terminal(probe)?;
    let g_out = s.terminal_id(g, "out")?;
    s.connect(g_out, probe_t)?;
    Ok(s)
}

/// Run the interactive loop until EOF or `quit`.
pub fn run(schematic: &mut Schematic) -> Result<()> {
    schematic.reset();
    settle(schematic);
    print_state(schematic);
    print_help();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        line.clear();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        match words.next() {
            Some("toggle") => match words.next() {
                Some(name) => toggle(schematic, name),
                None => println!("usage: toggle <switch>"),
            },
            Some("show") => print_state(schematic),
            Some("reset") => {
                schematic.reset();
                settle(schematic);
                print_state(schematic);
            }
            Some("quit") | Some("exit") => break,
            Some(_) => print_help(),
            None => {}
        }
    }
    Ok(())
}

fn toggle(schematic: &mut Schematic, name: &str) {
    let Some(id) = schematic.find_component(name) else {
        println!("no component named '{name}'");
        return;
    };
    if !matches!(schematic.component(id), Some(Component::Switch(_))) {
        println!("'{name}' is not a switch");
        return;
    }
    if let Err(err) = schematic.activate(id) {
        println!("error: {err}");
        return;
    }
    settle(schematic);
    print_state(schematic);
}

fn settle(schematic: &mut Schematic) {
    if let Err(err) = schematic.tick() {
        println!("warning: {err}; readings below are unsettled");
    }
}

fn print_state(schematic: &Schematic) {
    for (_, component) in schematic.components() {
        match component {
            Component::Switch(sw) => {
                println!("switch {:<8} -> {}", sw.name(), sw.output());
            }
            Component::Probe(probe) => {
                println!("probe  {:<8} =  {}", probe.name(), probe.reading());
            }
            _ => {}
        }
    }
    for (id, net) in schematic.nets() {
        println!("net    {:<8} =  {}", id.to_string(), net.output());
    }
}

fn print_help() {
    println!("commands: toggle <switch> | show | reset | quit");
}
