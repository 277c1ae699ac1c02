//! Schematic invariant validation.

use crate::circuit::{NetId, Schematic, TerminalId};
use crate::error::{LogicError, Result};

/// Check every structural invariant of a schematic.
///
/// Checks:
/// - terminal/net membership agrees in both directions
/// - net graphs are symmetric, self-loop free and connected
/// - every net anchors at least two live terminals
///
/// Intended for test harnesses and debug builds; a correct sequence of
/// editing operations never produces a violation. Recurses into nested
/// schematics of aggregate components.
pub fn validate_schematic(schematic: &Schematic) -> Result<()> {
    for (cid, component) in schematic.components() {
        component.validate()?;
        for (index, terminal) in component.terminals().iter().enumerate() {
            if let Some(net_id) = terminal.net() {
                let tid = TerminalId::new(cid, index);
                let net = schematic.net(net_id).ok_or(LogicError::TerminalNetMismatch {
                    terminal: tid,
                    net: net_id,
                })?;
                if net.node_of_terminal(tid).is_none() {
                    return Err(LogicError::TerminalNetMismatch {
                        terminal: tid,
                        net: net_id,
                    });
                }
            }
        }
    }

    for (nid, net) in schematic.nets() {
        net.validate(nid)?;
        check_population(schematic, nid)?;
        for tid in net.terminals() {
            let terminal = schematic.terminal(tid).ok_or(LogicError::DanglingTerminal {
                net: nid,
                terminal: tid,
            })?;
            if terminal.net() != Some(nid) {
                return Err(LogicError::TerminalNetMismatch {
                    terminal: tid,
                    net: nid,
                });
            }
        }
    }

    Ok(())
}

fn check_population(schematic: &Schematic, id: NetId) -> Result<()> {
    let terminals = schematic.net(id).map(|n| n.terminal_count()).unwrap_or(0);
    if terminals < 2 {
        return Err(LogicError::UnderpopulatedNet {
            net: id,
            terminals,
        });
    }
    Ok(())
}
