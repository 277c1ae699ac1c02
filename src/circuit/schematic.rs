//! The schematic: component and net arenas plus the propagation engine.
//!
//! Editing operations (`add`, `remove`, `connect`, `disconnect`) keep the
//! topology invariants; `tick` drives the worklist fixpoint. Edits never
//! recompute signals themselves; they enqueue the affected components and
//! nets, and the next `tick` settles the circuit.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::circuit::net::{Net, NodeAnchor};
use crate::circuit::{ComponentId, Endpoint, NetId, Point, Signal, TerminalId};
use crate::components::{Component, Terminal};
use crate::error::{LogicError, Result};

/// Default cap on worklist items processed by a single [`Schematic::tick`].
///
/// A circuit that has not settled within this many pops is treated as
/// divergent (e.g. a ring oscillator) rather than simulated forever.
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// One unit of pending propagation work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WorkItem {
    Component(ComponentId),
    Net(NetId),
}

/// A circuit: components wired together on nets.
///
/// Components and nets live in index arenas and are referenced by
/// [`ComponentId`]/[`NetId`] everywhere else, so the undirected
/// terminal-net back-references never alias. Removed entries leave dead
/// slots behind; stale worklist entries pointing at them are skipped.
#[derive(Debug, Clone)]
pub struct Schematic {
    components: Vec<Option<Component>>,
    nets: Vec<Option<Net>>,
    pending: VecDeque<WorkItem>,
    pending_set: HashSet<WorkItem>,
    step_limit: usize,
}

impl Default for Schematic {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            nets: Vec::new(),
            pending: VecDeque::new(),
            pending_set: HashSet::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl Schematic {
    /// Create an empty schematic with the default step limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-tick worklist step limit.
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    // ============ Introspection ============

    /// Iterate all live components in id order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> + '_ {
        self.components
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ComponentId(i), c)))
    }

    /// Iterate all live nets in id order.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> + '_ {
        self.nets
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NetId(i), n)))
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)?.as_ref()
    }

    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.0)?.as_ref()
    }

    /// The cached aggregate signal of a net. Valid once settled.
    pub fn net_signal(&self, id: NetId) -> Option<Signal> {
        self.net(id).map(Net::output)
    }

    pub fn terminal(&self, id: TerminalId) -> Option<&Terminal> {
        self.component(id.component)?.terminals().get(id.index)
    }

    fn terminal_mut(&mut self, id: TerminalId) -> Option<&mut Terminal> {
        self.components
            .get_mut(id.component.0)?
            .as_mut()?
            .terminals_mut()
            .get_mut(id.index)
    }

    /// Resolve a terminal by component and terminal name.
    pub fn terminal_id(&self, component: ComponentId, name: &str) -> Result<TerminalId> {
        let comp = self
            .component(component)
            .ok_or(LogicError::ComponentNotFound { id: component })?;
        let index = comp
            .terminal_index(name)
            .ok_or_else(|| LogicError::terminal_not_found(comp.name(), name))?;
        Ok(TerminalId::new(component, index))
    }

    /// Resolve a single-terminal component (source, switch, probe, marker)
    /// to its one terminal. Errors if the component exposes several.
    pub fn sole_terminal(&self, component: ComponentId) -> Result<TerminalId> {
        let comp = self
            .component(component)
            .ok_or(LogicError::ComponentNotFound { id: component })?;
        if comp.terminals().len() != 1 {
            return Err(LogicError::NotSingleTerminal {
                component: comp.name().to_string(),
                terminals: comp.terminals().len(),
            });
        }
        Ok(TerminalId::new(component, 0))
    }

    /// Find the first component with the given name, in id order.
    pub fn find_component(&self, name: &str) -> Option<ComponentId> {
        self.components()
            .find(|(_, c)| c.name() == name)
            .map(|(id, _)| id)
    }

    pub fn component_count(&self) -> usize {
        self.components().count()
    }

    pub fn net_count(&self) -> usize {
        self.nets().count()
    }

    /// True when no propagation work is pending. A tick that returned a
    /// divergence error leaves this false.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check every schematic invariant. See [`crate::circuit::validate_schematic`].
    pub fn validate(&self) -> Result<()> {
        crate::circuit::validate_schematic(self)
    }

    // ============ Editing ============

    /// Add a component. It is reset (fixed sources pin their rails),
    /// detached from any previous nets, and enqueued for the next tick.
    pub fn add(&mut self, mut component: Component) -> ComponentId {
        component.reset();
        for terminal in component.terminals_mut() {
            terminal.detach();
        }
        let id = ComponentId(self.components.len());
        self.components.push(Some(component));
        self.mark(WorkItem::Component(id));
        id
    }

    /// Wire two endpoints together, creating, extending or merging nets as
    /// needed. Re-connecting endpoints already on one net just adds a
    /// routing edge (idempotent). The touched net is enqueued; the caller
    /// ticks when ready.
    pub fn connect(&mut self, a: impl Into<Endpoint>, b: impl Into<Endpoint>) -> Result<NetId> {
        let a = a.into();
        let b = b.into();
        self.check_endpoint(a)?;
        self.check_endpoint(b)?;

        let id = match (self.endpoint_net(a), self.endpoint_net(b)) {
            (Some(x), Some(y)) if x != y => self.merge_nets(x, y)?,
            (Some(x), _) => x,
            (None, Some(y)) => y,
            (None, None) => {
                let id = NetId(self.nets.len());
                self.nets.push(Some(Net::new()));
                trace!(net = %id, "created net");
                id
            }
        };

        let node_a = self.ensure_node(id, a)?;
        let node_b = self.ensure_node(id, b)?;
        let net = self
            .nets
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(LogicError::NetNotFound { id })?;
        net.add_edge(node_a, node_b);
        net.validate(id)?;

        self.mark(WorkItem::Net(id));
        Ok(id)
    }

    /// Wire a chain of endpoints in order, as one net.
    pub fn connect_all(&mut self, endpoints: &[Endpoint]) -> Result<NetId> {
        if endpoints.len() < 2 {
            return Err(LogicError::TooFewEndpoints {
                got: endpoints.len(),
            });
        }
        // Validate the whole chain up front so a bad endpoint cannot leave
        // a partially wired net behind.
        for &endpoint in endpoints {
            self.check_endpoint(endpoint)?;
        }
        let mut id = self.connect(endpoints[0], endpoints[1])?;
        for i in 2..endpoints.len() {
            id = self.connect(endpoints[i - 1], endpoints[i])?;
        }
        Ok(id)
    }

    /// Detach one terminal from its net. The net is rebuilt afterwards:
    /// splitting into connected components if the node was a cut vertex,
    /// tearing down any remnant left with fewer than two terminals. The
    /// caller ticks when ready.
    pub fn disconnect(&mut self, id: TerminalId) -> Result<()> {
        self.check_endpoint(Endpoint::Terminal(id))?;
        let Some(net_id) = self.terminal(id).and_then(Terminal::net) else {
            return Ok(());
        };
        self.detach_terminal(net_id, id)?;
        self.rebuild_net(net_id);
        Ok(())
    }

    /// Remove a routing waypoint from a net, rebuilding the net the same
    /// way terminal detachment does. Unknown waypoints are a no-op.
    pub fn remove_waypoint(&mut self, net_id: NetId, point: Point) -> Result<()> {
        let net = self
            .nets
            .get_mut(net_id.0)
            .and_then(Option::as_mut)
            .ok_or(LogicError::NetNotFound { id: net_id })?;
        let Some(node) = net.node_of_waypoint(point) else {
            return Ok(());
        };
        net.remove_node(node);
        self.rebuild_net(net_id);
        Ok(())
    }

    /// Remove a component, detaching all its terminals and rebuilding every
    /// touched net, then re-run `tick`: topology changed, so the circuit
    /// must settle again before the caller observes it.
    pub fn remove(&mut self, id: ComponentId) -> Result<()> {
        let component = self
            .components
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(LogicError::ComponentNotFound { id })?;

        let mut touched: Vec<NetId> = Vec::new();
        for (index, terminal) in component.terminals().iter().enumerate() {
            if let Some(net_id) = terminal.net() {
                let tid = TerminalId::new(id, index);
                if let Some(net) = self.nets.get_mut(net_id.0).and_then(Option::as_mut) {
                    if let Some(node) = net.node_of_terminal(tid) {
                        net.remove_node(node);
                    }
                }
                if !touched.contains(&net_id) {
                    touched.push(net_id);
                }
            }
        }

        for net_id in touched {
            self.rebuild_net(net_id);
        }
        debug!(component = %id, "removed component");
        self.tick()?;
        Ok(())
    }

    /// Apply a user action (e.g. cycle a switch) and enqueue the nets its
    /// changed outputs drive. The core never auto-ticks on activation; the
    /// caller follows up with [`Schematic::tick`].
    pub fn activate(&mut self, id: ComponentId) -> Result<()> {
        let component = self
            .components
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(LogicError::ComponentNotFound { id })?;
        let before: Vec<Signal> = component.terminals().iter().map(Terminal::output).collect();
        component.on_activate();
        let changed: Vec<NetId> = component
            .terminals()
            .iter()
            .zip(&before)
            .filter(|(t, prev)| t.output() != **prev)
            .filter_map(|(t, _)| t.net())
            .collect();
        for net in changed {
            self.mark(WorkItem::Net(net));
        }
        Ok(())
    }

    /// Drive a terminal's output from outside the simulation (an external
    /// stimulus, or an aggregate copying a boundary value inward). Enqueues
    /// the terminal's net on change.
    pub fn drive_terminal(&mut self, id: TerminalId, signal: Signal) -> Result<()> {
        self.check_endpoint(Endpoint::Terminal(id))?;
        let mut changed_net = None;
        if let Some(terminal) = self.terminal_mut(id) {
            if terminal.output() != signal {
                terminal.set_output(signal);
                changed_net = terminal.net();
            }
        }
        if let Some(net) = changed_net {
            self.mark(WorkItem::Net(net));
        }
        Ok(())
    }

    // ============ Simulation ============

    /// Re-initialize every component and net (fixed sources pin their
    /// rails, everything else floats) and seed the worklist with the whole
    /// circuit: all components, then all nets, in id order.
    pub fn reset(&mut self) {
        for slot in self.components.iter_mut().flatten() {
            slot.reset();
        }
        for slot in self.nets.iter_mut().flatten() {
            slot.reset();
        }
        self.pending.clear();
        self.pending_set.clear();
        for i in 0..self.components.len() {
            if self.components[i].is_some() {
                self.mark(WorkItem::Component(ComponentId(i)));
            }
        }
        for i in 0..self.nets.len() {
            if self.nets[i].is_some() {
                self.mark(WorkItem::Net(NetId(i)));
            }
        }
    }

    /// Run the worklist to fixpoint and return the number of items
    /// processed. A settled schematic returns `Ok(0)`.
    ///
    /// Popping a net recomputes its terminals' inputs (each excluding the
    /// terminal's own output) and enqueues the owners of changed inputs;
    /// popping a component runs its update (recursing through nested
    /// schematics) and enqueues the nets of changed outputs. The settled
    /// state is independent of pop order; intermediate states are not.
    ///
    /// If more than the step limit of items are processed the tick aborts
    /// with [`LogicError::Divergence`], leaving the unprocessed work queued
    /// so the schematic reports `is_settled() == false`.
    pub fn tick(&mut self) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(item) = self.pending.pop_front() {
            if steps >= self.step_limit {
                // Re-queue so the unsettled state stays observable.
                self.pending.push_front(item);
                warn!(limit = self.step_limit, "tick exceeded step limit");
                return Err(LogicError::Divergence {
                    steps: self.step_limit,
                });
            }
            self.pending_set.remove(&item);
            steps += 1;
            match item {
                WorkItem::Net(id) => self.update_net(id)?,
                WorkItem::Component(id) => self.update_component(id)?,
            }
        }
        if steps > 0 {
            debug!(steps, "schematic settled");
        }
        Ok(steps)
    }

    fn mark(&mut self, item: WorkItem) {
        if self.pending_set.insert(item) {
            self.pending.push_back(item);
        }
    }

    /// Recompute terminal inputs and the cached aggregate for one net.
    ///
    /// Each terminal's input combines the outputs of every OTHER terminal
    /// on the net, never its own, so a driver cannot feed itself. The
    /// aggregate combines all outputs and is observation-only.
    fn update_net(&mut self, id: NetId) -> Result<()> {
        let term_ids: Vec<TerminalId> = match self.nets.get(id.0).and_then(Option::as_ref) {
            Some(net) => net.terminals().collect(),
            None => return Ok(()), // merged away or torn down; stale work
        };

        let mut outputs = Vec::with_capacity(term_ids.len());
        for &tid in &term_ids {
            let terminal = self.terminal(tid).ok_or(LogicError::DanglingTerminal {
                net: id,
                terminal: tid,
            })?;
            outputs.push(terminal.output());
        }

        let mut changed_owners: Vec<ComponentId> = Vec::new();
        for (i, &tid) in term_ids.iter().enumerate() {
            let others = outputs
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &s)| s);
            let input = Signal::combine(others);
            let terminal = self.terminal_mut(tid).ok_or(LogicError::DanglingTerminal {
                net: id,
                terminal: tid,
            })?;
            if terminal.input() != input {
                terminal.set_input(input);
                if !changed_owners.contains(&tid.component) {
                    changed_owners.push(tid.component);
                }
            }
        }

        let aggregate = Signal::combine(outputs.iter().copied());
        if let Some(net) = self.nets.get_mut(id.0).and_then(Option::as_mut) {
            net.set_output(aggregate);
        }

        for owner in changed_owners {
            self.mark(WorkItem::Component(owner));
        }
        Ok(())
    }

    /// Run one component's update and enqueue the nets of changed outputs.
    fn update_component(&mut self, id: ComponentId) -> Result<()> {
        let Some(component) = self.components.get_mut(id.0).and_then(Option::as_mut) else {
            return Ok(()); // removed; stale work
        };
        let before: Vec<Signal> = component.terminals().iter().map(Terminal::output).collect();
        component.update()?;
        let changed: Vec<NetId> = component
            .terminals()
            .iter()
            .zip(&before)
            .filter(|(t, prev)| t.output() != **prev)
            .filter_map(|(t, _)| t.net())
            .collect();
        for net in changed {
            self.mark(WorkItem::Net(net));
        }
        Ok(())
    }

    // ============ Topology internals ============

    fn check_endpoint(&self, endpoint: Endpoint) -> Result<()> {
        if let Endpoint::Terminal(t) = endpoint {
            let comp = self
                .component(t.component)
                .ok_or(LogicError::ComponentNotFound { id: t.component })?;
            if t.index >= comp.terminals().len() {
                return Err(LogicError::TerminalOutOfRange { id: t });
            }
        }
        Ok(())
    }

    fn endpoint_net(&self, endpoint: Endpoint) -> Option<NetId> {
        match endpoint {
            Endpoint::Terminal(t) => self.terminal(t).and_then(Terminal::net),
            Endpoint::Waypoint(_) => None,
        }
    }

    /// Find or create the node anchoring `endpoint` in net `id`, attaching
    /// the terminal back-reference when a terminal joins the net.
    fn ensure_node(&mut self, id: NetId, endpoint: Endpoint) -> Result<usize> {
        let net = self
            .nets
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(LogicError::NetNotFound { id })?;
        match endpoint {
            Endpoint::Terminal(t) => {
                if let Some(node) = net.node_of_terminal(t) {
                    return Ok(node);
                }
                let node = net.add_node(NodeAnchor::Terminal(t));
                self.terminal_mut(t)
                    .ok_or(LogicError::TerminalOutOfRange { id: t })?
                    .attach(id);
                Ok(node)
            }
            Endpoint::Waypoint(p) => {
                if let Some(node) = net.node_of_waypoint(p) {
                    return Ok(node);
                }
                Ok(net.add_node(NodeAnchor::Waypoint(p)))
            }
        }
    }

    /// Absorb net `y` into net `x`, retargeting every moved terminal.
    fn merge_nets(&mut self, x: NetId, y: NetId) -> Result<NetId> {
        let other = self
            .nets
            .get_mut(y.0)
            .and_then(Option::take)
            .ok_or(LogicError::NetNotFound { id: y })?;
        let moved: Vec<TerminalId> = {
            let net = self
                .nets
                .get_mut(x.0)
                .and_then(Option::as_mut)
                .ok_or(LogicError::NetNotFound { id: x })?;
            let offset = net.absorb(other);
            net.nodes()[offset..]
                .iter()
                .filter_map(|n| n.terminal())
                .collect()
        };
        for tid in moved {
            if let Some(terminal) = self.terminal_mut(tid) {
                terminal.attach(x);
            }
        }
        debug!(from = %y, into = %x, "merged nets");
        Ok(x)
    }

    fn detach_terminal(&mut self, net_id: NetId, id: TerminalId) -> Result<()> {
        let net = self
            .nets
            .get_mut(net_id.0)
            .and_then(Option::as_mut)
            .ok_or(LogicError::NetNotFound { id: net_id })?;
        if let Some(node) = net.node_of_terminal(id) {
            net.remove_node(node);
        }
        if let Some(terminal) = self.terminal_mut(id) {
            terminal.detach();
            terminal.set_input(Signal::Float);
        }
        self.mark(WorkItem::Component(id.component));
        Ok(())
    }

    /// Rebuild a net after node removal: keep each connected component with
    /// at least two terminals as a net (the first reuses the original id),
    /// tear the rest down, floating and detaching their terminals.
    fn rebuild_net(&mut self, id: NetId) {
        let Some(net) = self.nets.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        let groups = net.connected_components();
        let split = groups.len() > 1;
        let mut reused = false;
        for group in &groups {
            let part = net.extract(group);
            let terminals: Vec<TerminalId> = part.terminals().collect();
            if terminals.len() >= 2 {
                let new_id = if reused {
                    let nid = NetId(self.nets.len());
                    self.nets.push(None);
                    nid
                } else {
                    reused = true;
                    id
                };
                for &tid in &terminals {
                    if let Some(terminal) = self.terminal_mut(tid) {
                        terminal.attach(new_id);
                    }
                }
                self.nets[new_id.0] = Some(part);
                self.mark(WorkItem::Net(new_id));
                if split {
                    debug!(net = %id, part = %new_id, "net split");
                }
            } else {
                for &tid in &terminals {
                    if let Some(terminal) = self.terminal_mut(tid) {
                        terminal.detach();
                        terminal.set_input(Signal::Float);
                    }
                    self.mark(WorkItem::Component(tid.component));
                }
                trace!(net = %id, "net remnant torn down");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;

    fn sole(s: &Schematic, id: ComponentId) -> TerminalId {
        s.sole_terminal(id).unwrap()
    }

    fn named(s: &Schematic, id: ComponentId, name: &str) -> TerminalId {
        s.terminal_id(id, name).unwrap()
    }

    fn input_of(s: &Schematic, id: TerminalId) -> Signal {
        s.terminal(id).unwrap().input()
    }

    /// Wire a CMOS inverter stage; returns (gate endpoint, output endpoint).
    fn add_inverter(
        s: &mut Schematic,
        vdd: ComponentId,
        gnd: ComponentId,
        tag: &str,
    ) -> (TerminalId, TerminalId) {
        let n = s.add(Component::nmos(format!("{tag}_n")));
        let p = s.add(Component::pmos(format!("{tag}_p")));
        let vdd_t = sole(s, vdd);
        let gnd_t = sole(s, gnd);
        let n_gate = named(s, n, "gate");
        let n_source = named(s, n, "source");
        let n_drain = named(s, n, "drain");
        let p_gate = named(s, p, "gate");
        let p_source = named(s, p, "source");
        let p_drain = named(s, p, "drain");
        s.connect(vdd_t, p_source).unwrap();
        s.connect(gnd_t, n_drain).unwrap();
        s.connect(n_gate, p_gate).unwrap();
        s.connect(n_source, p_drain).unwrap();
        (n_gate, n_source)
    }

    #[test]
    fn connect_creates_extends_and_merges() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let b = s.add(Component::switch("b"));
        let c = s.add(Component::probe("c"));
        let at = sole(&s, a);
        let bt = sole(&s, b);
        let ct = sole(&s, c);

        let n1 = s.connect(at, bt).unwrap();
        let n2 = s.connect(ct, Point::new(1.0, 0.0)).unwrap();
        assert_ne!(n1, n2);
        assert_eq!(s.net_count(), 2);

        // Bridging the two nets merges them into n1's slot.
        let merged = s.connect(bt, ct).unwrap();
        assert_eq!(merged, n1);
        assert_eq!(s.net_count(), 1);
        let net = s.net(n1).unwrap();
        assert_eq!(net.terminal_count(), 3);
        assert_eq!(net.nodes().len(), 4); // three terminals plus a waypoint
        assert_eq!(s.terminal(ct).unwrap().net(), Some(n1));
        s.validate().unwrap();
    }

    #[test]
    fn connect_same_net_is_idempotent() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let b = s.add(Component::switch("b"));
        let at = sole(&s, a);
        let bt = sole(&s, b);
        let n1 = s.connect(at, bt).unwrap();
        let n2 = s.connect(at, bt).unwrap();
        assert_eq!(n1, n2);
        assert_eq!(s.net(n1).unwrap().nodes().len(), 2);
        s.validate().unwrap();
    }

    #[test]
    fn connect_rejects_bad_endpoints() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let at = sole(&s, a);
        let ghost = TerminalId::new(ComponentId(99), 0);
        assert!(matches!(
            s.connect(at, ghost),
            Err(LogicError::ComponentNotFound { .. })
        ));
        let oob = TerminalId::new(a, 5);
        assert!(matches!(
            s.connect(at, oob),
            Err(LogicError::TerminalOutOfRange { .. })
        ));
        assert!(matches!(
            s.connect_all(&[Endpoint::Terminal(at)]),
            Err(LogicError::TooFewEndpoints { got: 1 })
        ));
    }

    #[test]
    fn sole_terminal_rejects_multi_terminal_parts() {
        let mut s = Schematic::new();
        let t = s.add(Component::nmos("t"));
        assert!(matches!(
            s.sole_terminal(t),
            Err(LogicError::NotSingleTerminal { terminals: 3, .. })
        ));
    }

    #[test]
    fn settled_tick_processes_nothing() {
        let mut s = Schematic::new();
        let vdd = s.add(Component::vdd("vdd"));
        let p = s.add(Component::probe("p"));
        let vt = sole(&s, vdd);
        let pt = sole(&s, p);
        s.connect(vt, pt).unwrap();
        s.reset();
        assert!(s.tick().unwrap() > 0);
        assert!(s.is_settled());
        assert_eq!(s.tick().unwrap(), 0);
        assert_eq!(input_of(&s, pt), Signal::High);
    }

    #[test]
    fn contention_between_rails() {
        let mut s = Schematic::new();
        let vdd = s.add(Component::vdd("vdd"));
        let gnd = s.add(Component::gnd("gnd"));
        let vt = sole(&s, vdd);
        let gt = sole(&s, gnd);
        let net = s.connect(vt, gt).unwrap();
        s.reset();
        s.tick().unwrap();
        assert_eq!(s.net_signal(net), Some(Signal::Contention));
        // Self-exclusion: each rail sees only the other one.
        assert_eq!(input_of(&s, vt), Signal::Low);
        assert_eq!(input_of(&s, gt), Signal::High);
    }

    #[test]
    fn cmos_inverter_follows_switch() {
        let mut s = Schematic::new();
        let vdd = s.add(Component::vdd("vdd"));
        let gnd = s.add(Component::gnd("gnd"));
        let (gate, out) = add_inverter(&mut s, vdd, gnd, "inv");
        let input = s.add(Component::switch_with_cycle(
            "in",
            vec![Signal::Low, Signal::High],
        ));
        let probe = s.add(Component::probe("out"));
        let in_t = sole(&s, input);
        let probe_t = sole(&s, probe);
        s.connect(in_t, gate).unwrap();
        s.connect(out, probe_t).unwrap();

        s.reset();
        s.tick().unwrap();
        assert_eq!(input_of(&s, probe_t), Signal::High); // switch starts low

        s.activate(input).unwrap(); // low -> high
        s.tick().unwrap();
        assert_eq!(input_of(&s, probe_t), Signal::Low);

        s.activate(input).unwrap(); // wraps back to low
        s.tick().unwrap();
        assert_eq!(input_of(&s, probe_t), Signal::High);
        s.validate().unwrap();
    }

    #[test]
    fn remove_prunes_underpopulated_nets() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let b = s.add(Component::switch("b"));
        let c = s.add(Component::switch("c"));
        let at = sole(&s, a);
        let bt = sole(&s, b);
        let ct = sole(&s, c);
        s.connect_all(&[at.into(), bt.into(), ct.into()]).unwrap();
        s.reset();
        s.tick().unwrap();

        s.remove(c).unwrap();
        assert_eq!(s.net_count(), 1);
        assert_eq!(s.component_count(), 2);
        s.validate().unwrap();

        // Removing the second-to-last terminal kills the net and floats
        // the survivor.
        s.remove(b).unwrap();
        assert_eq!(s.net_count(), 0);
        assert_eq!(s.terminal(at).unwrap().net(), None);
        assert_eq!(input_of(&s, at), Signal::Float);
        s.validate().unwrap();
    }

    #[test]
    fn removing_cut_vertex_splits_net() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let pa = s.add(Component::probe("pa"));
        let mid = s.add(Component::switch("mid"));
        let b = s.add(Component::switch("b"));
        let pb = s.add(Component::probe("pb"));
        let at = sole(&s, a);
        let pat = sole(&s, pa);
        let mt = sole(&s, mid);
        let bt = sole(&s, b);
        let pbt = sole(&s, pb);
        // a - pa, a - mid - b, b - pb: mid is a cut vertex.
        s.connect(at, pat).unwrap();
        s.connect(at, mt).unwrap();
        s.connect(mt, bt).unwrap();
        s.connect(bt, pbt).unwrap();
        s.reset();
        s.tick().unwrap();
        assert_eq!(s.net_count(), 1);

        s.remove(mid).unwrap();
        assert_eq!(s.net_count(), 2);
        let left = s.terminal(at).unwrap().net().unwrap();
        let right = s.terminal(bt).unwrap().net().unwrap();
        assert_ne!(left, right);
        assert_eq!(s.terminal(pat).unwrap().net(), Some(left));
        assert_eq!(s.terminal(pbt).unwrap().net(), Some(right));
        s.validate().unwrap();
    }

    #[test]
    fn disconnect_detaches_and_floats() {
        let mut s = Schematic::new();
        let sw = s.add(Component::switch_with_cycle("sw", vec![Signal::High]));
        let p1 = s.add(Component::probe("p1"));
        let p2 = s.add(Component::probe("p2"));
        let st = sole(&s, sw);
        let p1t = sole(&s, p1);
        let p2t = sole(&s, p2);
        // Star on the switch so detaching p1 cannot orphan p2.
        s.connect(st, p1t).unwrap();
        s.connect(st, p2t).unwrap();
        s.reset();
        s.tick().unwrap();
        assert_eq!(input_of(&s, p1t), Signal::High);

        s.disconnect(p1t).unwrap();
        s.tick().unwrap();
        assert_eq!(s.terminal(p1t).unwrap().net(), None);
        assert_eq!(input_of(&s, p1t), Signal::Float);
        // The other two stay connected.
        assert_eq!(input_of(&s, p2t), Signal::High);
        s.validate().unwrap();
    }

    #[test]
    fn remove_waypoint_rejoins_or_rebuilds() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let b = s.add(Component::probe("b"));
        let at = sole(&s, a);
        let bt = sole(&s, b);
        let bend = Point::new(2.0, 3.0);
        // a - bend - b: the waypoint is a cut vertex, so removing it tears
        // the 1-terminal remnants down.
        let net = s.connect(at, bend).unwrap();
        s.connect(bend, bt).unwrap();
        assert_eq!(s.net(net).unwrap().nodes().len(), 3);

        s.remove_waypoint(net, bend).unwrap();
        assert_eq!(s.net_count(), 0);
        assert_eq!(s.terminal(at).unwrap().net(), None);
        assert_eq!(s.terminal(bt).unwrap().net(), None);
    }

    #[test]
    fn drive_terminal_acts_as_external_stimulus() {
        let mut s = Schematic::new();
        let p1 = s.add(Component::probe("p1"));
        let p2 = s.add(Component::probe("p2"));
        let p1t = sole(&s, p1);
        let p2t = sole(&s, p2);
        s.connect(p1t, p2t).unwrap();
        s.reset();
        s.tick().unwrap();
        assert_eq!(input_of(&s, p2t), Signal::Float);

        s.drive_terminal(p1t, Signal::High).unwrap();
        s.tick().unwrap();
        assert_eq!(input_of(&s, p2t), Signal::High);
        // Self-exclusion: the driven terminal does not hear itself.
        assert_eq!(input_of(&s, p1t), Signal::Float);
    }

    #[test]
    fn driven_inverter_ring_diverges() {
        let mut s = Schematic::new().with_step_limit(500);
        let vdd = s.add(Component::vdd("vdd"));
        let gnd = s.add(Component::gnd("gnd"));
        let (in1, out1) = add_inverter(&mut s, vdd, gnd, "inv1");
        let (in2, out2) = add_inverter(&mut s, vdd, gnd, "inv2");
        let (in3, out3) = add_inverter(&mut s, vdd, gnd, "inv3");
        let kick = s.add(Component::switch_with_cycle(
            "kick",
            vec![Signal::Float, Signal::High],
        ));
        let probe = s.add(Component::probe("tap"));
        let kick_t = sole(&s, kick);
        let probe_t = sole(&s, probe);
        s.connect(kick_t, in1).unwrap();
        s.connect(out1, in2).unwrap();
        s.connect(out2, in3).unwrap();
        s.connect(out3, probe_t).unwrap();

        // Settle the open chain with a driven head: every stage holds a
        // definite level.
        s.reset();
        s.tick().unwrap();
        s.activate(kick).unwrap(); // float -> high
        s.tick().unwrap();
        assert_eq!(input_of(&s, probe_t), Signal::Low);

        // Close the loop, then let go of the head: the ring holds only
        // driven values that contradict themselves, so it oscillates.
        s.connect(out3, in1).unwrap();
        s.activate(kick).unwrap(); // wraps back to float
        let err = s.tick().unwrap_err();
        assert!(matches!(err, LogicError::Divergence { steps: 500 }));
        assert!(!s.is_settled());
    }

    #[test]
    fn cold_ring_settles_to_contention() {
        // From a cold start the ambiguous-gate rule floods a feedback ring
        // with contention, which is absorbing, so the ring converges.
        let mut s = Schematic::new();
        let vdd = s.add(Component::vdd("vdd"));
        let gnd = s.add(Component::gnd("gnd"));
        let (in1, out1) = add_inverter(&mut s, vdd, gnd, "inv");
        let ring = s.connect(out1, in1).unwrap();
        s.reset();
        s.tick().unwrap();
        assert_eq!(s.net_signal(ring), Some(Signal::Contention));
    }

    #[test]
    fn stale_worklist_entries_are_skipped() {
        let mut s = Schematic::new();
        let a = s.add(Component::switch("a"));
        let b = s.add(Component::switch("b"));
        let at = sole(&s, a);
        let bt = sole(&s, b);
        let net = s.connect(at, bt).unwrap();
        s.reset();
        // remove() rebuilds the net away and ticks with the stale net
        // entry still queued.
        s.remove(b).unwrap();
        assert!(s.net(net).is_none());
        assert!(s.is_settled());
    }
}
