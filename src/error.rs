//! Error types for the logic simulator.
//!
//! This module provides a unified error type [`LogicError`] that covers
//! all error conditions that can occur during schematic editing, invariant
//! validation, and simulation.

use thiserror::Error;

use crate::circuit::{ComponentId, NetId, TerminalId};

/// Result type alias using [`LogicError`].
pub type Result<T> = std::result::Result<T, LogicError>;

/// Unified error type for all simulator operations.
#[derive(Error, Debug)]
pub enum LogicError {
    // ============ Structural Edit Errors ============
    /// Component id does not resolve to a live component
    #[error("Component {id} not found in schematic")]
    ComponentNotFound { id: ComponentId },

    /// Net id does not resolve to a live net
    #[error("Net {id} not found in schematic")]
    NetNotFound { id: NetId },

    /// Terminal name not present on the component
    #[error("Component '{component}' has no terminal named '{name}'")]
    TerminalNotFound { component: String, name: String },

    /// Terminal id points past the component's terminal list
    #[error("Terminal {id} does not exist")]
    TerminalOutOfRange { id: TerminalId },

    /// A single terminal was required but the component exposes several
    #[error("Component '{component}' has {terminals} terminals, expected exactly one")]
    NotSingleTerminal { component: String, terminals: usize },

    /// A connection needs at least two endpoints
    #[error("Connecting requires at least 2 endpoints, got {got}")]
    TooFewEndpoints { got: usize },

    /// Part kind not present in the library
    #[error("Unknown part kind '{kind}'")]
    UnknownPartKind { kind: String },

    /// Part kind registered twice
    #[error("Duplicate part kind '{kind}'")]
    DuplicatePartKind { kind: String },

    /// Boundary marker names inside an aggregate must be unique and non-empty
    #[error("Invalid boundary marker name '{name}' in aggregate '{aggregate}'")]
    InvalidBoundaryName { aggregate: String, name: String },

    // ============ Invariant Violations ============
    /// A terminal's net back-reference disagrees with the net's node set
    #[error("Terminal {terminal} and net {net} disagree about membership")]
    TerminalNetMismatch { terminal: TerminalId, net: NetId },

    /// A net node lists a neighbor that does not list it back
    #[error("Net {net}: edge {from} -> {to} has no reverse edge")]
    AsymmetricEdge { net: NetId, from: usize, to: usize },

    /// A net node lists itself as a neighbor
    #[error("Net {net}: node {node} is its own neighbor")]
    SelfLoop { net: NetId, node: usize },

    /// A net's node graph is not connected
    #[error("Net {net} is disconnected: {unreached} of {nodes} nodes unreachable")]
    DisconnectedNet {
        net: NetId,
        unreached: usize,
        nodes: usize,
    },

    /// A simulated net must anchor at least two terminals
    #[error("Net {net} has {terminals} terminals, needs at least 2")]
    UnderpopulatedNet { net: NetId, terminals: usize },

    /// A net anchors a terminal whose component is gone
    #[error("Net {net} anchors dangling terminal {terminal}")]
    DanglingTerminal { net: NetId, terminal: TerminalId },

    // ============ Simulation Errors ============
    /// The worklist did not drain within the step limit
    #[error("Circuit did not converge within {steps} steps")]
    Divergence { steps: usize },
}

impl LogicError {
    /// Create a terminal-not-found error.
    pub fn terminal_not_found(component: impl Into<String>, name: impl Into<String>) -> Self {
        Self::TerminalNotFound {
            component: component.into(),
            name: name.into(),
        }
    }

    /// Create an unknown-part-kind error.
    pub fn unknown_part_kind(kind: impl Into<String>) -> Self {
        Self::UnknownPartKind { kind: kind.into() }
    }

    /// Create an invalid-boundary-name error.
    pub fn invalid_boundary_name(aggregate: impl Into<String>, name: impl Into<String>) -> Self {
        Self::InvalidBoundaryName {
            aggregate: aggregate.into(),
            name: name.into(),
        }
    }

    /// True for errors raised by `validate()` rather than by an edit.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::TerminalNetMismatch { .. }
                | Self::AsymmetricEdge { .. }
                | Self::SelfLoop { .. }
                | Self::DisconnectedNet { .. }
                | Self::UnderpopulatedNet { .. }
                | Self::DanglingTerminal { .. }
        )
    }
}
