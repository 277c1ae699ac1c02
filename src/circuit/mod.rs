//! Schematic representation and the propagation engine.
//!
//! This module provides the core data model: four-valued [`Signal`]s,
//! undirected [`Net`] topology, and the [`Schematic`] that owns components
//! and nets and drives the worklist fixpoint algorithm.

mod net;
mod schematic;
mod signal;
mod types;
mod validate;

pub use net::{Net, NetNode, NodeAnchor};
pub use schematic::{Schematic, DEFAULT_STEP_LIMIT};
pub use signal::Signal;
pub use types::*;
pub use validate::validate_schematic;
