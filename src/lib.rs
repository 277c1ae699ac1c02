//! # Logicsim Core
//!
//! A four-valued digital logic circuit simulator.
//!
//! This library provides:
//! - A signal model with an explicit contention state
//!   (high, low, float, contention)
//! - An editable schematic of components wired on undirected nets
//! - A worklist-driven fixpoint engine that settles a circuit after any
//!   edit or user action, with divergence detection for oscillating rings
//! - Hierarchical modules: a whole schematic wrapped as one component,
//!   down to transistor-level gate implementations (NOT through XNOR)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Signals, nets, the schematic and the propagation engine
//! - [`components`] - Device models (sources, transistors, switches,
//!   probes, aggregates) and the gate library
//! - [`library`] - The registration table of instantiable part kinds
//! - [`console`] - Interactive front-end (CLI only)
//!
//! ## Usage
//!
//! ```
//! use logicsim_core::components::Component;
//! use logicsim_core::{Schematic, Signal};
//!
//! let mut schematic = Schematic::new();
//! let vdd = schematic.add(Component::vdd("vdd"));
//! let probe = schematic.add(Component::probe("p"));
//! let vdd_t = schematic.sole_terminal(vdd)?;
//! let probe_t = schematic.sole_terminal(probe)?;
//! schematic.connect(vdd_t, probe_t)?;
//!
//! schematic.reset();
//! schematic.tick()?;
//! assert_eq!(schematic.terminal(probe_t).unwrap().input(), Signal::High);
//! # Ok::<(), logicsim_core::LogicError>(())
//! ```
//!
//! ## Simulation Method
//!
//! A single deduplicated FIFO worklist holds pending components and nets.
//! Popping a net recomputes each attached terminal's input from the
//! outputs of every *other* terminal on that net (so a driver never hears
//! itself) and enqueues the owners of changed inputs; popping a component
//! runs its pure input-to-output update and enqueues the nets its changed
//! outputs drive. The circuit is settled when the worklist drains; a tick
//! that exceeds its step limit reports divergence instead of looping.
//! Aggregate components run the same algorithm recursively on their inner
//! schematic.

pub mod circuit;
pub mod components;
pub mod error;
pub mod library;

#[cfg(feature = "cli")]
pub mod console;

// Re-export main types for convenience
pub use circuit::{Schematic, Signal, DEFAULT_STEP_LIMIT};
pub use error::{LogicError, Result};
pub use library::PartLibrary;
