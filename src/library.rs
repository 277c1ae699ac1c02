//! The part library: a registration table of instantiable component kinds.
//!
//! Editors use this to list "addable" parts and to build components by
//! kind name. The table is built explicitly at startup and passed by
//! reference wherever it is needed; there is no global registry.

use crate::components::{gates, Component};
use crate::error::{LogicError, Result};

/// One instantiable part kind.
pub struct PartEntry {
    /// Kind name used for lookup ("vdd", "nmos", "nand", ...).
    pub kind: &'static str,
    /// Constructor; the argument becomes the instance name.
    pub build: fn(String) -> Result<Component>,
}

/// An ordered table of part kinds.
pub struct PartLibrary {
    entries: Vec<PartEntry>,
}

impl PartLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The built-in parts: primitives plus the standard gate set.
    pub fn standard() -> Self {
        let mut library = Self::new();
        let entries = [
            PartEntry {
                kind: "vdd",
                build: |name| Ok(Component::vdd(name)),
            },
            PartEntry {
                kind: "gnd",
                build: |name| Ok(Component::gnd(name)),
            },
            PartEntry {
                kind: "nmos",
                build: |name| Ok(Component::nmos(name)),
            },
            PartEntry {
                kind: "pmos",
                build: |name| Ok(Component::pmos(name)),
            },
            PartEntry {
                kind: "switch",
                build: |name| Ok(Component::switch(name)),
            },
            PartEntry {
                kind: "probe",
                build: |name| Ok(Component::probe(name)),
            },
            PartEntry {
                kind: "io",
                build: |name| Ok(Component::io(name)),
            },
            PartEntry {
                kind: "not",
                build: |name| gates::not_gate(name),
            },
            PartEntry {
                kind: "nand",
                build: |name| gates::nand_gate(name),
            },
            PartEntry {
                kind: "nor",
                build: |name| gates::nor_gate(name),
            },
            PartEntry {
                kind: "and",
                build: |name| gates::and_gate(name),
            },
            PartEntry {
                kind: "or",
                build: |name| gates::or_gate(name),
            },
            PartEntry {
                kind: "xor",
                build: |name| gates::xor_gate(name),
            },
            PartEntry {
                kind: "xnor",
                build: |name| gates::xnor_gate(name),
            },
        ];
        for entry in entries {
            // Kinds are distinct by construction.
            let _ = library.register(entry);
        }
        library
    }

    /// Kind names in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    /// Register a new kind. Duplicates are rejected.
    pub fn register(&mut self, entry: PartEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.kind == entry.kind) {
            return Err(LogicError::DuplicatePartKind {
                kind: entry.kind.to_string(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Build a component of the given kind with the given instance name.
    pub fn build(&self, kind: &str, name: impl Into<String>) -> Result<Component> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.kind == kind)
            .ok_or_else(|| LogicError::unknown_part_kind(kind))?;
        (entry.build)(name.into())
    }
}

impl Default for PartLibrary {
    fn default() -> Self {
        Self::standard()
    }
}
