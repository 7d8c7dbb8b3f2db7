//! The [`Object`] node: one archive member or standalone compiled unit.

use crate::core::Name;
use crate::model::linkset::LinkKind;
use crate::model::xref::XrefId;

/// Arena index for an [`Object`]. Stable for the lifetime of the owning
/// [`Graph`](crate::graph::Graph) — objects are created during ingest and
/// never destroyed, only evicted from their link set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One compiled translation unit: an archive member, or a standalone object
/// ingested without a library qualifier.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: Name,
    pub library: Option<Name>,
    pub(crate) exports: Vec<XrefId>,
    pub(crate) imports: Vec<XrefId>,
    /// Which link set this object currently belongs to, if any.
    pub(crate) anchor: Option<LinkKind>,
    /// Successor in `anchor`'s singly-linked chain.
    pub(crate) link_next: Option<ObjectId>,
}

impl Object {
    pub(crate) fn new(name: Name, library: Option<Name>) -> Self {
        Self {
            name,
            library,
            exports: Vec::new(),
            imports: Vec::new(),
            anchor: None,
            link_next: None,
        }
    }

    pub fn exports(&self) -> &[XrefId] {
        &self.exports
    }

    pub fn imports(&self) -> &[XrefId] {
        &self.imports
    }

    pub fn anchor(&self) -> Option<LinkKind> {
        self.anchor
    }

    /// Display name in `lib[member]` / `name` form, matching the ingest
    /// grammar's object header.
    pub fn display_name(&self) -> String {
        match &self.library {
            Some(lib) => format!("{lib}[{}]", self.name),
            None => self.name.to_string(),
        }
    }
}
