//! The [`Library`] record, used only for disambiguated human-facing lookup.

use crate::core::Name;
use crate::model::object::ObjectId;

/// Arena index for a [`Library`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryId(u32);

impl LibraryId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An originating archive, grouping together the objects ingested from it.
#[derive(Debug, Clone)]
pub struct Library {
    pub name: Name,
    pub(crate) members: Vec<ObjectId>,
}

impl Library {
    pub(crate) fn new(name: Name) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[ObjectId] {
        &self.members
    }
}
