//! The [`Symbol`] node and its type-code classification.

use crate::core::Name;
use crate::model::xref::XrefId;

/// Arena index for a [`Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether an occurrence of a symbol defines it or references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Export,
    Import,
}

/// A single-character symbol-table type code, normalized to uppercase in
/// lenient mode. Carries only what the rest of the system needs to know
/// about a code: its export/import class, and whether it marks a weak
/// definition or a common symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeCode(char);

const EXPORT_CODES: &[char] = &['T', 'D', 'B', 'R', 'G', 'S', 'A', 'C', 'W', 'V'];

impl TypeCode {
    /// Parse a raw type character. In lenient mode, lowercase is upcased
    /// before classification and `?` is accepted as an import marker;
    /// outside lenient mode an unrecognized code is rejected.
    pub fn parse(raw: char, lenient: bool) -> Result<Self, char> {
        let c = if lenient { raw.to_ascii_uppercase() } else { raw };
        if EXPORT_CODES.contains(&c) || c == 'U' || (lenient && c == '?') {
            Ok(Self(c))
        } else {
            Err(raw)
        }
    }

    pub fn class(self) -> Class {
        match self.0 {
            'U' | '?' => Class::Import,
            _ => Class::Export,
        }
    }

    pub fn is_weak(self) -> bool {
        matches!(self.0, 'W' | 'V')
    }

    pub fn is_common(self) -> bool {
        self.0 == 'C'
    }

    pub fn is_undefined(self) -> bool {
        self.0 == 'U'
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

/// A linker name: a symbol table entry with an optional type and the two
/// chains of cross-reference edges that define and use it.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: Name,
    pub(crate) ty: Option<TypeCode>,
    /// Definition sites, in ingest order. The first entry is the one that
    /// traversal follows (see [`crate::graph::walker`]).
    pub(crate) exported_by: Vec<XrefId>,
    /// Use sites, populated during linking (not at ingest).
    pub(crate) imported_from: Vec<XrefId>,
}

impl Symbol {
    pub(crate) fn new(name: Name) -> Self {
        Self {
            name,
            ty: None,
            exported_by: Vec::new(),
            imported_from: Vec::new(),
        }
    }

    pub fn ty(&self) -> Option<TypeCode> {
        self.ty
    }

    pub fn exported_by(&self) -> &[XrefId] {
        &self.exported_by
    }

    pub fn imported_from(&self) -> &[XrefId] {
        &self.imported_from
    }

    /// A symbol is "dangling" iff no object defines it — the condition the
    /// undefined pod's exports enumerate exhaustively.
    pub fn is_defined(&self) -> bool {
        !self.exported_by.is_empty()
    }

    /// Merge a newly observed type into this symbol's recorded type,
    /// returning `true` if the merge is a genuine, warning-worthy
    /// disagreement between two non-`U` codes.
    pub(crate) fn merge_type(&mut self, new_ty: TypeCode) -> bool {
        match self.ty {
            None => {
                self.ty = Some(new_ty);
                false
            }
            Some(existing) => {
                if existing.is_undefined() && !new_ty.is_undefined() {
                    self.ty = Some(new_ty);
                    false
                } else if !existing.is_undefined() && !new_ty.is_undefined() && existing.0 != new_ty.0 {
                    true
                } else {
                    false
                }
            }
        }
    }
}
