//! §4.7 read-only query/report contract: `trackSym`, `trackObj`,
//! `checkMultipleDefs`, `fileListFind`.
//!
//! These return plain data, not formatted text, so the CLI's printers (and
//! the interactive query loop) are free to render them however each command
//! needs without the report functions knowing anything about output format.

use rustc_hash::FxHashSet;

use crate::graph::ingest::split_display_name;
use crate::graph::{Direction, Graph};
use crate::model::{ObjectId, SymbolId};

/// `trackSym(s)` result (§4.7).
#[derive(Debug, Clone)]
pub struct SymbolTrace {
    pub symbol: String,
    /// Every defining object, in exported-by (ingest) order, with its weak flag.
    pub definitions: Vec<(String, bool)>,
    /// The `IMPORTS`-direction, `BUILD_LIST` closure of the first definer.
    pub forward_closure: Vec<String>,
    /// For each importer, the `EXPORTS`-direction closure from it.
    pub backward_closures: Vec<(String, Vec<String>)>,
}

/// `trackObj(f)` result (§4.7).
#[derive(Debug, Clone)]
pub struct ObjectTrace {
    pub object: String,
    pub exports: Vec<String>,
    pub imports: Vec<String>,
    pub exports_closure: Vec<String>,
    pub imports_closure: Vec<String>,
}

/// One name clash reported by `checkMultipleDefs` (§4.7).
#[derive(Debug, Clone)]
pub struct MultipleDef {
    pub symbol: String,
    pub definers: Vec<String>,
}

/// One match returned by `fileListFind` (§4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListMatch {
    pub object: ObjectId,
    pub name: String,
    pub library: Option<String>,
}

impl Graph {
    pub fn track_symbol(&self, sym_id: SymbolId) -> SymbolTrace {
        let sym = self.symbol(sym_id);
        let definitions: Vec<(String, bool)> = sym
            .exported_by()
            .iter()
            .map(|&xid| {
                let xref = self.xref(xid);
                (self.object(xref.obj).display_name(), xref.weak)
            })
            .collect();

        let forward_closure = sym
            .exported_by()
            .first()
            .map(|&xid| {
                let first_definer = self.xref(xid).obj;
                self.walk_build_list(first_definer, Direction::Imports)
                    .iter()
                    .map(|&id| self.object(id).display_name())
                    .collect()
            })
            .unwrap_or_default();

        let backward_closures = sym
            .imported_from()
            .iter()
            .map(|&xid| {
                let importer = self.xref(xid).obj;
                let closure = self
                    .walk_build_list(importer, Direction::Exports)
                    .iter()
                    .map(|&id| self.object(id).display_name())
                    .collect();
                (self.object(importer).display_name(), closure)
            })
            .collect();

        SymbolTrace {
            symbol: self.symbol_name(sym_id).to_string(),
            definitions,
            forward_closure,
            backward_closures,
        }
    }

    pub fn track_object(&self, obj_id: ObjectId) -> ObjectTrace {
        let obj = self.object(obj_id);
        let exports = obj
            .exports()
            .iter()
            .map(|&xid| self.symbol_name(self.xref(xid).sym).to_string())
            .collect();
        let imports = obj
            .imports()
            .iter()
            .map(|&xid| self.symbol_name(self.xref(xid).sym).to_string())
            .collect();
        let exports_closure = self
            .walk_build_list(obj_id, Direction::Exports)
            .iter()
            .map(|&id| self.object(id).display_name())
            .collect();
        let imports_closure = self
            .walk_build_list(obj_id, Direction::Imports)
            .iter()
            .map(|&id| self.object(id).display_name())
            .collect();

        ObjectTrace {
            object: obj.display_name(),
            exports,
            imports,
            exports_closure,
            imports_closure,
        }
    }

    /// §4.7: for every object in `set`, for every exported symbol defined
    /// strongly (non-weak) by more than one object and not of type `C`
    /// (common), report the clash. A weak definition may be silently
    /// overridden by a strong one (GLOSSARY, "Weak"), so it never
    /// contributes to the clash count — scenario 6 in §8 pins this down: a
    /// weak `p.o` and a strong `q.o` definer is not a clash. Each clashing
    /// symbol is reported once even if more than one of its definers is in
    /// `set`.
    pub fn check_multiple_defs(&self, set: &[ObjectId]) -> Vec<MultipleDef> {
        let mut seen: FxHashSet<SymbolId> = FxHashSet::default();
        let mut out = Vec::new();
        for &obj_id in set {
            for &xid in self.object(obj_id).exports() {
                let sym_id = self.xref(xid).sym;
                if !seen.insert(sym_id) {
                    continue;
                }
                let sym = self.symbol(sym_id);
                let is_common = sym.ty().is_some_and(|t| t.is_common());
                let strong_count = sym.exported_by().iter().filter(|&&xid| !self.xref(xid).weak).count();
                if is_common || strong_count <= 1 {
                    continue;
                }
                let definers = sym
                    .exported_by()
                    .iter()
                    .map(|&xid| self.object(self.xref(xid).obj).display_name())
                    .collect();
                out.push(MultipleDef {
                    symbol: self.symbol_name(sym_id).to_string(),
                    definers,
                });
            }
        }
        out
    }

    /// §4.7: parse `[lib[member]]` and return every matching object, sorted
    /// by `(name, library)`. Duplicates are permitted and surfaced so the
    /// caller can report ambiguity rather than guess.
    pub fn file_list_find(&self, display_name: &str) -> Vec<FileListMatch> {
        let trimmed = display_name.trim();
        let (name_filter, lib_filter) = split_display_name(trimmed).unwrap_or((trimmed, None));

        let mut matches: Vec<FileListMatch> = self
            .objects()
            .filter(|(_, o)| o.name.as_ref() == name_filter)
            .filter(|(_, o)| match lib_filter {
                Some(lib) => o.library.as_deref() == Some(lib),
                None => true,
            })
            .map(|(id, o)| FileListMatch {
                object: id,
                name: o.name.to_string(),
                library: o.library.as_ref().map(|s| s.to_string()),
            })
            .collect();
        matches.sort_by(|a, b| (&a.name, &a.library).cmp(&(&b.name, &b.library)));
        matches
    }
}
