//! §4.1 ingest contract and §4.2 export fix-up.

use tracing::{debug, warn};

use crate::core::IngestError;
use crate::graph::Graph;
use crate::model::{Class, LibraryId, Object, ObjectId, Symbol, SymbolId, TypeCode, Xref, XrefId};

/// One event the scanner feeds to [`Graph::ingest_listing`], per spec §4.1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `display_name` is the object header text before the colon: either a
    /// bare name, or `lib[member]`.
    BeginObject(String),
    /// A symbol-table line: the bare symbol name and its raw type character.
    Symbol { name: String, ty: char },
}

impl Graph {
    /// Ingest one listing's worth of events. `base_name` seeds the synthetic
    /// object fabricated if a `Symbol` event arrives before any
    /// `BeginObject` (§4.1 item 2). `lenient` enables `?`-as-import and
    /// lowercase type-code upcasing (§6.1).
    ///
    /// Multiple listings may be ingested into the same `Graph`; the
    /// watermark that separates default-Application from default-Optional
    /// objects (§4.4 "Driver seeding") is fixed after the *first* call to
    /// this method completes.
    pub fn ingest_listing<I>(&mut self, base_name: &str, events: I, lenient: bool) -> Result<(), IngestError>
    where
        I: IntoIterator<Item = Event>,
    {
        self.current_listing_base = Some(self.interner.intern(base_name));
        for event in events {
            match event {
                Event::BeginObject(display_name) => {
                    self.begin_object(&display_name)?;
                }
                Event::Symbol { name, ty } => {
                    self.symbol_event(&name, ty, lenient)?;
                }
            }
        }
        if self.app_watermark.is_none() {
            self.app_watermark = Some(self.objects.len());
        }
        Ok(())
    }

    /// App-watermark in object-index terms; objects before it default to
    /// `Application`, objects from it onward default to `Optional` (§4.4).
    pub(crate) fn app_watermark(&self) -> usize {
        self.app_watermark.unwrap_or(0)
    }

    /// Final fix-up of the last-begun object, then the dangling-undefineds
    /// pass (§4.1 item 3). Call once, after every listing has been ingested.
    pub fn finish_ingest(&mut self) {
        if let Some(last) = self.current_object.take() {
            self.fixup_exports(last);
        }
        let pod = self.undefined_pod;
        let sym_ids: Vec<SymbolId> = (0..self.symbols.len()).map(SymbolId::new).collect();
        for sym_id in sym_ids {
            let defined = self.symbol(sym_id).is_defined();
            if defined {
                continue;
            }
            let xref_id = XrefId::new(self.xrefs.len());
            self.xrefs.push(Xref {
                sym: sym_id,
                obj: pod,
                weak: false,
            });
            self.objects[pod.index()].exports.push(xref_id);
            self.symbols
                .get_index_mut(sym_id.index())
                .expect("valid SymbolId")
                .1
                .exported_by
                .push(xref_id);
        }
    }

    fn begin_object(&mut self, display_name: &str) -> Result<ObjectId, IngestError> {
        if let Some(prev) = self.current_object.take() {
            self.fixup_exports(prev);
        }

        let trimmed = display_name.trim();
        let (name_part, library_part) = split_display_name(trimmed)?;

        let library = match library_part {
            Some(lib_part) => {
                let lib_name = self.interner.intern(lib_part);
                let member_name = self.interner.intern(name_part);
                if !self.members_seen.insert((lib_name.clone(), member_name.clone())) {
                    return Err(IngestError::DuplicateMember {
                        lib: lib_part.to_string(),
                        member: name_part.to_string(),
                    });
                }
                Some(lib_name)
            }
            None => None,
        };

        let name = self.interner.intern(name_part);
        let obj_id = ObjectId::new(self.objects.len());
        self.objects.push(Object::new(name.clone(), library.clone()));

        if let Some(lib_name) = library {
            let lib_id = self.library_id_or_create(lib_name);
            self.libraries
                .get_index_mut(lib_id.index())
                .expect("valid LibraryId")
                .1
                .members
                .push(obj_id);
        }

        self.current_object = Some(obj_id);
        Ok(obj_id)
    }

    fn library_id_or_create(&mut self, name: crate::core::Name) -> LibraryId {
        if let Some(idx) = self.libraries.get_index_of(&name) {
            LibraryId::new(idx)
        } else {
            let idx = self.libraries.len();
            self.libraries.insert(name.clone(), crate::model::Library::new(name));
            LibraryId::new(idx)
        }
    }

    fn symbol_event(&mut self, name: &str, raw_ty: char, lenient: bool) -> Result<(), IngestError> {
        let ty = TypeCode::parse(raw_ty, lenient).map_err(IngestError::UnknownTypeCode)?;

        let obj_id = match self.current_object {
            Some(id) => id,
            None => {
                let base = self
                    .current_listing_base
                    .clone()
                    .unwrap_or_else(|| self.interner.intern("listing"));
                debug!(listing = %base, "no object begun; fabricating synthetic object");
                self.begin_object(&base)?
            }
        };

        let interned = self.interner.intern(name);
        let sym_id = self.symbol_id_or_create(interned.clone());
        let conflicted = self
            .symbols
            .get_index_mut(sym_id.index())
            .expect("valid SymbolId")
            .1
            .merge_type(ty);
        if conflicted {
            warn!(symbol = %interned, new_type = %ty.as_char(), "conflicting type codes; keeping first-seen");
        }

        let xref_id = XrefId::new(self.xrefs.len());
        self.xrefs.push(Xref {
            sym: sym_id,
            obj: obj_id,
            weak: ty.is_weak(),
        });
        match ty.class() {
            Class::Export => self.objects[obj_id.index()].exports.push(xref_id),
            Class::Import => self.objects[obj_id.index()].imports.push(xref_id),
        }
        Ok(())
    }

    fn symbol_id_or_create(&mut self, name: crate::core::Name) -> SymbolId {
        if let Some(idx) = self.symbols.get_index_of(&name) {
            SymbolId::new(idx)
        } else {
            let idx = self.symbols.len();
            self.symbols.insert(name.clone(), Symbol::new(name));
            SymbolId::new(idx)
        }
    }

    /// §4.2: append every export of `obj` to its symbol's exported-by
    /// chain, in that object's ingest order. Deferred until `obj`'s export
    /// array is done growing.
    fn fixup_exports(&mut self, obj: ObjectId) {
        let export_ids = self.objects[obj.index()].exports.clone();
        for xref_id in export_ids {
            let sym_id = self.xrefs[xref_id.index()].sym;
            self.symbols
                .get_index_mut(sym_id.index())
                .expect("valid SymbolId")
                .1
                .exported_by
                .push(xref_id);
        }
    }
}

/// Split an object header's display name into `(name, library)`. The
/// library/member form is recognized by a trailing `]`: `lib[member]`.
pub(crate) fn split_display_name(display_name: &str) -> Result<(&str, Option<&str>), IngestError> {
    if display_name.is_empty() {
        return Err(IngestError::MalformedHeader(display_name.to_string()));
    }
    if let Some(stripped) = display_name.strip_suffix(']') {
        let open = stripped
            .find('[')
            .ok_or_else(|| IngestError::MalformedHeader(display_name.to_string()))?;
        let lib = &stripped[..open];
        let member = &stripped[open + 1..];
        if lib.is_empty() || member.is_empty() {
            return Err(IngestError::MalformedHeader(display_name.to_string()));
        }
        Ok((member, Some(lib)))
    } else if display_name.contains('[') || display_name.contains(']') {
        Err(IngestError::MalformedHeader(display_name.to_string()))
    } else {
        Ok((display_name, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_name() {
        assert_eq!(split_display_name("A.o").unwrap(), ("A.o", None));
    }

    #[test]
    fn split_archive_member() {
        assert_eq!(split_display_name("libx.a[b.o]").unwrap(), ("b.o", Some("libx.a")));
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        assert!(split_display_name("libx.a[b.o").is_err());
        assert!(split_display_name("libx.a b.o]").is_err());
    }

    #[test]
    fn rejects_empty_member_or_library() {
        assert!(split_display_name("libx.a[]").is_err());
        assert!(split_display_name("[b.o]").is_err());
    }

    #[test]
    fn ingest_simple_object_and_symbols() {
        let mut g = Graph::new();
        g.ingest_listing(
            "app",
            [
                Event::BeginObject("A.o".into()),
                Event::Symbol { name: "main".into(), ty: 'T' },
                Event::Symbol { name: "foo".into(), ty: 'U' },
            ],
            false,
        )
        .unwrap();
        g.finish_ingest();

        let sym_main = g.find_symbol("main").unwrap();
        assert!(g.symbol(sym_main).is_defined());
        let sym_foo = g.find_symbol("foo").unwrap();
        assert!(!g.symbol(sym_foo).is_defined());
        // foo should now be exported by the undefined pod.
        let pod = g.undefined_pod();
        assert_eq!(g.object(pod).exports().len(), 1);
    }

    #[test]
    fn duplicate_archive_member_rejected() {
        let mut g = Graph::new();
        let err = g
            .ingest_listing(
                "lib",
                [
                    Event::BeginObject("libx.a[b.o]".into()),
                    Event::BeginObject("libx.a[b.o]".into()),
                ],
                false,
            )
            .unwrap_err();
        assert!(matches!(err, IngestError::DuplicateMember { .. }));
    }

    #[test]
    fn unknown_type_code_rejected_outside_lenient() {
        let mut g = Graph::new();
        let err = g
            .ingest_listing(
                "app",
                [
                    Event::BeginObject("A.o".into()),
                    Event::Symbol { name: "x".into(), ty: '?' },
                ],
                false,
            )
            .unwrap_err();
        assert!(matches!(err, IngestError::UnknownTypeCode('?')));
    }

    #[test]
    fn symbol_before_any_begin_object_fabricates_synthetic() {
        let mut g = Graph::new();
        g.ingest_listing("app", [Event::Symbol { name: "main".into(), ty: 'T' }], false)
            .unwrap();
        // exactly one real object besides the undefined pod.
        assert_eq!(g.object_count(), 2);
    }
}
