//! [`Graph`]: the single analyzer handle that owns every arena and drives
//! every algorithm in this crate (spec §9's design note — "package global
//! driver state as a single analyzer handle passed explicitly through every
//! entry point").
//!
//! The algorithms themselves are split across sibling modules, each
//! contributing `impl Graph` blocks so that every entry point shares one
//! owner for the arenas and link-set chains:
//!
//! - [`ingest`] — §4.1/§4.2, event ingestion and export fix-up.
//! - [`walker`] — §4.3, the direction/mode-parameterized traversal.
//! - [`linker`] — §4.4, link-set construction.
//! - [`unlinker`] — §4.5, transitive removal.
//! - [`pruner`] — §4.6, the undefined-symbol pruning loop.
//! - [`report`] — §4.7, the read-only query/report contract.

mod ingest;
mod invariants;
mod linker;
mod pruner;
mod report;
mod unlinker;
mod walker;

pub use ingest::Event;
pub use linker::AppSeed;
pub use report::{FileListMatch, MultipleDef, ObjectTrace, SymbolTrace};
pub use unlinker::UnlinkOutcome;
pub use walker::Direction;

use rustc_hash::FxHashSet;

use crate::core::{Interner, Name};
use crate::model::{Library, LibraryId, LinkKind, Object, ObjectId, Symbol, SymbolId, Xref, XrefId};

use indexmap::IndexMap;

/// Name the scanner fabricates for an object that is never explicitly begun
/// — the undefined pod. Not a legal listing identifier, so it can never
/// collide with a real object or archive member.
const UNDEFINED_POD_NAME: &str = "*UND*";

/// The symbol/object graph plus the three link-set chains threaded through
/// it (spec §§2–3). Every algorithm in this crate is a method on `Graph`.
pub struct Graph {
    interner: Interner,
    objects: Vec<Object>,
    symbols: IndexMap<Name, Symbol>,
    libraries: IndexMap<Name, Library>,
    xrefs: Vec<Xref>,
    /// `(library, member)` pairs already begun, for §4.1's duplicate check.
    members_seen: FxHashSet<(Name, Name)>,
    /// Chain heads, one per [`LinkKind`].
    link_heads: [Option<ObjectId>; 3],
    /// The synthetic sentinel object whose exports enumerate every symbol
    /// defined nowhere real (spec §3, "Undefined-pod").
    undefined_pod: ObjectId,
    /// The object most recently begun by [`Graph::begin_object`], still
    /// accumulating exports/imports until the next `BeginObject` or
    /// [`Graph::finish_ingest`] triggers its export fix-up.
    current_object: Option<ObjectId>,
    /// Base name of the listing currently being ingested, used to fabricate
    /// a synthetic object if a `Symbol` event arrives with none begun.
    current_listing_base: Option<Name>,
    /// Object count after the first listing completed ingestion — the
    /// watermark separating default-Application from default-Optional
    /// seeds in [`linker::AppSeed::Watermark`] mode.
    app_watermark: Option<usize>,
}

impl Graph {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let pod_name = interner.intern(UNDEFINED_POD_NAME);
        let mut objects = Vec::new();
        let pod_id = ObjectId::new(objects.len());
        let mut pod = Object::new(pod_name, None);
        pod.anchor = Some(LinkKind::Undefined);
        objects.push(pod);

        let mut link_heads = [None, None, None];
        link_heads[LinkKind::Undefined.as_index()] = Some(pod_id);

        Self {
            interner,
            objects,
            symbols: IndexMap::new(),
            libraries: IndexMap::new(),
            xrefs: Vec::new(),
            members_seen: FxHashSet::default(),
            link_heads,
            undefined_pod: pod_id,
            current_object: None,
            current_listing_base: None,
            app_watermark: None,
        }
    }

    pub fn undefined_pod(&self) -> ObjectId {
        self.undefined_pod
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.symbols.get_index(id.index()).expect("valid SymbolId").1
    }

    pub fn symbol_name(&self, id: SymbolId) -> &Name {
        self.symbols.get_index(id.index()).expect("valid SymbolId").0
    }

    pub fn xref(&self, id: XrefId) -> Xref {
        self.xrefs[id.index()]
    }

    pub fn library(&self, id: LibraryId) -> &Library {
        self.libraries.get_index(id.index()).expect("valid LibraryId").1
    }

    /// All objects, in ingest order, including the undefined pod at index 0.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId::new(i), o))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn find_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get_index_of(name).map(SymbolId::new)
    }

    /// All symbols, in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = (&Name, &Symbol)> {
        self.symbols.iter()
    }

    pub fn libraries(&self) -> impl Iterator<Item = (LibraryId, &Library)> {
        self.libraries
            .iter()
            .enumerate()
            .map(|(i, (_, lib))| (LibraryId::new(i), lib))
    }

    /// Objects currently anchored to `kind`, head first — i.e. in the order
    /// produced by [`linker`]'s chain prepends.
    pub fn link_set(&self, kind: LinkKind) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut cur = self.link_heads[kind.as_index()];
        while let Some(obj_id) = cur {
            out.push(obj_id);
            cur = self.objects[obj_id.index()].link_next;
        }
        out
    }

    fn link_head_mut(&mut self, kind: LinkKind) -> &mut Option<ObjectId> {
        &mut self.link_heads[kind.as_index()]
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkKind {
    fn as_index(self) -> usize {
        match self {
            LinkKind::Application => 0,
            LinkKind::Optional => 1,
            LinkKind::Undefined => 2,
        }
    }
}
