//! `objlink`: an object-file dependency analyzer.
//!
//! Given symbol listings produced by a standard symbol-table dumper, this
//! crate builds a global database of object files and the symbols each
//! exports and imports, computes the *Application* and *Optional* link
//! sets, prunes objects whose transitive imports cannot be resolved, and
//! exposes either the linker-script view of the result or the interactive
//! trace/diagnostic queries over it.
//!
//! Module layout, dependency order lowest first:
//!
//! ```text
//! scanner → graph (ingest → walker → linker → unlinker → pruner → report)
//!   → model (object, symbol, xref, library, linkset) → core (intern, error)
//! ```
//!
//! The CLI/driver — option parsing, file I/O, log routing, the interactive
//! REPL, and the output writers — is the out-of-scope collaborator from
//! the original design; it lives in `src/bin/objlink.rs` as a thin
//! consumer of this library's public contract.

pub mod core;
pub mod emit;
pub mod graph;
pub mod model;
pub mod scanner;

pub use core::{AnalysisError, IngestError, Interner, Name};
pub use emit::write_linker_script;
pub use graph::{AppSeed, Direction, Event, FileListMatch, Graph, MultipleDef, ObjectTrace, SymbolTrace, UnlinkOutcome};
pub use model::{Class, Library, LibraryId, LinkKind, Object, ObjectId, Symbol, SymbolId, TypeCode, Xref, XrefId};
pub use scanner::{scan_listing, ScanError};
