//! Error types for graph construction and analysis.

use thiserror::Error;

/// Fatal errors raised while attributing a single ingest event
/// ([`BeginObject`](crate::graph::Graph::begin_object) /
/// [`Symbol`](crate::graph::Graph::symbol)) to the graph.
///
/// These correspond to malformed input that the ingest contract itself can
/// detect, independent of how the bytes were scanned off disk.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The object header's library/member bracket form was unbalanced or empty.
    #[error("malformed object header {0:?}")]
    MalformedHeader(String),

    /// A symbol line carried a type character outside `{T,D,B,R,G,S,A,C,W,V,U,?}`
    /// (or `?` outside lenient mode).
    #[error("unrecognized symbol type code {0:?}")]
    UnknownTypeCode(char),

    /// The same `(library, member)` pair was begun twice.
    #[error("duplicate archive member {lib}[{member}]")]
    DuplicateMember { lib: String, member: String },
}

/// Fatal errors raised above the ingest layer: seeding the linker from an
/// undefined application symbol, or closing over a graph invariant that
/// construction should have guaranteed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// `-A <sym>` named a symbol with no (real) definition site.
    #[error("application seed symbol `{0}` has no definition")]
    UndefinedAppSymbol(String),

    /// A back-pointer or chain invariant the graph is supposed to maintain
    /// did not hold. Always a programming error, never a user-input error.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}
