//! Listing-file scanner (§6.1, §10.7).
//!
//! The core graph treats the scanner as an external collaborator specified
//! only by the `(BeginObject | Symbol)` event stream it feeds to
//! [`Graph::ingest_listing`](crate::graph::Graph::ingest_listing). This is a
//! small hand-written line parser — the grammar is only two line shapes, not
//! enough to warrant a lexer-generator dependency.
//!
//! Line grammar (§6.1, whitespace-tolerant):
//! - Object header: `<library-or-file-name>[[<member>]]:` (colon mandatory).
//! - Symbol line: `<name> <type-char> [<value> <size>]` (trailing fields ignored).

use thiserror::Error;

use crate::graph::Event;

/// A malformed listing line, citing the file and 1-based line number per
/// §7's "abort with diagnostic citing file and line".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{file}:{line}: malformed listing line: {text:?}")]
pub struct ScanError {
    pub file: String,
    pub line: usize,
    pub text: String,
}

/// Scan one listing file's text into a stream of ingest events.
///
/// `file` names the listing for diagnostics only; it is not the same as the
/// `base_name` passed to `ingest_listing` (the synthetic-object fallback
/// name), though callers typically derive one from the other.
pub fn scan_listing(file: &str, text: &str) -> Result<Vec<Event>, ScanError> {
    let mut events = Vec::with_capacity(text.lines().count());
    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_suffix(':') {
            events.push(Event::BeginObject(header.trim().to_string()));
            continue;
        }

        let err = || ScanError {
            file: file.to_string(),
            line: idx + 1,
            text: raw_line.to_string(),
        };

        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or_else(err)?;
        let ty_token = tokens.next().ok_or_else(err)?;
        let mut ty_chars = ty_token.chars();
        let ty = ty_chars.next().ok_or_else(err)?;
        if ty_chars.next().is_some() {
            return Err(err());
        }
        // value/size fields, if present, are ignored per the grammar.
        events.push(Event::Symbol {
            name: name.to_string(),
            ty,
        });
    }
    Ok(events)
}

/// Derive the synthetic-object base name `ingest_listing` wants from a
/// listing file's path: its file stem.
pub fn listing_base_name(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
