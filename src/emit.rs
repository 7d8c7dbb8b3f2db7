//! Linker-script emission (§6.3).
//!
//! Not part of the core per §1 ("the CLI/driver ... the output writers"),
//! but small and deterministic enough to live in the library so it can be
//! unit-tested directly rather than only through the CLI binary.

use std::io::{self, Write};

use crate::graph::Graph;
use crate::model::LinkKind;

/// Write the linker script for `graph`: Application's section first (unless
/// `suppress_application`), then Optional's. Each section is a banner
/// comment followed by, per object in set-membership order, a comment
/// naming the object and one `EXTERN( <symbol> )` per export.
pub fn write_linker_script(graph: &Graph, w: &mut impl Write, suppress_application: bool) -> io::Result<()> {
    if !suppress_application {
        write_section(graph, w, LinkKind::Application)?;
    }
    write_section(graph, w, LinkKind::Optional)
}

fn write_section(graph: &Graph, w: &mut impl Write, kind: LinkKind) -> io::Result<()> {
    writeln!(w, "/* {} */", kind.label())?;
    for obj_id in graph.link_set(kind) {
        let obj = graph.object(obj_id);
        writeln!(w, "/* {} */", obj.display_name())?;
        for &xref_id in obj.exports() {
            let sym_name = graph.symbol_name(graph.xref(xref_id).sym);
            writeln!(w, "EXTERN( {sym_name} )")?;
        }
    }
    Ok(())
}
