//! §4.6 undefined-pruner.

use rustc_hash::FxHashSet;
use tracing::warn;

use crate::graph::{Graph, UnlinkOutcome};
use crate::model::ObjectId;

impl Graph {
    /// For every symbol defined nowhere (the undefined pod's exports),
    /// repeatedly un-link its importers until either none remain or the
    /// remaining ones all reach the Application set (and so are rejected).
    /// Rejections are tolerated, not retried forever: §4.6's rationale is
    /// that Application-set code is assumed resolvable by startup files or
    /// linker scripts this tool cannot see.
    pub fn prune_undefined(&mut self) {
        let pod = self.undefined_pod();
        let undefined_exports = self.object(pod).exports().to_vec();
        for xref_id in undefined_exports {
            let sym_id = self.xref(xref_id).sym;
            let mut rejected: FxHashSet<ObjectId> = FxHashSet::default();
            loop {
                let next = self
                    .symbol(sym_id)
                    .imported_from()
                    .iter()
                    .map(|&imp_id| self.xref(imp_id).obj)
                    .find(|obj| !rejected.contains(obj));
                let importer = match next {
                    Some(obj) => obj,
                    None => break,
                };
                match self.unlink_obj(importer) {
                    UnlinkOutcome::Removed(_) => {}
                    UnlinkOutcome::Rejected => {
                        warn!(
                            symbol = %self.symbol_name(sym_id),
                            object = %self.object(importer).display_name(),
                            "leaving unresolved: application-set code depends on this undefined symbol"
                        );
                        rejected.insert(importer);
                    }
                    UnlinkOutcome::NotFound => {
                        rejected.insert(importer);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ingest::Event;
    use crate::graph::linker::AppSeed;
    use crate::model::LinkKind;

    #[test]
    fn scenario_two_rejected_removal_leaves_sets_unchanged() {
        // A.o imports foo, provided by b.o, which imports bar — never
        // defined. The pruner tries to unlink b.o but A.o (Application)
        // depends on foo, so the removal is rejected and nothing changes.
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
        g.ingest_listing(
            "lib",
            [
                Event::BeginObject("libx.a[b.o]".into()),
                Event::Symbol { name: "foo".into(), ty: 'T' },
                Event::Symbol { name: "bar".into(), ty: 'U' },
            ],
            false,
        )
        .unwrap();
        g.finish_ingest();
        g.run_linker(AppSeed::Watermark, false).unwrap();

        let before = g.link_set(LinkKind::Application);
        g.prune_undefined();
        let after = g.link_set(LinkKind::Application);
        assert_eq!(before, after);
    }

    #[test]
    fn scenario_three_pruner_removes_unreachable_undefined_importer() {
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
        g.ingest_listing(
            "lib",
            [
                Event::BeginObject("libx.a[b.o]".into()),
                Event::Symbol { name: "foo".into(), ty: 'T' },
                Event::BeginObject("libx.a[d.o]".into()),
                Event::Symbol { name: "helper".into(), ty: 'T' },
                Event::Symbol { name: "ghost".into(), ty: 'U' },
            ],
            false,
        )
        .unwrap();
        g.finish_ingest();
        g.run_linker(AppSeed::Watermark, false).unwrap();

        let d = g
            .objects()
            .find(|(_, o)| o.display_name() == "libx.a[d.o]")
            .unwrap()
            .0;
        assert_eq!(g.object(d).anchor(), Some(LinkKind::Optional));

        g.prune_undefined();
        assert_eq!(g.object(d).anchor(), None);
    }
}
