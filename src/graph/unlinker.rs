//! §4.5 un-linker: transitive removal with Application-set protection.

use tracing::{info, warn};

use crate::graph::{Direction, Graph};
use crate::model::{LinkKind, ObjectId};

/// Result of [`Graph::unlink_obj`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlinkOutcome {
    /// `f` and the listed closure (head first, in discovery order) were
    /// removed from their link sets.
    Removed(Vec<ObjectId>),
    /// The closure from `f` reached an Application-set object; nothing was
    /// mutated.
    Rejected,
    /// `f` was not currently anchored (already removed, or never linked).
    /// A repeat call against the same object is idempotent and returns this.
    NotFound,
}

impl Graph {
    /// §4.5: remove `f` and every object transitively depending on it via
    /// the `EXPORTS` direction, unless that closure reaches an
    /// Application-set object.
    pub fn unlink_obj(&mut self, f: ObjectId) -> UnlinkOutcome {
        if self.object(f).anchor().is_none() {
            return UnlinkOutcome::NotFound;
        }

        let closure = self.walk_build_list(f, Direction::Exports);
        let rejected = closure
            .iter()
            .any(|&g| self.object(g).anchor() == Some(LinkKind::Application));
        if rejected {
            warn!(
                object = %self.object(f).display_name(),
                "unlink rejected: closure reaches an application-set object"
            );
            return UnlinkOutcome::Rejected;
        }

        for &g in &closure {
            let import_ids = self.object(g).imports().to_vec();
            for imp_id in import_ids {
                let sym_id = self.xref(imp_id).sym;
                let (_, sym) = self.symbols.get_index_mut(sym_id.index()).expect("valid SymbolId");
                if let Some(pos) = sym.imported_from.iter().position(|&x| x == imp_id) {
                    sym.imported_from.remove(pos);
                }
            }
            self.remove_from_chain(g);
            self.objects[g.index()].anchor = None;
            self.objects[g.index()].link_next = None;
        }

        info!(
            root = %self.object(f).display_name(),
            count = closure.len(),
            "unlinked object and its dependent closure"
        );
        UnlinkOutcome::Removed(closure)
    }

    fn remove_from_chain(&mut self, g: ObjectId) {
        let kind = self.object(g).anchor().expect("object must be anchored to splice out");
        let mut cur = self.link_heads[kind.as_index()];
        let mut prev: Option<ObjectId> = None;
        while let Some(node) = cur {
            if node == g {
                let next = self.objects[node.index()].link_next;
                match prev {
                    Some(p) => self.objects[p.index()].link_next = next,
                    None => self.link_heads[kind.as_index()] = next,
                }
                return;
            }
            prev = Some(node);
            cur = self.objects[node.index()].link_next;
        }
        unreachable!("object missing from its own anchor chain — invariant violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ingest::Event;
    use crate::graph::linker::AppSeed;

    fn scenario_three() -> Graph {
        // A.o -> foo (b.o) -> bar (c.o); d.o exports unused `helper`,
        // imports missing `ghost`.
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
                Event::BeginObject("libx.a[c.o]".into()),
                Event::Symbol { name: "bar".into(), ty: 'T' },
                Event::BeginObject("libx.a[d.o]".into()),
                Event::Symbol { name: "helper".into(), ty: 'T' },
                Event::Symbol { name: "ghost".into(), ty: 'U' },
            ],
            false,
        )
        .unwrap();
        g.finish_ingest();
        g.run_linker(AppSeed::Watermark, false).unwrap();
        g
    }

    #[test]
    fn unlink_rejects_when_closure_reaches_application() {
        let mut g = scenario_three();
        let b = g
            .objects()
            .find(|(_, o)| o.display_name() == "libx.a[b.o]")
            .unwrap()
            .0;
        let outcome = g.unlink_obj(b);
        assert_eq!(outcome, UnlinkOutcome::Rejected);
        // no mutation: b is still Application-anchored.
        assert_eq!(g.object(b).anchor(), Some(LinkKind::Application));
    }

    #[test]
    fn unlink_removes_unreferenced_optional_object() {
        let mut g = scenario_three();
        let d = g
            .objects()
            .find(|(_, o)| o.display_name() == "libx.a[d.o]")
            .unwrap()
            .0;
        assert_eq!(g.object(d).anchor(), Some(LinkKind::Optional));
        let outcome = g.unlink_obj(d);
        assert_eq!(outcome, UnlinkOutcome::Removed(vec![d]));
        assert_eq!(g.object(d).anchor(), None);
        assert!(!g.link_set(LinkKind::Optional).contains(&d));
    }

    #[test]
    fn unlink_is_idempotent() {
        let mut g = scenario_three();
        let d = g
            .objects()
            .find(|(_, o)| o.display_name() == "libx.a[d.o]")
            .unwrap()
            .0;
        g.unlink_obj(d);
        assert_eq!(g.unlink_obj(d), UnlinkOutcome::NotFound);
    }
}
