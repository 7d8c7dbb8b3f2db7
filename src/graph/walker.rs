//! §4.3 dependency walker.
//!
//! The original threads a tri-valued `work` marker through each `Object` to
//! double as both a cycle guard and (in `BUILD_LIST` mode) a singly-linked
//! work list, which forces the one-walk-at-a-time reentrancy constraint of
//! §5. Per spec §9's design note, this implementation instead allocates a
//! fresh visitation bitset per call — removing the global reentrancy
//! constraint entirely, since no state outlives a single walk.

use crate::graph::Graph;
use crate::model::ObjectId;

/// Which cross-reference direction a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow each import to the first object defining it.
    Imports,
    /// Follow each export to every object that imports it.
    Exports,
}

impl Graph {
    /// `VISIT` mode (§4.3): invoke `action` once per object on every DFS
    /// path that reaches it. The cycle guard is "busy" (currently on the
    /// recursion stack) and is cleared on pop, so a diamond-shaped
    /// dependency is visited along each path that reaches it — this walk is
    /// a trace printer, not a closure builder; use `walk_build_list` for a
    /// deduplicated closure.
    pub fn walk_visit(&self, start: ObjectId, direction: Direction, mut action: impl FnMut(ObjectId)) {
        let mut busy = vec![false; self.object_count()];
        self.visit_rec(start, direction, &mut busy, &mut action);
    }

    fn visit_rec(&self, obj: ObjectId, direction: Direction, busy: &mut [bool], action: &mut impl FnMut(ObjectId)) {
        if busy[obj.index()] {
            return;
        }
        busy[obj.index()] = true;
        action(obj);
        for next in self.neighbors(obj, direction) {
            self.visit_rec(next, direction, busy, action);
        }
        busy[obj.index()] = false;
    }

    /// `BUILD_LIST` mode (§4.3): materialize the reachable closure from
    /// `start` as an ordered work list in DFS pre-order, discovery order —
    /// each object appears exactly once, at the position it was first
    /// reached.
    pub fn walk_build_list(&self, start: ObjectId, direction: Direction) -> Vec<ObjectId> {
        let mut enqueued = vec![false; self.object_count()];
        let mut list = Vec::new();
        self.build_list_rec(start, direction, &mut enqueued, &mut list);
        list
    }

    fn build_list_rec(&self, obj: ObjectId, direction: Direction, enqueued: &mut [bool], list: &mut Vec<ObjectId>) {
        if enqueued[obj.index()] {
            return;
        }
        enqueued[obj.index()] = true;
        list.push(obj);
        for next in self.neighbors(obj, direction) {
            self.build_list_rec(next, direction, enqueued, list);
        }
    }

    fn neighbors(&self, obj: ObjectId, direction: Direction) -> Vec<ObjectId> {
        match direction {
            Direction::Imports => self
                .object(obj)
                .imports()
                .iter()
                .filter_map(|&xref_id| {
                    let sym = self.symbol(self.xref(xref_id).sym);
                    sym.exported_by().first().map(|&ex_id| self.xref(ex_id).obj)
                })
                .collect(),
            Direction::Exports => self
                .object(obj)
                .exports()
                .iter()
                .flat_map(|&xref_id| {
                    let sym = self.symbol(self.xref(xref_id).sym);
                    sym.imported_from()
                        .iter()
                        .map(|&imp_id| self.xref(imp_id).obj)
                        .collect::<Vec<_>>()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ingest::Event;

    fn three_chain() -> Graph {
        // A.o imports foo (exported by b.o, which imports bar, exported by c.o).
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
            ],
            false,
        )
        .unwrap();
        g.finish_ingest();
        g
    }

    #[test]
    fn build_list_imports_follows_chain_to_providers() {
        let g = three_chain();
        let a = ObjectId::new(1); // index 0 is the undefined pod
        let list = g.walk_build_list(a, Direction::Imports);
        let names: Vec<String> = list.iter().map(|&id| g.object(id).display_name()).collect();
        assert_eq!(names, vec!["A.o", "libx.a[b.o]", "libx.a[c.o]"]);
    }

    #[test]
    fn build_list_exports_follows_importers() {
        // imported-from chains are populated by the linker, not at ingest
        // (§3 "Lifecycle") — run it first.
        let mut g = three_chain();
        g.run_linker(crate::graph::AppSeed::Watermark, false).unwrap();
        let c = ObjectId::new(3);
        let list = g.walk_build_list(c, Direction::Exports);
        let names: Vec<String> = list.iter().map(|&id| g.object(id).display_name()).collect();
        assert_eq!(names, vec!["libx.a[c.o]", "libx.a[b.o]", "A.o"]);
    }

    #[test]
    fn walk_terminates_on_self_cycle() {
        // p.o exports and imports the same symbol: a degenerate cycle.
        let mut g = Graph::new();
        g.ingest_listing(
            "app",
            [
                Event::BeginObject("p.o".into()),
                Event::Symbol { name: "s".into(), ty: 'T' },
                Event::Symbol { name: "s".into(), ty: 'U' },
            ],
            false,
        )
        .unwrap();
        g.finish_ingest();
        let p = ObjectId::new(1);
        let mut count = 0;
        g.walk_visit(p, Direction::Imports, |_| count += 1);
        assert_eq!(count, 1);
    }
}
