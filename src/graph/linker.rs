//! §4.4 linker: link-set construction.

use tracing::warn;

use crate::core::AnalysisError;
use crate::graph::Graph;
use crate::model::{LinkKind, ObjectId};

/// How the driver seeds the Application set before running the linker over
/// every un-anchored object (§4.4 "Driver seeding").
#[derive(Debug, Clone, Copy)]
pub enum AppSeed<'a> {
    /// Default seeding: objects from the first ingested listing are
    /// Application seeds, everything after is Optional.
    Watermark,
    /// Alternative seeding: the single object defining `sym` is the sole
    /// Application seed; every other object defaults to Optional.
    Symbol(&'a str),
}

impl Graph {
    /// Seed link-set membership and recursively pull in providers of every
    /// import, for every object that doesn't already have an anchor
    /// (§4.4). `warn_undefined` mirrors the CLI's `-u` flag: whether an
    /// unresolved import during linking is worth a warning.
    pub fn run_linker(&mut self, seed: AppSeed<'_>, warn_undefined: bool) -> Result<(), AnalysisError> {
        let explicit_app_object = match seed {
            AppSeed::Watermark => None,
            AppSeed::Symbol(name) => {
                let sym_id = self
                    .find_symbol(name)
                    .filter(|&id| self.symbol(id).is_defined())
                    .ok_or_else(|| AnalysisError::UndefinedAppSymbol(name.to_string()))?;
                let ex_id = self.symbol(sym_id).exported_by()[0];
                Some(self.xref(ex_id).obj)
            }
        };

        let watermark = self.app_watermark();
        for i in 0..self.object_count() {
            let obj_id = ObjectId::new(i);
            if self.object(obj_id).anchor().is_some() {
                continue;
            }
            let anchor = match explicit_app_object {
                Some(seed_id) if seed_id == obj_id => LinkKind::Application,
                Some(_) => LinkKind::Optional,
                None => {
                    if i < watermark {
                        LinkKind::Application
                    } else {
                        LinkKind::Optional
                    }
                }
            };
            self.set_anchor(obj_id, anchor);
            self.link_obj(obj_id, warn_undefined);
        }
        Ok(())
    }

    fn set_anchor(&mut self, obj_id: ObjectId, kind: LinkKind) {
        self.objects[obj_id.index()].anchor = Some(kind);
    }

    /// §4.4's `linkObj`. Installs every import edge, recursively pulling in
    /// each import's first provider, then — post-order, after its own
    /// imports are fully processed — prepends `f` onto its anchor's chain.
    /// The post-order self-push is what makes a provider's prepend land
    /// *before* its dependents' in the final chain (see scenario 1 in §8).
    fn link_obj(&mut self, f: ObjectId, warn_undefined: bool) {
        let import_ids = self.object(f).imports().to_vec();
        for imp_id in import_ids {
            let imp = self.xref(imp_id);
            debug_assert!(
                !self.symbol(imp.sym).imported_from().contains(&imp_id),
                "import edge installed twice"
            );
            self.symbols
                .get_index_mut(imp.sym.index())
                .expect("valid SymbolId")
                .1
                .imported_from
                .insert(0, imp_id);

            match self.symbol(imp.sym).exported_by().first().copied() {
                Some(ex_id) => {
                    let dep = self.xref(ex_id).obj;
                    if self.object(dep).anchor().is_none() {
                        let anchor = self.object(f).anchor().expect("f already anchored by caller");
                        self.set_anchor(dep, anchor);
                        self.link_obj(dep, warn_undefined);
                    }
                }
                None => {
                    if warn_undefined {
                        warn!(
                            symbol = %self.symbol_name(imp.sym),
                            object = %self.object(f).display_name(),
                            "unresolved import"
                        );
                    }
                }
            }
        }
        self.push_chain(f);
    }

    fn push_chain(&mut self, obj_id: ObjectId) {
        let kind = self.object(obj_id).anchor().expect("anchor assigned before chain push");
        let old_head = *self.link_head_mut(kind);
        self.objects[obj_id.index()].link_next = old_head;
        *self.link_head_mut(kind) = Some(obj_id);
    }
}
