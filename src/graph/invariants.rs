//! Cross-cutting invariant checks (§8, "Invariants (quantified)").
//!
//! These are debugging/testing aids, not part of the algorithms themselves:
//! every invariant here is supposed to hold after any sequence of public
//! `Graph` operations, so a violation is a programming error in this crate,
//! not a user-input error (§7, "Invariant violations ... are programming
//! errors and abort"). Exposed as a `Result` rather than a panic so tests can
//! assert on *which* invariant broke.

use rustc_hash::FxHashSet;

use crate::core::AnalysisError;
use crate::graph::Graph;
use crate::model::{LinkKind, ObjectId, XrefId};

impl Graph {
    /// Run every quantified invariant from §8 against the current state.
    /// Returns the first violation found, or `Ok(())` if none.
    pub fn check_invariants(&self) -> Result<(), AnalysisError> {
        self.check_back_pointer_integrity()?;
        self.check_edge_uniqueness()?;
        self.check_set_disjointness()?;
        self.check_anchor_consistency()?;
        self.check_undefined_pod_exhaustiveness()?;
        Ok(())
    }

    /// 1. *Back-pointer integrity*: every `Xref` in `f.exports`/`f.imports`
    /// has `obj == f`.
    fn check_back_pointer_integrity(&self) -> Result<(), AnalysisError> {
        for (obj_id, obj) in self.objects() {
            for &xid in obj.exports().iter().chain(obj.imports()) {
                if self.xref(xid).obj != obj_id {
                    return Err(AnalysisError::InvariantViolation(format!(
                        "xref {xid:?} lives in {obj_id:?}'s arrays but points back to {:?}",
                        self.xref(xid).obj
                    )));
                }
            }
        }
        Ok(())
    }

    /// 2. *Edge-uniqueness*: every `Xref` appears exactly once across all
    /// `exported_by` chains, and exactly once across all `imported_from`
    /// chains it could possibly belong to (import edges not yet installed by
    /// the linker are simply absent from every chain, which also satisfies
    /// "at most once").
    fn check_edge_uniqueness(&self) -> Result<(), AnalysisError> {
        let mut seen_exports: FxHashSet<XrefId> = FxHashSet::default();
        let mut seen_imports: FxHashSet<XrefId> = FxHashSet::default();
        for (_, sym) in self.symbols() {
            for &xid in sym.exported_by() {
                if !seen_exports.insert(xid) {
                    return Err(AnalysisError::InvariantViolation(format!(
                        "xref {xid:?} appears more than once across exported-by chains"
                    )));
                }
            }
            for &xid in sym.imported_from() {
                if !seen_imports.insert(xid) {
                    return Err(AnalysisError::InvariantViolation(format!(
                        "xref {xid:?} appears more than once across imported-from chains"
                    )));
                }
            }
        }
        Ok(())
    }

    /// 3. *Set disjointness*: Application, Optional, and Undefined are
    /// pairwise disjoint (trivially true if each object has at most one
    /// `anchor`, but checked directly against the chains themselves so a
    /// chain-splice bug that duplicates an object into two chains is still
    /// caught).
    fn check_set_disjointness(&self) -> Result<(), AnalysisError> {
        let app: FxHashSet<ObjectId> = self.link_set(LinkKind::Application).into_iter().collect();
        let opt: FxHashSet<ObjectId> = self.link_set(LinkKind::Optional).into_iter().collect();
        let und: FxHashSet<ObjectId> = self.link_set(LinkKind::Undefined).into_iter().collect();
        if !app.is_disjoint(&opt) || !app.is_disjoint(&und) || !opt.is_disjoint(&und) {
            return Err(AnalysisError::InvariantViolation(
                "Application/Optional/Undefined link sets are not pairwise disjoint".to_string(),
            ));
        }
        Ok(())
    }

    /// 4. *Anchor consistency*: if `f.anchor == Some(kind)`, `f` is reachable
    /// from `kind`'s chain head.
    fn check_anchor_consistency(&self) -> Result<(), AnalysisError> {
        for (obj_id, obj) in self.objects() {
            if let Some(kind) = obj.anchor() {
                if !self.link_set(kind).contains(&obj_id) {
                    return Err(AnalysisError::InvariantViolation(format!(
                        "{:?} claims anchor {:?} but is absent from that chain",
                        obj_id,
                        kind.label()
                    )));
                }
            }
        }
        Ok(())
    }

    /// 5. *Undefined pod exhaustiveness*: after ingest, a symbol has an
    /// export entry from the undefined pod iff it has no other definer.
    fn check_undefined_pod_exhaustiveness(&self) -> Result<(), AnalysisError> {
        let pod = self.undefined_pod();
        for (name, sym) in self.symbols() {
            let real_definers = sym.exported_by().iter().filter(|&&xid| self.xref(xid).obj != pod).count();
            let pod_definer = sym.exported_by().iter().any(|&xid| self.xref(xid).obj == pod);
            if (real_definers == 0) != pod_definer {
                return Err(AnalysisError::InvariantViolation(format!(
                    "symbol `{name}` has {real_definers} real definer(s) but pod membership is {pod_definer}"
                )));
            }
        }
        Ok(())
    }
}
