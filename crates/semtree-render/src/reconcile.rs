use semtree_core::NodeId;
use rustc_hash::FxHashSet;

/// How the drawn set changes between two layout passes. Each list keeps the order of the
/// sequence it was taken from (`next` for entering and updating, `previous` for exiting).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub entering: Vec<NodeId>,
    pub updating: Vec<NodeId>,
    pub exiting: Vec<NodeId>,
}

impl Reconciliation {
    pub fn is_unchanged(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// Diffs two drawn sets by id.
pub fn reconcile(previous: &[NodeId], next: &[NodeId]) -> Reconciliation {
    let before: FxHashSet<NodeId> = previous.iter().copied().collect();
    let after: FxHashSet<NodeId> = next.iter().copied().collect();

    let mut out = Reconciliation::default();
    for id in next {
        if before.contains(id) {
            out.updating.push(*id);
        } else {
            out.entering.push(*id);
        }
    }
    out.exiting = previous
        .iter()
        .copied()
        .filter(|id| !after.contains(id))
        .collect();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[u32]) -> Vec<NodeId> {
        v.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn splits_into_three_groups() {
        let r = reconcile(&ids(&[1, 2, 3]), &ids(&[1, 3, 4, 5]));
        assert_eq!(r.entering, ids(&[4, 5]));
        assert_eq!(r.updating, ids(&[1, 3]));
        assert_eq!(r.exiting, ids(&[2]));
        assert!(!r.is_unchanged());
    }

    #[test]
    fn first_pass_enters_everything() {
        let r = reconcile(&[], &ids(&[7, 8]));
        assert_eq!(r.entering, ids(&[7, 8]));
        assert!(r.updating.is_empty());
        assert!(r.exiting.is_empty());
    }

    #[test]
    fn identical_sets_only_update() {
        let r = reconcile(&ids(&[1, 2]), &ids(&[1, 2]));
        assert!(r.is_unchanged());
        assert_eq!(r.updating, ids(&[1, 2]));
    }
}
