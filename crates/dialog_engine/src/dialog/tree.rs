use std::collections::BTreeMap;

use super::error::DialogError;
use super::types::{Dialog, DialogId};

struct DialogNode {
    // None while the instance is checked out to a hook or handler.
    instance: Option<Box<dyn Dialog>>,
    parent: Option<DialogId>,
    children: Vec<DialogId>,
}

pub struct RemovedNode {
    pub instance: Option<Box<dyn Dialog>>,
    pub parent: Option<DialogId>,
}

/// Live dialogs, their parent/child links, and the order they were opened in.
///
/// Removing a node always unlinks it from its parent's child list, so the
/// parent/child relation stays a forest no matter which node goes first.
#[derive(Default)]
pub struct DialogTree {
    nodes: BTreeMap<DialogId, DialogNode>,
    open_order: Vec<DialogId>,
}

impl DialogTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        id: DialogId,
        instance: Box<dyn Dialog>,
        parent: Option<DialogId>,
    ) -> Result<(), DialogError> {
        if self.nodes.contains_key(&id) {
            return Err(DialogError::DuplicateInstance(id));
        }

        if let Some(parent_node) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent_node.children.push(id);
        }
        self.nodes.insert(
            id,
            DialogNode {
                instance: Some(instance),
                parent,
                children: Vec::new(),
            },
        );
        self.open_order.push(id);
        Ok(())
    }

    pub fn remove(&mut self, id: DialogId) -> Result<RemovedNode, DialogError> {
        let node = self
            .nodes
            .remove(&id)
            .ok_or(DialogError::UnknownInstance(id))?;

        if let Some(parent_node) = node.parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent_node.children.retain(|child| *child != id);
        }

        if self.open_order.last() == Some(&id) {
            self.open_order.pop();
        } else {
            self.open_order.retain(|entry| *entry != id);
        }

        Ok(RemovedNode {
            instance: node.instance,
            parent: node.parent,
        })
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn children_of(&self, id: DialogId) -> Vec<DialogId> {
        self.nodes
            .get(&id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn parent_of(&self, id: DialogId) -> Option<DialogId> {
        self.nodes
            .get(&id)
            .and_then(|node| node.parent)
            .filter(|parent| self.nodes.contains_key(parent))
    }

    pub fn top(&self) -> Option<DialogId> {
        self.open_order.last().copied()
    }

    pub fn all(&self) -> Vec<DialogId> {
        self.nodes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node and the open order without running any hooks.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.open_order.clear();
    }

    pub fn instance(&self, id: DialogId) -> Option<&(dyn Dialog + 'static)> {
        self.nodes.get(&id)?.instance.as_deref()
    }

    pub fn instance_mut(&mut self, id: DialogId) -> Option<&mut (dyn Dialog + 'static)> {
        self.nodes.get_mut(&id)?.instance.as_deref_mut()
    }

    pub(crate) fn checkout(&mut self, id: DialogId) -> Option<Box<dyn Dialog>> {
        self.nodes.get_mut(&id)?.instance.take()
    }

    /// Puts a checked-out instance back. Hands it back to the caller when the
    /// node was removed in the meantime.
    pub(crate) fn restore(
        &mut self,
        id: DialogId,
        instance: Box<dyn Dialog>,
    ) -> Result<(), Box<dyn Dialog>> {
        match self.nodes.get_mut(&id) {
            Some(node) if node.instance.is_none() => {
                node.instance = Some(instance);
                Ok(())
            }
            _ => Err(instance),
        }
    }

    #[cfg(test)]
    pub(crate) fn open_order(&self) -> &[DialogId] {
        &self.open_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::types::{DialogView, PanelView};

    #[derive(Default)]
    struct Stub {
        view: PanelView,
    }

    impl DialogView for Stub {
        fn set_visible(&mut self, visible: bool) {
            self.view.set_visible(visible);
        }

        fn is_visible(&self) -> bool {
            self.view.visible()
        }
    }

    impl Dialog for Stub {}

    fn stub() -> Box<dyn Dialog> {
        Box::new(Stub::default())
    }

    fn assert_forest(tree: &DialogTree) {
        for id in tree.all() {
            let mut seen = vec![id];
            let mut cursor = tree.parent_of(id);
            while let Some(parent) = cursor {
                assert!(!seen.contains(&parent), "cycle through {parent}");
                assert!(tree.children_of(parent).contains(seen.last().expect("last")));
                seen.push(parent);
                cursor = tree.parent_of(parent);
            }
        }
    }

    #[test]
    fn insert_links_child_under_tracked_parent() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("root");
        tree.insert(DialogId(2), stub(), Some(DialogId(1)))
            .expect("child");
        tree.insert(DialogId(3), stub(), Some(DialogId(1)))
            .expect("child");

        assert_eq!(tree.children_of(DialogId(1)), vec![DialogId(2), DialogId(3)]);
        assert_eq!(tree.parent_of(DialogId(3)), Some(DialogId(1)));
        assert_eq!(tree.top(), Some(DialogId(3)));
        assert_forest(&tree);
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("first");

        let err = tree.insert(DialogId(1), stub(), None).expect_err("duplicate");

        assert_eq!(err, DialogError::DuplicateInstance(DialogId(1)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.open_order(), &[DialogId(1)]);
    }

    #[test]
    fn insert_under_untracked_parent_keeps_node_rootless() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(5), stub(), Some(DialogId(99)))
            .expect("orphan");

        assert_eq!(tree.parent_of(DialogId(5)), None);
        assert!(tree.children_of(DialogId(99)).is_empty());
    }

    #[test]
    fn remove_unknown_reports_error() {
        let mut tree = DialogTree::new();
        let err = tree.remove(DialogId(4)).err().expect("unknown");
        assert_eq!(err, DialogError::UnknownInstance(DialogId(4)));
    }

    #[test]
    fn remove_from_middle_preserves_open_order() {
        let mut tree = DialogTree::new();
        for raw in 0..4 {
            tree.insert(DialogId(raw), stub(), None).expect("insert");
        }

        tree.remove(DialogId(1)).expect("remove middle");

        assert_eq!(tree.open_order(), &[DialogId(0), DialogId(2), DialogId(3)]);
        assert_eq!(tree.top(), Some(DialogId(3)));

        tree.remove(DialogId(3)).expect("remove top");
        assert_eq!(tree.top(), Some(DialogId(2)));
    }

    #[test]
    fn remove_unlinks_from_parent_children() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("root");
        tree.insert(DialogId(2), stub(), Some(DialogId(1)))
            .expect("child");

        let removed = tree.remove(DialogId(2)).expect("remove");

        assert_eq!(removed.parent, Some(DialogId(1)));
        assert!(removed.instance.is_some());
        assert!(tree.children_of(DialogId(1)).is_empty());
        assert_forest(&tree);
    }

    #[test]
    fn removing_parent_first_leaves_children_rootless() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("root");
        tree.insert(DialogId(2), stub(), Some(DialogId(1)))
            .expect("child");

        tree.remove(DialogId(1)).expect("remove parent");

        assert!(tree.contains(DialogId(2)));
        assert_eq!(tree.parent_of(DialogId(2)), None);
        assert_forest(&tree);
    }

    #[test]
    fn checkout_and_restore_round_trip() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("root");

        let instance = tree.checkout(DialogId(1)).expect("checkout");
        assert!(tree.instance(DialogId(1)).is_none());
        assert!(tree.checkout(DialogId(1)).is_none());

        assert!(tree.restore(DialogId(1), instance).is_ok());
        assert!(tree.instance(DialogId(1)).is_some());
    }

    #[test]
    fn restore_after_removal_hands_instance_back() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("root");
        let instance = tree.checkout(DialogId(1)).expect("checkout");

        let removed = tree.remove(DialogId(1)).expect("remove");

        assert!(removed.instance.is_none());
        assert!(tree.restore(DialogId(1), instance).is_err());
    }

    #[test]
    fn clear_drops_everything() {
        let mut tree = DialogTree::new();
        tree.insert(DialogId(1), stub(), None).expect("root");
        tree.insert(DialogId(2), stub(), Some(DialogId(1)))
            .expect("child");

        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.top(), None);
        assert!(tree.all().is_empty());
    }
}
