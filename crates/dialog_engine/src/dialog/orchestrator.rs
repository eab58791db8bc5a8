use std::collections::{HashSet, VecDeque};

use tracing::{debug, error, info, warn};

use super::error::DialogError;
use super::registry::DialogRegistry;
use super::tree::DialogTree;
use super::types::{Dialog, DialogId, DialogIdAllocator, DialogTypeId};

/// Public face of the dialog subsystem: builds dialogs from the registry,
/// tracks them in the tree and drives their lifecycle.
///
/// Every hook and handler gets `&mut DialogOrchestrator`, so opening or
/// closing dialogs from inside a hook is allowed. Structural changes to the
/// tree always land before the hook that could observe them runs.
#[derive(Default)]
pub struct DialogOrchestrator {
    registry: DialogRegistry,
    tree: DialogTree,
    allocator: DialogIdAllocator,
    closing: HashSet<DialogId>,
    // Parents whose re-show was requested while they were checked out.
    pending_reshow: HashSet<DialogId>,
    // Close requests that found a child still mid-close further up the stack.
    close_after_children: HashSet<DialogId>,
    // Removed dialogs waiting for on_close, in close order.
    teardown: VecDeque<PendingTeardown>,
}

struct PendingTeardown {
    id: DialogId,
    // None until the hook or handler holding the instance returns it.
    instance: Option<Box<dyn Dialog>>,
}

impl DialogOrchestrator {
    pub fn new(registry: DialogRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DialogRegistry {
        &mut self.registry
    }

    pub fn open<T: Dialog>(&mut self, parent: Option<DialogId>) -> Option<DialogId> {
        match self.try_open::<T>(parent) {
            Ok(id) => Some(id),
            Err(err) => {
                error!(error = %err, "dialog_open_failed");
                None
            }
        }
    }

    pub fn try_open<T: Dialog>(&mut self, parent: Option<DialogId>) -> Result<DialogId, DialogError> {
        let type_id = DialogTypeId::of::<T>();
        let instance = self.registry.create(type_id)?;
        if !instance.is::<T>() {
            let actual = instance.type_name();
            // The stray instance is dropped here, before anything tracks it.
            drop(instance);
            return Err(DialogError::FactoryTypeMismatch {
                expected: type_id.name(),
                actual,
            });
        }

        let id = self.allocator.allocate();
        self.tree.insert(id, instance, parent)?;
        if let Some(dialog) = self.tree.instance_mut(id) {
            dialog.set_visible(true);
        }
        info!(
            dialog = %id,
            dialog_type = %type_id,
            parent = ?parent,
            open_count = self.tree.len(),
            "dialog_opened"
        );

        self.dispatch(id, |dialog, id, dialogs| dialog.on_open(id, dialogs));
        Ok(id)
    }

    /// Closes `id` and everything opened under it, children first. Closing a
    /// dialog that is not tracked, or is already closing, does nothing.
    ///
    /// `on_close` runs in close order. When a dialog in the cascade is
    /// checked out to a running hook, its teardown and every teardown queued
    /// after it wait until that hook returns.
    pub fn close(&mut self, id: DialogId) {
        if !self.tree.contains(id) || self.closing.contains(&id) {
            debug!(dialog = %id, "dialog_close_ignored");
            return;
        }
        self.closing.insert(id);

        // Hooks fired while closing children may open new ones under `id`.
        while let Some(child) = self.next_child_to_close(id) {
            self.close(child);
        }
        if !self.tree.children_of(id).is_empty() {
            debug!(dialog = %id, "dialog_close_after_children");
            self.close_after_children.insert(id);
            self.closing.remove(&id);
            return;
        }

        let removed = match self.tree.remove(id) {
            Ok(removed) => removed,
            Err(err) => {
                error!(error = %err, "dialog_remove_failed");
                self.closing.remove(&id);
                return;
            }
        };
        self.close_after_children.remove(&id);
        info!(dialog = %id, open_count = self.tree.len(), "dialog_closed");

        if removed.instance.is_none() {
            debug!(dialog = %id, "dialog_close_deferred");
        }
        self.teardown.push_back(PendingTeardown {
            id,
            instance: removed.instance,
        });
        self.drain_teardown();
        self.closing.remove(&id);

        if let Some(parent) = removed.parent {
            if self.close_after_children.remove(&parent) {
                self.close(parent);
            } else {
                self.reshow_parent(parent);
            }
        }
    }

    pub fn close_all(&mut self) {
        let snapshot = self.tree.all();
        debug!(count = snapshot.len(), "dialog_close_all");
        for id in snapshot {
            self.close(id);
        }
    }

    /// Runs `f` against a tracked dialog of type `T` with the orchestrator
    /// available for re-entrant calls. Returns `None` when the dialog is not
    /// tracked, is already checked out, or is not a `T`.
    pub fn with_dialog<T, R, F>(&mut self, id: DialogId, f: F) -> Option<R>
    where
        T: Dialog,
        F: FnOnce(&mut T, DialogId, &mut DialogOrchestrator) -> R,
    {
        if !self.tree.instance(id)?.is::<T>() {
            return None;
        }
        self.dispatch(id, move |dialog, id, dialogs| {
            dialog
                .downcast_mut::<T>()
                .map(|typed| f(typed, id, dialogs))
        })
        .flatten()
    }

    pub fn get<T: Dialog>(&self, id: DialogId) -> Option<&T> {
        self.tree.instance(id)?.downcast_ref::<T>()
    }

    pub fn get_mut<T: Dialog>(&mut self, id: DialogId) -> Option<&mut T> {
        self.tree.instance_mut(id)?.downcast_mut::<T>()
    }

    pub fn dialog(&self, id: DialogId) -> Option<&(dyn Dialog + 'static)> {
        self.tree.instance(id)
    }

    pub fn set_visible(&mut self, id: DialogId, visible: bool) -> bool {
        match self.tree.instance_mut(id) {
            Some(dialog) => {
                dialog.set_visible(visible);
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, id: DialogId) -> Option<bool> {
        self.tree.instance(id).map(|dialog| dialog.is_visible())
    }

    pub fn top_dialog(&self) -> Option<DialogId> {
        self.tree.top()
    }

    pub fn children_of(&self, id: DialogId) -> Vec<DialogId> {
        self.tree.children_of(id)
    }

    pub fn parent_of(&self, id: DialogId) -> Option<DialogId> {
        self.tree.parent_of(id)
    }

    pub fn all_dialogs(&self) -> Vec<DialogId> {
        self.tree.all()
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.tree.contains(id)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    fn dispatch<R, F>(&mut self, id: DialogId, f: F) -> Option<R>
    where
        F: FnOnce(&mut (dyn Dialog + 'static), DialogId, &mut DialogOrchestrator) -> R,
    {
        let Some(mut instance) = self.tree.checkout(id) else {
            warn!(dialog = %id, "dialog_dispatch_unavailable");
            return None;
        };

        let result = f(&mut *instance, id, self);

        match self.tree.restore(id, instance) {
            Ok(()) => {
                if self.pending_reshow.remove(&id) {
                    self.reshow_parent(id);
                }
            }
            Err(instance) => {
                self.pending_reshow.remove(&id);
                self.release_checked_out(id, instance);
            }
        }
        Some(result)
    }

    fn next_child_to_close(&self, id: DialogId) -> Option<DialogId> {
        self.tree
            .children_of(id)
            .into_iter()
            .find(|child| {
                !self.closing.contains(child) && !self.close_after_children.contains(child)
            })
    }

    fn release_checked_out(&mut self, id: DialogId, instance: Box<dyn Dialog>) {
        match self.teardown.iter_mut().find(|pending| pending.id == id) {
            Some(pending) => pending.instance = Some(instance),
            None => self.teardown.push_back(PendingTeardown {
                id,
                instance: Some(instance),
            }),
        }
        self.drain_teardown();
    }

    fn drain_teardown(&mut self) {
        while let Some(pending) = self.teardown.front_mut() {
            let Some(instance) = pending.instance.take() else {
                break;
            };
            let id = pending.id;
            self.teardown.pop_front();
            self.finish_close(id, instance);
        }
    }

    fn finish_close(&mut self, id: DialogId, mut instance: Box<dyn Dialog>) {
        instance.on_close(id, self);
        instance.set_visible(false);
        debug!(dialog = %id, dialog_type = instance.type_name(), "dialog_destroyed");
    }

    fn reshow_parent(&mut self, parent: DialogId) {
        if !self.tree.contains(parent) {
            return;
        }
        match self.tree.instance_mut(parent) {
            Some(dialog) => {
                if !dialog.is_visible() {
                    dialog.set_visible(true);
                    debug!(dialog = %parent, "dialog_parent_reshown");
                }
            }
            None => {
                self.pending_reshow.insert(parent);
            }
        }
    }
}
