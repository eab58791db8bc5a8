use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::orchestrator::DialogOrchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DialogId(pub u64);

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out ids starting at `#1`; `#0` is never allocated.
#[derive(Debug)]
pub(crate) struct DialogIdAllocator {
    next: u64,
}

impl Default for DialogIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl DialogIdAllocator {
    pub(crate) fn allocate(&mut self) -> DialogId {
        let id = DialogId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Names a dialog kind. Equality and hashing only look at the `TypeId`; the
/// name is carried for log output.
#[derive(Debug, Clone, Copy)]
pub struct DialogTypeId {
    id: TypeId,
    name: &'static str,
}

impl DialogTypeId {
    pub fn of<T: Dialog>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for DialogTypeId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DialogTypeId {}

impl Hash for DialogTypeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for DialogTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    // Generic arguments keep their paths; only the outer path is trimmed.
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Presentation side of a dialog. The orchestrator only ever toggles
/// visibility; everything else about drawing belongs to the host.
pub trait DialogView {
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
}

/// A live overlay panel managed by [`DialogOrchestrator`].
///
/// Hooks receive the orchestrator so they can open children or close
/// dialogs (including themselves) while they run. By the time `on_open` is
/// called the dialog is already tracked; by the time `on_close` is called it
/// is already untracked.
pub trait Dialog: DialogView + AsAny {
    fn on_open(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {}

    fn on_close(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {}

    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

impl dyn Dialog {
    pub fn is<T: Dialog>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Dialog>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Dialog>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Visibility plus the "accepts input" flag most panels want to track.
/// Open makes a panel interactable, close makes it inert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelView {
    visible: bool,
    interactable: bool,
}

impl PanelView {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn interactable(&self) -> bool {
        self.interactable
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn mark_opened(&mut self) {
        self.interactable = true;
    }

    pub fn mark_closed(&mut self) {
        self.interactable = false;
    }
}
