use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::error::DialogError;
use super::types::{Dialog, DialogTypeId};

pub type DialogFactory = Box<dyn FnMut() -> Box<dyn Dialog>>;

#[derive(Default)]
pub struct DialogRegistry {
    factories: HashMap<DialogTypeId, DialogFactory>,
}

impl fmt::Debug for DialogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogRegistry")
            .field("types", &self.type_ids())
            .finish()
    }
}

impl DialogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, type_id: DialogTypeId, factory: DialogFactory) {
        if self.factories.insert(type_id, factory).is_some() {
            warn!(dialog_type = %type_id, "dialog_factory_overwritten");
        } else {
            debug!(dialog_type = %type_id, "dialog_factory_registered");
        }
    }

    pub fn register_dialog<T, F>(&mut self, mut factory: F)
    where
        T: Dialog,
        F: FnMut() -> T + 'static,
    {
        self.register(
            DialogTypeId::of::<T>(),
            Box::new(move || Box::new(factory()) as Box<dyn Dialog>),
        );
    }

    pub fn unregister(&mut self, type_id: DialogTypeId) -> bool {
        let removed = self.factories.remove(&type_id).is_some();
        if removed {
            debug!(dialog_type = %type_id, "dialog_factory_unregistered");
        }
        removed
    }

    pub fn unregister_many<I>(&mut self, type_ids: I) -> usize
    where
        I: IntoIterator<Item = DialogTypeId>,
    {
        type_ids
            .into_iter()
            .filter(|type_id| self.unregister(*type_id))
            .count()
    }

    pub fn create(&mut self, type_id: DialogTypeId) -> Result<Box<dyn Dialog>, DialogError> {
        let factory = self
            .factories
            .get_mut(&type_id)
            .ok_or(DialogError::FactoryNotFound {
                type_name: type_id.name(),
            })?;
        Ok(factory())
    }

    pub fn contains(&self, type_id: DialogTypeId) -> bool {
        self.factories.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn type_ids(&self) -> Vec<DialogTypeId> {
        let mut ids = self.factories.keys().copied().collect::<Vec<_>>();
        ids.sort_by_key(|id| id.name());
        ids
    }
}
