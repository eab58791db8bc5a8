use std::fmt;

use tracing::{info, warn};

use crate::dialog::{Dialog, DialogFactory, DialogOrchestrator, DialogTypeId};

/// One entry of a scene's dialog list: the kind it produces and how to build it.
pub struct DialogTemplate {
    type_id: DialogTypeId,
    factory: DialogFactory,
}

impl DialogTemplate {
    pub fn new<T, F>(mut factory: F) -> Self
    where
        T: Dialog,
        F: FnMut() -> T + 'static,
    {
        Self {
            type_id: DialogTypeId::of::<T>(),
            factory: Box::new(move || Box::new(factory()) as Box<dyn Dialog>),
        }
    }

    pub fn type_id(&self) -> DialogTypeId {
        self.type_id
    }
}

impl fmt::Debug for DialogTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogTemplate")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

/// Registers a scene's dialog factories on load and removes exactly those on
/// teardown. Nothing is removed automatically: a registrar dropped before
/// `teardown` leaves its factories registered and logs a warning.
#[derive(Debug)]
pub struct SceneDialogRegistrar {
    scene: String,
    registered: Vec<DialogTypeId>,
}

impl SceneDialogRegistrar {
    pub fn register_templates<I>(
        scene: impl Into<String>,
        templates: I,
        dialogs: &mut DialogOrchestrator,
    ) -> Self
    where
        I: IntoIterator<Item = DialogTemplate>,
    {
        let scene = scene.into();
        let mut registered = Vec::new();
        for template in templates {
            let type_id = template.type_id;
            dialogs.registry_mut().register(type_id, template.factory);
            if !registered.contains(&type_id) {
                registered.push(type_id);
            }
        }
        info!(
            scene = %scene,
            dialog_types = registered.len(),
            "scene_dialogs_registered"
        );
        Self { scene, registered }
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn registered(&self) -> &[DialogTypeId] {
        &self.registered
    }

    pub fn teardown(&mut self, dialogs: &mut DialogOrchestrator) {
        if self.registered.is_empty() {
            return;
        }
        let removed = dialogs
            .registry_mut()
            .unregister_many(self.registered.drain(..));
        info!(scene = %self.scene, removed, "scene_dialogs_unregistered");
    }
}

impl Drop for SceneDialogRegistrar {
    fn drop(&mut self) {
        if !self.registered.is_empty() {
            warn!(
                scene = %self.scene,
                dialog_types = self.registered.len(),
                "scene_dialog_registrar_dropped_without_teardown"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{DialogView, PanelView};

    #[derive(Default)]
    struct Pause {
        view: PanelView,
    }

    #[derive(Default)]
    struct Inventory {
        view: PanelView,
    }

    impl DialogView for Pause {
        fn set_visible(&mut self, visible: bool) {
            self.view.set_visible(visible);
        }

        fn is_visible(&self) -> bool {
            self.view.visible()
        }
    }

    impl DialogView for Inventory {
        fn set_visible(&mut self, visible: bool) {
            self.view.set_visible(visible);
        }

        fn is_visible(&self) -> bool {
            self.view.visible()
        }
    }

    impl Dialog for Pause {}
    impl Dialog for Inventory {}

    #[test]
    fn registers_templates_and_tears_down_only_its_own() {
        let mut dialogs = DialogOrchestrator::default();
        dialogs.registry_mut().register_dialog(Inventory::default);

        let mut registrar = SceneDialogRegistrar::register_templates(
            "title",
            [DialogTemplate::new(Pause::default)],
            &mut dialogs,
        );
        assert_eq!(registrar.registered(), &[DialogTypeId::of::<Pause>()]);
        assert!(dialogs.open::<Pause>(None).is_some());

        registrar.teardown(&mut dialogs);

        assert!(registrar.registered().is_empty());
        assert!(!dialogs.registry().contains(DialogTypeId::of::<Pause>()));
        assert!(dialogs.registry().contains(DialogTypeId::of::<Inventory>()));
    }

    #[test]
    fn registrar_remembers_scene_and_template_kinds() {
        let mut dialogs = DialogOrchestrator::default();
        let templates = [
            DialogTemplate::new(Pause::default),
            DialogTemplate::new(Inventory::default),
        ];
        let kinds: Vec<DialogTypeId> = templates.iter().map(DialogTemplate::type_id).collect();

        let mut registrar =
            SceneDialogRegistrar::register_templates("pause_menu", templates, &mut dialogs);

        assert_eq!(registrar.scene(), "pause_menu");
        assert_eq!(registrar.registered(), kinds.as_slice());
        registrar.teardown(&mut dialogs);
    }

    #[test]
    fn teardown_leaves_live_dialogs_tracked() {
        let mut dialogs = DialogOrchestrator::default();
        let mut registrar = SceneDialogRegistrar::register_templates(
            "title",
            [DialogTemplate::new(Pause::default)],
            &mut dialogs,
        );
        let id = dialogs.open::<Pause>(None).expect("pause");

        registrar.teardown(&mut dialogs);

        assert!(dialogs.contains(id));
        assert!(dialogs.open::<Pause>(None).is_none());
        dialogs.close(id);
        assert!(dialogs.is_empty());
    }

    #[test]
    fn duplicate_templates_are_recorded_once() {
        let mut dialogs = DialogOrchestrator::default();
        let mut registrar = SceneDialogRegistrar::register_templates(
            "title",
            [
                DialogTemplate::new(Pause::default),
                DialogTemplate::new(Pause::default),
            ],
            &mut dialogs,
        );

        assert_eq!(registrar.registered().len(), 1);
        registrar.teardown(&mut dialogs);
        assert!(dialogs.registry().is_empty());
    }

    #[test]
    fn teardown_twice_is_harmless() {
        let mut dialogs = DialogOrchestrator::default();
        let mut registrar = SceneDialogRegistrar::register_templates(
            "title",
            [DialogTemplate::new(Pause::default)],
            &mut dialogs,
        );

        registrar.teardown(&mut dialogs);
        dialogs.registry_mut().register_dialog(Pause::default);
        registrar.teardown(&mut dialogs);

        assert!(dialogs.registry().contains(DialogTypeId::of::<Pause>()));
    }
}
