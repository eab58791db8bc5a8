pub mod dialog;
mod registrar;
mod scene;

pub use dialog::{
    AsAny, Dialog, DialogError, DialogFactory, DialogId, DialogOrchestrator, DialogRegistry,
    DialogTree, DialogTypeId, DialogView, PanelView, RemovedNode,
};
pub use registrar::{DialogTemplate, SceneDialogRegistrar};
pub use scene::{Scene, SceneCommand, SceneError, SceneKey, SceneMachine};
