mod error;
mod orchestrator;
mod registry;
mod tree;
mod types;

pub use error::DialogError;
pub use orchestrator::DialogOrchestrator;
pub use registry::{DialogFactory, DialogRegistry};
pub use tree::{DialogTree, RemovedNode};
pub use types::{AsAny, Dialog, DialogId, DialogTypeId, DialogView, PanelView};
