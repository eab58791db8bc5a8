use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::dialog::DialogOrchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneKey(pub &'static str);

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown scene '{0}'")]
    UnknownScene(SceneKey),
    #[error("scene '{0}' is already registered")]
    DuplicateScene(SceneKey),
}

pub trait Scene {
    fn key(&self) -> SceneKey;
    fn load(&mut self, dialogs: &mut DialogOrchestrator);
    fn unload(&mut self, dialogs: &mut DialogOrchestrator);
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    is_loaded: bool,
}

/// Owns the scenes and keeps exactly one of them loaded.
#[derive(Default)]
pub struct SceneMachine {
    scenes: Vec<SceneRuntime>,
    active: Option<SceneKey>,
}

impl SceneMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scene: Box<dyn Scene>) -> Result<(), SceneError> {
        let key = scene.key();
        if self.index_of(key).is_some() {
            return Err(SceneError::DuplicateScene(key));
        }
        self.scenes.push(SceneRuntime {
            scene,
            is_loaded: false,
        });
        Ok(())
    }

    pub fn active(&self) -> Option<SceneKey> {
        self.active
    }

    pub fn scene_keys(&self) -> Vec<SceneKey> {
        self.scenes.iter().map(|runtime| runtime.scene.key()).collect()
    }

    /// Unloads the active scene (if any) and loads `next`. Returns `false`
    /// when `next` is already active.
    pub fn switch_to(
        &mut self,
        next: SceneKey,
        dialogs: &mut DialogOrchestrator,
    ) -> Result<bool, SceneError> {
        let next_index = self.index_of(next).ok_or(SceneError::UnknownScene(next))?;
        if self.active == Some(next) {
            return Ok(false);
        }

        if let Some(current) = self.active.and_then(|key| self.index_of(key)) {
            self.unload_at(current, dialogs);
        }

        let runtime = &mut self.scenes[next_index];
        runtime.scene.load(dialogs);
        runtime.is_loaded = true;
        info!(
            from = ?self.active.map(|key| key.0),
            to = next.0,
            open_dialogs = dialogs.len(),
            "scene_switched"
        );
        self.active = Some(next);
        Ok(true)
    }

    pub fn apply(
        &mut self,
        command: SceneCommand,
        dialogs: &mut DialogOrchestrator,
    ) -> Result<bool, SceneError> {
        match command {
            SceneCommand::None => Ok(false),
            SceneCommand::SwitchTo(key) => self.switch_to(key, dialogs),
        }
    }

    pub fn shutdown_all(&mut self, dialogs: &mut DialogOrchestrator) {
        for index in 0..self.scenes.len() {
            self.unload_at(index, dialogs);
        }
        self.active = None;
    }

    fn unload_at(&mut self, index: usize, dialogs: &mut DialogOrchestrator) {
        let runtime = &mut self.scenes[index];
        if runtime.is_loaded {
            runtime.scene.unload(dialogs);
            runtime.is_loaded = false;
        }
    }

    fn index_of(&self, key: SceneKey) -> Option<usize> {
        self.scenes
            .iter()
            .position(|runtime| runtime.scene.key() == key)
    }
}
