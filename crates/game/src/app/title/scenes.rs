use dialog_engine::{DialogOrchestrator, DialogTemplate, Scene, SceneDialogRegistrar, SceneKey};
use tracing::info;

use super::dialogs::{AudioSettings, ConfirmDialog, CreditsDialog, SettingsDialog};
use crate::app::config::AppConfig;

pub(crate) const TITLE_SCENE: SceneKey = SceneKey("title");
pub(crate) const GAME_SCENE: SceneKey = SceneKey("game");

pub(crate) fn scene_key_from_name(name: &str) -> Option<SceneKey> {
    [TITLE_SCENE, GAME_SCENE]
        .into_iter()
        .find(|key| key.0.eq_ignore_ascii_case(name))
}

pub(crate) fn title_templates(config: &AppConfig, audio: &AudioSettings) -> Vec<DialogTemplate> {
    let settings_audio = audio.clone();
    let reset_volume = config.default_volume;
    let reset_confirm = config.reset_confirm.clone();
    let credits = config.credits.clone();
    vec![
        DialogTemplate::new(move || {
            SettingsDialog::new(settings_audio.clone(), reset_volume, reset_confirm.clone())
        }),
        DialogTemplate::new(move || CreditsDialog::new(&credits)),
        DialogTemplate::new(ConfirmDialog::default),
    ]
}

pub(crate) struct TitleScene {
    config: AppConfig,
    audio: AudioSettings,
    registrar: Option<SceneDialogRegistrar>,
}

impl TitleScene {
    pub(crate) fn new(config: AppConfig, audio: AudioSettings) -> Self {
        Self {
            config,
            audio,
            registrar: None,
        }
    }
}

impl Scene for TitleScene {
    fn key(&self) -> SceneKey {
        TITLE_SCENE
    }

    fn load(&mut self, dialogs: &mut DialogOrchestrator) {
        let templates = title_templates(&self.config, &self.audio);
        self.registrar = Some(SceneDialogRegistrar::register_templates(
            TITLE_SCENE.0,
            templates,
            dialogs,
        ));
        info!(scene = TITLE_SCENE.0, volume = self.audio.volume(), "scene_loaded");
    }

    fn unload(&mut self, dialogs: &mut DialogOrchestrator) {
        // Dialogs built from this scene's factories go before the factories do.
        dialogs.close_all();
        match self.registrar.take() {
            Some(mut registrar) => {
                registrar.teardown(dialogs);
                info!(scene = registrar.scene(), "scene_unloaded");
            }
            None => info!(scene = TITLE_SCENE.0, "scene_unloaded"),
        }
    }
}

/// Stand-in for the gameplay scene: it owns no dialogs.
#[derive(Debug, Default)]
pub(crate) struct GameScene;

impl Scene for GameScene {
    fn key(&self) -> SceneKey {
        GAME_SCENE
    }

    fn load(&mut self, _dialogs: &mut DialogOrchestrator) {
        info!(scene = GAME_SCENE.0, "scene_loaded");
    }

    fn unload(&mut self, _dialogs: &mut DialogOrchestrator) {
        info!(scene = GAME_SCENE.0, "scene_unloaded");
    }
}
