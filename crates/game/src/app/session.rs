use dialog_engine::{
    Dialog, DialogId, DialogOrchestrator, SceneError, SceneKey, SceneMachine,
};
use tracing::{debug, info};

use super::config::AppConfig;
use super::console::{ConsoleCommand, ConsoleCommandRegistry};
use super::title::{
    scene_key_from_name, AudioSettings, ConfirmDialog, CreditsDialog, GameScene,
    MenuButtonClickService, SettingsDialog, TitleScene, TITLE_SCENE,
};

/// Everything the title screen needs at runtime, driven one console line at
/// a time. Each executed line yields the text the console should print.
pub(crate) struct TitleSession {
    dialogs: DialogOrchestrator,
    scenes: SceneMachine,
    menu: MenuButtonClickService,
    audio: AudioSettings,
    console: ConsoleCommandRegistry,
    quit_requested: bool,
}

impl TitleSession {
    pub(crate) fn new(config: &AppConfig) -> Result<Self, SceneError> {
        let audio = AudioSettings::new(config.default_volume);
        let mut dialogs = DialogOrchestrator::default();
        let mut scenes = SceneMachine::new();
        scenes.add(Box::new(TitleScene::new(config.clone(), audio.clone())))?;
        scenes.add(Box::new(GameScene))?;

        let start = scene_key_from_name(&config.start_scene).unwrap_or(TITLE_SCENE);
        scenes.switch_to(start, &mut dialogs)?;

        Ok(Self {
            dialogs,
            scenes,
            menu: MenuButtonClickService,
            audio,
            console: ConsoleCommandRegistry::with_builtins(),
            quit_requested: false,
        })
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn active_scene(&self) -> Option<SceneKey> {
        self.scenes.active()
    }

    pub(crate) fn dialogs(&self) -> &DialogOrchestrator {
        &self.dialogs
    }

    pub(crate) fn execute_line(&mut self, raw_line: &str) -> Vec<String> {
        match self.console.parse_line(raw_line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Vec::new(),
            Err(line) => vec![line],
        }
    }

    pub(crate) fn execute(&mut self, command: ConsoleCommand) -> Vec<String> {
        debug!(command = ?command, "console_command");
        match command {
            ConsoleCommand::Help => self.console.help_lines(),
            ConsoleCommand::Click(button) => {
                let top_before = self.dialogs.top_dialog();
                let scene_command = self.menu.click(button, &mut self.dialogs);
                match self.scenes.apply(scene_command, &mut self.dialogs) {
                    Ok(true) => vec![self.scene_line()],
                    Ok(false) => match self.dialogs.top_dialog() {
                        Some(id) if Some(id) != top_before => self.opened_lines(id),
                        _ => vec![format!("{} did nothing", button.name())],
                    },
                    Err(err) => vec![format!("error: {err}")],
                }
            }
            ConsoleCommand::Volume(value) => {
                let Some(id) = self.newest::<SettingsDialog>() else {
                    return vec!["error: no settings dialog is open".to_string()];
                };
                self.dialogs
                    .with_dialog::<SettingsDialog, _, _>(id, |settings, _, _| {
                        settings.set_volume(value);
                        settings.volume_text()
                    })
                    .into_iter()
                    .collect()
            }
            ConsoleCommand::Reset => {
                let Some(id) = self.newest::<SettingsDialog>() else {
                    return vec!["error: no settings dialog is open".to_string()];
                };
                let confirm = self
                    .dialogs
                    .with_dialog::<SettingsDialog, _, _>(id, |settings, id, dialogs| {
                        settings.press_reset(id, dialogs)
                    })
                    .flatten();
                match confirm {
                    Some(confirm) => self.opened_lines(confirm),
                    None => vec!["error: reset confirmation could not be opened".to_string()],
                }
            }
            ConsoleCommand::Confirm => self.answer_confirm(true),
            ConsoleCommand::Cancel => self.answer_confirm(false),
            ConsoleCommand::Close(target) => {
                let Some(id) = target.or_else(|| self.dialogs.top_dialog()) else {
                    return vec!["error: no dialogs are open".to_string()];
                };
                if !self.dialogs.contains(id) {
                    return vec![format!("error: no open dialog {id}")];
                }
                let before = self.dialogs.len();
                self.dialogs.close(id);
                vec![format!(
                    "closed {id} ({} dialogs)",
                    before - self.dialogs.len()
                )]
            }
            ConsoleCommand::CloseAll => {
                let before = self.dialogs.len();
                self.dialogs.close_all();
                vec![format!("closed {before} dialogs")]
            }
            ConsoleCommand::Hide(id) => {
                if self.dialogs.set_visible(id, false) {
                    vec![format!("hidden {id}")]
                } else {
                    vec![format!("error: no open dialog {id}")]
                }
            }
            ConsoleCommand::Top => match self.dialogs.top_dialog() {
                Some(id) => vec![format!("top: {}", self.describe(id))],
                None => vec!["top: none".to_string()],
            },
            ConsoleCommand::Tree => self.tree_lines(),
            ConsoleCommand::Scene(key) => match self.scenes.switch_to(key, &mut self.dialogs) {
                Ok(true) => vec![self.scene_line()],
                Ok(false) => vec![format!("scene {key} is already active")],
                Err(err) => vec![format!("error: {err}")],
            },
            ConsoleCommand::Quit => {
                self.quit_requested = true;
                vec!["bye".to_string()]
            }
        }
    }

    pub(crate) fn shutdown(&mut self) {
        self.scenes.shutdown_all(&mut self.dialogs);
        info!(volume = self.audio.volume(), "session_shutdown");
    }

    fn answer_confirm(&mut self, accept: bool) -> Vec<String> {
        let Some(id) = self.newest::<ConfirmDialog>() else {
            return vec!["error: no confirm dialog is open".to_string()];
        };
        self.dialogs
            .with_dialog::<ConfirmDialog, _, _>(id, |confirm, id, dialogs| {
                if accept {
                    confirm.confirm(id, dialogs);
                } else {
                    confirm.cancel(id, dialogs);
                }
            });
        let verb = if accept { "confirmed" } else { "cancelled" };
        vec![
            format!("{verb} {id}"),
            format!("Volume: {}%", (self.audio.volume() * 100.0).round() as i32),
        ]
    }

    fn newest<T: Dialog>(&self) -> Option<DialogId> {
        self.dialogs
            .all_dialogs()
            .into_iter()
            .rev()
            .find(|id| self.dialogs.dialog(*id).is_some_and(|dialog| dialog.is::<T>()))
    }

    fn describe(&self, id: DialogId) -> String {
        match self.dialogs.dialog(id) {
            Some(dialog) => {
                let state = if self.dialogs.is_visible(id) == Some(true) {
                    "visible"
                } else {
                    "hidden"
                };
                format!("{} {id} [{state}]", dialog.type_name())
            }
            None => format!("{id} [closed]"),
        }
    }

    fn opened_lines(&self, id: DialogId) -> Vec<String> {
        let mut lines = vec![format!("opened {}", self.describe(id))];
        let Some(dialog) = self.dialogs.dialog(id) else {
            return lines;
        };
        if let Some(settings) = dialog.downcast_ref::<SettingsDialog>() {
            lines.push(format!("  {}", settings.volume_text()));
        } else if let Some(credits) = dialog.downcast_ref::<CreditsDialog>() {
            lines.push(format!("  {}", credits.title()));
            lines.extend(credits.content().lines().map(|line| format!("  {line}")));
        } else if let Some(confirm) = dialog.downcast_ref::<ConfirmDialog>() {
            lines.push(format!("  {}", confirm.title()));
            lines.push(format!("  {}", confirm.message()));
        }
        lines
    }

    fn scene_line(&self) -> String {
        match self.scenes.active() {
            Some(key) => format!("scene {key}"),
            None => "scene none".to_string(),
        }
    }

    fn tree_lines(&self) -> Vec<String> {
        let roots: Vec<DialogId> = self
            .dialogs
            .all_dialogs()
            .into_iter()
            .filter(|id| self.dialogs.parent_of(*id).is_none())
            .collect();
        if roots.is_empty() {
            return vec!["no dialogs open".to_string()];
        }

        let mut lines = Vec::new();
        let mut stack: Vec<(DialogId, usize)> = roots.into_iter().rev().map(|id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            lines.push(format!("{}{}", "  ".repeat(depth), self.describe(id)));
            for child in self.dialogs.children_of(id).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        lines
    }
}
