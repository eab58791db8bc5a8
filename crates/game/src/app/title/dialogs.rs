use std::cell::Cell;
use std::rc::Rc;

use dialog_engine::{Dialog, DialogId, DialogOrchestrator, DialogView, PanelView};
use tracing::{debug, info};

use crate::app::config::{ConfirmConfig, CreditsConfig};

/// Master volume shared between the host and whichever settings dialog is open.
#[derive(Debug, Clone)]
pub(crate) struct AudioSettings {
    volume: Rc<Cell<f32>>,
}

impl AudioSettings {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            volume: Rc::new(Cell::new(volume.clamp(0.0, 1.0))),
        }
    }

    pub(crate) fn volume(&self) -> f32 {
        self.volume.get()
    }

    pub(crate) fn set_volume(&self, volume: f32) {
        self.volume.set(volume.clamp(0.0, 1.0));
    }
}

pub(crate) struct SettingsDialog {
    view: PanelView,
    audio: AudioSettings,
    reset_volume: f32,
    reset_confirm: ConfirmConfig,
}

impl SettingsDialog {
    pub(crate) fn new(audio: AudioSettings, reset_volume: f32, reset_confirm: ConfirmConfig) -> Self {
        Self {
            view: PanelView::default(),
            audio,
            reset_volume,
            reset_confirm,
        }
    }

    pub(crate) fn volume_text(&self) -> String {
        format!("Volume: {}%", (self.audio.volume() * 100.0).round() as i32)
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume);
        debug!(volume = self.audio.volume(), "settings_volume_changed");
    }

    /// Opens a confirmation child; confirming restores the default volume.
    pub(crate) fn press_reset(
        &mut self,
        id: DialogId,
        dialogs: &mut DialogOrchestrator,
    ) -> Option<DialogId> {
        let confirm_id = dialogs.open::<ConfirmDialog>(Some(id))?;
        let confirm = dialogs.get_mut::<ConfirmDialog>(confirm_id)?;
        confirm.set_title(&self.reset_confirm.title);
        confirm.set_message(&self.reset_confirm.message);
        let audio = self.audio.clone();
        let reset_volume = self.reset_volume;
        confirm.on_confirmed(move |_| {
            audio.set_volume(reset_volume);
            info!(volume = reset_volume, "settings_reset");
        });
        confirm.on_cancelled(move |_| debug!(settings = %id, "settings_reset_cancelled"));
        Some(confirm_id)
    }
}

impl DialogView for SettingsDialog {
    fn set_visible(&mut self, visible: bool) {
        self.view.set_visible(visible);
    }

    fn is_visible(&self) -> bool {
        self.view.visible()
    }
}

impl Dialog for SettingsDialog {
    fn on_open(&mut self, id: DialogId, _dialogs: &mut DialogOrchestrator) {
        self.view.mark_opened();
        info!(dialog = %id, volume_text = %self.volume_text(), "settings_opened");
    }

    fn on_close(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {
        self.view.mark_closed();
    }
}

pub(crate) struct CreditsDialog {
    view: PanelView,
    title: String,
    lines: Vec<String>,
}

impl CreditsDialog {
    pub(crate) fn new(config: &CreditsConfig) -> Self {
        Self {
            view: PanelView::default(),
            title: config.title.clone(),
            lines: config.lines.clone(),
        }
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn content(&self) -> String {
        self.lines.join("\n\n")
    }
}

impl DialogView for CreditsDialog {
    fn set_visible(&mut self, visible: bool) {
        self.view.set_visible(visible);
    }

    fn is_visible(&self) -> bool {
        self.view.visible()
    }
}

impl Dialog for CreditsDialog {
    fn on_open(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {
        self.view.mark_opened();
    }

    fn on_close(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {
        self.view.mark_closed();
    }
}

type ConfirmCallback = Box<dyn FnOnce(&mut DialogOrchestrator)>;

pub(crate) struct ConfirmDialog {
    view: PanelView,
    title: String,
    message: String,
    confirmed: Vec<ConfirmCallback>,
    cancelled: Vec<ConfirmCallback>,
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self {
            view: PanelView::default(),
            title: "Confirm".to_string(),
            message: String::new(),
            confirmed: Vec::new(),
            cancelled: Vec::new(),
        }
    }
}

impl ConfirmDialog {
    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub(crate) fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub(crate) fn on_confirmed(&mut self, callback: impl FnOnce(&mut DialogOrchestrator) + 'static) {
        self.confirmed.push(Box::new(callback));
    }

    pub(crate) fn on_cancelled(&mut self, callback: impl FnOnce(&mut DialogOrchestrator) + 'static) {
        self.cancelled.push(Box::new(callback));
    }

    pub(crate) fn confirm(&mut self, id: DialogId, dialogs: &mut DialogOrchestrator) {
        self.cancelled.clear();
        for callback in self.confirmed.drain(..) {
            callback(dialogs);
        }
        dialogs.close(id);
    }

    pub(crate) fn cancel(&mut self, id: DialogId, dialogs: &mut DialogOrchestrator) {
        self.confirmed.clear();
        for callback in self.cancelled.drain(..) {
            callback(dialogs);
        }
        dialogs.close(id);
    }
}

impl DialogView for ConfirmDialog {
    fn set_visible(&mut self, visible: bool) {
        self.view.set_visible(visible);
    }

    fn is_visible(&self) -> bool {
        self.view.visible()
    }
}

impl Dialog for ConfirmDialog {
    fn on_open(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {
        self.view.mark_opened();
    }

    fn on_close(&mut self, _id: DialogId, _dialogs: &mut DialogOrchestrator) {
        self.view.mark_closed();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn orchestrator(audio: &AudioSettings) -> DialogOrchestrator {
        let mut dialogs = DialogOrchestrator::default();
        let audio = audio.clone();
        dialogs.registry_mut().register_dialog(move || {
            SettingsDialog::new(audio.clone(), 1.0, ConfirmConfig::default())
        });
        dialogs.registry_mut().register_dialog(ConfirmDialog::default);
        dialogs
    }

    #[test]
    fn volume_text_rounds_to_percent() {
        let audio = AudioSettings::new(0.333);
        let mut settings = SettingsDialog::new(audio.clone(), 1.0, ConfirmConfig::default());
        assert_eq!(settings.volume_text(), "Volume: 33%");

        settings.set_volume(4.0);

        assert_eq!(audio.volume(), 1.0);
        assert_eq!(settings.volume_text(), "Volume: 100%");
    }

    #[test]
    fn reset_opens_configured_confirm_child() {
        let audio = AudioSettings::new(0.5);
        let mut dialogs = orchestrator(&audio);
        let settings = dialogs.open::<SettingsDialog>(None).expect("settings");

        let confirm = dialogs
            .with_dialog::<SettingsDialog, _, _>(settings, |dialog, id, dialogs| {
                dialog.press_reset(id, dialogs)
            })
            .flatten()
            .expect("confirm");

        assert_eq!(dialogs.children_of(settings), vec![confirm]);
        let dialog = dialogs.get::<ConfirmDialog>(confirm).expect("confirm dialog");
        assert_eq!(dialog.title(), "Reset Settings");
        assert_eq!(
            dialog.message(),
            "Are you sure you want to reset all settings to default?"
        );
    }

    #[test]
    fn confirming_reset_restores_volume_and_closes_confirm() {
        let audio = AudioSettings::new(0.2);
        let mut dialogs = orchestrator(&audio);
        let settings = dialogs.open::<SettingsDialog>(None).expect("settings");
        let confirm = dialogs
            .with_dialog::<SettingsDialog, _, _>(settings, |dialog, id, dialogs| {
                dialog.press_reset(id, dialogs)
            })
            .flatten()
            .expect("confirm");

        dialogs.with_dialog::<ConfirmDialog, _, _>(confirm, |dialog, id, dialogs| {
            dialog.confirm(id, dialogs)
        });

        assert_eq!(audio.volume(), 1.0);
        assert!(!dialogs.contains(confirm));
        assert_eq!(dialogs.all_dialogs(), vec![settings]);
    }

    #[test]
    fn cancelling_runs_only_cancel_callbacks() {
        let mut dialogs = DialogOrchestrator::default();
        dialogs.registry_mut().register_dialog(ConfirmDialog::default);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let id = dialogs.open::<ConfirmDialog>(None).expect("confirm");
        let dialog = dialogs.get_mut::<ConfirmDialog>(id).expect("typed");
        let confirmed = Rc::clone(&calls);
        dialog.on_confirmed(move |_| confirmed.borrow_mut().push("confirmed"));
        let cancelled = Rc::clone(&calls);
        dialog.on_cancelled(move |_| cancelled.borrow_mut().push("cancelled"));

        dialogs.with_dialog::<ConfirmDialog, _, _>(id, |dialog, id, dialogs| {
            dialog.cancel(id, dialogs)
        });

        assert_eq!(*calls.borrow(), vec!["cancelled"]);
        assert!(dialogs.is_empty());
    }

    #[test]
    fn closing_settings_closes_pending_confirm() {
        let audio = AudioSettings::new(0.2);
        let mut dialogs = orchestrator(&audio);
        let settings = dialogs.open::<SettingsDialog>(None).expect("settings");
        dialogs
            .with_dialog::<SettingsDialog, _, _>(settings, |dialog, id, dialogs| {
                dialog.press_reset(id, dialogs)
            })
            .flatten()
            .expect("confirm");

        dialogs.close(settings);

        assert!(dialogs.is_empty());
        assert_eq!(audio.volume(), 0.2);
    }

    #[test]
    fn credits_content_joins_lines_with_blank_line() {
        let credits = CreditsDialog::new(&CreditsConfig::default());
        assert_eq!(credits.title(), "Credits");
        assert_eq!(
            credits.content(),
            "Game Developer: Hemuichi\n\nLevel Design: Ogu"
        );
    }
}
