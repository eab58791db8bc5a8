use dialog_engine::{DialogOrchestrator, SceneCommand};
use tracing::info;

use super::dialogs::{CreditsDialog, SettingsDialog};
use super::scenes::GAME_SCENE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuButton {
    Singleplayer,
    Multiplayer,
    Settings,
    Credits,
}

impl MenuButton {
    pub(crate) const ALL: [MenuButton; 4] = [
        MenuButton::Singleplayer,
        MenuButton::Multiplayer,
        MenuButton::Settings,
        MenuButton::Credits,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            MenuButton::Singleplayer => "singleplayer",
            MenuButton::Multiplayer => "multiplayer",
            MenuButton::Settings => "settings",
            MenuButton::Credits => "credits",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|button| button.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Default)]
pub(crate) struct MenuButtonClickService;

impl MenuButtonClickService {
    pub(crate) fn click(&self, button: MenuButton, dialogs: &mut DialogOrchestrator) -> SceneCommand {
        info!(button = button.name(), "menu_button_clicked");
        match button {
            MenuButton::Singleplayer => SceneCommand::SwitchTo(GAME_SCENE),
            MenuButton::Multiplayer => SceneCommand::None,
            MenuButton::Settings => {
                dialogs.open::<SettingsDialog>(None);
                SceneCommand::None
            }
            MenuButton::Credits => {
                dialogs.open::<CreditsDialog>(None);
                SceneCommand::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::AppConfig;
    use crate::app::title::dialogs::AudioSettings;
    use crate::app::title::scenes::title_templates;
    use dialog_engine::SceneDialogRegistrar;

    #[test]
    fn button_names_round_trip_case_insensitively() {
        for button in MenuButton::ALL {
            assert_eq!(MenuButton::from_name(button.name()), Some(button));
        }
        assert_eq!(MenuButton::from_name("SETTINGS"), Some(MenuButton::Settings));
        assert_eq!(MenuButton::from_name("options"), None);
    }

    #[test]
    fn dialog_buttons_open_root_dialogs() {
        let mut dialogs = DialogOrchestrator::default();
        let config = AppConfig::default();
        let mut registrar = SceneDialogRegistrar::register_templates(
            "title",
            title_templates(&config, &AudioSettings::new(1.0)),
            &mut dialogs,
        );
        let service = MenuButtonClickService;

        assert_eq!(
            service.click(MenuButton::Settings, &mut dialogs),
            SceneCommand::None
        );
        assert_eq!(
            service.click(MenuButton::Credits, &mut dialogs),
            SceneCommand::None
        );

        let open = dialogs.all_dialogs();
        assert_eq!(open.len(), 2);
        assert!(dialogs.get::<SettingsDialog>(open[0]).is_some());
        assert!(dialogs.get::<CreditsDialog>(open[1]).is_some());
        assert_eq!(dialogs.parent_of(open[1]), None);
        registrar.teardown(&mut dialogs);
    }

    #[test]
    fn singleplayer_requests_game_scene_and_multiplayer_does_nothing() {
        let mut dialogs = DialogOrchestrator::default();
        let service = MenuButtonClickService;

        assert_eq!(
            service.click(MenuButton::Singleplayer, &mut dialogs),
            SceneCommand::SwitchTo(GAME_SCENE)
        );
        assert_eq!(
            service.click(MenuButton::Multiplayer, &mut dialogs),
            SceneCommand::None
        );
        assert!(dialogs.is_empty());
    }

    #[test]
    fn dialog_buttons_without_registration_open_nothing() {
        let mut dialogs = DialogOrchestrator::default();

        MenuButtonClickService.click(MenuButton::Credits, &mut dialogs);

        assert!(dialogs.is_empty());
    }
}
