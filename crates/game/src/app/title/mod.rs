pub(crate) mod dialogs;
pub(crate) mod menu;
pub(crate) mod scenes;

pub(crate) use dialogs::{AudioSettings, ConfirmDialog, CreditsDialog, SettingsDialog};
pub(crate) use menu::{MenuButton, MenuButtonClickService};
pub(crate) use scenes::{scene_key_from_name, GameScene, TitleScene, TITLE_SCENE};
