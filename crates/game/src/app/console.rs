use std::collections::HashMap;

use dialog_engine::{DialogId, SceneKey};
use tracing::warn;

use super::title::{scene_key_from_name, MenuButton};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConsoleCommand {
    Help,
    Click(MenuButton),
    Volume(f32),
    Reset,
    Confirm,
    Cancel,
    Close(Option<DialogId>),
    CloseAll,
    Hide(DialogId),
    Top,
    Tree,
    Scene(SceneKey),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CommandParseError {
    reason: String,
    usage: String,
}

impl CommandParseError {
    fn new(reason: impl Into<String>, usage: &str) -> Self {
        Self {
            reason: reason.into(),
            usage: usage.to_string(),
        }
    }
}

type ParseFn = dyn Fn(&[&str]) -> Result<ConsoleCommand, CommandParseError>;

struct CommandSpec {
    name: String,
    help: String,
    arg_schema: String,
    parse: Box<ParseFn>,
}

type Builtin = (
    &'static str,
    &'static str,
    &'static str,
    fn(&[&str]) -> Result<ConsoleCommand, CommandParseError>,
);

const BUILTINS: [Builtin; 13] = [
    ("help", "List commands", "", parse_help),
    (
        "click",
        "Press a title menu button",
        "<button:singleplayer|multiplayer|settings|credits>",
        parse_click,
    ),
    (
        "volume",
        "Move the volume slider of the newest settings dialog",
        "<value:0..1>",
        parse_volume,
    ),
    (
        "reset",
        "Press reset on the newest settings dialog",
        "",
        parse_reset,
    ),
    ("confirm", "Confirm the newest confirm dialog", "", parse_confirm),
    ("cancel", "Cancel the newest confirm dialog", "", parse_cancel),
    (
        "close",
        "Close a dialog and its children (default: top)",
        "[dialog_id:u64]",
        parse_close,
    ),
    ("close_all", "Close every open dialog", "", parse_close_all),
    ("hide", "Hide a dialog without closing it", "<dialog_id:u64>", parse_hide),
    ("top", "Show the most recently opened dialog", "", parse_top),
    ("tree", "Show the open dialog forest", "", parse_tree),
    ("scene", "Switch active scene", "<scene:title|game>", parse_scene),
    ("quit", "Leave the console", "", parse_quit),
];

/// Case-insensitive command table. Help output follows registration order.
pub(crate) struct ConsoleCommandRegistry {
    specs: Vec<CommandSpec>,
    lookup_by_lower_name: HashMap<String, usize>,
}

impl ConsoleCommandRegistry {
    pub(crate) fn new() -> Self {
        Self {
            specs: Vec::new(),
            lookup_by_lower_name: HashMap::new(),
        }
    }

    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, help, arg_schema, parse) in BUILTINS {
            if let Err(reason) = registry.register(name, help, arg_schema, parse) {
                warn!(command = name, reason = %reason, "console_builtin_rejected");
            }
        }
        registry
    }

    pub(crate) fn register<F>(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        arg_schema: impl Into<String>,
        parse: F,
    ) -> Result<(), String>
    where
        F: Fn(&[&str]) -> Result<ConsoleCommand, CommandParseError> + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("command name cannot be empty".to_string());
        }
        let lower = name.to_ascii_lowercase();
        if self.lookup_by_lower_name.contains_key(&lower) {
            return Err(format!("duplicate command registration: {name}"));
        }

        self.specs.push(CommandSpec {
            name,
            help: help.into(),
            arg_schema: arg_schema.into(),
            parse: Box::new(parse),
        });
        self.lookup_by_lower_name.insert(lower, self.specs.len() - 1);
        Ok(())
    }

    fn lookup(&self, input_name: &str) -> Option<&CommandSpec> {
        let index = self
            .lookup_by_lower_name
            .get(&input_name.to_ascii_lowercase())?;
        self.specs.get(*index)
    }

    /// `Ok(None)` for blank lines. The error is the console line to print.
    pub(crate) fn parse_line(&self, raw_line: &str) -> Result<Option<ConsoleCommand>, String> {
        let tokens: Vec<&str> = raw_line.split_whitespace().collect();
        let Some((command_name, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let Some(spec) = self.lookup(command_name) else {
            return Err(format!(
                "error: unknown command '{command_name}'. try: help"
            ));
        };

        (spec.parse)(args)
            .map(Some)
            .map_err(|error| format!("error: {}. usage: {}", error.reason, error.usage))
    }

    pub(crate) fn help_lines(&self) -> Vec<String> {
        self.specs
            .iter()
            .map(|spec| {
                if spec.arg_schema.is_empty() {
                    format!("{} - {}", spec.name, spec.help)
                } else {
                    format!("{} {} - {}", spec.name, spec.arg_schema, spec.help)
                }
            })
            .collect()
    }
}

fn parse_help(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "help")?;
    Ok(ConsoleCommand::Help)
}

fn parse_click(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    let [name] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <button>",
            "click <button>",
        ));
    };
    MenuButton::from_name(name)
        .map(ConsoleCommand::Click)
        .ok_or_else(|| {
            CommandParseError::new(
                format!(
                    "unknown button '{name}' (expected singleplayer|multiplayer|settings|credits)"
                ),
                "click <button>",
            )
        })
}

fn parse_volume(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    let [raw] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <value>",
            "volume <value>",
        ));
    };
    let value = raw.parse::<f32>().map_err(|_| {
        CommandParseError::new(format!("invalid volume '{raw}' (expected f32)"), "volume <value>")
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(CommandParseError::new(
            format!("volume {value} is outside 0..1"),
            "volume <value>",
        ));
    }
    Ok(ConsoleCommand::Volume(value))
}

fn parse_reset(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "reset")?;
    Ok(ConsoleCommand::Reset)
}

fn parse_confirm(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "confirm")?;
    Ok(ConsoleCommand::Confirm)
}

fn parse_cancel(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "cancel")?;
    Ok(ConsoleCommand::Cancel)
}

fn parse_close(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    match args {
        [] => Ok(ConsoleCommand::Close(None)),
        [raw] => parse_dialog_id(raw, "close [dialog_id]").map(|id| ConsoleCommand::Close(Some(id))),
        _ => Err(CommandParseError::new(
            "expected at most one argument [dialog_id]",
            "close [dialog_id]",
        )),
    }
}

fn parse_close_all(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "close_all")?;
    Ok(ConsoleCommand::CloseAll)
}

fn parse_hide(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    let [raw] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <dialog_id>",
            "hide <dialog_id>",
        ));
    };
    parse_dialog_id(raw, "hide <dialog_id>").map(ConsoleCommand::Hide)
}

fn parse_top(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "top")?;
    Ok(ConsoleCommand::Top)
}

fn parse_tree(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "tree")?;
    Ok(ConsoleCommand::Tree)
}

fn parse_scene(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    let [name] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <scene>",
            "scene <scene>",
        ));
    };
    scene_key_from_name(name)
        .map(ConsoleCommand::Scene)
        .ok_or_else(|| {
            CommandParseError::new(
                format!("unknown scene '{name}' (expected title|game)"),
                "scene <scene>",
            )
        })
}

fn parse_quit(args: &[&str]) -> Result<ConsoleCommand, CommandParseError> {
    require_no_args(args, "quit")?;
    Ok(ConsoleCommand::Quit)
}

/// Accepts both `3` and the display form `#3`.
fn parse_dialog_id(raw: &str, usage: &str) -> Result<DialogId, CommandParseError> {
    raw.strip_prefix('#')
        .unwrap_or(raw)
        .parse::<u64>()
        .map(DialogId)
        .map_err(|_| CommandParseError::new(format!("invalid dialog id '{raw}' (expected u64)"), usage))
}

fn require_no_args(args: &[&str], usage: &str) -> Result<(), CommandParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandParseError::new(
            format!("unexpected arguments for '{usage}'"),
            usage,
        ))
    }
}
