use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::session::TitleSession;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let mut session = match TitleSession::new(&app.config) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let result = match &app.script {
        Some(path) => match fs::read_to_string(path) {
            Ok(script) => {
                info!(path = %path.display(), "script_loaded");
                drive(&mut session, script.lines().map(|line| Ok(line.to_string())), true)
            }
            Err(err) => Err(err),
        },
        None => drive(&mut session, io::stdin().lock().lines(), app.config.echo_prompt),
    };

    info!(
        scene = ?session.active_scene().map(|key| key.0),
        open_dialogs = session.dialogs().len(),
        "console_finished"
    );
    session.shutdown();
    if let Err(err) = result {
        error!(error = %err, "console_input_failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Feeds console lines into the session until input ends or `quit` runs.
fn drive<I>(session: &mut TitleSession, lines: I, echo: bool) -> io::Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        let line = line?;
        if echo {
            writeln!(out, "> {line}")?;
        }
        for output in session.execute_line(&line) {
            writeln!(out, "{output}")?;
        }
        if session.quit_requested() {
            break;
        }
    }
    out.flush()
}
