//! Terminal front end — stdin commands in, rendered views out.

use std::io::Write;

use futures::{Stream, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::courses::{find_course, sample_courses};
use crate::ui::screen::Action;
use crate::ui::view::{Renderer, View};

pub const HELP: &str = "Commands: continue | reset | toggle <N|CODE> | quit";

/// Parse one input line into an action.
///
/// A bare number or course code toggles that card; numbers are 1-based.
pub fn parse_command(line: &str) -> Option<Action> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_ascii_lowercase();
    let arg = parts.next();

    match (command.as_str(), arg) {
        ("continue" | "c", None) => Some(Action::Continue),
        ("reset" | "r", None) => Some(Action::Reset),
        ("quit" | "q" | "exit", None) => Some(Action::Quit),
        ("toggle" | "t", Some(target)) => toggle_target(target),
        (target, None) => toggle_target(target),
        _ => None,
    }
}

fn toggle_target(target: &str) -> Option<Action> {
    let courses = sample_courses();
    let code = match target.parse::<usize>() {
        Ok(n) if (1..=courses.len()).contains(&n) => courses[n - 1].code.to_string(),
        Ok(_) => return None,
        Err(_) => find_course(target)?.code.to_string(),
    };
    Some(Action::ToggleCourse(code))
}

/// Stream of actions read from stdin. Unrecognised lines print the help text.
pub fn stdin_actions() -> impl Stream<Item = Action> + Send + Unpin {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        eprint!("> ");
                        continue;
                    }
                    match parse_command(line) {
                        Some(action) => {
                            if tx.send(action).is_err() {
                                break;
                            }
                        }
                        None => {
                            eprintln!("Unknown command: {line}");
                            eprintln!("{HELP}");
                            eprint!("> ");
                        }
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    Box::pin(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|action| (action, rx))
    }))
}

/// Writes each view to stdout followed by a prompt on stderr.
pub struct StdoutRenderer;

impl Renderer for StdoutRenderer {
    fn render(&mut self, view: &View) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "\n{}", view.render_text());
        let _ = out.flush();
        eprint!("> ");
    }
}
