//! Line-oriented operator surface read from stdin.

use std::{
    io::{self, BufRead},
    thread,
};

use crossbeam_channel::Sender;
use shared::domain::{ControlSignal, GestureMove};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorInput {
    Move(GestureMove),
    End,
    SetLimit(f64),
    Signal(ControlSignal),
    ShowPose,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown command '{0}' (expected move, end, limit, signal, pose or quit)")]
    UnknownCommand(String),
    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("unknown signal '{0}' (expected start, reset, calib or closed)")]
    UnknownSignal(String),
}

/// Parses one operator line. Blank lines yield `Ok(None)`.
///
/// A bare `move`, or one whose distance does not parse, becomes a move
/// without distance. A distance token must be followed by an angle.
pub fn parse_line(line: &str) -> Result<Option<OperatorInput>, InputError> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "move" => match tokens.next() {
            None => OperatorInput::Move(GestureMove::without_distance(0.0)),
            Some(raw) => {
                let angle = parse_number(tokens.next(), "move", "angle")?;
                OperatorInput::Move(GestureMove {
                    distance: raw.parse::<f64>().ok(),
                    angle,
                })
            }
        },
        "end" => OperatorInput::End,
        "limit" => OperatorInput::SetLimit(parse_number(tokens.next(), "limit", "value")?),
        "signal" => {
            let raw = tokens.next().ok_or(InputError::MissingArgument {
                command: "signal",
                argument: "name",
            })?;
            let signal =
                ControlSignal::parse(raw).ok_or_else(|| InputError::UnknownSignal(raw.into()))?;
            OperatorInput::Signal(signal)
        }
        "pose" => OperatorInput::ShowPose,
        "quit" | "exit" => OperatorInput::Quit,
        _ => return Err(InputError::UnknownCommand(verb.to_string())),
    };
    Ok(Some(input))
}

fn parse_number(
    token: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<f64, InputError> {
    let raw = token.ok_or(InputError::MissingArgument { command, argument })?;
    raw.parse::<f64>()
        .map_err(|_| InputError::InvalidNumber(raw.to_string()))
}

/// Queues one input for the session thread. Returns `false` once the
/// session side has gone away.
pub fn dispatch_operator_input(tx: &Sender<OperatorInput>, input: OperatorInput) -> bool {
    match tx.send(input) {
        Ok(()) => {
            debug!(?input, "queued operator input");
            true
        }
        Err(_) => {
            warn!("control session disconnected; stopping operator input");
            false
        }
    }
}

/// Reads stdin on its own thread until EOF or `quit`.
pub fn spawn_stdin_reader(tx: Sender<OperatorInput>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "failed to read operator input");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Some(input)) => {
                    if !dispatch_operator_input(&tx, input) || input == OperatorInput::Quit {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => eprintln!("{err}"),
            }
        }
        dispatch_operator_input(&tx, OperatorInput::Quit);
    })
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
