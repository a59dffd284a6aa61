// src/control.rs
//! Line-based control input: the play/pause button and option selectors.
//!
//! Commands:
//!
//! | line                          | effect                         |
//! |-------------------------------|--------------------------------|
//! | `toggle`                      | play/pause button              |
//! | `play`, `pause`               | explicit start / stop          |
//! | `graphics <2d\|webgl2>`       | select backend                 |
//! | `resolution <1080p\|4k\|...>` | select resolution preset       |
//! | `workers <on\|off>`           | ship frames to the echo worker |
//! | `transfer <on\|off>`          | move buffers instead of copy   |
//! | `status`                      | log the current loop state     |
//! | `quit`                        | shut down                      |

use crate::backend::GraphicsKey;
use crate::coordinator::OptionChange;
use crate::resolution::ResolutionKey;
use anyhow::{Context, Result};
use log::*;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    TogglePlay,
    Play,
    Pause,
    SetOption(OptionChange),
    Status,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument for '{command}': {reason}")]
    InvalidArgument { command: &'static str, reason: String },
}

fn parse_switch(command: &'static str, value: &str) -> Result<bool, CommandParseError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        other => Err(CommandParseError::InvalidArgument {
            command,
            reason: format!("expected on/off, got '{}'", other),
        }),
    }
}

impl FromStr for ControlCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandParseError::Empty)?;
        let arg = words.next();

        let require = |command: &'static str| arg.ok_or(CommandParseError::MissingArgument(command));
        let invalid = |command: &'static str| {
            move |reason: String| CommandParseError::InvalidArgument { command, reason }
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "toggle" | "p" => ControlCommand::TogglePlay,
            "play" => ControlCommand::Play,
            "pause" => ControlCommand::Pause,
            "status" => ControlCommand::Status,
            "quit" | "exit" | "q" => ControlCommand::Quit,
            "graphics" => ControlCommand::SetOption(OptionChange::Graphics(
                require("graphics")?.parse::<GraphicsKey>().map_err(invalid("graphics"))?,
            )),
            "resolution" => ControlCommand::SetOption(OptionChange::Resolution(
                require("resolution")?.parse::<ResolutionKey>().map_err(invalid("resolution"))?,
            )),
            "workers" => ControlCommand::SetOption(OptionChange::UseWorkers(parse_switch(
                "workers",
                require("workers")?,
            )?)),
            "transfer" => ControlCommand::SetOption(OptionChange::UseTransferables(parse_switch(
                "transfer",
                require("transfer")?,
            )?)),
            other => return Err(CommandParseError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Reads control commands line by line on a background thread.
///
/// End of input is reported as `Quit`. The thread is not joined on drop
/// since it may be blocked on a read.
pub struct ConsoleInputActor {
    _thread_handle: JoinHandle<()>,
}

impl ConsoleInputActor {
    pub fn spawn<R, T>(input: R, command_tx: Sender<T>) -> Result<Self>
    where
        R: BufRead + Send + 'static,
        T: From<ControlCommand> + Send + 'static,
    {
        let thread_handle = thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || Self::run(input, command_tx))
            .context("Failed to spawn console input thread")?;

        info!("ConsoleInputActor spawned successfully");
        Ok(Self {
            _thread_handle: thread_handle,
        })
    }

    fn run<R, T>(input: R, command_tx: Sender<T>)
    where
        R: BufRead,
        T: From<ControlCommand>,
    {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("ConsoleInputActor: Failed to read input: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ControlCommand>() {
                Ok(command) => {
                    debug!("ConsoleInputActor: {:?}", command);
                    if command_tx.send(T::from(command)).is_err() {
                        info!("ConsoleInputActor: Coordinator channel closed, exiting");
                        return;
                    }
                    if command == ControlCommand::Quit {
                        return;
                    }
                }
                Err(e) => warn!("ConsoleInputActor: {}", e),
            }
        }

        info!("ConsoleInputActor: End of input, requesting shutdown");
        let _ = command_tx.send(T::from(ControlCommand::Quit));
    }
}
