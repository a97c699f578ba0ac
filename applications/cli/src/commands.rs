//! Prompt and script commands
//!
//! One command per line, arguments separated by whitespace. The same grammar
//! is used by the interactive prompt and by script files.

use crate::error::{CliError, Result};
use pocket_playback::TransportCommand;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const HELP: &str = "\
commands:
  samples                     list sample media
  sample <url|number>         play a sample and queue the ones after it
  open <url> <mime>           play a url right away
  upload <path>               play a local file right away
  enqueue <url> <mime>        add a url to the end of the queue
  next | back                 queue navigation
  remove <url> | discard <url>
  clear                       empty queue and history
  play | mute | restart
  vol <0..1|+|->              volume
  rate <rate|+|->             playback rate
  rates                       list rate presets
  seek <secs> | skip <secs> | forward | rewind
  key <code>                  simulate a key press (Space, KeyM, ArrowUp, ...)
  wait <secs>                 run the simulated clock
  fullscreen | minimize
  status [--json] | queue
  close | reopen | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Help,
    Samples,
    /// Catalog url or 1-based catalog number
    Sample(String),
    Open { url: String, mime_type: String },
    Upload(PathBuf),
    Enqueue { url: String, mime_type: String },
    Next,
    Back,
    Remove(String),
    Discard(String),
    Clear,
    Key(String),
    Transport(TransportCommand),
    VolumeUp,
    VolumeDown,
    RateUp,
    RateDown,
    Rates,
    Forward,
    Rewind,
    Wait(Duration),
    Fullscreen,
    Minimize,
    Status { json: bool },
    Queue,
    Close,
    Reopen,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CliError::UnknownCommand(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => ReplCommand::Help,
            "samples" => ReplCommand::Samples,
            "sample" => ReplCommand::Sample(one(&args, "sample")?.to_string()),
            "open" => {
                let (url, mime_type) = two(&args, "open")?;
                ReplCommand::Open { url, mime_type }
            }
            "upload" => ReplCommand::Upload(PathBuf::from(one(&args, "upload")?)),
            "enqueue" | "add" => {
                let (url, mime_type) = two(&args, "enqueue")?;
                ReplCommand::Enqueue { url, mime_type }
            }
            "next" => ReplCommand::Next,
            "back" | "previous" | "prev" => ReplCommand::Back,
            "remove" => ReplCommand::Remove(one(&args, "remove")?.to_string()),
            "discard" => ReplCommand::Discard(one(&args, "discard")?.to_string()),
            "clear" => ReplCommand::Clear,
            "key" => ReplCommand::Key(one(&args, "key")?.to_string()),
            "play" | "pause" | "toggle" => ReplCommand::Transport(TransportCommand::TogglePlayPause),
            "mute" | "unmute" => ReplCommand::Transport(TransportCommand::ToggleMute),
            "restart" => ReplCommand::Transport(TransportCommand::Restart),
            "vol" | "volume" => match one(&args, "vol")? {
                "+" => ReplCommand::VolumeUp,
                "-" => ReplCommand::VolumeDown,
                value => ReplCommand::Transport(TransportCommand::SetVolume(number(value, "vol")?)),
            },
            "rate" => match one(&args, "rate")? {
                "+" => ReplCommand::RateUp,
                "-" => ReplCommand::RateDown,
                value => ReplCommand::Transport(TransportCommand::SetPlaybackRate(number(value, "rate")?)),
            },
            "rates" => ReplCommand::Rates,
            "seek" => ReplCommand::Transport(TransportCommand::Seek(number(one(&args, "seek")?, "seek")?)),
            "skip" => ReplCommand::Transport(TransportCommand::SeekBy(number(one(&args, "skip")?, "skip")?)),
            "forward" | "ff" => ReplCommand::Forward,
            "rewind" | "rw" => ReplCommand::Rewind,
            "wait" => {
                let secs = number(one(&args, "wait")?, "wait")?;
                let duration = Duration::try_from_secs_f64(secs)
                    .map_err(|_| CliError::invalid("wait", format!("{secs} is not a valid duration")))?;
                ReplCommand::Wait(duration)
            }
            "fullscreen" | "fs" => ReplCommand::Fullscreen,
            "minimize" | "min" => ReplCommand::Minimize,
            "status" => ReplCommand::Status {
                json: args.iter().any(|arg| *arg == "--json"),
            },
            "queue" | "q" => ReplCommand::Queue,
            "close" => ReplCommand::Close,
            "reopen" => ReplCommand::Reopen,
            "quit" | "exit" => ReplCommand::Quit,
            _ => return Err(CliError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

fn one<'a>(args: &[&'a str], command: &'static str) -> Result<&'a str> {
    match args {
        [value] => Ok(*value),
        _ => Err(CliError::invalid(command, format!("expected 1 argument, got {}", args.len()))),
    }
}

fn two(args: &[&str], command: &'static str) -> Result<(String, String)> {
    match args {
        [first, second] => Ok(((*first).to_string(), (*second).to_string())),
        _ => Err(CliError::invalid(command, format!("expected 2 arguments, got {}", args.len()))),
    }
}

fn number(value: &str, command: &'static str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| CliError::invalid(command, format!("`{value}` is not a number")))
}
