//! Headless player driver
//!
//! Owns a [`Player`] mounted on a [`SimulatedHost`] and runs prompt commands
//! against it. Interactive mode also runs the simulated playhead on a wall
//! clock and lets the session apply notices and poll ticks as they come.

use crate::commands::{ReplCommand, HELP};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use pocket_playback::{
    format_time, types::PLAYBACK_RATE_PRESETS, MediaItem, Player, PlayerSession,
    PresentationShell, PresentationState, SimulatedHost, TransportState, Upload,
};
use serde::Serialize;
use std::cell::Cell;
use std::collections::HashMap;
use std::future;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Lines to print
    Continue(Vec<String>),
    Quit,
}

/// Snapshot printed by `status`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub active: Option<MediaItem>,
    pub transport: TransportState,
    pub presentation: PresentationState,
    pub queued: usize,
    pub history: usize,
}

/// Terminal stand-in for the platform fullscreen API
///
/// Requests are granted right away; the driver reports the change back to
/// the session after each command.
#[derive(Debug, Default)]
struct TerminalShell {
    granted: Cell<Option<bool>>,
}

impl PresentationShell for TerminalShell {
    fn request_fullscreen(&self) {
        self.granted.set(Some(true));
    }

    fn exit_fullscreen(&self) {
        self.granted.set(Some(false));
    }
}

pub struct Driver {
    player: Player,
    host: SimulatedHost,
    shell: Rc<TerminalShell>,
    clock_tick: Option<Duration>,
}

impl Driver {
    /// Open a session on a fresh simulated host
    pub fn new(config: &CliConfig) -> Self {
        let durations: HashMap<String, Duration> = config
            .simulation
            .durations
            .iter()
            .map(|entry| (entry.url.clone(), Duration::from_secs(entry.secs)))
            .collect();
        let host = SimulatedHost::with_durations(config.simulation.default_duration(), durations);

        let mut driver = Self {
            player: Player::new(config.playback.clone()),
            host,
            shell: Rc::default(),
            clock_tick: config.simulation.clock_tick(),
        };
        driver.open();
        driver
    }

    fn open(&mut self) {
        let shell: Rc<dyn PresentationShell> = self.shell.clone();
        self.player
            .open(Box::new(self.host.clone()))
            .set_presentation_shell(shell);
    }

    fn session(&mut self) -> Result<&mut PlayerSession> {
        Ok(self.player.session_mut()?)
    }

    /// Parse and run one line; blank lines and `#` comments do nothing
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Continue(Vec::new()));
        }
        let command: ReplCommand = line.parse()?;
        self.execute(command)
    }

    /// Run one command and apply whatever the media reported in response
    pub fn execute(&mut self, command: ReplCommand) -> Result<Outcome> {
        debug!(?command, "executing command");
        let output = self.dispatch(command)?;

        if let Ok(session) = self.player.session_mut() {
            if let Some(is_fullscreen) = self.shell.granted.take() {
                session.fullscreen_changed(is_fullscreen);
            }
            session.pump();
        }
        Ok(output)
    }

    fn dispatch(&mut self, command: ReplCommand) -> Result<Outcome> {
        let mut output = Vec::new();

        match command {
            ReplCommand::Help => output.push(HELP.to_string()),
            ReplCommand::Samples => {
                let session = self.session()?;
                output.extend(
                    session
                        .catalog()
                        .entries()
                        .iter()
                        .enumerate()
                        .map(|(index, item)| format!("{:>2}. {}", index + 1, describe(item))),
                );
            }
            ReplCommand::Sample(selector) => {
                let session = self.session()?;
                let url = match selector.parse::<usize>() {
                    Ok(number) => session
                        .catalog()
                        .entries()
                        .get(number.wrapping_sub(1))
                        .map(|item| item.url().to_string())
                        .ok_or_else(|| CliError::invalid("sample", format!("no sample #{number}")))?,
                    Err(_) => selector,
                };
                let item = session.select_sample(&url)?;
                output.push(format!("now playing {}", describe(&item)));
            }
            ReplCommand::Open { url, mime_type } => {
                let session = self.session()?;
                let thumbnail = session.config().default_thumbnail.clone();
                let item = session.select_file(&url, &mime_type, &thumbnail)?;
                output.push(format!("now playing {}", describe(&item)));
            }
            ReplCommand::Upload(path) => {
                let upload = read_upload(&path)?;
                let locator = self.session()?.upload_file(upload)?;
                output.push(format!("uploaded {} as {locator}", path.display()));
            }
            ReplCommand::Enqueue { url, mime_type } => {
                let session = self.session()?;
                let thumbnail = session.config().default_thumbnail.clone();
                let item = MediaItem::from_mime(url, &mime_type, thumbnail)?;
                output.push(format!("queued {}", describe(&item)));
                session.enqueue(item);
            }
            ReplCommand::Next => output.push(match self.session()?.next() {
                Some(item) => format!("now playing {}", describe(&item)),
                None => "queue is empty".to_string(),
            }),
            ReplCommand::Back => output.push(match self.session()?.previous() {
                Some(item) => format!("now playing {}", describe(&item)),
                None => "history is empty".to_string(),
            }),
            ReplCommand::Remove(url) => {
                let session = self.session()?;
                let item = queued(session, &url)?;
                session.remove(&item);
                output.push(format!("removed {url}"));
            }
            ReplCommand::Discard(url) => {
                let session = self.session()?;
                let item = queued(session, &url)?;
                session.discard(&item);
                output.push(format!("discarded {url}"));
            }
            ReplCommand::Clear => {
                self.session()?.clear_queue();
                output.push("queue and history cleared".to_string());
            }
            ReplCommand::Key(code) => match self.session()?.handle_key(&code)? {
                Some(command) => output.push(format!("{code} -> {command:?}")),
                None => output.push(format!("{code} is not bound")),
            },
            ReplCommand::Transport(command) => self.session()?.execute(command)?,
            ReplCommand::VolumeUp => self.session()?.volume_up()?,
            ReplCommand::VolumeDown => self.session()?.volume_down()?,
            ReplCommand::RateUp => {
                let session = self.session()?;
                let step = session.config().rate_step;
                session.set_playback_rate(session.transport().playback_rate + step)?;
            }
            ReplCommand::RateDown => {
                let session = self.session()?;
                let step = session.config().rate_step;
                session.set_playback_rate(session.transport().playback_rate - step)?;
            }
            ReplCommand::Rates => {
                let current = self.session().ok().map(|session| session.transport().playback_rate);
                let presets: Vec<String> = PLAYBACK_RATE_PRESETS
                    .iter()
                    .map(|rate| match current {
                        Some(current) if (current - rate).abs() < 1e-9 => format!("[{rate}x]"),
                        _ => format!("{rate}x"),
                    })
                    .collect();
                output.push(format!("rates: {}", presets.join(" ")));
            }
            ReplCommand::Forward => self.session()?.skip_forward()?,
            ReplCommand::Rewind => self.session()?.skip_back()?,
            ReplCommand::Wait(elapsed) => {
                self.advance_clock(elapsed);
                let state = *self.session()?.transport();
                output.push(format!(
                    "{} / {}",
                    format_time(state.position),
                    format_time(state.duration)
                ));
            }
            ReplCommand::Fullscreen => self.session()?.toggle_fullscreen(),
            ReplCommand::Minimize => self.session()?.toggle_minimize(),
            ReplCommand::Status { json } => {
                let snapshot = self.status()?;
                output.push(if json {
                    serde_json::to_string_pretty(&snapshot)?
                } else {
                    render_status(&snapshot)
                });
            }
            ReplCommand::Queue => {
                let session = self.session()?;
                let queue = session.queue();
                output.push(format!("up next ({}):", queue.len()));
                output.extend(queue.pending().into_iter().map(|item| format!("  {}", describe(item))));
                output.push(format!("history ({}):", queue.history().len()));
                output.extend(queue.history().into_iter().map(|item| format!("  {}", describe(item))));
            }
            ReplCommand::Close => {
                if self.player.close() {
                    output.push("session closed".to_string());
                }
            }
            ReplCommand::Reopen => {
                self.open();
                output.push("session opened".to_string());
            }
            ReplCommand::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Continue(output))
    }

    /// Current session state
    pub fn status(&self) -> Result<StatusSnapshot> {
        let session = self.player.session()?;
        Ok(StatusSnapshot {
            active: session.active_item().cloned(),
            transport: *session.transport(),
            presentation: session.presentation(),
            queued: session.queue().len(),
            history: session.queue().history().len(),
        })
    }

    /// Run the mounted media's clock and apply what it reports
    pub fn advance_clock(&mut self, elapsed: Duration) {
        if let Some(media) = self.host.current() {
            media.advance(elapsed);
        }
        if let Ok(session) = self.player.session_mut() {
            session.pump();
        }
    }

    /// Run every line of a script; errors are printed and do not stop the run
    pub fn run_script(&mut self, script: &str, out: &mut impl Write) -> Result<()> {
        for (number, line) in script.lines().enumerate() {
            match self.execute_line(line) {
                Ok(Outcome::Continue(lines)) => print_lines(out, &lines)?,
                Ok(Outcome::Quit) => break,
                Err(err) => writeln!(out, "line {}: error: {err}", number + 1)?,
            }
        }
        Ok(())
    }

    /// Interactive loop over `input` until EOF or `quit`
    pub async fn run<R>(&mut self, input: R, out: &mut impl Write) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut clock = self.clock_tick.map(|period| {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        info!("interactive session started");
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match self.execute_line(&line) {
                        Ok(Outcome::Continue(output)) => print_lines(out, &output)?,
                        Ok(Outcome::Quit) => break,
                        Err(err) => writeln!(out, "error: {err}")?,
                    }
                    out.flush()?;
                }
                update = next_update(&mut self.player) => {
                    trace!(?update, "session update");
                }
                elapsed = tick(&mut clock) => {
                    self.advance_clock(elapsed);
                }
            }
        }
        Ok(())
    }

    /// Tear the session down
    pub fn close(&mut self) {
        self.player.close();
    }
}

async fn next_update(player: &mut Player) -> pocket_playback::SessionUpdate {
    match player.session_mut() {
        Ok(session) => session.next_update().await,
        Err(_) => future::pending().await,
    }
}

async fn tick(clock: &mut Option<Interval>) -> Duration {
    match clock {
        Some(interval) => {
            interval.tick().await;
            interval.period()
        }
        None => future::pending().await,
    }
}

fn queued(session: &PlayerSession, url: &str) -> Result<MediaItem> {
    session
        .queue()
        .pending()
        .into_iter()
        .find(|item| item.url() == url)
        .cloned()
        .ok_or_else(|| CliError::NotQueued(url.to_string()))
}

fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path)?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Upload::new(name, mime_type.essence_str(), bytes))
}

fn describe(item: &MediaItem) -> String {
    format!("{} ({:?}, {})", item.url(), item.kind(), item.mime_type())
}

fn render_status(status: &StatusSnapshot) -> String {
    let Some(active) = &status.active else {
        return format!("nothing playing ({} queued)", status.queued);
    };
    let transport = &status.transport;
    let mut line = format!(
        "{} {}  {} / {}  vol {:.0}%{}  {:.2}x",
        if transport.is_playing { "playing" } else { "paused" },
        active.url(),
        format_time(transport.position),
        format_time(transport.duration),
        transport.volume * 100.0,
        if transport.is_muted { " (muted)" } else { "" },
        transport.playback_rate,
    );
    if status.presentation.is_fullscreen {
        line.push_str("  [fullscreen]");
    }
    if status.presentation.is_minimized {
        line.push_str("  [minimized]");
    }
    line.push_str(&format!("  {} queued", status.queued));
    line
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Driver {
        Driver::new(&CliConfig::default())
    }

    fn run(driver: &mut Driver, line: &str) -> Vec<String> {
        match driver.execute_line(line).unwrap() {
            Outcome::Continue(lines) => lines,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn numbered_sample_selection() {
        let mut driver = driver();
        let output = run(&mut driver, "sample 5");
        assert_eq!(output, ["now playing /samples/sample5.mp3 (Audio, audio/mpeg)"]);
        assert!(driver.execute_line("sample 0").is_err());
        assert!(driver.execute_line("sample 7").is_err());
    }

    #[test]
    fn fullscreen_round_trip() {
        let mut driver = driver();
        run(&mut driver, "fullscreen");
        assert!(driver.status().unwrap().presentation.is_fullscreen);
        run(&mut driver, "fullscreen");
        assert!(!driver.status().unwrap().presentation.is_fullscreen);
    }

    #[test]
    fn remove_requires_queued_url() {
        let mut driver = driver();
        run(&mut driver, "sample 1");
        assert!(matches!(
            driver.execute_line("remove /nowhere.mp4"),
            Err(CliError::NotQueued(_))
        ));
        run(&mut driver, "remove /samples/sample2.mp4");
        assert_eq!(driver.status().unwrap().queued, 4);
    }

    #[test]
    fn rates_mark_current_preset() {
        let mut driver = driver();
        assert_eq!(
            run(&mut driver, "rates"),
            ["rates: 0.25x 0.5x 0.75x [1x] 1.25x 1.5x 2x 3x 4x"]
        );

        run(&mut driver, "sample 1");
        run(&mut driver, "rate 2");
        assert_eq!(
            run(&mut driver, "rates"),
            ["rates: 0.25x 0.5x 0.75x 1x 1.25x 1.5x [2x] 3x 4x"]
        );

        run(&mut driver, "rate 1.1");
        assert_eq!(
            run(&mut driver, "rates"),
            ["rates: 0.25x 0.5x 0.75x 1x 1.25x 1.5x 2x 3x 4x"]
        );
    }

    #[test]
    fn status_line() {
        let mut driver = driver();
        assert_eq!(run(&mut driver, "status"), ["nothing playing (0 queued)"]);

        run(&mut driver, "sample 1");
        run(&mut driver, "play");
        run(&mut driver, "wait 3");
        assert_eq!(
            run(&mut driver, "status"),
            ["playing /samples/sample1.mp4  0:03 / 0:30  vol 100%  1.00x  5 queued"]
        );
    }
}
