use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail};
use chrono::Local;
use report_core::{update, AppState, JobMode, Msg, PollerStatus};
use report_engine::{export_report, EngineHandle};
use report_logging::{report_info, report_warn};

use super::commands::{parse_command, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::render::render;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Everything the session loop reacts to.
#[derive(Debug)]
pub enum Input {
    Msg(Msg),
    Export(PathBuf),
    Show,
    Help,
    Quit,
}

/// One non-interactive pass: analyse, optionally summarize and export.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub query: String,
    pub mode: JobMode,
    pub limit: Option<String>,
    pub summary: bool,
    pub export: Option<PathBuf>,
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    inbox: mpsc::Receiver<Input>,
    echo: bool,
    last_frame: String,
}

impl Session {
    fn start(config: &AppConfig, echo: bool) -> anyhow::Result<(Self, mpsc::Sender<Input>)> {
        let (input_tx, inbox) = mpsc::channel();
        let engine = EngineHandle::new(config.client_settings())?;
        let runner = EffectRunner::new(engine, input_tx.clone());
        spawn_ticker(input_tx.clone());
        report_info!("Session started against {}", config.base_url);

        let session = Self {
            state: AppState::with_page_size(config.page_size),
            runner,
            inbox,
            echo,
            last_frame: String::new(),
        };
        Ok((session, input_tx))
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects);
        if was_dirty && self.echo {
            self.draw(false);
        }
    }

    fn draw(&mut self, force: bool) {
        let frame = render(&self.state.view());
        if force || frame != self.last_frame {
            println!("{frame}");
            self.last_frame = frame;
        }
    }

    fn export(&self, dir: &Path) -> anyhow::Result<()> {
        let stamp = Local::now().format("%m%d%y%H%M").to_string();
        let content = self.state.report().content().unwrap_or_default();
        let summary = export_report(dir, &stamp, content)?;
        println!(
            "Saved {} and {}",
            summary.html_path.display(),
            summary.text_path.display()
        );
        Ok(())
    }

    /// Feeds messages into `update` until `done` holds.
    fn wait_until(&mut self, done: impl Fn(&AppState) -> bool) -> anyhow::Result<()> {
        while !done(&self.state) {
            match self.inbox.recv() {
                Ok(Input::Msg(msg)) => self.dispatch(msg),
                Ok(_) => {}
                Err(_) => bail!("all input sources closed"),
            }
        }
        Ok(())
    }
}

fn spawn_ticker(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        while input_tx.send(Input::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

pub fn run_script(config: &AppConfig, options: ScriptOptions) -> anyhow::Result<()> {
    let (mut session, _input_tx) = Session::start(config, false)?;

    session.dispatch(Msg::QueryChanged(options.query));
    session.dispatch(Msg::ModeChanged(options.mode));
    session.dispatch(Msg::LimitChanged(options.limit.unwrap_or_default()));
    session.dispatch(Msg::GenerateClicked);
    if let Some(error) = session.state.view().validation_error {
        bail!(error);
    }

    session.wait_until(|state| {
        !matches!(
            state.poller().status(),
            PollerStatus::Idle | PollerStatus::Polling
        ) || state.view().notification.is_some()
    })?;
    if session.state.poller().status() != PollerStatus::Terminal {
        let reason = session
            .state
            .view()
            .notification
            .unwrap_or_else(|| "analysis did not complete".to_string());
        bail!(reason);
    }
    session.draw(true);

    if !options.summary {
        return Ok(());
    }
    session.dispatch(Msg::SummaryClicked);
    if let Some(error) = session.state.view().validation_error {
        bail!(error);
    }
    session.wait_until(|state| !state.report().is_pending())?;
    session.draw(true);
    if let Some(error) = session.state.report().error() {
        bail!("summary failed: {error}");
    }

    if let Some(dir) = options.export {
        session.export(&dir)?;
    }
    Ok(())
}

pub fn run_shell(config: &AppConfig) -> anyhow::Result<()> {
    let (mut session, input_tx) = Session::start(config, true)?;
    spawn_stdin_reader(input_tx);
    println!("{HELP}\n");
    session.draw(true);

    loop {
        let input = session
            .inbox
            .recv()
            .map_err(|_| anyhow!("all input sources closed"))?;
        match input {
            Input::Msg(msg) => session.dispatch(msg),
            Input::Export(dir) => {
                if let Err(err) = session.export(&dir) {
                    report_warn!("Export to {} failed: {:#}", dir.display(), err);
                    println!("Export failed: {err:#}");
                }
            }
            Input::Show => session.draw(true),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    if session.state.poller().is_polling() {
        session.dispatch(Msg::CancelClicked);
    }
    report_info!("Shell closed on the {} tab", session.state.view().tab.label());
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(Some(input)) => {
                    if input_tx.send(input).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => println!("{err:#}"),
            }
        }
        let _ = input_tx.send(Input::Quit);
    });
}
