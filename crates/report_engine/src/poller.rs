use std::sync::{mpsc, Arc};
use std::time::Duration;

use report_core::PollGeneration;
use report_logging::{report_debug, report_info, report_warn};
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::ReportApi;
use crate::EngineEvent;

/// Where the engine delivers its events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

struct ActivePoll {
    generation: PollGeneration,
    token: CancellationToken,
}

/// Owns at most one polling task at a time.
pub struct ProgressPoller {
    interval: Duration,
    active: Option<ActivePoll>,
}

impl ProgressPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: None,
        }
    }

    /// True while a task is running. A task that stopped on its own
    /// (terminal snapshot or error) cancels its token, which counts as inactive.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.token.is_cancelled())
    }

    pub fn active_generation(&self) -> Option<PollGeneration> {
        self.active
            .as_ref()
            .filter(|active| !active.token.is_cancelled())
            .map(|active| active.generation)
    }

    /// Spawns the poll task on `runtime`. Returns false, and spawns nothing,
    /// when a task is already running.
    pub fn start(
        &mut self,
        runtime: &Handle,
        generation: PollGeneration,
        api: Arc<dyn ReportApi>,
        sink: Arc<dyn EventSink>,
    ) -> bool {
        if let Some(current) = self.active_generation() {
            report_warn!(
                "poll start for generation {} refused: generation {} still polling",
                generation,
                current
            );
            return false;
        }

        let token = CancellationToken::new();
        self.active = Some(ActivePoll {
            generation,
            token: token.clone(),
        });
        report_info!("polling started (generation {})", generation);
        runtime.spawn(poll_loop(api, sink, generation, self.interval, token));
        true
    }

    /// Cancels the running task, if any. Only a matching generation is
    /// cancelled when one is given.
    pub fn cancel(&mut self, generation: Option<PollGeneration>) -> bool {
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        if generation.is_some_and(|wanted| wanted != active.generation) {
            report_debug!(
                "cancel for generation {:?} ignored: active generation is {}",
                generation,
                active.generation
            );
            return false;
        }
        let was_running = !active.token.is_cancelled();
        active.token.cancel();
        if was_running {
            report_info!("polling cancelled (generation {})", active.generation);
        }
        self.active = None;
        was_running
    }
}

impl Drop for ProgressPoller {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
        }
    }
}

async fn poll_loop(
    api: Arc<dyn ReportApi>,
    sink: Arc<dyn EventSink>,
    generation: PollGeneration,
    period: Duration,
    token: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    // A slow response pushes the next tick back instead of bunching requests.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let result = api.poll_progress().await;
        if token.is_cancelled() {
            report_debug!("dropping stale progress response (generation {})", generation);
            return;
        }

        let finished = match &result {
            Ok(snapshot) if snapshot.terminal() => {
                report_info!("analysis complete (generation {})", generation);
                true
            }
            Ok(snapshot) => {
                report_debug!("progress {}% (generation {})", snapshot.percent, generation);
                false
            }
            Err(err) => {
                report_warn!("progress poll failed (generation {}): {}", generation, err);
                true
            }
        };

        if finished {
            token.cancel();
        }
        sink.emit(EngineEvent::Progress { generation, result });
        if finished {
            return;
        }
    }
}
