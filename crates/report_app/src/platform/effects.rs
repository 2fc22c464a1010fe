use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use report_core::{Effect, Msg};
use report_engine::{EngineEvent, EngineHandle, SummaryOutcome};
use report_logging::{report_debug, report_info};

use super::app::Input;

const EVENT_WAIT: Duration = Duration::from_millis(100);

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, input_tx: mpsc::Sender<Input>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(input_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob(job) => {
                    report_info!("StartJob mode={} limit={:?}", job.mode.label(), job.result_limit);
                    self.engine.start_job(job);
                }
                Effect::StartPolling { generation } => {
                    self.engine.start_polling(generation);
                }
                Effect::CancelPolling { generation } => {
                    self.engine.cancel_polling(generation);
                }
                Effect::SubmitSummary(request) => {
                    report_info!("SubmitSummary rows={}", request.rows.len());
                    self.engine.submit_summary(request);
                }
            }
        }
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<Input>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(EVENT_WAIT) else {
                continue;
            };
            if input_tx.send(Input::Msg(event_to_msg(event))).is_err() {
                report_debug!("input channel closed; engine event loop exiting");
                break;
            }
        });
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobStarted { result: Ok(ack) } => Msg::JobStartAcknowledged {
            message: ack.message,
        },
        EngineEvent::JobStarted { result: Err(err) } => Msg::JobStartFailed {
            error: err.to_string(),
        },
        EngineEvent::Progress {
            generation,
            result: Ok(snapshot),
        } => Msg::ProgressReceived {
            generation,
            snapshot,
        },
        EngineEvent::Progress {
            generation,
            result: Err(err),
        } => Msg::PollFailed {
            generation,
            error: err.to_string(),
        },
        EngineEvent::SummaryCompleted {
            result: Ok(SummaryOutcome::Ready { formatted_output }),
        } => Msg::SummaryReady { formatted_output },
        EngineEvent::SummaryCompleted {
            result: Ok(SummaryOutcome::Rejected { error }),
        } => Msg::SummaryFailed { error },
        EngineEvent::SummaryCompleted { result: Err(err) } => Msg::SummaryFailed {
            error: err.to_string(),
        },
    }
}
