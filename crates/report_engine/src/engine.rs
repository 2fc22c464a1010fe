use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use report_core::{Job, PollGeneration, SummaryRequest};
use report_logging::{report_debug, report_info, report_warn};

use crate::api::{ClientSettings, ReportApi, ReqwestReportApi};
use crate::poller::{ChannelEventSink, EventSink, ProgressPoller};
use crate::{EngineError, EngineEvent};

enum EngineCommand {
    StartJob(Job),
    StartPolling { generation: PollGeneration },
    CancelPolling { generation: PollGeneration },
    SubmitSummary(SummaryRequest),
}

/// Command/event bridge to the engine thread.
///
/// The thread owns a tokio runtime and the [`ProgressPoller`]; dropping every
/// handle closes the command channel, which stops the thread and its tasks.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestReportApi::new(&settings)?);
        Self::with_api(api, settings.poll_interval)
    }

    pub fn with_api(
        api: Arc<dyn ReportApi>,
        poll_interval: Duration,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let mut poller = ProgressPoller::new(poll_interval);
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &mut poller, &api, &sink, command);
            }
            report_debug!("engine command channel closed");
            poller.cancel(None);
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn start_job(&self, job: Job) {
        self.send(EngineCommand::StartJob(job));
    }

    pub fn start_polling(&self, generation: PollGeneration) {
        self.send(EngineCommand::StartPolling { generation });
    }

    pub fn cancel_polling(&self, generation: PollGeneration) {
        self.send(EngineCommand::CancelPolling { generation });
    }

    pub fn submit_summary(&self, request: SummaryRequest) {
        self.send(EngineCommand::SubmitSummary(request));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            report_warn!("engine thread has stopped; command dropped");
        }
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    poller: &mut ProgressPoller,
    api: &Arc<dyn ReportApi>,
    sink: &Arc<dyn EventSink>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::StartJob(job) => {
            report_info!(
                "starting analysis: mode={:?} limit={:?} query_len={}",
                job.mode,
                job.result_limit,
                job.query.len()
            );
            let api = api.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = api.start_analysis(&job).await;
                match &result {
                    Ok(ack) => report_info!("analysis accepted: {:?}", ack.message),
                    Err(err) => report_warn!("analysis start failed: {}", err),
                }
                sink.emit(EngineEvent::JobStarted { result });
            });
        }
        EngineCommand::StartPolling { generation } => {
            poller.start(runtime.handle(), generation, api.clone(), sink.clone());
        }
        EngineCommand::CancelPolling { generation } => {
            poller.cancel(Some(generation));
        }
        EngineCommand::SubmitSummary(request) => {
            report_info!("submitting summary for {} rows", request.rows.len());
            let api = api.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = api.generate_summary(&request).await;
                if let Err(err) = &result {
                    report_warn!("summary request failed: {}", err);
                }
                sink.emit(EngineEvent::SummaryCompleted { result });
            });
        }
    }
}
