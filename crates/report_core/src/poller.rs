use report_logging::{report_debug, report_info, report_warn};

/// Identifies one run of the poller so late responses can be recognised.
pub type PollGeneration = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerStatus {
    #[default]
    Idle,
    Polling,
    Terminal,
    Cancelled,
    Failed,
}

/// Pure half of the progress poller: decides whether a poll may start and
/// whether an incoming response still belongs to the live run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollerState {
    status: PollerStatus,
    generation: PollGeneration,
}

impl PollerState {
    pub fn status(&self) -> PollerStatus {
        self.status
    }

    pub fn generation(&self) -> PollGeneration {
        self.generation
    }

    pub fn is_polling(&self) -> bool {
        self.status == PollerStatus::Polling
    }

    /// Begins a new run. Refused while a run is active.
    pub fn start(&mut self) -> Option<PollGeneration> {
        if self.is_polling() {
            report_warn!(
                "Poller already running (generation {}); start ignored",
                self.generation
            );
            return None;
        }
        self.generation += 1;
        self.status = PollerStatus::Polling;
        report_info!("Poller started (generation {})", self.generation);
        Some(self.generation)
    }

    pub fn cancel(&mut self) -> bool {
        if !self.is_polling() {
            return false;
        }
        self.status = PollerStatus::Cancelled;
        report_info!("Poller cancelled (generation {})", self.generation);
        true
    }

    /// True when a response tagged with `generation` may still be applied.
    pub fn accepts(&self, generation: PollGeneration) -> bool {
        let live = self.is_polling() && generation == self.generation;
        if !live {
            report_debug!(
                "Discarding stale poll response (generation {}, current {}, status {:?})",
                generation,
                self.generation,
                self.status
            );
        }
        live
    }

    pub(crate) fn finish(&mut self) {
        if self.is_polling() {
            self.status = PollerStatus::Terminal;
        }
    }

    pub(crate) fn fail(&mut self) {
        if self.is_polling() {
            self.status = PollerStatus::Failed;
        }
    }
}
