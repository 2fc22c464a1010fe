use report_logging::{report_info, report_warn};

use crate::{
    AppState, Effect, JobRequestBuilder, Msg, SummaryRequestBuilder, TabId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(query) => {
            if state.set_query_input(query) {
                state.set_validation_error(None);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModeChanged(mode) => {
            if state.set_mode(mode) {
                report_info!("Switched to {}", mode.label());
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LimitChanged(limit) => {
            if state.set_limit_input(limit) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TabSelected(tab) => {
            if state.tab_mut().switch_to(tab) {
                // An inline error belongs to the view it was raised on.
                state.set_validation_error(None);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GenerateClicked => generate(&mut state),
        Msg::JobStartAcknowledged { message } => {
            if !state.is_start_pending() {
                return (state, Vec::new());
            }
            state.set_start_pending(false);
            report_info!(
                "Report generation started: {}",
                message.as_deref().unwrap_or("(no message)")
            );
            match state.poller_mut().start() {
                Some(generation) => vec![Effect::StartPolling { generation }],
                None => Vec::new(),
            }
        }
        Msg::JobStartFailed { error } => {
            if !state.is_start_pending() {
                return (state, Vec::new());
            }
            report_warn!("Starting report generation failed: {}", error);
            state.set_start_pending(false);
            state.set_analysis_percent(None);
            state.set_notification(Some(format!(
                "An error occurred while starting report generation: {error}"
            )));
            state.tab_mut().switch_to(TabId::Query);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ProgressReceived {
            generation,
            snapshot,
        } => {
            if !state.poller().accepts(generation) {
                return (state, Vec::new());
            }
            state.set_analysis_percent(Some(snapshot.percent));
            if snapshot.terminal() {
                state.poller_mut().finish();
                report_info!(
                    "Analysis complete with {} result(s)",
                    snapshot.results.len()
                );
                state.show_snapshot_results(&snapshot);
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::PollFailed { generation, error } => {
            if !state.poller().accepts(generation) {
                return (state, Vec::new());
            }
            report_warn!("Fetching progress failed: {}", error);
            state.poller_mut().fail();
            state.set_analysis_percent(None);
            state.set_notification(Some(format!("Error fetching progress: {error}")));
            state.mark_dirty();
            Vec::new()
        }
        Msg::CancelClicked => {
            if state.poller_mut().cancel() {
                let generation = state.poller().generation();
                state.set_analysis_percent(None);
                state.set_notification(Some("Analysis cancelled.".to_string()));
                state.mark_dirty();
                vec![Effect::CancelPolling { generation }]
            } else if state.is_start_pending() {
                report_info!("Cancelled before the server acknowledged the job");
                state.set_start_pending(false);
                state.set_analysis_percent(None);
                state.set_notification(Some("Analysis cancelled.".to_string()));
                state.mark_dirty();
                Vec::new()
            } else {
                Vec::new()
            }
        }
        Msg::RowToggled { group, local_index } => {
            if state.records_mut().toggle_row(group, local_index) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RowRemoved { group, local_index } => {
            if state.records_mut().remove_row(group, local_index) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PageChanged { group, page } => {
            if state.records_mut().set_page(group, page) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FilterChanged { group, text } => {
            if state.records_mut().set_filter(group, &text) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SortChanged { group, column } => {
            if state.records_mut().sort_by(group, column) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SummaryClicked => summarize(&mut state),
        Msg::SummaryReady { formatted_output } => {
            if state.report().is_pending() {
                report_info!("Summary received ({} bytes)", formatted_output.len());
                state.report_mut().succeed(formatted_output);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SummaryFailed { error } => {
            if state.report().is_pending() {
                report_warn!("Summary generation failed: {}", error);
                state.report_mut().fail(error);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NotificationDismissed => {
            if state.set_notification(None) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick => {
            if state.report_mut().advance() {
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn generate(state: &mut AppState) -> Vec<Effect> {
    if state.poller().is_polling() || state.is_start_pending() {
        report_warn!("Generate ignored: an analysis is already running");
        if state.set_notification(Some("An analysis is already running.".to_string())) {
            state.mark_dirty();
        }
        return Vec::new();
    }

    let job = match JobRequestBuilder::build(state.query_input(), state.mode(), state.limit_input())
    {
        Ok(job) => job,
        Err(error) => {
            report_info!("Generate rejected: {}", error);
            if state.set_validation_error(Some(error)) {
                state.mark_dirty();
            }
            return Vec::new();
        }
    };

    report_info!(
        "Starting analysis: query_len={} mode={:?} limit={:?}",
        job.query.len(),
        job.mode,
        job.result_limit
    );
    state.set_validation_error(None);
    state.tab_mut().switch_to(TabId::Records);
    state.reset_for_new_job();
    state.set_start_pending(true);
    state.mark_dirty();
    vec![Effect::StartJob(job)]
}

fn summarize(state: &mut AppState) -> Vec<Effect> {
    if state.report().is_pending() {
        report_warn!("Summary ignored: a summary is already being generated");
        if state.set_notification(Some("A summary is already being generated.".to_string())) {
            state.mark_dirty();
        }
        return Vec::new();
    }

    let request = match SummaryRequestBuilder::build(state.query_input(), state.records()) {
        Ok(request) => request,
        Err(error) => {
            report_info!("Summary rejected: {}", error);
            if state.set_validation_error(Some(error)) {
                state.mark_dirty();
            }
            return Vec::new();
        }
    };

    report_info!("Submitting summary for {} row(s)", request.rows.len());
    state.set_validation_error(None);
    state.tab_mut().switch_to(TabId::Report);
    state.report_mut().begin();
    state.mark_dirty();
    vec![Effect::SubmitSummary(request)]
}
