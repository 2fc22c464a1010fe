#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the query input.
    QueryChanged(String),
    /// User flipped the mode toggle.
    ModeChanged(crate::JobMode),
    /// User edited the result-limit input (raw text, validated on submit).
    LimitChanged(String),
    /// User picked a tab.
    TabSelected(crate::TabId),
    /// User clicked Generate.
    GenerateClicked,
    /// Server acknowledged the start request.
    JobStartAcknowledged { message: Option<String> },
    /// Start request failed in transport or decoding.
    JobStartFailed { error: String },
    /// One poll response for the given poller run.
    ProgressReceived {
        generation: crate::PollGeneration,
        snapshot: crate::ProgressSnapshot,
    },
    /// A poll failed for the given poller run.
    PollFailed {
        generation: crate::PollGeneration,
        error: String,
    },
    /// User clicked Cancel while an analysis is running.
    CancelClicked,
    /// User clicked a row to expand or collapse it (`group` is 0-based).
    RowToggled { group: usize, local_index: usize },
    /// User removed a row from a table.
    RowRemoved { group: usize, local_index: usize },
    /// User moved a table to another page (0-based).
    PageChanged { group: usize, page: usize },
    /// User typed into a table's search box.
    FilterChanged { group: usize, text: String },
    /// User clicked a column header to sort a table.
    SortChanged {
        group: usize,
        column: crate::SortColumn,
    },
    /// User clicked Generate Summary.
    SummaryClicked,
    /// Summary service returned formatted output.
    SummaryReady { formatted_output: String },
    /// Summary service reported an error, or the request failed.
    SummaryFailed { error: String },
    /// User dismissed the notification banner.
    NotificationDismissed,
    /// UI tick driving cosmetic animation.
    Tick,
}
