#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartJob(crate::Job),
    StartPolling { generation: crate::PollGeneration },
    CancelPolling { generation: crate::PollGeneration },
    SubmitSummary(crate::SummaryRequest),
}
