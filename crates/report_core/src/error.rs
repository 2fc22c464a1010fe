/// Input problems caught before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please enter a query")]
    EmptyQuery,
    #[error("result limit must be a whole number greater than zero")]
    InvalidLimit,
    #[error("no data available in the table to process")]
    NoData,
    #[error("row {local_index} of {file_name} has an unreadable relevance value {value:?}")]
    MalformedRelevance {
        file_name: String,
        local_index: usize,
        value: String,
    },
}
