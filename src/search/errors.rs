use malbolge_derive::Error;

/// Errors raised while configuring a search.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SearchError {
    /// A beam must retain at least one node per round.
    #[error("beam width must be at least 1")]
    ZeroBeamWidth,
}
