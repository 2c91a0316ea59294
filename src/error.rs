use thiserror::Error;

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error, PartialEq)]
pub enum MeetPointError {
    #[error("None of the participant addresses could be located.")]
    EpicenterUnavailable,
    #[error("No candidate meeting point is reachable by any participant.")]
    NoReachableCandidate,
}
