use thiserror::Error;

/// Returned when the value of an empty `OptionPtr` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the pointer holds no value")]
pub struct Absent;

/// Returned when a string names neither `ascending` nor `descending`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order `{0}`, expected `ascending` or `descending`")]
pub struct ParseOrderError(pub String);
