use std::fmt;

/// The planner's typed error taxonomy.
///
/// `DataMissing`, `NoRoute`, and `InputInvalid` are fatal to a plan. `NoTrade`
/// (spec §7) is recoverable at the section level and never surfaces as a
/// `PlannerError` — the trade optimizer degrades to a
/// [`crate::trade::SectionOutcome::NoTrade`] placeholder for that section
/// instead of aborting the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// A location string or numeric parameter was malformed.
    InputInvalid(String),
    /// A system, station, coordinate, or market snapshot could not be found.
    DataMissing(String),
    /// Bidirectional BFS exhausted both frontiers without meeting.
    NoRoute { from: String, to: String },
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InputInvalid(msg) => write!(f, "invalid input: {msg}"),
            PlannerError::DataMissing(msg) => write!(f, "data missing: {msg}"),
            PlannerError::NoRoute { from, to } => {
                write!(f, "no jump-connected route from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for PlannerError {}

pub type Result<T> = std::result::Result<T, PlannerError>;
