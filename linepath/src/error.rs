use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("unknown line '{0}'")]
    UnknownLine(String),

    #[error("no connection starts at a structure marked '{marker}'")]
    NoOriginFound { marker: String },

    #[error("chain from origin reaches {ordered} of {total} connections")]
    DisconnectedOrCyclicTopology { ordered: usize, total: usize },

    #[error("structure {code} has more than one outgoing connection")]
    AmbiguousBranch { code: String },

    #[error("span {start} -> {end} has no distance")]
    MissingDistance { start: String, end: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElevationError {
    #[error("elevation service unavailable, {0}")]
    Unavailable(String),
}
