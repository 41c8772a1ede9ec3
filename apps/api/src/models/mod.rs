pub mod interview;
pub mod job;
pub mod resume;

use serde::Serialize;

/// Colour family a client uses for a status pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Blue,
    Yellow,
    Green,
    Red,
    Purple,
    Gray,
}

/// Display form of a status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: BadgeTone,
}
