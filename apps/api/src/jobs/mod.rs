// Job tracker: lifecycle rules over the gateway's job collection, plus HTTP handlers.

pub mod handlers;
pub mod lifecycle;
