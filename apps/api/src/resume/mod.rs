// Resume builder: structural edits, Markdown export and HTTP handlers.
// PDF rendering is left to the client.

pub mod builder;
pub mod handlers;
pub mod markdown;
