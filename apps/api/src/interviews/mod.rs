// Mock interview scheduling & expiry engine.
// Scheduling validates future-dated requests; expiry purges interviews once
// their fixed 60-minute active window has elapsed; the reconciler repeats that
// pass on a timer for every open interview view.

pub mod expiry;
pub mod handlers;
pub mod reconciler;
pub mod scheduling;
pub mod views;

pub use views::InterviewViews;
