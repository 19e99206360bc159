pub mod analyze;
pub mod gap;
pub mod push_event;
pub mod refresh;
pub mod reports;
pub mod serve;

// Re-export command functions for convenience
pub use analyze::{analyze, AnalyzeParams};
pub use gap::gap;
pub use push_event::push_event;
pub use refresh::refresh;
pub use reports::reports;
pub use serve::serve;
