pub mod enums;
pub mod task;
pub mod views;

pub use enums::{Filter, Priority};
pub use task::Task;
pub use views::{compute_stats, counter_text, format_due, FilterState, TaskStats};
