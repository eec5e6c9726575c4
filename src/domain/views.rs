use super::enums::Filter;
use super::task::Task;
use chrono::{Duration, NaiveDate};

/// Filter and search criteria supplied by the caller on every view request
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub filter: Filter,
    pub search: String,
}

impl FilterState {
    pub fn new(filter: Filter, search: impl Into<String>) -> Self {
        Self {
            filter,
            search: search.into(),
        }
    }

    /// Check whether a task passes the completion filter and the search query
    pub fn matches(&self, task: &Task) -> bool {
        if !self.filter.admits(task.completed) {
            return false;
        }
        let query = self.search.trim();
        query.is_empty() || task.matches_search(query)
    }
}

/// Aggregate counts over the whole task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

/// Compute aggregate counts; overdue only counts incomplete tasks
pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();

    TaskStats {
        total,
        active: total - completed,
        completed,
        overdue,
    }
}

/// Human-readable counter line, e.g. "3 tasks, 1 completed"
pub fn counter_text(stats: &TaskStats) -> String {
    let plural = |n: usize| if n == 1 { "" } else { "s" };

    if stats.total == 0 {
        "No tasks".to_string()
    } else if stats.completed == 0 {
        format!("{} task{}", stats.active, plural(stats.active))
    } else if stats.active == 0 {
        format!("{} completed task{}", stats.completed, plural(stats.completed))
    } else {
        format!(
            "{} task{}, {} completed",
            stats.total,
            plural(stats.total),
            stats.completed
        )
    }
}

/// Format a due date relative to today: "Today", "Tomorrow", or YYYY-MM-DD
pub fn format_due(due: NaiveDate, today: NaiveDate) -> String {
    if due == today {
        "Today".to_string()
    } else if due == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        due.format("%Y-%m-%d").to_string()
    }
}
