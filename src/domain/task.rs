use super::enums::Priority;
use chrono::{DateTime, Local, NaiveDate};
use uuid::Uuid;

/// A single to-do entry
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique ID, generated at creation and never changed
    pub id: Uuid,
    /// Trimmed title, case-insensitively unique within the store
    pub title: String,
    /// Whether the task has been completed
    pub completed: bool,
    /// When the task was created
    pub created_at: DateTime<Local>,
    /// Refreshed whenever the task itself is mutated
    pub updated_at: DateTime<Local>,
    /// Optional due date (calendar date, no time of day)
    pub due_date: Option<NaiveDate>,
    /// Priority level
    pub priority: Priority,
    /// Position in the persisted display order
    pub order: usize,
}

impl Task {
    pub fn new(
        title: String,
        due_date: Option<NaiveDate>,
        priority: Priority,
        order: usize,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            completed: false,
            created_at: now,
            updated_at: now,
            due_date,
            priority,
            order,
        }
    }

    /// Case-insensitive title equality, used for duplicate detection
    pub fn title_matches(&self, other: &str) -> bool {
        self.title.to_lowercase() == other.to_lowercase()
    }

    /// Case-insensitive substring search on the title
    pub fn matches_search(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }

    /// An incomplete task whose due date is strictly before today
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => !self.completed && due < today,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_task(title: &str) -> Task {
        Task::new(title.to_string(), None, Priority::Medium, 0, Local::now())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_new() {
        let task = create_test_task("Buy milk");
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.order, 0);
        assert_eq!(task.created_at, task.updated_at);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = create_test_task("a");
        let b = create_test_task("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_title_matches_ignores_case() {
        let task = create_test_task("Buy Milk");
        assert!(task.title_matches("buy milk"));
        assert!(task.title_matches("BUY MILK"));
        assert!(!task.title_matches("buy milk!"));
    }

    #[test]
    fn test_matches_search_substring() {
        let task = create_test_task("Water the Garden");
        assert!(task.matches_search("garden"));
        assert!(task.matches_search("WATER"));
        assert!(task.matches_search("the"));
        assert!(!task.matches_search("lawn"));
    }

    #[test]
    fn test_is_overdue() {
        let today = date(2024, 6, 15);

        let mut task = create_test_task("Report");
        assert!(!task.is_overdue(today)); // no due date

        task.due_date = Some(date(2024, 6, 14));
        assert!(task.is_overdue(today));

        // Due today is not overdue (strictly before)
        task.due_date = Some(today);
        assert!(!task.is_overdue(today));

        task.due_date = Some(date(2024, 6, 16));
        assert!(!task.is_overdue(today));

        // Completed tasks are never overdue
        task.due_date = Some(date(2024, 6, 1));
        task.completed = true;
        assert!(!task.is_overdue(today));
    }
}
