use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::tasks::recurrence::{RecurrenceError, RecurrenceRule};
use crate::features::users::models::UserRef;

/// Database model for a task.
///
/// Recurrence is stored flat (`recurrence_*` columns) and parsed into a
/// [`RecurrenceRule`] on read; a non-null `recurrence_interval` marks the row
/// as a recurring template rather than a one-off.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub importance: i32,
    pub due_date: Option<NaiveDate>,
    pub category_id: Uuid,
    pub creator_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub is_recurring: bool,
    pub recurrence_interval: Option<String>,
    pub recurrence_week_days: Option<String>,
    pub recurrence_day_of_month: Option<i32>,
    pub recurrence_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Parse the stored recurrence columns, `None` for one-off tasks.
    /// Stored rows are validated on write, so an error here means the row
    /// was tampered with outside the API.
    pub fn recurrence(&self) -> Result<Option<RecurrenceRule>, RecurrenceError> {
        let Some(interval) = self.recurrence_interval.as_deref() else {
            return Ok(None);
        };
        RecurrenceRule::from_columns(
            interval,
            self.recurrence_week_days.as_deref(),
            self.recurrence_day_of_month,
            self.recurrence_end_date,
            self.due_date,
        )
        .map(Some)
    }

    /// The order every task listing uses: pending rows before completed
    /// ones, then ascending due date with undated tasks last, then creation
    /// time. The `ORDER BY` clauses in the listing queries mirror this.
    pub fn listing_order(&self, other: &Task) -> Ordering {
        self.completed
            .cmp(&other.completed)
            .then_with(|| match (self.due_date, other.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.created_at.cmp(&other.created_at))
    }
}

/// Database model for a subtask
#[derive(Debug, Clone, FromRow)]
pub struct SubTask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A task with everything a list view needs: subtasks, people, category
#[derive(Debug, Clone)]
pub struct TaskDetails {
    pub task: Task,
    pub subtasks: Vec<SubTask>,
    pub creator: UserRef,
    pub assignee: Option<UserRef>,
    pub category_name: String,
    pub category_color: String,
}

impl TaskDetails {
    /// Case-insensitive narrowing over the task title and subtask titles.
    /// A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        if self.task.title.to_lowercase().contains(&needle) {
            return true;
        }
        self.subtasks
            .iter()
            .any(|s| s.title.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(title: &str, subtask_titles: &[&str]) -> TaskDetails {
        let now = Utc::now();
        let task = Task {
            id: Uuid::from_u128(1),
            title: title.to_string(),
            description: None,
            completed: false,
            importance: 0,
            due_date: None,
            category_id: Uuid::from_u128(2),
            creator_id: Uuid::from_u128(3),
            assignee_id: None,
            reminder_at: None,
            is_recurring: false,
            recurrence_interval: None,
            recurrence_week_days: None,
            recurrence_day_of_month: None,
            recurrence_end_date: None,
            created_at: now,
            updated_at: now,
        };
        TaskDetails {
            subtasks: subtask_titles
                .iter()
                .map(|t| SubTask {
                    id: Uuid::new_v4(),
                    task_id: task.id,
                    title: t.to_string(),
                    description: None,
                    completed: false,
                    created_at: now,
                })
                .collect(),
            task,
            creator: UserRef {
                id: Uuid::from_u128(3),
                username: "alice".to_string(),
            },
            assignee: None,
            category_name: "Chores".to_string(),
            category_color: "#6366f1".to_string(),
        }
    }

    #[test]
    fn test_matches_query_on_title() {
        let d = details("Buy groceries", &[]);
        assert!(d.matches_query("GROC"));
        assert!(!d.matches_query("laundry"));
    }

    #[test]
    fn test_matches_query_on_subtask_title() {
        let d = details("Weekend", &["Mow the lawn", "Wash car"]);
        assert!(d.matches_query("lawn"));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let d = details("Anything", &[]);
        assert!(d.matches_query("   "));
    }

    #[test]
    fn test_recurrence_none_for_one_off() {
        let d = details("One-off", &[]);
        assert_eq!(d.task.recurrence().unwrap(), None);
    }

    fn listed(title: &str, completed: bool, due: Option<(i32, u32, u32)>, created_min: i64) -> Task {
        let mut task = details(title, &[]).task;
        task.completed = completed;
        task.due_date = due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        task.created_at = DateTime::from_timestamp(created_min * 60, 0).unwrap();
        task
    }

    fn sorted_titles(mut tasks: Vec<Task>) -> Vec<String> {
        tasks.sort_by(|a, b| a.listing_order(b));
        tasks.into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn test_listing_order_pending_before_completed() {
        let titles = sorted_titles(vec![
            listed("done early", true, Some((2024, 1, 1)), 0),
            listed("pending late", false, Some((2024, 6, 1)), 1),
        ]);
        assert_eq!(titles, ["pending late", "done early"]);
    }

    #[test]
    fn test_listing_order_undated_sorts_last() {
        let titles = sorted_titles(vec![
            listed("undated", false, None, 0),
            listed("dated", false, Some((2024, 3, 1)), 1),
        ]);
        assert_eq!(titles, ["dated", "undated"]);
    }

    #[test]
    fn test_listing_order_by_due_then_created() {
        let titles = sorted_titles(vec![
            listed("same day, newer", false, Some((2024, 3, 1)), 5),
            listed("later day", false, Some((2024, 3, 2)), 0),
            listed("same day, older", false, Some((2024, 3, 1)), 1),
        ]);
        assert_eq!(titles, ["same day, older", "same day, newer", "later day"]);
    }

    #[test]
    fn test_narrowing_keeps_listing_order() {
        let mut all = vec![
            listed("pay rent", false, None, 0),
            listed("pay insurance", false, Some((2024, 2, 1)), 1),
            listed("walk dog", false, Some((2024, 1, 15)), 2),
            listed("pay taxes", true, Some((2024, 1, 1)), 3),
        ];
        all.sort_by(|a, b| a.listing_order(b));
        all.retain(|t| t.title.contains("pay"));
        let titles: Vec<_> = all.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["pay insurance", "pay rent", "pay taxes"]);
    }
}
