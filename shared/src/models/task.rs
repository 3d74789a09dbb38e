//! Task Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::optional_clock;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "task_status", rename_all = "lowercase"))]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "task_priority", rename_all = "lowercase")
)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub store_id: i64,
    pub title: String,
    pub category: String,
    pub assigned_role: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// `"HH:MM"`
    pub due_time: Option<String>,
    pub recurring: bool,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    pub store_id: i64,
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub assigned_role: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub priority: TaskPriority,
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub assigned_role: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<String>,
    pub recurring: Option<bool>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl Task {
    pub fn from_create(id: i64, data: TaskCreate, now: i64) -> AppResult<Self> {
        if data.title.trim().is_empty() {
            return Err(AppError::required("title"));
        }
        let due_time = optional_clock("due_time", data.due_time)?;
        Ok(Self {
            id,
            store_id: data.store_id,
            title: data.title,
            category: data.category,
            assigned_role: data.assigned_role,
            due_date: data.due_date,
            due_time,
            recurring: data.recurring,
            status: TaskStatus::Pending,
            priority: data.priority,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, data: TaskUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.title {
            if v.trim().is_empty() {
                return Err(AppError::required("title"));
            }
            self.title = v;
        }
        if let Some(v) = data.category {
            self.category = v;
        }
        if data.assigned_role.is_some() {
            self.assigned_role = data.assigned_role;
        }
        if data.due_date.is_some() {
            self.due_date = data.due_date;
        }
        if data.due_time.is_some() {
            self.due_time = optional_clock("due_time", data.due_time)?;
        }
        if let Some(v) = data.recurring {
            self.recurring = v;
        }
        if let Some(v) = data.priority {
            self.priority = v;
        }
        if let Some(status) = data.status {
            self.set_status(status, now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// `completed_at` follows the status: set on completion, cleared on reopen.
    pub fn set_status(&mut self, status: TaskStatus, now: i64) {
        self.completed_at = match (self.status, status) {
            (TaskStatus::Pending, TaskStatus::Completed) => Some(now),
            (TaskStatus::Completed, TaskStatus::Completed) => self.completed_at.or(Some(now)),
            (_, TaskStatus::Pending) => None,
        };
        self.status = status;
        self.updated_at = now;
    }
}
