pub mod seed;

use crate::domain::employee_update::{apply_update, EmployeeError, EmployeeUpdate};
use crate::domain::format;
use crate::domain::models::{Announcement, Employee, Priority};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Employee records in insertion order. Ids are unique.
#[derive(Clone, Default)]
pub struct EmployeeStore {
    inner: Arc<RwLock<Vec<Employee>>>,
}

impl EmployeeStore {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(employees)),
        }
    }

    pub async fn list(&self) -> Vec<Employee> {
        self.inner.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn get(&self, id: &str) -> Option<Employee> {
        self.inner.read().await.iter().find(|e| e.id == id).cloned()
    }

    /// Case-insensitive id lookup, used to match login ids (`emp001`) to
    /// employee records (`EMP001`).
    pub async fn find_by_login(&self, login_id: &str) -> Option<Employee> {
        self.inner
            .read()
            .await
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(login_id))
            .cloned()
    }

    pub async fn insert(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        let mut employees = self.inner.write().await;
        if employees.iter().any(|e| e.id == employee.id) {
            return Err(EmployeeError::DuplicateId(employee.id));
        }
        employees.push(employee.clone());
        Ok(employee)
    }

    /// Merges the update into a copy and swaps it in only if the merge
    /// succeeded, so a rejected form never leaves a half-applied record.
    pub async fn update(&self, id: &str, update: &EmployeeUpdate) -> Result<Employee, EmployeeError> {
        let mut employees = self.inner.write().await;
        let slot = employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EmployeeError::NotFound(id.to_string()))?;
        let mut merged = slot.clone();
        apply_update(&mut merged, update)?;
        *slot = merged.clone();
        Ok(merged)
    }

    pub async fn remove(&self, id: &str) -> Result<Employee, EmployeeError> {
        let mut employees = self.inner.write().await;
        let index = employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EmployeeError::NotFound(id.to_string()))?;
        Ok(employees.remove(index))
    }
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub attachment: Option<String>,
}

struct Board {
    items: Vec<Announcement>,
    next_id: u64,
}

/// Announcements, newest first. Ids come from a counter and are never
/// reused after a delete.
#[derive(Clone)]
pub struct AnnouncementStore {
    inner: Arc<RwLock<Board>>,
}

impl AnnouncementStore {
    pub fn new(items: Vec<Announcement>) -> Self {
        let next_id = items.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(RwLock::new(Board { items, next_id })),
        }
    }

    pub async fn list(&self) -> Vec<Announcement> {
        self.inner.read().await.items.clone()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn create(&self, new: NewAnnouncement) -> Announcement {
        let mut board = self.inner.write().await;
        let announcement = Announcement {
            id: board.next_id,
            title: new.title,
            description: new.description,
            priority: new.priority,
            date: format::today(),
            attachment: new.attachment,
        };
        board.next_id += 1;
        board.items.insert(0, announcement.clone());
        announcement
    }

    pub async fn delete(&self, id: u64) -> Option<Announcement> {
        let mut board = self.inner.write().await;
        let index = board.items.iter().position(|a| a.id == id)?;
        Some(board.items.remove(index))
    }
}
