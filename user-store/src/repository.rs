use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;

use crate::errors::UserError;
use crate::model::User;

struct Inner {
    users: Vec<User>,
    /// Next id to hand out; never decremented, so deleted ids are not reused.
    next_id: u64,
}

impl Inner {
    /// Id of the user holding `email` (ASCII case-insensitive).
    fn email_owner(&self, email: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| u.id.as_str())
    }
}

pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Store holding the two demo users.
    pub fn seeded() -> Self {
        Self::with_users(vec![
            User {
                id: "1".into(),
                email: "john@example.com".into(),
                name: "John Doe".into(),
                created_at: utc_midnight(2024, 1, 1),
            },
            User {
                id: "2".into(),
                email: "jane@example.com".into(),
                name: "Jane Smith".into(),
                created_at: utc_midnight(2024, 1, 2),
            },
        ])
    }

    fn with_users(users: Vec<User>) -> Self {
        let next_id = users
            .iter()
            .filter_map(|u| u.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: RwLock::new(Inner { users, next_id }),
        }
    }

    pub async fn find_all(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        let inner = self.inner.read().await;
        inner.users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        let id = inner.email_owner(email)?;
        inner.users.iter().find(|u| u.id == id).cloned()
    }

    /// Inserts a user unless the email is taken. The check and the insert
    /// happen under one write lock.
    pub async fn create(&self, email: &str, name: &str) -> Result<User, UserError> {
        let mut inner = self.inner.write().await;
        if inner.email_owner(email).is_some() {
            return Err(UserError::Conflict(
                "User with this email already exists".into(),
            ));
        }
        let user = User {
            id: inner.next_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.users.push(user.clone());
        Ok(user)
    }

    /// Applies the given changes. The email must not belong to another user;
    /// the check and the write happen under one write lock.
    pub async fn update(
        &self,
        id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User, UserError> {
        let mut inner = self.inner.write().await;
        let pos = inner
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| UserError::NotFound("User not found".into()))?;
        if let Some(email) = email {
            if inner.email_owner(email).is_some_and(|owner| owner != id) {
                return Err(UserError::Conflict(
                    "Email already in use by another user".into(),
                ));
            }
        }
        let user = &mut inner.users[pos];
        if let Some(email) = email {
            user.email = email.to_string();
        }
        if let Some(name) = name {
            user.name = name.to_string();
        }
        Ok(user.clone())
    }

    /// `true` when a user was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        inner.users.len() != before
    }
}

fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_store_has_demo_users() {
        let repo = InMemoryUserRepository::seeded();
        let all = repo.find_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "John Doe");
        assert_eq!(all[1].created_at.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::seeded();
        let a = repo.create("a@example.com", "A").await.unwrap();
        assert_eq!(a.id, "3");
        assert!(repo.delete(&a.id).await);
        let b = repo.create("b@example.com", "B").await.unwrap();
        assert_eq!(b.id, "4");
    }

    #[tokio::test]
    async fn stores_are_isolated() {
        let one = InMemoryUserRepository::new();
        let two = InMemoryUserRepository::new();
        one.create("x@example.com", "X").await.unwrap();
        assert!(two.find_all().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_creates_keep_emails_unique() {
        let repo = std::sync::Arc::new(InMemoryUserRepository::new());
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create("same@example.com", &format!("U{i}")).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, UserError::Conflict(_))),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.find_all().await.len(), 1);
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_user() {
        let repo = InMemoryUserRepository::seeded();
        let err = repo
            .update("2", Some("JOHN@example.com"), None)
            .await
            .unwrap_err();
        assert_eq!(err, UserError::Conflict("Email already in use by another user".into()));
        assert!(repo.update("1", Some("john@example.com"), Some("J")).await.is_ok());
        assert!(matches!(
            repo.update("9", None, Some("x")).await,
            Err(UserError::NotFound(_))
        ));
    }
}
