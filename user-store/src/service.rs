use std::sync::Arc;

use tracing::info;

use crate::errors::UserError;
use crate::model::{CreateUser, UpdateUser, User};
use crate::repository::InMemoryUserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<InMemoryUserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<InMemoryUserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Vec<User> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: &str) -> Result<User, UserError> {
        let id = require_id(id)?;
        self.repo.find_by_id(id).await.ok_or_else(not_found)
    }

    pub async fn create(&self, input: CreateUser) -> Result<User, UserError> {
        let (email, name) = match (non_blank(&input.email), non_blank(&input.name)) {
            (Some(email), Some(name)) => (email, name),
            _ => {
                return Err(UserError::Validation(
                    "Email and name are required".into(),
                ));
            }
        };
        let user = self.repo.create(email, name).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn update(&self, id: &str, input: UpdateUser) -> Result<User, UserError> {
        let id = require_id(id)?;
        self.repo
            .update(id, non_blank(&input.email), non_blank(&input.name))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), UserError> {
        let id = require_id(id)?;
        if self.repo.delete(id).await {
            info!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

fn require_id(id: &str) -> Result<&str, UserError> {
    let id = id.trim();
    if id.is_empty() {
        Err(UserError::Validation("User ID is required".into()))
    } else {
        Ok(id)
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn not_found() -> UserError {
    UserError::NotFound("User not found".into())
}
