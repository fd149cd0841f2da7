use std::sync::Arc;

use user_store::{CreateUser, InMemoryUserRepository, UpdateUser, UserError, UserService};

fn service() -> UserService {
    UserService::new(Arc::new(InMemoryUserRepository::seeded()))
}

fn create(email: &str, name: &str) -> CreateUser {
    CreateUser {
        email: Some(email.into()),
        name: Some(name.into()),
    }
}

#[tokio::test]
async fn create_requires_email_and_name() {
    let err = service()
        .create(CreateUser {
            email: Some("new@example.com".into()),
            name: Some("   ".into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err, UserError::Validation("Email and name are required".into()));
}

#[tokio::test]
async fn create_rejects_duplicate_email() {
    let err = service()
        .create(create("john@example.com", "Another John"))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::Conflict(_)));
    assert_eq!(err.to_string(), "User with this email already exists");
}

#[tokio::test]
async fn create_then_get() {
    let svc = service();
    let user = svc.create(create("sam@example.com", "Sam")).await.unwrap();
    assert_eq!(svc.get(&user.id).await.unwrap(), user);
    assert_eq!(svc.list().await.len(), 3);
}

#[tokio::test]
async fn get_validates_and_reports_missing() {
    let svc = service();
    assert_eq!(
        svc.get(" ").await.unwrap_err(),
        UserError::Validation("User ID is required".into())
    );
    assert_eq!(
        svc.get("42").await.unwrap_err(),
        UserError::NotFound("User not found".into())
    );
}

#[tokio::test]
async fn update_checks_email_owner() {
    let svc = service();
    let err = svc
        .update(
            "2",
            UpdateUser {
                email: Some("john@example.com".into()),
                name: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already in use by another user");

    let same = svc
        .update(
            "1",
            UpdateUser {
                email: Some("john@example.com".into()),
                name: Some("Johnny".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(same.name, "Johnny");
    assert_eq!(same.email, "john@example.com");
}

#[tokio::test]
async fn delete_twice_is_not_found() {
    let svc = service();
    svc.delete("1").await.unwrap();
    assert!(matches!(svc.delete("1").await, Err(UserError::NotFound(_))));
}
