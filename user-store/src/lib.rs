//! In-memory user store.
//!
//! [`InMemoryUserRepository`] is an explicit store object; each instance owns
//! its own user list, so tests get isolation by constructing a fresh one.
//! [`UserService`] holds the validation and uniqueness rules on top of it.

pub mod errors;
pub mod model;
pub mod repository;
pub mod service;

pub use errors::UserError;
pub use model::{CreateUser, UpdateUser, User};
pub use repository::InMemoryUserRepository;
pub use service::UserService;
