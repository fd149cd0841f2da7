pub mod system;
pub mod trivia;
pub mod users;
