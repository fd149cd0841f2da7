pub mod fetch_trivia_route;
pub mod generate_trivia_route;
pub mod trivia_request;
