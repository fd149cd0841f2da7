pub mod users_route;
