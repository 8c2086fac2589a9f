pub mod auth;
pub mod chat;
pub mod error;
pub mod handlers;
pub mod librarian;
pub mod listings;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
