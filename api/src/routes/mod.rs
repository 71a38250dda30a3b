pub mod chat;
pub mod feedback;
pub mod health_route;
pub mod session;
