pub mod feedback_request;
pub mod update_feedback_route;
