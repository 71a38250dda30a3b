pub mod new_session_route;
