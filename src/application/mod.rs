pub mod app_error;
pub mod jwt;
pub mod request_context;
pub mod use_cases;
