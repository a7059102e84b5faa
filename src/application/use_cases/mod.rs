pub mod api_key;
pub mod audit;
pub mod user;
