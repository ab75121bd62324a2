pub mod client;
pub mod config;
pub mod form;
pub mod mock_backend;
pub mod models;
pub mod validation;
