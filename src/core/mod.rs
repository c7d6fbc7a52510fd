pub mod api_error;
pub mod commentary;
pub mod config;
pub mod constants;
pub mod prompt;
pub mod relay;
pub mod text;
