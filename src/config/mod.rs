mod app;

pub use app::{AppConfig, DEFAULT_DB_FILE};
