pub mod command;
pub mod config;
pub mod terminal_logger;

pub use command::Tool;
pub use config::{AppConfig, load_app_config};
pub use terminal_logger::TerminalLogger;
