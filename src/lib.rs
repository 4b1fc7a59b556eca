pub mod api;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod selector;
pub mod storage;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, ShowquizError};
pub use storage::Database;
