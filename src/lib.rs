pub mod config;
pub mod db;
pub mod gemini;
pub mod handlers;
pub mod prompt;
pub mod router;

pub use config::Config;
pub use router::{create_router, AppState, Limits};
