pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod models;
pub mod session;
pub mod utils;

pub use api::{ApiError, ApiResult, Gateway};
pub use app::{load_config, Config};
pub use models::{Child, ChildPayload, Role, User};
pub use session::TokenStore;
