/// API module - Gateway
///
/// All backend traffic goes through the Gateway; submodules stay
/// private and everything callers need is re-exported here.
mod error;
mod gateway;
mod types;

pub use error::{ApiError, ApiResult};
pub use gateway::Gateway;
pub use types::{HealthStatus, LoginOutcome, Profile, Registration};
