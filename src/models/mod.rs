// Gateway module for domain entities - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod child;
mod user;

// Public re-exports - the ONLY way to access entity types
pub use child::{Child, ChildPayload};
pub use user::{Role, User};
