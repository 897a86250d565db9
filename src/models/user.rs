use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. The backend defaults new registrations to `guardian`;
/// only guardians may manage children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guardian,
    Driver,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Guardian
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Guardian => write!(f, "guardian"),
            Role::Driver => write!(f, "driver"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Account data attached to auth responses.
///
/// Only `email` is guaranteed: the registration and profile endpoints send
/// the full record, while older login responses attach a trimmed object
/// (or nothing at all). Everything else is optional so both shapes decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// MongoDB ObjectId, serialized under the `_id` alias
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}
