/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_LOCAL_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_DEVICE_URL: &str = "http://10.100.0.222:8000";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 10;

// Session storage
pub const SESSION_FILE_NAME: &str = "session.toml";

// Error formatting
pub const FIELD_ERROR_SEPARATOR: &str = ", ";
