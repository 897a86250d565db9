use serde::Deserialize;

use crate::models::User;

/// Raw body of a successful login. Every field is optional at the wire
/// level so a missing token becomes a classified error instead of a
/// decode failure. The backend also sends `token_type` (always
/// `bearer`); nothing here needs it.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// What a successful login means to the caller: the session is stored,
/// and the account details are attached when the server sent them.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: Option<User>,
}

/// Body of a successful registration.
#[derive(Debug, Deserialize)]
pub struct Registration {
    pub message: String,
    pub user: User,
}

/// Service health report. Only `status` is guaranteed; older server
/// builds omit the rest.
#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Authenticated profile lookup.
#[derive(Debug, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_response_tolerates_missing_fields() {
        let parsed: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.access_token.is_none());
        assert!(parsed.user.is_none());
    }

    #[test]
    fn test_login_response_full_shape() {
        // token_type stays in the fixture; unmodeled keys must not
        // break decoding.
        let body = r#"{
            "access_token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "token_type": "bearer",
            "user": {"email": "dox@gmail.com"}
        }"#;
        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.access_token.as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.payload.sig")
        );
        assert_eq!(parsed.user.unwrap().email, "dox@gmail.com");
    }

    #[test]
    fn test_health_accepts_status_only_body() {
        let parsed: HealthStatus = serde_json::from_str(r#"{"status": "healthy"}"#).unwrap();
        assert_eq!(parsed.status, "healthy");
        assert!(parsed.message.is_none());
        assert!(parsed.version.is_none());
    }
}
