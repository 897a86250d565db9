use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::api::error::{status_error, transport_error, ApiError, ApiResult};
use crate::api::types::{HealthStatus, LoginOutcome, LoginResponse, Profile, Registration};
use crate::app::ApiConfig;
use crate::models::{Child, ChildPayload, Role};
use crate::session::TokenStore;

/// Whether an endpoint expects the bearer token. A 401 from a guarded
/// endpoint means the stored token is dead and gets cleared; a 401 from
/// an open one (bad login credentials) says nothing about it.
#[derive(Clone, Copy, PartialEq)]
enum Guard {
    Open,
    TokenRequired,
}

/// Single mediator for all traffic to the SafeRide backend.
///
/// Holds one pooled HTTP client, the resolved base URL, and the token
/// store it was constructed with. All operations return [`ApiResult`]
/// so callers get exactly one classified error per request; nothing is
/// retried here.
pub struct Gateway {
    client: Client,
    base_url: String,
    timeout_secs: u64,
    store: Arc<dyn TokenStore>,
}

impl Gateway {
    /// Build a gateway from resolved configuration. The base URL is
    /// fixed at this point; switching targets means building a new one.
    pub fn new(config: &ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn is_authenticated(&self) -> bool {
        self.store.is_authenticated().await
    }

    /// Exchange credentials for a bearer token and persist it. The
    /// session only changes state once the token is safely stored.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let builder = self
            .client
            .post(self.url("/auth/login-json"))
            .json(&json!({ "email": email, "password": password }));
        let response: LoginResponse = self.execute(Guard::Open, builder, "Login failed").await?;

        let token = match response.access_token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ApiError::Server("No token received".to_string())),
        };

        self.store
            .store(&token)
            .await
            .map_err(|err| ApiError::Storage(format!("Could not save session: {}", err)))?;
        debug!("session established for {}", email);

        Ok(LoginOutcome {
            token,
            user: response.user,
        })
    }

    /// Create an account. Does not log in; callers chain `login` when
    /// they want a session afterwards.
    pub async fn register(&self, email: &str, password: &str, role: Role) -> ApiResult<Registration> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let builder = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password, "role": role }));
        self.execute(Guard::Open, builder, "Registration failed").await
    }

    /// Drop the local session. Purely local: the token is not revoked
    /// server-side, it simply stops being sent.
    pub async fn logout(&self) -> ApiResult<()> {
        self.store.clear().await.map_err(|err| {
            warn!("session clear failed: {}", err);
            ApiError::Storage("Logout failed".to_string())
        })
    }

    /// All children registered by the authenticated guardian.
    pub async fn fetch_children(&self) -> ApiResult<Vec<Child>> {
        let builder = self.client.get(self.url("/children/me"));
        self.execute(Guard::TokenRequired, builder, "Failed to load children")
            .await
    }

    pub async fn get_child(&self, id: &str) -> ApiResult<Child> {
        let builder = self.client.get(self.url(&format!("/children/{}", id)));
        self.execute(Guard::TokenRequired, builder, "Failed to load child")
            .await
    }

    /// Register a child. Coordinates are checked locally first so a
    /// malformed payload never produces network traffic.
    pub async fn create_child(&self, payload: &ChildPayload) -> ApiResult<Child> {
        validate_coordinates(payload)?;
        let builder = self.client.post(self.url("/children/")).json(payload);
        self.execute(Guard::TokenRequired, builder, "Failed to add child")
            .await
    }

    pub async fn update_child(&self, id: &str, payload: &ChildPayload) -> ApiResult<Child> {
        validate_coordinates(payload)?;
        let builder = self
            .client
            .put(self.url(&format!("/children/{}", id)))
            .json(payload);
        self.execute(Guard::TokenRequired, builder, "Failed to update child")
            .await
    }

    pub async fn delete_child(&self, id: &str) -> ApiResult<()> {
        let builder = self.client.delete(self.url(&format!("/children/{}", id)));
        self.execute_empty(Guard::TokenRequired, builder, "Failed to delete child")
            .await
    }

    /// Unauthenticated liveness probe.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let builder = self.client.get(self.url("/health"));
        self.execute(Guard::Open, builder, "Health check failed").await
    }

    pub async fn profile(&self) -> ApiResult<Profile> {
        let builder = self.client.get(self.url("/api/profile"));
        self.execute(Guard::TokenRequired, builder, "Failed to load profile")
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored bearer token when one is present. Runs for
    /// every request regardless of endpoint; callers never set
    /// credentials themselves. With no stored token the request goes
    /// out bare and the server's 401 becomes the error.
    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.read().await {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        guard: Guard,
        builder: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let body = self.exchange(guard, builder, fallback).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// For endpoints whose success response has no body (204).
    async fn execute_empty(
        &self,
        guard: Guard,
        builder: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<()> {
        self.exchange(guard, builder, fallback).await.map(|_| ())
    }

    /// Send one request and return the success body, classifying every
    /// other outcome. A 401 on a token-guarded endpoint also clears the
    /// stored session, since the server has declared it dead.
    async fn exchange(
        &self,
        guard: Guard,
        builder: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<String> {
        let request = self
            .authorize(builder)
            .await
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        debug!("{} {}", request.method(), request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| transport_error(err, self.timeout_secs))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(err, self.timeout_secs))?;
        debug!("response status {}", status.as_u16());

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && guard == Guard::TokenRequired {
            match self.store.clear().await {
                Ok(()) => debug!("cleared session rejected by server"),
                Err(err) => warn!("could not clear rejected session: {}", err),
            }
        }

        Err(status_error(status, &body, fallback))
    }
}

fn validate_coordinates(payload: &ChildPayload) -> ApiResult<()> {
    check_pair("Home", payload.home_coordinates.as_deref())?;
    check_pair("School", payload.school_coordinates.as_deref())?;
    Ok(())
}

/// Mirrors the server's own coordinate rules so rejections carry the
/// same wording whether they are caught locally or remotely.
fn check_pair(which: &str, pair: Option<&[f64]>) -> ApiResult<()> {
    let pair = pair.ok_or_else(|| {
        ApiError::Validation(format!("{} coordinates are required", which))
    })?;

    if pair.len() != 2 {
        return Err(ApiError::Validation(
            "Coordinates must contain exactly 2 values [longitude, latitude]".to_string(),
        ));
    }

    let (lng, lat) = (pair[0], pair[1]);
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ApiError::Validation(
            "Longitude must be between -180 and 180 degrees".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ApiError::Validation(
            "Latitude must be between -90 and 90 degrees".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn payload() -> ChildPayload {
        ChildPayload {
            name: "Emma Johnson".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2017, 3, 12).unwrap(),
            home_address: "123 Main St, Springfield, IL".to_string(),
            home_coordinates: Some(vec![-89.6501, 39.7817]),
            school_name: "Springfield Elementary".to_string(),
            school_address: "456 School Ave, Springfield, IL".to_string(),
            school_coordinates: Some(vec![-89.6445, 39.7890]),
            photo_url: None,
            allergies: None,
            notes: None,
        }
    }

    fn gateway() -> Gateway {
        Gateway::new(&ApiConfig::default(), Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_valid_coordinates_pass() {
        assert!(validate_coordinates(&payload()).is_ok());
    }

    #[test]
    fn test_missing_home_coordinates_rejected() {
        let mut p = payload();
        p.home_coordinates = None;
        let err = validate_coordinates(&p).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Home coordinates are required");
    }

    #[test]
    fn test_missing_school_coordinates_rejected() {
        let mut p = payload();
        p.school_coordinates = None;
        let err = validate_coordinates(&p).unwrap_err();
        assert_eq!(err.to_string(), "School coordinates are required");
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let mut p = payload();
        p.home_coordinates = Some(vec![-89.6501]);
        let err = validate_coordinates(&p).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Coordinates must contain exactly 2 values [longitude, latitude]"
        );
    }

    #[test]
    fn test_longitude_out_of_range_rejected() {
        let mut p = payload();
        p.home_coordinates = Some(vec![181.0, 39.7817]);
        let err = validate_coordinates(&p).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Longitude must be between -180 and 180 degrees"
        );
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        let mut p = payload();
        p.school_coordinates = Some(vec![-89.6445, -90.5]);
        let err = validate_coordinates(&p).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Latitude must be between -90 and 90 degrees"
        );
    }

    #[test]
    fn test_boundary_coordinates_pass() {
        let mut p = payload();
        p.home_coordinates = Some(vec![-180.0, 90.0]);
        p.school_coordinates = Some(vec![180.0, -90.0]);
        assert!(validate_coordinates(&p).is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_inputs_locally() {
        let gateway = gateway();
        let err = gateway.login("", "Frego12345").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Email and password are required");

        let err = gateway.login("dox@gmail.com", "").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_inputs_locally() {
        let gateway = gateway();
        let err = gateway.register("   ", "pw", Role::Guardian).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_base_url_loses_trailing_slash() {
        let config = ApiConfig {
            local_url: "http://127.0.0.1:8000/".to_string(),
            ..ApiConfig::default()
        };
        let gateway =
            Gateway::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(gateway.base_url(), "http://127.0.0.1:8000");
    }
}
