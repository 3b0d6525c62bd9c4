//! HTTP adapter for the dictionary backend.
//!
//! One `ApiClient` per application. Authenticated endpoints read the bearer
//! token from the shared `SessionHandle`; any 401 clears the session through
//! that same handle before the error reaches the caller.

pub mod error;
pub mod types;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{ApiError, ApiErrorKind, ApiResult};
use types::{
    AutocompleteResponse, EmailRequest, LoginRequest, LoginResponse, MessageResponse, OtpRequest,
    ProfilePictureRequest, RegisterRequest, ResetPasswordRequest, ResetRequest, SearchResponse,
    SearchResult, UpdateNameRequest, UpdateUsernameRequest, User, VerifyResetOtpResponse,
    VerifyUserResponse, WordOfDayResponse,
};

use crate::config::Config;
use crate::session::SessionHandle;

/// Standard User-Agent header for requests.
pub const USER_AGENT: &str = concat!("urhobo/", env!("CARGO_PKG_VERSION"));

/// Whether a call carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    None,
    Bearer,
}

/// Backend client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionHandle>,
    suggestion_limit: u32,
    search_language: String,
}

impl ApiClient {
    /// Builds a client from resolved configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn from_config(config: &Config, session: Arc<SessionHandle>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let base_url = config.effective_base_url()?;
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            session,
            suggestion_limit: config.search.suggestion_limit,
            search_language: config.search.language.clone(),
        })
    }

    /// Client against `base_url` with default search settings.
    pub fn new(base_url: impl Into<String>, session: Arc<SessionHandle>) -> Self {
        let defaults = crate::config::SearchConfig::default();
        Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            suggestion_limit: defaults.suggestion_limit,
            search_language: defaults.language,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionHandle> {
        &self.session
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest { email, password };
        self.send_json(Method::POST, "/auth/login", Auth::None, Some(&body), "Login failed")
            .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn register(&self, request: &RegisterRequest<'_>) -> ApiResult<MessageResponse> {
        self.send_json(
            Method::POST,
            "/auth/register",
            Auth::None,
            Some(request),
            "Registration failed",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn verify_signup_otp(&self, email: &str, otp: &str) -> ApiResult<MessageResponse> {
        let body = OtpRequest { otp, email };
        self.send_json(
            Method::POST,
            "/auth/verify-otp",
            Auth::None,
            Some(&body),
            "OTP verification failed",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn resend_signup_otp(&self, email: &str) -> ApiResult<MessageResponse> {
        let body = EmailRequest { email };
        self.send_json(
            Method::POST,
            "/auth/resend-otp",
            Auth::None,
            Some(&body),
            "Failed to resend OTP",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn verify_user(&self, email: &str) -> ApiResult<VerifyUserResponse> {
        let body = EmailRequest { email };
        self.send_json(
            Method::POST,
            "/auth/verify-user",
            Auth::None,
            Some(&body),
            "Failed to verify user",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn request_password_reset(
        &self,
        user_id: &str,
        email: &str,
    ) -> ApiResult<MessageResponse> {
        let body = ResetRequest { user_id, email };
        self.send_json(
            Method::POST,
            "/auth/enhanced-reset",
            Auth::None,
            Some(&body),
            "Failed to send reset email",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn verify_reset_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> ApiResult<VerifyResetOtpResponse> {
        let body = OtpRequest { otp, email };
        self.send_json(
            Method::POST,
            "/auth/verify-reset-otp",
            Auth::None,
            Some(&body),
            "Invalid OTP",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest<'_>,
    ) -> ApiResult<MessageResponse> {
        self.send_json(
            Method::POST,
            "/auth/reset-password",
            Auth::None,
            Some(request),
            "Failed to reset password",
        )
        .await
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn profile(&self) -> ApiResult<User> {
        self.send_json::<(), _>(
            Method::GET,
            "/users/me/profile",
            Auth::Bearer,
            None,
            "Failed to load profile",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn update_name(&self, first_name: &str, last_name: &str) -> ApiResult<User> {
        let body = UpdateNameRequest {
            first_name,
            last_name,
        };
        self.send_json(
            Method::PUT,
            "/users/me/name",
            Auth::Bearer,
            Some(&body),
            "Update failed",
        )
        .await
    }

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn update_username(&self, username: &str) -> ApiResult<User> {
        let body = UpdateUsernameRequest { username };
        self.send_json(
            Method::PUT,
            "/users/me/username",
            Auth::Bearer,
            Some(&body),
            "Update failed",
        )
        .await
    }

    /// Uploads a `data:` URL image.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn upload_profile_picture(&self, data_url: &str) -> ApiResult<User> {
        let body = ProfilePictureRequest {
            image_data: data_url,
        };
        self.send_json(
            Method::POST,
            "/users/me/profile-picture",
            Auth::Bearer,
            Some(&body),
            "Profile update failed",
        )
        .await
    }

    // ------------------------------------------------------------------
    // Words
    // ------------------------------------------------------------------

    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn word_of_day(&self) -> ApiResult<WordOfDayResponse> {
        self.send_json::<(), _>(
            Method::GET,
            "/word-of-day",
            Auth::None,
            None,
            "Failed to fetch word of day",
        )
        .await
    }

    /// Full word records for an exact term.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn search(&self, term: &str) -> ApiResult<SearchResponse> {
        let query = [
            ("searchTerm", term),
            ("language", self.search_language.as_str()),
        ];
        let builder = self.request(Method::GET, "/search", Auth::Bearer).query(&query);
        self.execute(builder, "/search", "Failed to fetch details")
            .await
    }

    /// Prefix suggestions for the live dropdown.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport, status or decode failure.
    pub async fn autocomplete(&self, prefix: &str) -> ApiResult<Vec<SearchResult>> {
        let limit = self.suggestion_limit.to_string();
        let query = [
            ("prefix", prefix),
            ("limit", limit.as_str()),
            ("language", self.search_language.as_str()),
        ];
        let builder = self
            .request(Method::GET, "/search/autocomplete", Auth::Bearer)
            .query(&query);
        let response: AutocompleteResponse = self
            .execute(builder, "/search/autocomplete", "Autocomplete failed")
            .await?;
        Ok(response.suggestions)
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn request(&self, method: Method, path: &str, auth: Auth) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self
            .http
            .request(method, url)
            .header("accept", "application/json");
        if auth == Auth::Bearer {
            builder = builder.header("content-type", "application/json");
            if let Some(token) = self.session.access_token() {
                builder = builder.bearer_auth(token);
            }
        }
        builder
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Option<&B>,
        fallback: &str,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, path, auth);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, path, fallback).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
        fallback: &str,
    ) -> ApiResult<T> {
        let response = builder.send().await.map_err(|e| {
            tracing::debug!(path, error = %e, "request failed before a response");
            ApiError::network()
        })?;

        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "backend response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status.as_u16(), &body, fallback);
            if status == StatusCode::UNAUTHORIZED {
                self.session.force_logout();
            }
            return Err(error);
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::debug!(path, error = %e, "failed to read response body");
            ApiError::network()
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(path, error = %e, "response did not match expected shape");
            ApiError::parse()
        })
    }
}
