//! Password recovery: verify user, request code, verify code, set password.
//!
//! Each step is its own type and only exposes the transitions that are legal
//! from it, so skipping ahead or stepping back from the first step does not
//! compile:
//!
//! ```text
//! VerifyUser ──advance(user)──▶ RequestReset ──advance()──▶ VerifyOtp
//!      ▲                          │   ▲                       │   ▲
//!      └─────────back()───────────┘   └────────back()─────────┘   │
//!                                                              back()
//! VerifyOtp ──advance(token)──▶ SetNewPassword ──────────────────┘
//!                                    │
//!                                    └──advance()──▶ Completed
//! ```
//!
//! `ResetFlow` stores the current step in `ResetStep` and runs the backend
//! call for each transition.

use std::mem;
use std::time::Duration;

use tokio::time::Instant;

use super::{FlowError, FlowResult};
use crate::api::ApiClient;
use crate::api::types::{ResetPasswordRequest, UserSummary};
use crate::validation::{OtpInput, validate_email, validate_new_password};

/// Advisory wait between two reset-code sends.
pub const RESEND_COOLDOWN: Duration = Duration::from_secs(60);

const RESEND_FALLBACK: &str = "Failed to resend code";

// ============================================================================
// Steps
// ============================================================================

/// Step 1: look up the account by email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyUser {
    pub email: String,
}

impl VerifyUser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The email for step 2 is pre-filled from the account found.
    pub fn advance(self, user: UserSummary) -> RequestReset {
        let email = if user.email.trim().is_empty() {
            self.email
        } else {
            user.email.clone()
        };
        RequestReset { user, email }
    }
}

/// Step 2: confirm the email and ask for a reset code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReset {
    user: UserSummary,
    pub email: String,
}

impl RequestReset {
    pub fn user(&self) -> &UserSummary {
        &self.user
    }

    pub fn advance(self) -> VerifyOtp {
        VerifyOtp {
            user: self.user,
            email: self.email,
            otp: OtpInput::new(),
        }
    }

    pub fn back(self) -> VerifyUser {
        VerifyUser { email: self.email }
    }
}

/// Step 3: enter the six-digit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOtp {
    user: UserSummary,
    email: String,
    pub otp: OtpInput,
}

impl VerifyOtp {
    pub fn user(&self) -> &UserSummary {
        &self.user
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn advance(self, reset_token: String) -> SetNewPassword {
        SetNewPassword {
            user: self.user,
            email: self.email,
            reset_token,
        }
    }

    pub fn back(self) -> RequestReset {
        RequestReset {
            user: self.user,
            email: self.email,
        }
    }
}

/// Step 4: choose the new password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetNewPassword {
    user: UserSummary,
    email: String,
    reset_token: String,
}

impl SetNewPassword {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn reset_token(&self) -> &str {
        &self.reset_token
    }

    pub fn advance(self) -> Completed {
        Completed { email: self.email }
    }

    /// Returns to code entry with empty cells.
    pub fn back(self) -> VerifyOtp {
        VerifyOtp {
            user: self.user,
            email: self.email,
            otp: OtpInput::new(),
        }
    }
}

/// Password changed; the flow only waits to close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub email: String,
}

/// Current step of a running flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetStep {
    VerifyUser(VerifyUser),
    RequestReset(RequestReset),
    VerifyOtp(VerifyOtp),
    SetNewPassword(SetNewPassword),
    Completed(Completed),
}

impl Default for ResetStep {
    fn default() -> Self {
        ResetStep::VerifyUser(VerifyUser::new())
    }
}

impl ResetStep {
    /// Position shown in the progress bar, 1 through 4.
    pub fn number(&self) -> u8 {
        match self {
            ResetStep::VerifyUser(_) => 1,
            ResetStep::RequestReset(_) => 2,
            ResetStep::VerifyOtp(_) => 3,
            ResetStep::SetNewPassword(_) | ResetStep::Completed(_) => 4,
        }
    }

    /// Email carried by the step, if any has been entered yet.
    pub fn email(&self) -> &str {
        match self {
            ResetStep::VerifyUser(s) => &s.email,
            ResetStep::RequestReset(s) => &s.email,
            ResetStep::VerifyOtp(s) => &s.email,
            ResetStep::SetNewPassword(s) => &s.email,
            ResetStep::Completed(s) => &s.email,
        }
    }

    /// One step down. `None` on the first step and after completion.
    #[must_use]
    pub fn back(self) -> Option<Self> {
        match self {
            ResetStep::RequestReset(s) => Some(ResetStep::VerifyUser(s.back())),
            ResetStep::VerifyOtp(s) => Some(ResetStep::RequestReset(s.back())),
            ResetStep::SetNewPassword(s) => Some(ResetStep::VerifyOtp(s.back())),
            ResetStep::VerifyUser(_) | ResetStep::Completed(_) => None,
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Runs the reset flow against the backend.
///
/// Every operation belongs to exactly one step. On failure the message is
/// kept in [`ResetFlow::error`] and the step does not change.
pub struct ResetFlow {
    api: ApiClient,
    step: ResetStep,
    error: Option<String>,
    close_delay: Duration,
    code_sent_at: Option<Instant>,
}

impl ResetFlow {
    pub fn new(api: ApiClient, close_delay: Duration) -> Self {
        Self {
            api,
            step: ResetStep::default(),
            error: None,
            close_delay,
            code_sent_at: None,
        }
    }

    pub fn step(&self) -> &ResetStep {
        &self.step
    }

    pub fn step_number(&self) -> u8 {
        self.step.number()
    }

    /// Message of the last failed operation, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.step, ResetStep::Completed(_))
    }

    /// Code cells of step 3.
    pub fn otp_mut(&mut self) -> Option<&mut OtpInput> {
        match &mut self.step {
            ResetStep::VerifyOtp(s) => Some(&mut s.otp),
            _ => None,
        }
    }

    /// Time left before another code should be requested.
    pub fn resend_available_in(&self) -> Duration {
        self.code_sent_at.map_or(Duration::ZERO, |sent| {
            RESEND_COOLDOWN.saturating_sub(sent.elapsed())
        })
    }

    /// Step 1: looks up the account and moves to step 2.
    ///
    /// # Errors
    /// Validation, backend, or wrong-step failure; the step is unchanged.
    pub async fn submit_email(&mut self, email: &str) -> FlowResult<String> {
        let result = self.try_submit_email(email).await;
        self.record(result)
    }

    async fn try_submit_email(&mut self, email: &str) -> FlowResult<String> {
        let number = self.step.number();
        let ResetStep::VerifyUser(step) = &mut self.step else {
            return Err(FlowError::WrongStep { step: number });
        };
        let email = validate_email(email)?;
        step.email = email.to_string();

        let response = self.api.verify_user(email).await?;
        tracing::debug!(user_id = %response.user_info.id, "reset: account found");
        self.transition(|step| match step {
            ResetStep::VerifyUser(s) => ResetStep::RequestReset(s.advance(response.user_info)),
            other => other,
        });
        Ok(response
            .message
            .unwrap_or_else(|| "User verified successfully".to_string()))
    }

    /// Step 2: sends the reset code to `email` and moves to step 3.
    ///
    /// # Errors
    /// Validation, backend, or wrong-step failure; the step is unchanged.
    pub async fn request_reset(&mut self, email: &str) -> FlowResult<String> {
        let result = self.try_request_reset(email).await;
        self.record(result)
    }

    async fn try_request_reset(&mut self, email: &str) -> FlowResult<String> {
        let number = self.step.number();
        let ResetStep::RequestReset(step) = &mut self.step else {
            return Err(FlowError::WrongStep { step: number });
        };
        let email = validate_email(email)?;
        step.email = email.to_string();
        let user_id = step.user.id.clone();

        let response = self.api.request_password_reset(&user_id, email).await?;
        self.code_sent_at = Some(Instant::now());
        self.transition(|step| match step {
            ResetStep::RequestReset(s) => ResetStep::VerifyOtp(s.advance()),
            other => other,
        });
        Ok(response
            .message
            .unwrap_or_else(|| "Reset email sent successfully".to_string()))
    }

    /// Step 3: exchanges the entered code for a reset token.
    ///
    /// On a backend failure the cells are cleared and focus returns to the
    /// first one.
    ///
    /// # Errors
    /// Incomplete code, backend, or wrong-step failure; the step is unchanged.
    pub async fn verify_otp(&mut self) -> FlowResult<String> {
        let result = self.try_verify_otp().await;
        self.record(result)
    }

    async fn try_verify_otp(&mut self) -> FlowResult<String> {
        let number = self.step.number();
        let ResetStep::VerifyOtp(step) = &self.step else {
            return Err(FlowError::WrongStep { step: number });
        };
        let code = step.otp.submit()?;
        let email = step.email.clone();

        match self.api.verify_reset_otp(&email, &code).await {
            Ok(response) => {
                self.transition(|step| match step {
                    ResetStep::VerifyOtp(s) => {
                        ResetStep::SetNewPassword(s.advance(response.reset_token))
                    }
                    other => other,
                });
                Ok(response
                    .message
                    .unwrap_or_else(|| "OTP verified successfully".to_string()))
            }
            Err(e) => {
                if let Some(otp) = self.otp_mut() {
                    otp.clear();
                }
                Err(e.into())
            }
        }
    }

    /// Step 3 side action: sends a fresh code without changing step.
    ///
    /// # Errors
    /// Backend or wrong-step failure.
    pub async fn resend_code(&mut self) -> FlowResult<String> {
        let result = self.try_resend_code().await;
        self.record(result)
    }

    async fn try_resend_code(&mut self) -> FlowResult<String> {
        let number = self.step.number();
        let ResetStep::VerifyOtp(step) = &self.step else {
            return Err(FlowError::WrongStep { step: number });
        };
        let user_id = step.user.id.clone();
        let email = step.email.clone();

        let response = self
            .api
            .request_password_reset(&user_id, &email)
            .await
            .map_err(|e| e.or_fallback(RESEND_FALLBACK))?;
        self.code_sent_at = Some(Instant::now());
        Ok(response
            .message
            .unwrap_or_else(|| "Reset code resent successfully".to_string()))
    }

    /// Step 4: sets the new password and completes the flow.
    ///
    /// # Errors
    /// Validation, backend, or wrong-step failure; the step is unchanged.
    pub async fn submit_password(&mut self, password: &str, confirm: &str) -> FlowResult<String> {
        let result = self.try_submit_password(password, confirm).await;
        self.record(result)
    }

    async fn try_submit_password(&mut self, password: &str, confirm: &str) -> FlowResult<String> {
        let number = self.step.number();
        let ResetStep::SetNewPassword(step) = &self.step else {
            return Err(FlowError::WrongStep { step: number });
        };
        validate_new_password(password, confirm)?;

        let request = ResetPasswordRequest {
            email: &step.email,
            reset_token: &step.reset_token,
            password,
            confirm_password: confirm,
        };
        let response = self.api.reset_password(&request).await?;
        tracing::info!("password reset completed");
        self.transition(|step| match step {
            ResetStep::SetNewPassword(s) => ResetStep::Completed(s.advance()),
            other => other,
        });
        Ok(response
            .message
            .unwrap_or_else(|| "Password reset successfully".to_string()))
    }

    /// Steps down by one.
    ///
    /// # Errors
    /// Returns `WrongStep` on step 1 and after completion.
    pub fn back(&mut self) -> FlowResult<()> {
        let current = mem::take(&mut self.step);
        let number = current.number();
        match current.clone().back() {
            Some(previous) => {
                self.step = previous;
                self.error = None;
                Ok(())
            }
            None => {
                self.step = current;
                Err(FlowError::WrongStep { step: number })
            }
        }
    }

    /// Waits out the close delay once the flow has completed.
    ///
    /// Returns `false` immediately if the flow is not complete.
    pub async fn wait_for_close(&self) -> bool {
        if !self.is_complete() {
            return false;
        }
        tokio::time::sleep(self.close_delay).await;
        true
    }

    fn transition(&mut self, f: impl FnOnce(ResetStep) -> ResetStep) {
        let current = mem::take(&mut self.step);
        self.step = f(current);
        tracing::debug!(step = self.step.number(), "reset: step changed");
    }

    fn record<T>(&mut self, result: FlowResult<T>) -> FlowResult<T> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.message()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::{SessionHandle, SessionStorage};

    fn summary() -> UserSummary {
        UserSummary {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            ..Default::default()
        }
    }

    fn offline_flow() -> ResetFlow {
        let session = Arc::new(SessionHandle::new(SessionStorage::in_memory()));
        let api = ApiClient::new("http://127.0.0.1:9", session);
        ResetFlow::new(api, Duration::from_millis(1))
    }

    #[test]
    fn test_step_numbers_follow_transitions() {
        let step1 = VerifyUser::new();
        let step2 = step1.advance(summary());
        assert_eq!(step2.email, "a@b.com");
        assert_eq!(ResetStep::RequestReset(step2.clone()).number(), 2);

        let step3 = step2.advance();
        assert_eq!(ResetStep::VerifyOtp(step3.clone()).number(), 3);

        let step4 = step3.advance("tok".to_string());
        assert_eq!(step4.reset_token(), "tok");
        assert_eq!(ResetStep::SetNewPassword(step4.clone()).number(), 4);

        let done = step4.advance();
        assert_eq!(done.email, "a@b.com");
    }

    #[test]
    fn test_back_steps_down_exactly_one() {
        let step3 = VerifyUser::new().advance(summary()).advance();
        let back = ResetStep::VerifyOtp(step3).back().unwrap();
        assert_eq!(back.number(), 2);
        let back = back.back().unwrap();
        assert_eq!(back.number(), 1);
        assert_eq!(back.email(), "a@b.com");
        assert!(back.back().is_none());
    }

    #[test]
    fn test_email_prefill_keeps_typed_email_when_lookup_has_none() {
        let step1 = VerifyUser {
            email: "typed@b.com".to_string(),
        };
        let step2 = step1.advance(UserSummary::default());
        assert_eq!(step2.email, "typed@b.com");
    }

    #[test]
    fn test_back_on_first_step_is_rejected() {
        let mut flow = offline_flow();
        assert_eq!(flow.back(), Err(FlowError::WrongStep { step: 1 }));
        assert_eq!(flow.step_number(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_blocks_before_network() {
        let mut flow = offline_flow();
        let err = flow.submit_email("not-an-email").await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert_eq!(flow.error(), Some(crate::validation::EMAIL_INVALID));
        assert_eq!(flow.step_number(), 1);
    }

    #[tokio::test]
    async fn test_operations_outside_their_step_are_rejected() {
        let mut flow = offline_flow();
        assert_eq!(
            flow.verify_otp().await,
            Err(FlowError::WrongStep { step: 1 })
        );
        assert_eq!(
            flow.submit_password("Abcd1234!", "Abcd1234!").await,
            Err(FlowError::WrongStep { step: 1 })
        );
        assert!(!flow.wait_for_close().await);
        assert_eq!(flow.resend_available_in(), Duration::ZERO);
    }
}
