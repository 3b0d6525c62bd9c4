//! Account services: sign-in, sign-up, profile edits, word of the day.
//!
//! Each operation calls the backend through `ApiClient` and commits the
//! outcome to the shared session, the same place every other component
//! reads from.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::api::types::{Photo, RegisterRequest, User, WordOfDay};
use crate::api::{ApiClient, ApiResult};
use crate::flows::FlowResult;
use crate::session::SessionHandle;
use crate::store::{Action, AuthAction, UserAction, WordAction};
use crate::validation::{
    self, NAME_REQUIRED, OtpInput, USERNAME_REQUIRED, ValidationError, validate_email,
};

pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";
pub const NOT_AN_IMAGE: &str = "Please choose an image file";

const FALLBACK_WORD: &str = "Dish";
const FALLBACK_MEANING: &str =
    "A dish refers to a prepared or cooked item of food that is served as part of a meal.";

// ============================================================================
// Sign-in / sign-up
// ============================================================================

/// Exchanges credentials for a session.
///
/// The sign-in form state in the store tracks the attempt: the submission
/// flag is set for its duration and the error is recorded on failure.
///
/// # Errors
/// Validation failure (no request sent) or the backend error.
pub async fn sign_in(api: &ApiClient, email: &str, password: &str) -> FlowResult<User> {
    let session = api.session();
    let email = validate_email(email)?;
    session.dispatch(AuthAction::UpdateSignIn {
        email: Some(email.to_string()),
        submission_started: Some(true),
        error: Some(None),
    });

    match api.login(email, password).await {
        Ok(response) => {
            session.dispatch_all([
                AuthAction::SetAuthData {
                    access: response.access_token,
                    refresh: response.refresh_token,
                }
                .into(),
                UserAction::SetUser(response.user.clone()).into(),
                AuthAction::UpdateSignIn {
                    email: None,
                    submission_started: Some(false),
                    error: None,
                }
                .into(),
            ]);
            tracing::info!(user_id = %response.user.id, "signed in");
            Ok(response.user)
        }
        Err(e) => {
            session.dispatch(AuthAction::UpdateSignIn {
                email: None,
                submission_started: Some(false),
                error: Some(Some(e.message.clone())),
            });
            Err(e.into())
        }
    }
}

/// Sign-up form fields.
#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Creates the account and remembers the email for the verification step.
///
/// # Errors
/// Validation failure (no request sent) or the backend error.
pub async fn sign_up(api: &ApiClient, form: &SignUp) -> FlowResult<String> {
    let email = validate_email(&form.email)?;
    let request = RegisterRequest {
        first_name: form.first_name.trim(),
        last_name: form.last_name.trim(),
        username: form.username.trim(),
        email,
        password: &form.password,
    };
    let response = api.register(&request).await?;
    api.session().remember_pending_email(email);
    Ok(response
        .message
        .unwrap_or_else(|| "Verification email sent".to_string()))
}

/// Confirms the pending sign-up email with the six-digit code.
///
/// # Errors
/// Incomplete code or missing pending email (no request sent), or the
/// backend error.
pub async fn verify_signup_otp(api: &ApiClient, otp: &OtpInput) -> FlowResult<String> {
    let code = otp.submit()?;
    let email = pending_email(api.session())?;
    let response = api.verify_signup_otp(&email, &code).await?;
    Ok(response
        .message
        .unwrap_or_else(|| "Email verified successfully".to_string()))
}

/// Sends a new sign-up code to the pending email.
///
/// # Errors
/// Missing pending email (no request sent) or the backend error.
pub async fn resend_signup_otp(api: &ApiClient) -> FlowResult<String> {
    let email = pending_email(api.session())?;
    let response = api.resend_signup_otp(&email).await?;
    Ok(response
        .message
        .unwrap_or_else(|| "Verification code resent".to_string()))
}

fn pending_email(session: &SessionHandle) -> Result<String, ValidationError> {
    session
        .pending_email()
        .ok_or_else(|| ValidationError::new(validation::EMAIL_REQUIRED))
}

/// Local logout: no request is sent.
pub fn log_out(session: &SessionHandle) -> &'static str {
    session.dispatch_all([UserAction::ClearUser.into(), AuthAction::Logout.into()]);
    tracing::info!("signed out");
    LOGGED_OUT_MESSAGE
}

// ============================================================================
// Profile
// ============================================================================

/// Refreshes the stored user from the backend.
///
/// # Errors
/// Returns the backend error.
pub async fn load_profile(api: &ApiClient) -> ApiResult<User> {
    let user = api.profile().await?;
    api.session().dispatch(UserAction::SetUser(user.clone()));
    Ok(user)
}

/// Splits `full_name` into first and last name and saves both.
///
/// # Errors
/// Blank name (no request sent) or the backend error.
pub async fn update_name(api: &ApiClient, full_name: &str) -> FlowResult<User> {
    let full_name = validation::require_non_blank(full_name, NAME_REQUIRED)?;
    let (first, last) = validation::split_full_name(full_name);
    let user = api.update_name(&first, &last).await?;
    api.session().dispatch(UserAction::SetUser(user.clone()));
    Ok(user)
}

/// # Errors
/// Blank username (no request sent) or the backend error.
pub async fn update_username(api: &ApiClient, username: &str) -> FlowResult<User> {
    let username = validation::require_non_blank(username, USERNAME_REQUIRED)?;
    let user = api.update_username(username).await?;
    api.session().dispatch(UserAction::SetUser(user.clone()));
    Ok(user)
}

/// Uploads image bytes as the profile picture.
///
/// # Errors
/// Non-image content (no request sent) or the backend error.
pub async fn upload_profile_picture(api: &ApiClient, bytes: &[u8]) -> FlowResult<User> {
    let data_url = image_data_url(bytes)?;
    let user = api.upload_profile_picture(&data_url).await?;
    api.session().dispatch(UserAction::SetUser(user.clone()));
    Ok(user)
}

/// Encodes image bytes as `data:<mime>;base64,<payload>`.
///
/// The MIME type is sniffed from the content.
///
/// # Errors
/// Returns a `ValidationError` when the bytes are not a recognized image.
pub fn image_data_url(bytes: &[u8]) -> Result<String, ValidationError> {
    let kind = infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .ok_or_else(|| ValidationError::new(NOT_AN_IMAGE))?;
    Ok(format!(
        "data:{};base64,{}",
        kind.mime_type(),
        STANDARD.encode(bytes)
    ))
}

// ============================================================================
// Word of the day
// ============================================================================

/// Word shown when the daily word cannot be fetched.
pub fn fallback_word() -> WordOfDay {
    WordOfDay {
        word: FALLBACK_WORD.to_string(),
        meaning: FALLBACK_MEANING.to_string(),
        photo: Some(Photo::default()),
    }
}

/// Fetches the daily word into the store.
///
/// On failure the error is recorded and the fallback word is stored instead,
/// so `word.word_of_day` is always set afterwards.
///
/// # Errors
/// Returns the backend error after storing the fallback.
pub async fn word_of_day(api: &ApiClient) -> ApiResult<WordOfDay> {
    let session = api.session();
    session.dispatch_all([
        WordAction::SetLoading(true).into(),
        WordAction::SetError(None).into(),
    ]);

    let result = api
        .word_of_day()
        .await
        .map(|response| with_default_photo(response.word_of_day));
    let (word, error) = match &result {
        Ok(word) => (word.clone(), None),
        Err(e) => {
            tracing::debug!(error = %e, "word of the day unavailable, using fallback");
            (fallback_word(), Some(e.message.clone()))
        }
    };

    // Storing the word clears the error, so the error goes in after it.
    let mut actions: Vec<Action> = Vec::with_capacity(3);
    actions.push(WordAction::SetWordOfDay(word).into());
    if error.is_some() {
        actions.push(WordAction::SetError(error).into());
    }
    actions.push(WordAction::SetLoading(false).into());
    session.dispatch_all(actions);

    result
}

fn with_default_photo(mut word: WordOfDay) -> WordOfDay {
    let photo = word.photo.take().unwrap_or_default();
    let defaults = Photo::default();
    word.photo = Some(Photo {
        url: if photo.url.is_empty() {
            defaults.url
        } else {
            photo.url
        },
        kind: if photo.kind.is_empty() {
            defaults.kind
        } else {
            photo.kind
        },
    });
    word
}
