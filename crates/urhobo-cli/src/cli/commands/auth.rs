//! Sign-in, sign-out and sign-up command handlers.

use anyhow::Result;
use urhobo_core::account::{self, SignUp};
use urhobo_core::guard::{self, GuardDecision, Route};
use urhobo_core::validation::{OtpInput, validate_email};

use crate::cli::App;
use crate::cli::prompt::value_or_ask;

pub async fn login(app: &App, email: Option<String>, password: Option<String>) -> Result<()> {
    app.enter(Route::SignIn).await?;

    let email = value_or_ask(email, "Email")?;
    let password = value_or_ask(password, "Password")?;
    let user = account::sign_in(&app.api, &email, &password).await?;

    println!("✓ Login successful");
    let name = user.display_name();
    if name.is_empty() {
        println!("  Signed in as {}", user.email);
    } else {
        println!("  Signed in as {name} <{}>", user.email);
    }
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    let decision = app.session.read(|state| guard::guard(Route::Home, state));
    if decision == GuardDecision::Redirect(Route::Landing) {
        println!("Not signed in.");
        return Ok(());
    }
    println!("✓ {}", account::log_out(&app.session));
    Ok(())
}

/// Sign-up fields given on the command line; missing ones are prompted.
pub struct SignupArgs {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn signup(app: &App, args: SignupArgs) -> Result<()> {
    app.enter(Route::SignUp).await?;

    let form = SignUp {
        first_name: value_or_ask(args.first_name, "First name")?,
        last_name: value_or_ask(args.last_name, "Last name")?,
        username: value_or_ask(args.username, "Username")?,
        email: value_or_ask(args.email, "Email")?,
        password: value_or_ask(args.password, "Password")?,
    };
    let message = account::sign_up(&app.api, &form).await?;

    println!("✓ {message}");
    println!("  Then run: urhobo verify-email <CODE>");
    Ok(())
}

pub async fn verify_email(app: &App, code: Option<String>, email: Option<String>) -> Result<()> {
    app.enter(Route::VerifyOtp).await?;

    if let Some(email) = email {
        let email = validate_email(&email)?;
        app.session.remember_pending_email(email);
    }
    let code = value_or_ask(code, "6-digit code")?;
    let mut otp = OtpInput::new();
    otp.paste(&code);

    let message = account::verify_signup_otp(&app.api, &otp).await?;
    println!("✓ {message}");
    println!("  You can now sign in: urhobo login");
    Ok(())
}

pub async fn resend_code(app: &App, email: Option<String>) -> Result<()> {
    app.enter(Route::VerifyOtp).await?;

    if let Some(email) = email {
        let email = validate_email(&email)?;
        app.session.remember_pending_email(email);
    }
    let message = account::resend_signup_otp(&app.api).await?;
    println!("✓ {message}");
    Ok(())
}
