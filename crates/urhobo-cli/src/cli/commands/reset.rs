//! Interactive password reset.

use anyhow::Result;
use urhobo_core::flows::{ResetFlow, ResetStep};
use urhobo_core::guard::Route;

use crate::cli::App;
use crate::cli::prompt::{ask, ask_with_default};

const BACK: &str = "<";
const RESEND: &str = "r";

pub async fn run(app: &App, email: Option<String>) -> Result<()> {
    app.enter(Route::ForgotPassword).await?;

    let mut flow = ResetFlow::new(app.api.clone(), app.config.reset.close_delay());
    let mut prefill = email;
    println!("Reset your password. Enter {BACK} to go back a step.");

    while !flow.is_complete() {
        let number = flow.step_number();
        let outcome = match flow.step() {
            ResetStep::VerifyUser(_) => {
                println!("\nStep {number}/4: find your account");
                let email = match prefill.take() {
                    Some(email) => email,
                    None => ask("Email")?,
                };
                flow.submit_email(&email).await
            }
            ResetStep::RequestReset(step) => {
                println!("\nStep {number}/4: send a reset code");
                let answer = ask_with_default("Email", &step.email)?;
                if answer == BACK {
                    flow.back()?;
                    continue;
                }
                flow.request_reset(&answer).await
            }
            ResetStep::VerifyOtp(step) => {
                println!("\nStep {number}/4: enter the code sent to {}", step.email());
                let answer = ask(&format!("6-digit code ({RESEND} to resend)"))?;
                match answer.as_str() {
                    BACK => {
                        flow.back()?;
                        continue;
                    }
                    RESEND => {
                        let wait = flow.resend_available_in();
                        if !wait.is_zero() {
                            println!("  You can request a new code in {}s.", wait.as_secs());
                            continue;
                        }
                        flow.resend_code().await
                    }
                    code => {
                        if let Some(otp) = flow.otp_mut() {
                            otp.clear();
                            otp.paste(code);
                        }
                        flow.verify_otp().await
                    }
                }
            }
            ResetStep::SetNewPassword(_) => {
                println!("\nStep {number}/4: choose a new password");
                let password = ask("New password")?;
                if password == BACK {
                    flow.back()?;
                    continue;
                }
                let confirm = ask("Confirm password")?;
                flow.submit_password(&password, &confirm).await
            }
            ResetStep::Completed(_) => break,
        };

        match outcome {
            Ok(message) => println!("✓ {message}"),
            Err(e) => eprintln!("✗ {e}"),
        }
    }

    println!("You can now sign in with your new password.");
    flow.wait_for_close().await;
    Ok(())
}
