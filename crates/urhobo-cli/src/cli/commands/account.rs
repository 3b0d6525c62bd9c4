//! Profile command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use urhobo_core::account;
use urhobo_core::api::types::User;
use urhobo_core::guard::Route;

use crate::cli::App;

pub async fn whoami(app: &App) -> Result<()> {
    app.enter(Route::Home).await?;
    let user = account::load_profile(&app.api)
        .await
        .context("load profile")?;
    print_user(&user);
    Ok(())
}

pub async fn update_name(app: &App, full_name: &str) -> Result<()> {
    app.enter(Route::Home).await?;
    let user = account::update_name(&app.api, full_name).await?;
    println!("✓ Name updated to {}", user.display_name());
    Ok(())
}

pub async fn update_username(app: &App, username: &str) -> Result<()> {
    app.enter(Route::Home).await?;
    let user = account::update_username(&app.api, username).await?;
    println!("✓ Username updated to {}", user.username);
    Ok(())
}

pub async fn upload_picture(app: &App, path: &Path) -> Result<()> {
    app.enter(Route::Home).await?;
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let user = account::upload_profile_picture(&app.api, &bytes).await?;
    println!("✓ Profile picture updated");
    if let Some(url) = user.profile_picture_url.as_deref() {
        println!("  {url}");
    }
    Ok(())
}

fn print_user(user: &User) {
    let name = user.display_name();
    if !name.is_empty() {
        println!("{name}");
    }
    if !user.username.is_empty() {
        println!("  username: {}", user.username);
    }
    println!("  email:    {}", user.email);
    if let Some(verified) = user.is_verified {
        println!("  verified: {}", if verified { "yes" } else { "no" });
    }
}
