//! Route-level access control.

use std::fmt;

use crate::store::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    SignIn,
    SignUp,
    VerifyOtp,
    Home,
    About,
    Encyclopedia,
    Donate,
    Terms,
    Privacy,
    ForgotPassword,
    WordDisplay,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
            Route::VerifyOtp => "/verify-otp",
            Route::Home => "/home",
            Route::About => "/about",
            Route::Encyclopedia => "/encyclopedia",
            Route::Donate => "/donate",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
            Route::ForgotPassword => "/forgot-password",
            Route::WordDisplay => "/word-display",
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Route::Home | Route::WordDisplay)
    }

    /// Pages a signed-in user is sent away from.
    fn is_entry(self) -> bool {
        matches!(
            self,
            Route::Landing | Route::SignIn | Route::SignUp | Route::VerifyOtp
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Route),
    /// Authenticated but the user profile has not arrived yet.
    Loading,
}

/// Decides what happens when `route` is opened with the given state.
///
/// Expects the session to be bootstrapped already.
pub fn guard(route: Route, state: &AppState) -> GuardDecision {
    let authenticated = state.auth.is_authenticated;
    let has_user = state.user.user.is_some();

    if authenticated && has_user && route.is_entry() {
        return GuardDecision::Redirect(Route::Home);
    }
    if route.requires_auth() {
        if !authenticated {
            return GuardDecision::Redirect(Route::Landing);
        }
        if !has_user {
            return GuardDecision::Loading;
        }
    }
    GuardDecision::Render
}
