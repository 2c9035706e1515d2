// ABOUTME: Auth module — remote authentication API client and the login/register flow.
// ABOUTME: The flow writes tokens into the session store and drives navigation.

pub mod api;
pub mod flow;
pub mod worker;

pub use api::{AuthApi, AuthError, AuthResponse, GENERIC_AUTH_ERROR, HttpAuthApi};
pub use flow::{AppState, AuthFlow, AuthMode, Credentials, Field};
