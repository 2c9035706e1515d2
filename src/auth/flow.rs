// ABOUTME: Auth flow — login/register form state, validation, and submission lifecycle.
// ABOUTME: A successful submission stores the token in the session and navigates to chat.

use crate::auth::api::{AuthApi, AuthError, AuthResponse};
use crate::router::{Navigator, Route};
use crate::session::SessionStore;

/// The two mutually exclusive tabs of the auth screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    /// Text of the submit control, which changes while a request is in flight.
    pub fn submit_label(self, loading: bool) -> &'static str {
        match (self, loading) {
            (AuthMode::Login, false) => "Login",
            (AuthMode::Login, true) => "Logging in...",
            (AuthMode::Register, false) => "Create account",
            (AuthMode::Register, true) => "Creating account...",
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            AuthMode::Login => &[Field::Email, Field::Password],
            AuthMode::Register => &[Field::Name, Field::Email, Field::Password],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Password => "Password",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }
}

/// A validated request for the authentication API.
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
}

impl Credentials {
    /// Send these credentials to the matching API operation.
    pub async fn call(&self, api: &dyn AuthApi) -> Result<AuthResponse, AuthError> {
        match self {
            Credentials::Login { email, password } => api.login(email, password).await,
            Credentials::Register {
                name,
                email,
                password,
            } => api.register(name, email, password).await,
        }
    }
}

/// Whole-application authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Form state and submission lifecycle of the auth screen.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    mode: AuthMode,
    form: AuthForm,
    focus: usize,
    loading: bool,
    error: Option<String>,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFlow {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::Login,
            form: AuthForm::default(),
            focus: 0,
            loading: false,
            error: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focused(&self) -> Field {
        let fields = self.mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    /// Switch tabs. Field values are kept; the error and focus are reset.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.focus = 0;
        self.error = None;
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.switch_mode(next);
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.mode.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.mode.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Type into the focused field. Ignored while a request is in flight.
    pub fn push_char(&mut self, c: char) {
        if self.loading || c == '\n' {
            return;
        }
        let field = self.focused();
        self.form.value_mut(field).push(c);
    }

    pub fn pop_char(&mut self) {
        if self.loading {
            return;
        }
        let field = self.focused();
        self.form.value_mut(field).pop();
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.form.value_mut(field) = value.into();
    }

    /// Check presence and email shape for the fields of the current mode.
    pub fn validate(&self) -> Result<Credentials, AuthError> {
        for field in self.mode.fields() {
            if self.form.value(*field).trim().is_empty() {
                return Err(AuthError::Validation(format!(
                    "{} is required",
                    field.label()
                )));
            }
        }

        let email = self.form.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(AuthError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }

        let password = self.form.password.clone();
        Ok(match self.mode {
            AuthMode::Login => Credentials::Login { email, password },
            AuthMode::Register => Credentials::Register {
                name: self.form.name.trim().to_string(),
                email,
                password,
            },
        })
    }

    /// Start a submission. Returns `None` while another is in flight or when
    /// validation fails (the validation error is then displayed).
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        self.error = None;
        match self.validate() {
            Ok(credentials) => {
                self.loading = true;
                Some(credentials)
            }
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }

    /// Apply the API outcome. Returns whether the user is now signed in.
    pub fn finish(
        &mut self,
        result: Result<AuthResponse, AuthError>,
        session: &mut SessionStore,
        navigator: &mut dyn Navigator,
    ) -> bool {
        self.loading = false;
        match result {
            Ok(response) => {
                session.login(response.token);
                navigator.navigate(Route::Chat);
                true
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", self.mode.title().to_lowercase(), e);
                self.error = Some(e.user_message());
                false
            }
        }
    }

    /// Validate, call the API, and apply the result.
    pub async fn submit(
        &mut self,
        api: &dyn AuthApi,
        session: &mut SessionStore,
        navigator: &mut dyn Navigator,
    ) -> bool {
        let Some(credentials) = self.begin_submit() else {
            return false;
        };
        let result = credentials.call(api).await;
        self.finish(result, session, navigator)
    }

    /// Derive the whole-app state from the session and this flow.
    pub fn app_state(&self, session: &SessionStore) -> AppState {
        if session.is_authenticated() {
            AppState::Authenticated
        } else if self.loading {
            AppState::Authenticating
        } else {
            AppState::Unauthenticated
        }
    }
}

/// Minimal `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
