//! Session bootstrap and the sign-in/sign-out flows. Every failure here ends
//! in the same place: the caller is sent back to the login prompt.

use std::sync::Arc;

use shared::domain::UserData;
use storage::SessionStore;
use tracing::{info, warn};

use crate::{
    forms::{sanitize_mobile, validate_mobile, validate_otp, LoginForm},
    ClientError, ClientResult, Credentials, EmployeeClient,
};

const NOT_REGISTERED: &str = "The phone number is not registered.";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    /// Nothing usable in the credential cache.
    MissingCredentials,
    /// The server no longer recognises the cached session.
    SessionRejected(String),
    /// The session check could not be completed.
    Unreachable(String),
}

impl std::fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "no saved login"),
            Self::SessionRejected(message) => write!(f, "session rejected: {message}"),
            Self::Unreachable(message) => write!(f, "session check failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Authenticated(Credentials),
    RedirectToLogin(RedirectReason),
}

pub struct SessionManager {
    client: EmployeeClient,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(client: EmployeeClient, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &EmployeeClient {
        &self.client
    }

    /// Validates the cached login against the server.
    pub async fn bootstrap(&self) -> SessionState {
        let user = match self.store.load_user().await {
            Ok(Some(user)) => user,
            Ok(None) => return SessionState::RedirectToLogin(RedirectReason::MissingCredentials),
            Err(err) => {
                warn!("credential cache unreadable: {err:#}");
                return SessionState::RedirectToLogin(RedirectReason::MissingCredentials);
            }
        };

        let Some(credentials) = Credentials::from_user(user) else {
            return SessionState::RedirectToLogin(RedirectReason::MissingCredentials);
        };

        match self.client.check_session(&credentials).await {
            Ok(()) => {
                info!(user_id = credentials.user_id().0, "session restored");
                SessionState::Authenticated(credentials)
            }
            Err(ClientError::Api(api)) => {
                SessionState::RedirectToLogin(RedirectReason::SessionRejected(api.message))
            }
            Err(err) => SessionState::RedirectToLogin(RedirectReason::Unreachable(err.to_string())),
        }
    }

    /// Like [`bootstrap`](Self::bootstrap) but as a `Result` for callers that
    /// cannot proceed without a session.
    pub async fn require(&self) -> ClientResult<Credentials> {
        match self.bootstrap().await {
            SessionState::Authenticated(credentials) => Ok(credentials),
            SessionState::RedirectToLogin(reason) => {
                info!("redirecting to login: {reason}");
                Err(ClientError::NotLoggedIn)
            }
        }
    }

    /// Credentials straight from the cache, without asking the server.
    pub async fn cached(&self) -> ClientResult<Credentials> {
        self.store
            .load_user()
            .await?
            .and_then(Credentials::from_user)
            .ok_or(ClientError::NotLoggedIn)
    }

    pub async fn login_with_password(&self, mobile: &str, password: &str) -> ClientResult<Credentials> {
        let form = LoginForm::new(mobile, password);
        form.validate()?;

        let user = self
            .client
            .password_login(&form.mobile, &form.password)
            .await
            .map_err(reword_login_failure)?;
        self.persist_login(user).await
    }

    /// First OTP step: confirms the number is registered and remembers it.
    pub async fn request_otp(&self, mobile: &str) -> ClientResult<String> {
        let mobile = sanitize_mobile(mobile);
        validate_mobile(&mobile)?;

        match self.client.check_user(&mobile).await {
            Ok(Some(echoed)) if echoed == mobile => {
                self.store.remember_contact(&mobile).await?;
                info!("otp requested for registered number");
                Ok(mobile)
            }
            Ok(_) | Err(ClientError::Api(_)) => Err(ClientError::Validation(NOT_REGISTERED.into())),
            Err(err) if err.is_transport() => {
                warn!("checkUser failed: {err}");
                Err(ClientError::Validation(NOT_REGISTERED.into()))
            }
            Err(err) => Err(err),
        }
    }

    /// Second OTP step, using the number remembered by
    /// [`request_otp`](Self::request_otp).
    pub async fn login_with_otp(&self, otp: &str) -> ClientResult<Credentials> {
        validate_otp(otp)?;
        let Some(mobile) = self.store.contact().await? else {
            return Err(ClientError::Validation(
                "Failed to retrieve contact number. Please try again.".into(),
            ));
        };

        let user = self
            .client
            .otp_login(&mobile, otp)
            .await
            .map_err(reword_login_failure)?;
        self.persist_login(user).await
    }

    /// Revokes the token server-side, then forgets it locally. The cache is
    /// left alone if the server did not confirm.
    pub async fn logout(&self, credentials: &Credentials) -> ClientResult<()> {
        let confirmed = self.client.logout(credentials).await?;
        if !confirmed {
            return Err(ClientError::Validation("Failed to log out.".into()));
        }
        self.store.clear_session().await?;
        info!(user_id = credentials.user_id().0, "logged out");
        Ok(())
    }

    async fn persist_login(&self, user: UserData) -> ClientResult<Credentials> {
        let Some(credentials) = Credentials::from_user(user) else {
            return Err(ClientError::Validation(INVALID_CREDENTIALS.into()));
        };
        self.store.save_user(credentials.user()).await?;
        info!(user_id = credentials.user_id().0, "logged in");
        Ok(credentials)
    }
}

/// A login that did not return a usable user shows the server's message, or
/// a fixed fallback when the server gave none.
fn reword_login_failure(err: ClientError) -> ClientError {
    match err {
        ClientError::Api(api) if api.has_server_message() => {
            ClientError::Validation(api.message)
        }
        ClientError::MissingData { message, .. } if !message.trim().is_empty() => {
            ClientError::Validation(message)
        }
        ClientError::Api(_) | ClientError::MissingData { .. } | ClientError::Decode { .. } => {
            ClientError::Validation(INVALID_CREDENTIALS.into())
        }
        other => other,
    }
}
