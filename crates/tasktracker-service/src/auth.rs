use crate::{validate, ApiClient, EmptyObject};
use http::StatusCode;
use std::sync::Arc;
use tasktracker_error::Result;
use tasktracker_type::auth::{AuthResponse, LoginRequest, RegisterRequest};
use tokio::sync::watch;

/// Failure statuses the authentication endpoints explain with an [`AuthResponse`]
const EXPLAINED_FAILURES: &[StatusCode] = &[StatusCode::BAD_REQUEST, StatusCode::UNAUTHORIZED];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    pub username: Option<String>,
}

impl AuthState {
    fn logged_in(username: Option<String>) -> Self {
        Self {
            authenticated: true,
            username,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(AuthState::default());

        Self {
            client,
            state: Arc::new(state),
        }
    }

    fn publish(&self, state: AuthState) {
        self.state.send_replace(state);
    }

    /// Create a new account
    ///
    /// Rejected registrations come back as `Ok` with `success` set to `false`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        validate(request)?;

        self.client
            .post_accepting("/api/auth/register", request, EXPLAINED_FAILURES)
            .await
    }

    /// Open a session
    ///
    /// Wrong credentials come back as `Ok` with `success` set to `false`.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        validate(request)?;

        let response: AuthResponse = self
            .client
            .post_accepting("/api/auth/login", request, EXPLAINED_FAILURES)
            .await?;

        if response.success {
            info!("logged in");
            self.publish(AuthState::logged_in(response.username.clone()));
        }

        Ok(response)
    }

    /// Close the session
    ///
    /// The local state is reset no matter what the backend says, and the call always reports success.
    pub async fn logout(&self) -> AuthResponse {
        let result: Result<AuthResponse> = self.client.post("/api/auth/logout", &EmptyObject {}).await;
        self.publish(AuthState::default());

        match result {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "logout request failed, dropping the session anyway");

                AuthResponse {
                    success: true,
                    message: "Logout successful".into(),
                    ..AuthResponse::default()
                }
            }
        }
    }

    /// Ask the backend who we are and update the local state accordingly
    pub async fn current_user(&self) -> AuthResponse {
        match self.client.get::<AuthResponse>("/api/auth/me").await {
            Ok(response) => {
                if response.success {
                    self.publish(AuthState::logged_in(response.username.clone()));
                } else {
                    self.publish(AuthState::default());
                }

                response
            }
            Err(error) => {
                debug!(%error, "not authenticated");
                self.publish(AuthState::default());

                AuthResponse::failure("Not authenticated")
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().authenticated
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.state.borrow().username.clone()
    }

    /// Get notified whenever the authentication state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
