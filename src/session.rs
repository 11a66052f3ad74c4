use axum::{extract::FromRequestParts, http::request::Parts, response::{IntoResponse, Response}};
use tower_sessions::Session;

use crate::{api::{Grant, User}, AppResult};

pub const USER: &str = "user";
pub const TOKEN: &str = "api_token";
pub const NOTICE: &str = "notice";
pub const RETURN_URL: &str = "return_url";

/// Who is asking, and how to change that. Loaded from the cookie session on
/// every request and handed to handlers as an argument; nothing reads the
/// session keys directly.
pub struct AuthContext {
    session: Session,
    pub user: Option<User>,
    pub token: Option<String>,
}

impl AuthContext {
    pub async fn load(session: Session) -> AppResult<AuthContext> {
        let user = session.get::<User>(USER).await?;
        let token = session.get::<String>(TOKEN).await?;
        Ok(AuthContext { session, user, token })
    }

    /// Turns a service grant into the logged-in context.
    pub async fn login(&mut self, grant: Grant) -> AppResult<()> {
        self.session.insert(USER, &grant.user).await?;
        self.session.insert(TOKEN, &grant.token).await?;
        let Grant { token, user } = grant;
        self.user = Some(user);
        self.token = Some(token);
        Ok(())
    }

    /// Tears the context down; a later login starts from scratch.
    pub async fn logout(&mut self) {
        self.session.clear().await;
        self.user = None;
        self.token = None;
    }

    /// Queues a one-shot message for the next page render.
    pub async fn push_notice(&self, text: impl Into<String>) -> AppResult<()> {
        self.session.insert(NOTICE, text.into()).await?;
        Ok(())
    }

    /// Reading a notice consumes it.
    pub async fn take_notice(&self) -> AppResult<Option<String>> {
        Ok(self.session.remove::<String>(NOTICE).await?)
    }

    pub async fn remember_return_url(&self, url: &str) -> AppResult<()> {
        self.session.insert(RETURN_URL, url).await?;
        Ok(())
    }

    pub async fn take_return_url(&self) -> AppResult<Option<String>> {
        Ok(self.session.remove::<String>(RETURN_URL).await?)
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        AuthContext::load(session)
            .await
            .map_err(IntoResponse::into_response)
    }
}
