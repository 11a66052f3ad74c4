use axum::{debug_handler, extract::{Query, State}, response::Redirect};
use serde::Deserialize;

use crate::{api, requests::{self, Outcome}, session::AuthContext, AppResult};

#[derive(Deserialize)]
pub(crate) struct LogoutQuery {
    pub(crate) return_url: Option<String>,
}

#[debug_handler]
pub(crate) async fn logout(
    Query(LogoutQuery { return_url }): Query<LogoutQuery>,
    State(api): State<api::Client>,
    mut auth: AuthContext,
) -> AppResult<Redirect> {
    // the local session dies either way; the service token is revoked on a
    // best-effort basis
    if let Some(token) = auth.token.clone() {
        let request = requests::track(async move { Ok(api.logout(&token).await?) });
        if let Outcome::Failed(reason) = request.outcome().await {
            tracing::warn!("service logout failed: {reason}");
        }
    }

    auth.logout().await;
    Ok(Redirect::to(return_url.as_deref().unwrap_or("/")))
}
