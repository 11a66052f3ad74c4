use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;

use crate::{api, requests::{self, Outcome}, session::AuthContext, AppResult};

use super::login;

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    username: String,
    password: String,
}

/// Registration signs the new account straight in, like the login flow.
#[debug_handler]
pub(crate) async fn register(
    State(api): State<api::Client>,
    mut auth: AuthContext,

    Form(RegisterForm { username, password }): Form<RegisterForm>,
) -> AppResult<Response> {
    let creds = api::Credentials { username, password };
    let request = requests::track(async move { Ok(api.register(&creds).await?) });

    match request.outcome().await {
        Outcome::Success(grant) => {
            tracing::info!("registered u/{}", grant.user.username);
            auth.login(grant).await?;

            let return_url = auth.take_return_url().await?.unwrap_or_else(|| "/".to_owned());
            Ok(Redirect::to(&return_url).into_response())
        }
        Outcome::Failed(reason) => Ok(login::render(Some(reason))),
    }
}
