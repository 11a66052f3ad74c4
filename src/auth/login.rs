use axum::{debug_handler, extract::{Query, State}, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;

use crate::{api, include_res, requests::{self, Outcome}, res, session::AuthContext, AppResult};

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    auth: AuthContext,
) -> AppResult<Response> {
    if auth.user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    if let Some(return_url) = return_url {
        auth.remember_return_url(&return_url).await?;
    }

    let notice = auth.take_notice().await?;
    Ok(render(notice))
}

pub(crate) fn render(notice: Option<String>) -> Response {
    Html(include_res!(str, "/pages/login.html").replace("{notice}", &res::notice_html(notice)))
        .into_response()
}

#[debug_handler]
pub(crate) async fn login(
    State(api): State<api::Client>,
    mut auth: AuthContext,

    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Response> {
    let creds = api::Credentials { username, password };
    let request = requests::track(async move { Ok(api.login(&creds).await?) });

    match request.outcome().await {
        Outcome::Success(grant) => {
            tracing::info!("welcome u/{}", grant.user.username);
            auth.login(grant).await?;

            let return_url = auth.take_return_url().await?.unwrap_or_else(|| "/".to_owned());
            Ok(Redirect::to(&return_url).into_response())
        }
        Outcome::Failed(reason) => Ok(render(Some(reason))),
    }
}
