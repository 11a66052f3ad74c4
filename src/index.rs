use axum::{debug_handler, response::{Html, IntoResponse, Response}};

use crate::{code::ForumCode, include_res, res, session::AuthContext, AppResult};

/// Landing page for visitors, home page for members. Home proposes a fresh
/// code for the create form; the user can still edit it before submitting.
#[debug_handler]
pub async fn index(auth: AuthContext) -> AppResult<Response> {
    let Some(user) = &auth.user else {
        return Ok(Html(include_res!(str, "/pages/landing.html")).into_response());
    };

    let notice = auth.take_notice().await?;
    let body = include_res!(str, "/pages/home.html")
        .replace("{username}", &user.username)
        .replace("{proposed_code}", ForumCode::random().as_str())
        .replace("{notice}", &res::notice_html(notice));

    Ok(Html(body).into_response())
}
