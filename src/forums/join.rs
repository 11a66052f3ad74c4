use axum::{debug_handler, response::Redirect, Form};
use serde::Deserialize;

use crate::{code::{self, ForumCode}, session::AuthContext, AppResult};

use super::BAD_CODE_NOTICE;

#[derive(Deserialize)]
pub(crate) struct JoinForm {
    code: String,
}

/// Code-entry submission. Nothing leaves this handler for the network; a
/// well-formed code only earns a redirect to the forum page.
#[debug_handler]
pub(crate) async fn join(
    auth: AuthContext,
    Form(JoinForm { code }): Form<JoinForm>,
) -> AppResult<Redirect> {
    match ForumCode::parse(&code::normalize(&code)) {
        Some(code) => Ok(Redirect::to(&format!("/f/{code}"))),
        None => {
            auth.push_notice(BAD_CODE_NOTICE).await?;
            Ok(Redirect::to("/"))
        }
    }
}
