use std::sync::Arc;

use axum::{debug_handler, extract::State, response::Redirect, Form};
use serde::Deserialize;

use crate::{
    api,
    cache::{Event, Store},
    code::{self, ForumCode},
    requests::{self, Outcome},
    session::AuthContext,
    AppResult,
};

use super::BAD_CODE_NOTICE;

#[derive(Deserialize)]
pub(crate) struct NewForumForm {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    code: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn new_forum(
    State(api): State<api::Client>,
    State(store): State<Arc<Store>>,
    auth: AuthContext,

    Form(NewForumForm { name, description, code }): Form<NewForumForm>,
) -> AppResult<Redirect> {
    let Some(token) = auth.token.clone() else {
        return Ok(Redirect::to("/login?return_url=/"));
    };

    let name = name.trim().to_owned();
    if name.is_empty() {
        auth.push_notice("Please enter a name for your forum").await?;
        return Ok(Redirect::to("/"));
    }

    // the proposed code is editable, so it goes through the same gate as
    // typed input
    let code = if code.trim().is_empty() {
        ForumCode::random()
    } else {
        match ForumCode::parse(&code::normalize(&code)) {
            Some(code) => code,
            None => {
                auth.push_notice(BAD_CODE_NOTICE).await?;
                return Ok(Redirect::to("/"));
            }
        }
    };

    let request = requests::track({
        let code = code.clone();
        async move { Ok(api.create_forum(&token, &code, &name, &description).await?) }
    });

    match request.outcome().await {
        Outcome::Success(forum) => {
            store.apply(Event::ForumCreated { code: code.clone() });
            auth.push_notice(format!(
                r#"Your forum "{}" has been created with code: {}"#,
                forum.name, forum.code
            ))
            .await?;
            Ok(Redirect::to(&format!("/f/{code}")))
        }
        Outcome::Failed(reason) => {
            auth.push_notice(format!("Failed to create forum: {reason}")).await?;
            Ok(Redirect::to("/"))
        }
    }
}
