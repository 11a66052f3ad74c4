use std::sync::Arc;

use axum::{debug_handler, extract::{Multipart, Path, State}, response::Redirect};

use crate::{
    api::{self, Upload},
    cache::{Event, Store},
    code::{self, ForumCode},
    requests::{self, Outcome},
    session::AuthContext,
    AppResult,
};

use super::{lookup_forum, Lookup, BAD_CODE_NOTICE};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn create_post(
    Path(code): Path<String>,
    State(api): State<api::Client>,
    State(store): State<Arc<Store>>,
    auth: AuthContext,

    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let Some(code) = ForumCode::parse(&code::normalize(&code)) else {
        auth.push_notice(BAD_CODE_NOTICE).await?;
        return Ok(Redirect::to("/"));
    };

    let Some(token) = auth.token.clone() else {
        return Ok(Redirect::to(&format!("/login?return_url=/f/{code}")));
    };

    let mut title = String::new();
    let mut content = String::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_owned();
        match name.as_str() {
            "title" => title = field.text().await?,
            "content" => content = field.text().await?,
            "files" => {
                let filename = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await?.to_vec();
                // an untouched file input still submits an empty part
                if !data.is_empty() {
                    files.push(Upload { filename, content_type, data });
                }
            }
            _ => {}
        }
    }

    if title.trim().is_empty() || content.trim().is_empty() {
        auth.push_notice("A post needs both a title and some content").await?;
        return Ok(Redirect::to(&format!("/f/{code}")));
    }

    let forum = match lookup_forum(&api, &store, &token, &code).await {
        Lookup::Found(forum) => forum,
        Lookup::Missing => {
            auth.push_notice("The forum you're looking for doesn't exist").await?;
            return Ok(Redirect::to("/"));
        }
        Lookup::Failed(reason) => {
            auth.push_notice(reason).await?;
            return Ok(Redirect::to(&format!("/f/{code}")));
        }
    };

    let request = requests::track({
        let (api, forum_id) = (api.clone(), forum.id);
        async move { Ok(api.create_post(&token, forum_id, &title, &content, files).await?) }
    });

    match request.outcome().await {
        Outcome::Success(_) => {
            store.apply(Event::PostCreated { forum_id: forum.id });
            auth.push_notice("Your post has been published successfully").await?;
        }
        Outcome::Failed(reason) => {
            auth.push_notice(format!("Failed to create post: {reason}")).await?;
        }
    }

    Ok(Redirect::to(&format!("/f/{code}")))
}
