mod forum;
mod join;
mod new;
mod post;

use axum::{routing, Router};

use crate::{api::{self, Forum}, cache::Store, code::ForumCode, requests::{self, Outcome}, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join", routing::post(join::join))
        .route("/new", routing::post(new::new_forum))
        .route("/{code}", routing::get(forum::forum))
        .route("/{code}/posts", routing::post(post::create_post))
}

/// Same wording the code-entry widget shows; any path that takes a code uses it.
pub(crate) const BAD_CODE_NOTICE: &str = "Forum code must be 5 characters (A-Z and 1-9)";

pub(crate) enum Lookup {
    Found(Forum),
    Missing,
    Failed(String),
}

/// Forum metadata, from the store when it is already there.
pub(crate) async fn lookup_forum(
    api: &api::Client,
    store: &Store,
    token: &str,
    code: &ForumCode,
) -> Lookup {
    if let Some(forum) = store.forum(code) {
        return Lookup::Found(forum);
    }

    let request = requests::track({
        let (api, token, code) = (api.clone(), token.to_owned(), code.clone());
        async move { Ok(api.forum_by_code(&token, &code).await?) }
    });

    match request.outcome().await {
        Outcome::Success(Some(forum)) => {
            store.put_forum(forum.clone());
            Lookup::Found(forum)
        }
        Outcome::Success(None) => Lookup::Missing,
        Outcome::Failed(reason) => Lookup::Failed(reason),
    }
}
