use std::sync::Arc;

use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Redirect, Response}};

use crate::{
    api::{self, FileRecord, Post},
    cache::Store,
    code::{self, ForumCode},
    include_res,
    requests::{self, Outcome},
    res,
    session::AuthContext,
    AppResult,
};

use super::{lookup_forum, Lookup, BAD_CODE_NOTICE};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn forum(
    Path(code): Path<String>,
    State(api): State<api::Client>,
    State(store): State<Arc<Store>>,
    auth: AuthContext,
) -> AppResult<Response> {
    // path segments arrive raw, same as keyboard input
    let Some(code) = ForumCode::parse(&code::normalize(&code)) else {
        auth.push_notice(BAD_CODE_NOTICE).await?;
        return Ok(Redirect::to("/").into_response());
    };

    let Some(token) = auth.token.clone() else {
        return Ok(Redirect::to(&format!("/login?return_url=/f/{code}")).into_response());
    };

    let forum = match lookup_forum(&api, &store, &token, &code).await {
        Lookup::Found(forum) => forum,
        Lookup::Missing => return res::sorry("forum"),
        Lookup::Failed(reason) => {
            auth.push_notice(reason).await?;
            return Ok(Redirect::to("/").into_response());
        }
    };

    let posts = match store.posts(forum.id) {
        Some(posts) => posts,
        None => {
            let request = requests::track({
                let (api, token, forum_id) = (api.clone(), token.clone(), forum.id);
                async move { Ok(api.posts(&token, forum_id).await?) }
            });
            match request.outcome().await {
                Outcome::Success(posts) => {
                    store.put_posts(forum.id, posts.clone());
                    posts
                }
                Outcome::Failed(reason) => {
                    auth.push_notice(reason).await?;
                    return Ok(Redirect::to("/").into_response());
                }
            }
        }
    };

    let listing: String = if posts.is_empty() {
        r#"<p class="empty">No posts yet. Be the first to start a discussion!</p>"#.to_owned()
    } else {
        posts.iter().map(|post| post_html(&api, post)).collect()
    };

    let notice = auth.take_notice().await?;
    let body = include_res!(str, "/pages/forum.html")
        .replace("{code}", &forum.code)
        .replace("{name}", &forum.name)
        .replace(
            "{description}",
            forum.description.as_deref().unwrap_or("Welcome to this private forum"),
        )
        .replace("{posts}", &listing)
        .replace("{notice}", &res::notice_html(notice));

    Ok(Html(body).into_response())
}

fn post_html(api: &api::Client, post: &Post) -> String {
    let mut content = String::new();
    pulldown_cmark::html::push_html(&mut content, pulldown_cmark::Parser::new(&post.content));

    let files: String = post.files.iter().map(|file| file_html(api, file)).collect();

    include_res!(str, "/pages/post.html")
        .replace("{title}", &post.title)
        .replace("{author}", &post.author.username)
        .replace("{created_at}", &post.created_at)
        .replace("{content}", &content)
        .replace("{files}", &files)
}

fn file_html(api: &api::Client, file: &FileRecord) -> String {
    include_res!(str, "/pages/file.html")
        .replace("{url}", &api.file_url(file))
        .replace("{original_filename}", &file.original_filename)
        .replace("{size}", &human_size(file.size))
}

fn human_size(bytes: i64) -> String {
    if bytes >= 1 << 20 {
        format!("{:.1} MB", bytes as f64 / (1 << 20) as f64)
    } else if bytes >= 1 << 10 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::human_size;

    #[test]
    fn sizes_read_like_a_file_browser() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }
}
