use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};

use crate::AppResult;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn sorry(what: &str) -> AppResult<Response> {
    Ok((
        StatusCode::NOT_FOUND,
        Html(include_res!(str, "/pages/sorry.html").replace("{what}", what)),
    )
        .into_response())
}

/// Fills the `{notice}` slot of a page; empty when there is nothing to say.
pub fn notice_html(notice: Option<String>) -> String {
    match notice {
        Some(text) => format!(r#"<p class="notice">{text}</p>"#),
        None => String::new(),
    }
}
