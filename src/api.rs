//! Typed client for the forum data service. Every record here is owned by
//! the service; the client only decodes and displays them.

use reqwest::{multipart::{Form, Part}, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::code::ForumCode;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered and said no; the message is fit to show the user.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub forum_id: i64,
    pub user_id: i64,
    pub created_at: String,
    pub author: User,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub mimetype: String,
    pub size: i64,
    pub post_id: i64,
}

/// What the service hands back on login/registration. The token goes into
/// the session and onto every authenticated call.
#[derive(Debug, Deserialize)]
pub struct Grant {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One file picked in the post form, on its way to the service.
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    pub fn new(base: String) -> Client {
        Client {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn login(&self, creds: &Credentials) -> ApiResult<Grant> {
        let resp = self.http.post(self.url("/api/login")).json(creds).send().await?;
        ok_json(resp).await
    }

    pub async fn register(&self, creds: &Credentials) -> ApiResult<Grant> {
        let resp = self.http.post(self.url("/api/register")).json(creds).send().await?;
        ok_json(resp).await
    }

    pub async fn logout(&self, token: &str) -> ApiResult<()> {
        let resp = self.http
            .post(self.url("/api/logout"))
            .bearer_auth(token)
            .send()
            .await?;
        expect_ok(resp).await?;
        Ok(())
    }

    /// 404 means the code addresses nothing, which is not an error here.
    pub async fn forum_by_code(&self, token: &str, code: &ForumCode) -> ApiResult<Option<Forum>> {
        let resp = self.http
            .get(self.url(&format!("/api/forums/{code}")))
            .bearer_auth(token)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ok_json(resp).await.map(Some)
    }

    pub async fn posts(&self, token: &str, forum_id: i64) -> ApiResult<Vec<Post>> {
        let resp = self.http
            .get(self.url(&format!("/api/forums/{forum_id}/posts")))
            .bearer_auth(token)
            .send()
            .await?;
        ok_json(resp).await
    }

    /// Duplicate codes are the service's to reject, not ours.
    pub async fn create_forum(
        &self,
        token: &str,
        code: &ForumCode,
        name: &str,
        description: &str,
    ) -> ApiResult<Forum> {
        let resp = self.http
            .post(self.url("/api/forums"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "code": code.as_str(),
                "name": name,
                "description": description,
            }))
            .send()
            .await?;
        ok_json(resp).await
    }

    pub async fn create_post(
        &self,
        token: &str,
        forum_id: i64,
        title: &str,
        content: &str,
        files: Vec<Upload>,
    ) -> ApiResult<Post> {
        let mut form = Form::new()
            .text("forumId", forum_id.to_string())
            .text("title", title.to_owned())
            .text("content", content.to_owned());

        for upload in files {
            // browsers occasionally omit the part content type
            let mime = upload
                .content_type
                .or_else(|| mime_guess::from_path(&upload.filename).first_raw().map(str::to_owned))
                .unwrap_or_else(|| "application/octet-stream".to_owned());
            form = form.part(
                "files",
                Part::bytes(upload.data).file_name(upload.filename).mime_str(&mime)?,
            );
        }

        let resp = self.http
            .post(self.url("/api/posts"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        ok_json(resp).await
    }

    /// Where the service serves a stored attachment from.
    pub fn file_url(&self, file: &FileRecord) -> String {
        format!("{}/api/files/{}", self.base, file.id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

async fn ok_json<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    let resp = expect_ok(resp).await?;
    Ok(resp.json().await?)
}

/// One error-body contract for the whole service: a non-2xx response carries
/// `{"message": "..."}`.
async fn expect_ok(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Rejected(rejection_message(status, &body)))
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_message_body() {
        let msg = rejection_message(StatusCode::CONFLICT, r#"{"message":"code already taken"}"#);
        assert_eq!(msg, "code already taken");
    }

    #[test]
    fn rejection_falls_back_to_status() {
        assert_eq!(
            rejection_message(StatusCode::BAD_GATEWAY, "<html>nope</html>"),
            "502 Bad Gateway"
        );
        assert_eq!(
            rejection_message(StatusCode::UNAUTHORIZED, r#"{"error":"other shape"}"#),
            "401 Unauthorized"
        );
    }
}
