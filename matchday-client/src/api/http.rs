//! HTTP implementation of the community API.

use async_trait::async_trait;
use matchday_types::{FriendRequest, FriendshipId, UserDetail, UserId, UserProfile, Username};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{ApiError, FriendshipApi};
use crate::config::ClientConfig;

/// Error payload returned by the API on failure.
///
/// `message` is either a single string or a list of validation messages.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Self::One(text) => text,
            Self::Many(lines) => lines.join("; "),
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Extract the human-readable message from an error response body.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()?
        .message?
        .into_text()
}

fn map_reqwest(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Community API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    viewer: UserId,
}

impl HttpApi {
    /// Create an API client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(map_reqwest)?;
        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token: config.api.token.clone(),
            viewer: config.viewer_id(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(map_reqwest)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn put_action(&self, friendship: &FriendshipId, action: &str) -> Result<(), ApiError> {
        let path = format!("/friendships/request/{}/{}", friendship, action);
        self.execute(self.request(Method::PUT, &path)).await?;
        Ok(())
    }
}

#[async_trait]
impl FriendshipApi for HttpApi {
    async fn send_request(&self, target: &UserId) -> Result<(), ApiError> {
        let path = format!("/friendships/request/{}", target);
        self.execute(self.request(Method::POST, &path)).await?;
        Ok(())
    }

    async fn cancel_request(&self, friendship: &FriendshipId) -> Result<(), ApiError> {
        self.put_action(friendship, "cancel").await
    }

    async fn reject_request(&self, friendship: &FriendshipId) -> Result<(), ApiError> {
        self.put_action(friendship, "reject").await
    }

    async fn accept_request(&self, friendship: &FriendshipId) -> Result<(), ApiError> {
        self.put_action(friendship, "accept").await
    }

    async fn friendship_requests(&self) -> Result<Vec<FriendRequest>, ApiError> {
        self.get_json("/friendships/requests").await
    }

    async fn user_detail(&self, username: &Username) -> Result<UserDetail, ApiError> {
        let profile: UserProfile = self.get_json(&format!("/users/{}", username)).await?;
        Ok(UserDetail::from_profile(profile, &self.viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        let toml = format!(
            r#"
[api]
base_url = "{base_url}"

[viewer]
user_id = "u1"
"#
        );
        toml::from_str(&toml).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpApi::new(&config("https://api.example.test/v1/")).unwrap();
        assert_eq!(
            api.url("/friendships/requests"),
            "https://api.example.test/v1/friendships/requests"
        );
    }

    #[test]
    fn error_message_single_string() {
        let body = br#"{"statusCode":409,"message":"Friend request already exists"}"#;
        assert_eq!(
            error_message(body),
            Some("Friend request already exists".to_string())
        );
    }

    #[test]
    fn error_message_list_is_joined() {
        let body = br#"{"message":["id must be a UUID","id should not be empty"]}"#;
        assert_eq!(
            error_message(body),
            Some("id must be a UUID; id should not be empty".to_string())
        );
    }

    #[test]
    fn error_message_absent_or_unparseable() {
        assert_eq!(error_message(b""), None);
        assert_eq!(error_message(b"<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(br#"{"error":"x"}"#), None);
        assert_eq!(error_message(br#"{"message":"   "}"#), None);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let api = HttpApi::new(&config("http://127.0.0.1:9")).unwrap();
        let result = api.accept_request(&FriendshipId::new("f1")).await;
        assert!(
            matches!(result, Err(ApiError::Network(_)) | Err(ApiError::Timeout)),
            "got {:?}",
            result
        );
    }
}
