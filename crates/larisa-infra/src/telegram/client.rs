//! TelegramClient -- concrete [`ChatTransport`] implementation for the
//! Telegram Bot API.
//!
//! Every method is a JSON `POST` to `<base>/bot<token>/<method>`. The token is
//! part of the URL, so reqwest errors are stripped of their URL before they
//! are turned into [`TransportError`]s.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use larisa_core::transport::port::ChatTransport;
use larisa_types::chat::{ChatAction, ChatId, MessageId, ParseMode};
use larisa_types::error::TransportError;

use super::types::{
    ApiResponse, DeleteMessage, EditMessageText, GetUpdates, SendChatAction, SendMessage,
    TgMessage, TgUser, Update,
};

/// Default Bot API server.
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Whole-request timeout. Must exceed the long-poll timeout of `getUpdates`.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Telegram Bot API client.
///
/// Does NOT derive Debug: the bot token must never reach log output.
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (useful for testing or a local Bot API server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    /// Call a Bot API method and unwrap the response envelope.
    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        trace!(method, "telegram request");
        let response = self
            .client
            .post(self.method_url(method))
            .json(params)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let envelope: ApiResponse<R> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TransportError::Api {
                    code: i64::from(status.as_u16()),
                    description: text,
                });
            }
            Err(e) => {
                return Err(TransportError::Deserialization(format!(
                    "{method}: {e}"
                )));
            }
        };

        if envelope.ok {
            return envelope.result.ok_or_else(|| {
                TransportError::Deserialization(format!("{method}: ok response without result"))
            });
        }

        let code = envelope
            .error_code
            .unwrap_or_else(|| i64::from(status.as_u16()));
        let description = envelope.description.unwrap_or_default();
        Err(if code == 400 {
            TransportError::BadRequest { description }
        } else {
            TransportError::Api { code, description }
        })
    }

    /// Identity of the bot owning the token.
    pub async fn get_me(&self) -> Result<TgUser, TransportError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for new message updates.
    ///
    /// `offset` acknowledges every update with a lower id; `timeout` is the
    /// server-side wait in seconds.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        let params = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &params).await
    }
}

impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<MessageId, TransportError> {
        let params = SendMessage {
            chat_id,
            text,
            parse_mode: match parse_mode {
                ParseMode::Markdown => Some("Markdown"),
                ParseMode::Plain => None,
            },
        };
        let sent: TgMessage = self.call("sendMessage", &params).await?;
        Ok(sent.message_id)
    }

    async fn send_chat_action(
        &self,
        chat_id: ChatId,
        action: ChatAction,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call("sendChatAction", &SendChatAction { chat_id, action })
            .await?;
        Ok(())
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        // Returns the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageText {
                    chat_id,
                    message_id,
                    text,
                },
            )
            .await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call("deleteMessage", &DeleteMessage { chat_id, message_id })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::{Value, json};

    use super::*;

    type Log = Arc<Mutex<Vec<(String, Value)>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Fake Bot API answering every method with `reply(method, body)`.
    async fn fake_api(
        reply: impl Fn(&str, &Value) -> (StatusCode, Value) + Clone + Send + Sync + 'static,
    ) -> (TelegramClient, Log) {
        let log: Log = Arc::default();
        let router = Router::new().route(
            "/{token}/{method}",
            post({
                let log = log.clone();
                move |Path((token, method)): Path<(String, String)>, body: String| {
                    let log = log.clone();
                    let reply = reply.clone();
                    async move {
                        assert_eq!(token, "bot123:secret");
                        let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
                        let (status, value) = reply(&method, &body);
                        log.lock().unwrap().push((method, body));
                        (status, value.to_string())
                    }
                }
            }),
        );
        let base = serve(router).await;
        let client =
            TelegramClient::new(SecretString::from("123:secret")).with_base_url(base);
        (client, log)
    }

    fn ok(result: Value) -> (StatusCode, Value) {
        (StatusCode::OK, json!({"ok": true, "result": result}))
    }

    #[test]
    fn test_method_url_embeds_token() {
        let client = TelegramClient::new(SecretString::from("123:abc"))
            .with_base_url("http://localhost:8081/");
        assert_eq!(
            client.method_url("getMe"),
            "http://localhost:8081/bot123:abc/getMe"
        );
    }

    #[tokio::test]
    async fn test_send_message_markdown() {
        let (client, log) = fake_api(|_, _| {
            ok(json!({"message_id": 77, "chat": {"id": 5}, "text": "hi"}))
        })
        .await;

        let id = client
            .send_message(ChatId(5), "*hi*", ParseMode::Markdown)
            .await
            .unwrap();
        assert_eq!(id, MessageId(77));

        let log = log.lock().unwrap();
        assert_eq!(log[0].0, "sendMessage");
        assert_eq!(
            log[0].1,
            json!({"chat_id": 5, "text": "*hi*", "parse_mode": "Markdown"})
        );
    }

    #[tokio::test]
    async fn test_bad_request_maps_to_bad_request() {
        let (client, _log) = fake_api(|_, _| {
            (
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "error_code": 400,
                       "description": "Bad Request: message is not modified"}),
            )
        })
        .await;

        let err = client
            .edit_message_text(ChatId(5), MessageId(1), "same")
            .await
            .unwrap_err();
        assert!(err.is_not_modified());
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_api_error() {
        let (client, _log) = fake_api(|_, _| {
            (
                StatusCode::FORBIDDEN,
                json!({"ok": false, "error_code": 403,
                       "description": "Forbidden: bot was blocked by the user"}),
            )
        })
        .await;

        let err = client
            .send_chat_action(ChatId(5), ChatAction::Typing)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Api { code: 403, .. }));
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let (client, _log) =
            fake_api(|_, _| (StatusCode::BAD_GATEWAY, Value::String("oops".into()))).await;
        // The fake wraps the string in quotes; still not an envelope.
        let err = client
            .delete_message(ChatId(5), MessageId(9))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Api { code: 502, .. }));
    }

    #[tokio::test]
    async fn test_get_updates_sends_offset_and_timeout() {
        let (client, log) = fake_api(|_, _| {
            ok(json!([{
                "update_id": 100,
                "message": {"message_id": 1, "from": {"id": 2, "is_bot": false, "first_name": "A"},
                            "chat": {"id": 2}, "text": "yo"}
            }]))
        })
        .await;

        let updates = client
            .get_updates(Some(100), Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 100);

        let log = log.lock().unwrap();
        assert_eq!(log[0].0, "getUpdates");
        assert_eq!(log[0].1["offset"], 100);
        assert_eq!(log[0].1["timeout"], 30);
        assert_eq!(log[0].1["allowed_updates"], json!(["message"]));
    }

    #[tokio::test]
    async fn test_delete_and_action_accept_true() {
        let (client, log) = fake_api(|_, _| ok(json!(true))).await;

        client.delete_message(ChatId(5), MessageId(9)).await.unwrap();
        client
            .send_chat_action(ChatId(5), ChatAction::Typing)
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log[0].1, json!({"chat_id": 5, "message_id": 9}));
        assert_eq!(log[1].1, json!({"chat_id": 5, "action": "typing"}));
    }

    #[tokio::test]
    async fn test_network_error_does_not_leak_token() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TelegramClient::new(SecretString::from("123:very-secret"))
            .with_base_url(format!("http://{addr}"));
        let err = client.get_me().await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
        assert!(!err.to_string().contains("very-secret"));
    }
}
