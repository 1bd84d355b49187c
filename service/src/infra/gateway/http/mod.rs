//! HTTP [`Gateway`] implementation.

mod impls;

use std::{sync::Arc, time::Duration};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::infra::gateway::{self, Token};
#[cfg(doc)]
use crate::infra::Gateway;

/// Configuration of an [`Http`] client.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the API gateway all the remote services are behind.
    #[default = "http://localhost:8080"]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(15))]
    pub timeout: Duration,
}

/// HTTP client of the remote rental services.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying [`reqwest::Client`].
    client: reqwest::Client,

    /// Base URL without a trailing slash.
    base_url: Arc<str>,

    /// [`Token`] forwarded with every request, if any.
    token: Option<Token>,
}

impl Http {
    /// Creates a new [`Http`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to build the underlying [`reqwest::Client`].
    pub fn new(conf: &Config) -> Result<Self, Traced<gateway::Error>> {
        let client = reqwest::Client::builder()
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> gateway::Error))?;
        Ok(Self {
            client,
            base_url: conf.base_url.trim_end_matches('/').into(),
            token: None,
        })
    }

    /// Returns a copy of this [`Http`] client forwarding the provided
    /// [`Token`] with every request.
    #[must_use]
    pub fn authorized(&self, token: Option<Token>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: Arc::clone(&self.base_url),
            token,
        }
    }

    /// Starts a request to the provided `path` of the API gateway.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("{method} {path}");

        let req =
            self.client.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(t) => req.bearer_auth(t.expose()),
            None => req,
        }
    }

    /// Sends the provided request and decodes its JSON response.
    async fn fetch<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<T, Traced<gateway::Error>> {
        let resp = Self::send(req).await?;
        Self::decode(resp).await
    }

    /// Sends the provided request and decodes its JSON response, mapping
    /// [`StatusCode::NOT_FOUND`] into [`None`].
    async fn fetch_optional<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<Option<T>, Traced<gateway::Error>> {
        let resp = req
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> gateway::Error))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        Self::decode(resp).await.map(Some)
    }

    /// Sends the provided request discarding its response body.
    async fn perform(
        req: RequestBuilder,
    ) -> Result<(), Traced<gateway::Error>> {
        Self::send(req).await.map(drop)
    }

    /// Sends the provided request and checks its response status.
    async fn send(
        req: RequestBuilder,
    ) -> Result<Response, Traced<gateway::Error>> {
        let resp = req
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> gateway::Error))?;
        Self::check(resp).await
    }

    /// Turns a non-successful [`Response`] into a [`gateway::Error`].
    async fn check(
        resp: Response,
    ) -> Result<Response, Traced<gateway::Error>> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(tracerr::new!(gateway::Error::Status {
            status: status.as_u16(),
            body,
        }))
    }

    /// Decodes the JSON body of the provided [`Response`].
    async fn decode<T: DeserializeOwned>(
        resp: Response,
    ) -> Result<T, Traced<gateway::Error>> {
        let bytes = resp
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!(=> gateway::Error))?;
        serde_json::from_slice(&bytes)
            .map_err(tracerr::from_and_wrap!(=> gateway::Error))
    }
}

#[cfg(test)]
mod spec {
    use reqwest::Method;
    use serde_json::{json, Value};
    use tokio::{
        io::{AsyncReadExt as _, AsyncWriteExt as _},
        net::TcpListener,
        sync::oneshot,
    };

    use crate::infra::gateway::{self, Token};

    use super::{Config, Http};

    /// Serves a single request with the provided status line and body,
    /// returning the [`Http`] client pointed at it and the received request
    /// head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (Http, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        drop(tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let resp = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len(),
            );
            socket.write_all(resp.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            _ = tx.send(String::from_utf8_lossy(&head).to_lowercase());
        }));

        let http = Http::new(&Config {
            base_url: format!("http://{addr}/"),
            ..Config::default()
        })
        .unwrap();
        (http, rx)
    }

    #[tokio::test]
    async fn maps_not_found_into_none() {
        let (http, head) = serve_once("404 Not Found", "").await;
        let http = http.authorized(Some(Token::new("secret")));

        let found = Http::fetch_optional::<Value>(
            http.request(Method::GET, "/rental/orders/17"),
        )
        .await
        .unwrap();

        assert_eq!(found, None);
        let head = head.await.unwrap();
        assert!(
            head.starts_with("get /rental/orders/17 http/1.1\r\n"),
            "{head}",
        );
        assert!(
            head.contains("\r\nauthorization: bearer secret\r\n"),
            "{head}",
        );
    }

    #[tokio::test]
    async fn decodes_found_resource() {
        let (http, head) = serve_once("200 OK", r#"{"id":"17"}"#).await;

        let found = Http::fetch_optional::<Value>(
            http.request(Method::GET, "/user/users/me"),
        )
        .await
        .unwrap();

        assert_eq!(found, Some(json!({"id": "17"})));
        let head = head.await.unwrap();
        assert!(
            head.starts_with("get /user/users/me http/1.1\r\n"),
            "{head}",
        );
        assert!(!head.contains("authorization:"), "{head}");
    }

    #[tokio::test]
    async fn fails_on_unexpected_status() {
        let (http, _) = serve_once("503 Service Unavailable", "down").await;

        let err = Http::fetch_optional::<Value>(
            http.request(Method::GET, "/rental/orders/17"),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            gateway::Error::Status { status: 503, body } if body == "down",
        ));
    }
}
