use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use tracing::debug;

use crate::{Config, Error};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Header carrying the session token.
pub const AUTH_HEADER: &str = "x-vcloud-authorization";

/// An API request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            content_type: None,
            body: None,
        }
    }

    pub fn post(url: Url, content_type: &'static str, body: String) -> Self {
        Self {
            method: Method::POST,
            url,
            content_type: Some(content_type),
            body: Some(body),
        }
    }
}

/// A successful API response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
}

/// Executes API requests.
///
/// Implementations must map non-2xx responses to errors, see
/// [`Error::from_response`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: Request) -> Result<Response, Error>;
}

/// HTTP transport based on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    token: String,
    accept: String,
}

impl HttpTransport {
    pub fn new(c: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .https_only(c.https_only)
            .timeout(c.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            token: c.token.clone(),
            accept: format!("application/*+xml;version={}", c.api_version),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: Request) -> Result<Response, Error> {
        debug!(method = %req.method, url = %req.url, "sending request");

        let mut r = self
            .client
            .request(req.method, req.url)
            .header(AUTH_HEADER, &self.token)
            .header(ACCEPT, &self.accept);

        if let Some(ct) = req.content_type {
            r = r.header(CONTENT_TYPE, ct)
        }
        if let Some(body) = req.body {
            r = r.body(body)
        }

        let res = r.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::from_response(status, &body));
        }

        Ok(Response { status, body })
    }
}
