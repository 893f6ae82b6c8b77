//! Client for the network services of a vCloud Air edge gateway.
//!
//! Every reconfiguration reads the current service configuration, merges the
//! requested change into it and posts the result to the gateway's
//! `configureServices` action. See [`EdgeGateway`] for the operations and
//! [`merge`] for how existing rules are matched.

mod config;
mod error;
mod gateway;
mod retry;
mod task;
mod transport;

pub mod merge;

use std::{fmt, sync::Arc};

use edgegw_types::{Document, from_xml};
use reqwest::Url;

pub use config::{API_VERSION, ClientConfig, Config, ConfigError, RetryConfig};
pub use edgegw_types as types;
pub use error::Error;
pub use gateway::{CONFIGURE_SERVICES, EdgeGateway, SERVICE_CONFIG_TYPE};
pub use merge::{DhcpPool, PortMapping, Section, ServiceUpdate};
pub use retry::RetryPolicy;
pub use task::Task;
pub use transport::{AUTH_HEADER, HttpTransport, Request, Response, Transport};

/// Shared handle to configuration and transport.
#[derive(Clone)]
pub struct Client {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client talking HTTP.
    pub fn new(c: Config) -> Result<Self, Error> {
        let t = HttpTransport::new(&c)?;
        Ok(Self::with_transport(c, t))
    }

    pub fn with_transport<T: Transport + 'static>(c: Config, t: T) -> Self {
        Self {
            config: Arc::new(c),
            transport: Arc::new(t),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) async fn send(&self, req: Request) -> Result<Response, Error> {
        self.transport.send(req).await
    }

    pub(crate) async fn get<D: Document>(&self, url: Url) -> Result<D, Error> {
        let res = self.send(Request::get(url)).await?;
        Ok(from_xml(&res.body)?)
    }

    pub(crate) async fn post<D: Document>(
        &self,
        url: Url,
        content_type: &'static str,
        body: String,
    ) -> Result<D, Error> {
        let res = self.send(Request::post(url, content_type, body)).await?;
        Ok(from_xml(&res.body)?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("label", &self.config.label)
            .finish_non_exhaustive()
    }
}
