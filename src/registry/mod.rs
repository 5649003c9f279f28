//! HTTP access to container registries
//!
//! Requests go through the [`Transport`] trait so the per-registry protocols in
//! [`quay`], [`ghcr`] and [`hub`] can be exercised against canned responses.

use crate::auth::RegistryAuth;
use crate::constants;
use crate::error::ResolveError;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::{AUTHORIZATION, LOCATION, USER_AGENT};
use hyper::{Request, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod ghcr;
pub mod hub;
pub mod quay;

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;

/// Performs GET requests against registry APIs
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetch `url` and return the response body. Any non-2xx status is an error.
    async fn get(&self, url: &str, auth: &RegistryAuth) -> Result<Vec<u8>, ResolveError>;
}

/// Fetch `url` and decode its JSON body
pub async fn get_json<T, R>(
    transport: &R,
    url: &str,
    auth: &RegistryAuth,
) -> Result<T, ResolveError>
where
    T: DeserializeOwned,
    R: Transport,
{
    let body = transport.get(url, auth).await?;
    serde_json::from_slice(&body).map_err(|source| ResolveError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Where each registry protocol is reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// URL scheme used for quay and ghcr hosts
    pub scheme: String,
    /// Image name prefixes served by a Quay repository API
    pub quay_hosts: Vec<String>,
    /// Image name prefix served by the ghcr token + v2 tag list API
    pub ghcr_host: String,
    /// Base URL of the Docker Hub web API, used for every other image
    pub docker_hub_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            quay_hosts: vec![
                constants::host::QUAY.to_string(),
                constants::host::QUAY_USTC_MIRROR.to_string(),
            ],
            ghcr_host: constants::host::GHCR.to_string(),
            docker_hub_api: constants::host::DOCKER_HUB_API.to_string(),
        }
    }
}

impl Endpoints {
    /// Base URL for a registry host, e.g. `https://quay.io`
    pub fn base_url(&self, host: &str) -> String {
        format!("{}://{}", self.scheme, host)
    }
}

/// [`Transport`] backed by a hyper client with TLS
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        let https = HttpsConnector::new();
        let client = Client::builder(TokioExecutor::new()).build(https);
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn get(&self, url: &str, auth: &RegistryAuth) -> Result<Vec<u8>, ResolveError> {
        let origin: Uri = parse_uri(url)?;
        let mut current = origin.clone();

        for _ in 0..=constants::http::MAX_REDIRECTS {
            debug!("GET {}", current);

            let mut builder = Request::get(current.clone())
                .header(USER_AGENT, constants::http::USER_AGENT);
            // Credentials only go to the host they were issued for
            if current.authority() == origin.authority() {
                if let Some(value) = auth.to_authorization_header() {
                    builder = builder.header(AUTHORIZATION, value);
                }
            }
            let request = builder
                .body(Empty::<Bytes>::new())
                .map_err(|e| transport_error(&current, &e))?;

            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| transport_error(&current, &e))?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| ResolveError::Http {
                        url: current.to_string(),
                        status: status.as_u16(),
                    })?;
                let next = resolve_location(&current, location);
                debug!("{} redirected to {}", current, next);
                current = parse_uri(&next)?;
                continue;
            }

            if !status.is_success() {
                return Err(ResolveError::Http {
                    url: current.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| transport_error(&current, &e))?
                .to_bytes();
            debug!("{} returned {} bytes", current, body.len());
            return Ok(body.to_vec());
        }

        Err(ResolveError::TooManyRedirects {
            url: url.to_string(),
        })
    }
}

fn parse_uri(url: &str) -> Result<Uri, ResolveError> {
    url.parse().map_err(|e| ResolveError::Transport {
        url: url.to_string(),
        message: format!("invalid URL: {}", e),
    })
}

fn transport_error(uri: &Uri, error: &(dyn std::error::Error + 'static)) -> ResolveError {
    ResolveError::Transport {
        url: uri.to_string(),
        message: error_chain(error),
    }
}

/// Render an error with all of its sources, `outer: inner: root`
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Turn a `Location` header value into an absolute URL
pub(crate) fn resolve_location(base: &Uri, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }

    let scheme = base.scheme_str().unwrap_or("https");
    let authority = base.authority().map(|a| a.as_str()).unwrap_or_default();

    if location.starts_with("//") {
        return format!("{}:{}", scheme, location);
    }
    if location.starts_with('/') {
        return format!("{}://{}{}", scheme, authority, location);
    }
    if location.starts_with('?') {
        return format!("{}://{}{}{}", scheme, authority, base.path(), location);
    }

    let path = base.path();
    let dir = match path.rfind('/') {
        Some(pos) => &path[..=pos],
        None => "/",
    };
    format!("{}://{}{}{}", scheme, authority, dir, location)
}
