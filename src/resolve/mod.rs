//! Resolve an image's `latest` pointer to a stable tag name
//!
//! The strategy is picked once per image from its name: pinned images skip the
//! network entirely, Quay hosts are asked for tag digests, ghcr for its highest
//! version, and anything else is treated as a Docker Hub `namespace/repo`.

use crate::catalog::ImageDescriptor;
use crate::error::ResolveError;
use crate::registry::{ghcr, hub, quay, Endpoints, Transport};
use tracing::{debug, info};

/// How the tag for one image is determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Record this tag verbatim
    Pinned(String),
    /// Digest match on a Quay repository API
    Quay { host: String, repository: String },
    /// Highest version on ghcr
    Ghcr { repository: String },
    /// Digest match on the Docker Hub tags API
    Hub { repository: String },
}

impl Strategy {
    pub fn select(image: &ImageDescriptor, endpoints: &Endpoints) -> Self {
        if let Some(tag) = &image.pinned_tag {
            return Strategy::Pinned(tag.clone());
        }

        for host in &endpoints.quay_hosts {
            if let Some(repository) = strip_host(&image.image_name, host) {
                return Strategy::Quay {
                    host: host.clone(),
                    repository: repository.to_string(),
                };
            }
        }

        if let Some(repository) = strip_host(&image.image_name, &endpoints.ghcr_host) {
            return Strategy::Ghcr {
                repository: repository.to_string(),
            };
        }

        Strategy::Hub {
            repository: image.image_name.clone(),
        }
    }

    /// Short name of the protocol, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Pinned(_) => "pinned",
            Strategy::Quay { .. } => "quay",
            Strategy::Ghcr { .. } => "ghcr",
            Strategy::Hub { .. } => "hub",
        }
    }
}

fn strip_host<'a>(image_name: &'a str, host: &str) -> Option<&'a str> {
    image_name
        .strip_prefix(host)
        .and_then(|rest| rest.strip_prefix('/'))
}

/// Resolves catalog entries one at a time through a [`Transport`]
pub struct TagResolver<T> {
    transport: T,
    endpoints: Endpoints,
}

impl<T: Transport> TagResolver<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The tag that should be recorded for `image`
    pub async fn resolve(&self, image: &ImageDescriptor) -> Result<String, ResolveError> {
        let strategy = Strategy::select(image, &self.endpoints);
        debug!("Resolving {} via {}", image.image_name, strategy.kind());

        let tag = match strategy {
            Strategy::Pinned(tag) => {
                info!("{} is pinned to {}", image.image_name, tag);
                return Ok(tag);
            }
            Strategy::Quay { host, repository } => {
                quay::latest_tag(
                    &self.transport,
                    &self.endpoints,
                    &host,
                    &repository,
                    &image.image_name,
                )
                .await?
            }
            Strategy::Ghcr { repository } => {
                ghcr::latest_tag(
                    &self.transport,
                    &self.endpoints,
                    &repository,
                    &image.image_name,
                )
                .await?
            }
            Strategy::Hub { repository } => {
                hub::latest_tag(
                    &self.transport,
                    &self.endpoints,
                    &repository,
                    &image.image_name,
                )
                .await?
            }
        };

        info!("{} latest is {}", image.image_name, tag);
        Ok(tag)
    }
}
