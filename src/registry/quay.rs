//! Quay repository API: find the tag sharing a manifest digest with `latest`

use super::{get_json, Endpoints, Transport};
use crate::auth::RegistryAuth;
use crate::constants::tag::LATEST;
use crate::error::ResolveError;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

/// Response of `GET /api/v1/repository/<repo>?includeTags=true`
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    /// Tags in the order the registry listed them
    #[serde(default)]
    pub tags: IndexMap<String, QuayTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuayTag {
    pub manifest_digest: String,
}

pub fn repository_url(endpoints: &Endpoints, host: &str, repository: &str) -> String {
    format!(
        "{}/api/v1/repository/{}?includeTags=true",
        endpoints.base_url(host),
        repository
    )
}

/// Resolve `latest` for `repository` on the Quay instance at `host`
pub async fn latest_tag<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    host: &str,
    repository: &str,
    image: &str,
) -> Result<String, ResolveError> {
    let url = repository_url(endpoints, host, repository);
    let info: RepositoryInfo = get_json(transport, &url, &RegistryAuth::Anonymous).await?;
    debug!("{} lists {} tags", image, info.tags.len());
    matching_tag(image, info.tags)
}

/// First tag, in listing order, whose digest equals the digest of `latest`
pub fn matching_tag(
    image: &str,
    mut tags: IndexMap<String, QuayTag>,
) -> Result<String, ResolveError> {
    let latest = tags
        .shift_remove(LATEST)
        .ok_or_else(|| ResolveError::MissingLatest {
            image: image.to_string(),
        })?;

    tags.into_iter()
        .find(|(_, tag)| tag.manifest_digest == latest.manifest_digest)
        .map(|(name, _)| name)
        .ok_or_else(|| ResolveError::NoMatchingTag {
            image: image.to_string(),
            digest: latest.manifest_digest,
        })
}
