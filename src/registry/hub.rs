//! Docker Hub tags API: find the tag whose image digest matches `latest`

use super::{get_json, Endpoints, Transport};
use crate::auth::RegistryAuth;
use crate::constants::tag::LATEST;
use crate::error::ResolveError;
use serde::Deserialize;
use tracing::debug;

/// First page of `GET /v2/repositories/<name>/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagPage {
    #[serde(default)]
    pub results: Vec<HubTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubTag {
    pub name: String,
    #[serde(default)]
    pub images: Vec<HubImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubImage {
    pub digest: Option<String>,
}

impl HubTag {
    fn first_digest(&self) -> Option<&str> {
        self.images.first().and_then(|image| image.digest.as_deref())
    }
}

pub fn tags_url(endpoints: &Endpoints, repository: &str) -> String {
    format!(
        "{}/v2/repositories/{}/tags",
        endpoints.docker_hub_api.trim_end_matches('/'),
        repository
    )
}

/// Resolve `latest` for a Docker Hub `namespace/repo`
pub async fn latest_tag<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    repository: &str,
    image: &str,
) -> Result<String, ResolveError> {
    let url = tags_url(endpoints, repository);
    let page: TagPage = get_json(transport, &url, &RegistryAuth::Anonymous).await?;
    debug!("{} lists {} tags", image, page.results.len());
    matching_tag(image, &page.results)
}

/// First tag, in listing order, whose image digest equals the single image of `latest`
///
/// A `latest` backed by several images (a multi-arch manifest list) has no
/// single digest to compare against and is rejected.
pub fn matching_tag(image: &str, tags: &[HubTag]) -> Result<String, ResolveError> {
    let latest = tags
        .iter()
        .find(|tag| tag.name == LATEST)
        .ok_or_else(|| ResolveError::MissingLatest {
            image: image.to_string(),
        })?;

    if latest.images.len() != 1 {
        return Err(ResolveError::MultiImageLatest {
            image: image.to_string(),
            count: latest.images.len(),
        });
    }

    let digest = latest
        .first_digest()
        .ok_or_else(|| ResolveError::NoMatchingTag {
            image: image.to_string(),
            digest: "<none>".to_string(),
        })?;

    tags.iter()
        .filter(|tag| tag.name != LATEST)
        .find(|tag| tag.first_digest() == Some(digest))
        .map(|tag| tag.name.clone())
        .ok_or_else(|| ResolveError::NoMatchingTag {
            image: image.to_string(),
            digest: digest.to_string(),
        })
}
