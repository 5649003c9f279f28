//! ghcr: anonymous pull token, v2 tag list, highest version wins

use super::{get_json, Endpoints, Transport};
use crate::auth::{RegistryAuth, TokenResponse};
use crate::constants::tag::LATEST;
use crate::error::ResolveError;
use crate::version::TagVersion;
use serde::Deserialize;
use tracing::debug;

/// Response of `GET /v2/<repo>/tags/list`
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

pub fn token_url(endpoints: &Endpoints, repository: &str) -> String {
    format!(
        "{}/token?scope=repository:{}:pull",
        endpoints.base_url(&endpoints.ghcr_host),
        repository
    )
}

pub fn tags_url(endpoints: &Endpoints, repository: &str) -> String {
    format!(
        "{}/v2/{}/tags/list",
        endpoints.base_url(&endpoints.ghcr_host),
        repository
    )
}

/// Request an anonymous token scoped to pulling `repository`
pub async fn anonymous_token<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    repository: &str,
) -> Result<RegistryAuth, ResolveError> {
    let url = token_url(endpoints, repository);
    let response: TokenResponse = get_json(transport, &url, &RegistryAuth::Anonymous).await?;
    Ok(response.into_auth())
}

/// Resolve the newest versioned tag of `repository`
pub async fn latest_tag<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    repository: &str,
    image: &str,
) -> Result<String, ResolveError> {
    let auth = anonymous_token(transport, endpoints, repository).await?;
    let list: TagList = get_json(transport, &tags_url(endpoints, repository), &auth).await?;
    let tags = list.tags.unwrap_or_default();
    debug!("{} lists {} tags", image, tags.len());
    highest_version(image, &tags)
}

/// Highest version among `tags`, ignoring `latest`. Every other tag must parse.
pub fn highest_version(image: &str, tags: &[String]) -> Result<String, ResolveError> {
    let mut versions = Vec::new();
    for tag in tags.iter().filter(|tag| tag.as_str() != LATEST) {
        let version = TagVersion::parse(tag).map_err(|reason| ResolveError::InvalidVersion {
            image: image.to_string(),
            tag: tag.clone(),
            reason,
        })?;
        versions.push((version, tag));
    }

    // Sort descending; equal versions fall back to the tag text, highest first
    versions.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(a.1)));

    versions
        .into_iter()
        .next()
        .map(|(_, tag)| tag.clone())
        .ok_or_else(|| ResolveError::NoVersionedTags {
            image: image.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::fake::FakeTransport;
    use serde_json::json;

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_highest_version_skips_latest() {
        let tags = strings(&["1.0.0", "1.2.0", "latest", "1.1.0"]);
        assert_eq!(highest_version("img", &tags).unwrap(), "1.2.0");
    }

    #[test]
    fn test_highest_version_rejects_unparseable_tag() {
        let tags = strings(&["1.0.0", "nightly"]);
        match highest_version("img", &tags) {
            Err(ResolveError::InvalidVersion { tag, .. }) => assert_eq!(tag, "nightly"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_highest_version_accepts_pre_and_dev_releases() {
        let tags = strings(&["1.0.0", "1.1.0rc1", "1.0.1"]);
        assert_eq!(highest_version("img", &tags).unwrap(), "1.1.0rc1");

        let tags = strings(&["1.0.0", "1.0.1.dev0"]);
        assert_eq!(highest_version("img", &tags).unwrap(), "1.0.1.dev0");

        let tags = strings(&["1.0.0", "1.0.0+local.1", "1.0.0rc9"]);
        assert_eq!(highest_version("img", &tags).unwrap(), "1.0.0+local.1");
    }

    #[test]
    fn test_highest_version_ties_pick_greatest_tag_text() {
        let tags = strings(&["1.0", "1.0.0"]);
        assert_eq!(highest_version("img", &tags).unwrap(), "1.0.0");

        let tags = strings(&["v2.0", "2.0"]);
        assert_eq!(highest_version("img", &tags).unwrap(), "v2.0");
    }

    #[test]
    fn test_highest_version_only_latest() {
        let tags = strings(&["latest"]);
        assert!(matches!(
            highest_version("img", &tags),
            Err(ResolveError::NoVersionedTags { .. })
        ));
    }

    #[test]
    fn test_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            token_url(&endpoints, "mayeut/manylinux_2_31"),
            "https://ghcr.io/token?scope=repository:mayeut/manylinux_2_31:pull"
        );
        assert_eq!(
            tags_url(&endpoints, "mayeut/manylinux_2_31"),
            "https://ghcr.io/v2/mayeut/manylinux_2_31/tags/list"
        );
    }

    #[tokio::test]
    async fn test_latest_tag_uses_bearer_token_for_listing() {
        let endpoints = Endpoints::default();
        let transport = FakeTransport::new()
            .with_json(
                &token_url(&endpoints, "mayeut/manylinux_2_31"),
                json!({"token": "anon"}),
            )
            .with_json(
                &tags_url(&endpoints, "mayeut/manylinux_2_31"),
                json!({
                    "name": "mayeut/manylinux_2_31",
                    "tags": ["2024.10.01", "latest", "2024.11.09-1"],
                }),
            );

        let tag = latest_tag(
            &transport,
            &endpoints,
            "mayeut/manylinux_2_31",
            "ghcr.io/mayeut/manylinux_2_31",
        )
        .await
        .unwrap();
        assert_eq!(tag, "2024.11.09-1");

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, RegistryAuth::Anonymous);
        assert_eq!(calls[1].1, RegistryAuth::Bearer("anon".to_string()));
    }

    #[tokio::test]
    async fn test_latest_tag_stops_when_token_request_fails() {
        let endpoints = Endpoints::default();
        let transport = FakeTransport::new()
            .with_status(&token_url(&endpoints, "mayeut/manylinux_2_31"), 401);

        let result = latest_tag(
            &transport,
            &endpoints,
            "mayeut/manylinux_2_31",
            "ghcr.io/mayeut/manylinux_2_31",
        )
        .await;
        assert!(matches!(result, Err(ResolveError::Http { status: 401, .. })));
        assert_eq!(transport.call_count(), 1);
    }
}
