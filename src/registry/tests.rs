#[cfg(test)]
mod tests {
    use super::super::fake::FakeTransport;
    use super::super::*;
    use serde_json::json;

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.scheme, "https");
        assert_eq!(
            endpoints.quay_hosts,
            vec!["quay.io".to_string(), "quay.mirrors.ustc.edu.cn".to_string()]
        );
        assert_eq!(endpoints.ghcr_host, "ghcr.io");
        assert_eq!(endpoints.docker_hub_api, "https://hub.docker.com");
        assert_eq!(endpoints.base_url("quay.io"), "https://quay.io");
    }

    #[test]
    fn test_resolve_location_absolute() {
        let base: Uri = "https://hub.docker.com/v2/repositories/a/b/tags".parse().unwrap();
        assert_eq!(
            resolve_location(&base, "https://cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn test_resolve_location_root_relative() {
        let base: Uri = "https://hub.docker.com/v2/repositories/a/b/tags".parse().unwrap();
        assert_eq!(
            resolve_location(&base, "/v2/repositories/a/b/tags/"),
            "https://hub.docker.com/v2/repositories/a/b/tags/"
        );
    }

    #[test]
    fn test_resolve_location_path_relative() {
        let base: Uri = "http://127.0.0.1:8080/v2/repo/tags".parse().unwrap();
        assert_eq!(
            resolve_location(&base, "tags/"),
            "http://127.0.0.1:8080/v2/repo/tags/"
        );
    }

    #[test]
    fn test_resolve_location_scheme_relative() {
        let base: Uri = "https://ghcr.io/v2/mayeut/manylinux_2_31/tags/list".parse().unwrap();
        assert_eq!(
            resolve_location(&base, "//pkg-containers.example.com/v2/tags/list"),
            "https://pkg-containers.example.com/v2/tags/list"
        );

        let plain: Uri = "http://127.0.0.1:8080/v2/repo/tags".parse().unwrap();
        assert_eq!(
            resolve_location(&plain, "//127.0.0.1:9090/v2/repo/tags"),
            "http://127.0.0.1:9090/v2/repo/tags"
        );
    }

    #[test]
    fn test_resolve_location_query_only() {
        let base: Uri = "https://hub.docker.com/v2/repositories/a/b/tags?page=1"
            .parse()
            .unwrap();
        assert_eq!(
            resolve_location(&base, "?page=2"),
            "https://hub.docker.com/v2/repositories/a/b/tags?page=2"
        );
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let transport =
            FakeTransport::new().with_json("https://example.test/a", json!({"token": "t"}));
        let value: serde_json::Value =
            get_json(&transport, "https://example.test/a", &RegistryAuth::Anonymous)
                .await
                .unwrap();
        assert_eq!(value["token"], "t");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_json_propagates_http_status() {
        let transport = FakeTransport::new().with_status("https://example.test/a", 503);
        let result: Result<serde_json::Value, _> =
            get_json(&transport, "https://example.test/a", &RegistryAuth::Anonymous).await;
        match result {
            Err(ResolveError::Http { url, status }) => {
                assert_eq!(url, "https://example.test/a");
                assert_eq!(status, 503);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_json_reports_decode_errors() {
        let transport =
            FakeTransport::new().with_json("https://example.test/a", json!(["not", "a", "map"]));
        let result: Result<crate::auth::TokenResponse, _> =
            get_json(&transport, "https://example.test/a", &RegistryAuth::Anonymous).await;
        assert!(matches!(result, Err(ResolveError::Decode { .. })));
    }
}
