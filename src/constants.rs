/// Container image tag constants
pub mod tag {
    /// Moving tag that every registry lookup starts from
    pub const LATEST: &str = "latest";
}

/// Registry host constants
pub mod host {
    /// Upstream Quay registry
    pub const QUAY: &str = "quay.io";

    /// USTC mirror of Quay, serving the same repository API
    pub const QUAY_USTC_MIRROR: &str = "quay.mirrors.ustc.edu.cn";

    /// GitHub container registry
    pub const GHCR: &str = "ghcr.io";

    /// Docker Hub web API base (not the v2 registry endpoint)
    pub const DOCKER_HUB_API: &str = "https://hub.docker.com";
}

/// Output file constants
pub mod output {
    /// Default location of the pinned image manifest, relative to the repository root
    pub const DEFAULT_PATH: &str = "cibuildwheel/resources/pinned_docker_images.cfg";
}

/// HTTP client constants
pub mod http {
    /// Redirect hops followed before giving up
    pub const MAX_REDIRECTS: usize = 5;

    /// User-Agent sent with every registry request
    pub const USER_AGENT: &str = concat!("docker-pins/", env!("CARGO_PKG_VERSION"));
}
