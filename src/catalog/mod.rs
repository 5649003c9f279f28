//! Static catalog of manylinux/musllinux build images
//!
//! Each entry names the wheel compatibility family (the variant), the CPU
//! platform it builds for, and where its image lives. Entries with a pinned tag
//! are never looked up.


/// One build image the pins file tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Compatibility family, e.g. `manylinux2014` or `musllinux_1_2`
    pub variant: String,
    /// CPU platform, e.g. `x86_64` or `pypy_aarch64`
    pub platform: String,
    /// Registry path without a tag
    pub image_name: String,
    /// Tag to record verbatim instead of resolving `latest`
    pub pinned_tag: Option<String>,
}

impl ImageDescriptor {
    pub fn new(variant: &str, platform: &str, image_name: &str) -> Self {
        Self {
            variant: variant.to_string(),
            platform: platform.to_string(),
            image_name: image_name.to_string(),
            pinned_tag: None,
        }
    }

    /// Freeze this image at `tag`
    pub fn pinned(mut self, tag: &str) -> Self {
        self.pinned_tag = Some(tag.to_string());
        self
    }

    /// The `name:tag` reference written to the pins file
    pub fn reference(&self, tag: &str) -> String {
        format!("{}:{}", self.image_name, tag)
    }
}

/// Build a descriptor for an image published under `quay.io/pypa`
///
/// PyPy platforms share the CPython image, so a `pypy_` prefix is dropped from
/// the image name while the platform keeps it.
pub fn pypa_image(variant: &str, platform: &str, pinned_tag: Option<&str>) -> ImageDescriptor {
    let arch = platform.strip_prefix("pypy_").unwrap_or(platform);
    let image_name = format!("{}/pypa/{}_{}", crate::constants::host::QUAY, variant, arch);
    ImageDescriptor {
        variant: variant.to_string(),
        platform: platform.to_string(),
        image_name,
        pinned_tag: pinned_tag.map(str::to_string),
    }
}

const MIRROR: &str = crate::constants::host::QUAY_USTC_MIRROR;

fn mirrored(variant: &str, platform: &str, arch: &str) -> ImageDescriptor {
    ImageDescriptor::new(variant, platform, &format!("{MIRROR}/pypa/{variant}_{arch}"))
}

/// The hand-maintained image table, in the order entries are resolved and written
pub fn default_catalog() -> Vec<ImageDescriptor> {
    let mut images = Vec::new();

    // manylinux1
    for arch in ["x86_64", "i686"] {
        images.push(mirrored("manylinux1", arch, arch));
    }

    // manylinux2010
    for arch in ["x86_64", "i686"] {
        images.push(mirrored("manylinux2010", arch, arch));
    }
    for arch in ["x86_64", "i686"] {
        images.push(mirrored("manylinux2010", &format!("pypy_{arch}"), arch));
    }

    // manylinux2014
    for arch in ["x86_64", "i686", "aarch64", "ppc64le", "s390x"] {
        images.push(mirrored("manylinux2014", arch, arch));
    }
    for arch in ["x86_64", "i686", "aarch64"] {
        images.push(mirrored("manylinux2014", &format!("pypy_{arch}"), arch));
    }

    // manylinux_2_24
    for arch in ["x86_64", "i686", "aarch64", "ppc64le", "s390x"] {
        images.push(mirrored("manylinux_2_24", arch, arch));
    }
    for arch in ["x86_64", "i686", "aarch64"] {
        images.push(mirrored("manylinux_2_24", &format!("pypy_{arch}"), arch));
    }

    // manylinux_2_28
    for arch in ["x86_64", "aarch64", "ppc64le", "s390x"] {
        images.push(mirrored("manylinux_2_28", arch, arch));
    }
    for arch in ["x86_64", "aarch64"] {
        images.push(mirrored("manylinux_2_28", &format!("pypy_{arch}"), arch));
    }

    // manylinux_2_31 is only published for armv7l, on ghcr
    images.push(ImageDescriptor::new(
        "manylinux_2_31",
        "armv7l",
        &format!("{}/mayeut/manylinux_2_31", crate::constants::host::GHCR),
    ));

    // manylinux_2_34
    for platform in [
        "x86_64",
        "aarch64",
        "ppc64le",
        "s390x",
        "pypy_x86_64",
        "pypy_aarch64",
    ] {
        images.push(pypa_image("manylinux_2_34", platform, None));
    }

    // musllinux
    for variant in ["musllinux_1_1", "musllinux_1_2"] {
        for arch in ["x86_64", "i686", "aarch64", "ppc64le", "s390x"] {
            images.push(mirrored(variant, arch, arch));
        }
    }

    images
}
