//! Update service: resolve every catalog entry, then write the pins file once

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::{
    catalog::ImageDescriptor,
    pins::PinnedImages,
    registry::Transport,
    resolve::TagResolver,
};

/// Options for a single update run
pub struct UpdateOptions {
    pub output: PathBuf,
    /// Render the result instead of writing it
    pub dry_run: bool,
}

/// Service for orchestrating an update run
pub struct UpdateService;

impl UpdateService {
    /// Resolve `catalog` in order, stopping at the first failure
    pub async fn resolve_all<T: Transport>(
        catalog: &[ImageDescriptor],
        resolver: &TagResolver<T>,
    ) -> Result<PinnedImages> {
        let mut pins = PinnedImages::new();

        for (index, image) in catalog.iter().enumerate() {
            info!(
                "[{}/{}] {} ({}, {})",
                index + 1,
                catalog.len(),
                image.image_name,
                image.variant,
                image.platform
            );
            let tag = resolver.resolve(image).await.with_context(|| {
                format!(
                    "Failed to resolve latest tag for {} ({} on {})",
                    image.image_name, image.variant, image.platform
                )
            })?;
            pins.insert(&image.platform, &image.variant, image.reference(&tag));
        }

        Ok(pins)
    }

    /// Resolve everything, then write the result to `options.output`
    ///
    /// Nothing is written unless every image resolved. With `dry_run` the INI
    /// text is returned and the output file is left alone.
    pub async fn run<T: Transport>(
        catalog: &[ImageDescriptor],
        resolver: &TagResolver<T>,
        options: &UpdateOptions,
    ) -> Result<PinnedImages> {
        let pins = Self::resolve_all(catalog, resolver).await?;

        if options.dry_run {
            info!("Dry run, not writing {}", options.output.display());
        } else {
            pins.write_to(&options.output).with_context(|| {
                format!(
                    "Failed to write pinned images to {}",
                    options.output.display()
                )
            })?;
        }

        Ok(pins)
    }
}
