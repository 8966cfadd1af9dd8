//! Image reference resolution

use openapi_client::ImageSourceSpecRegistryType;

use crate::models::deployment::{ImageLocation, ImageRef};

/// Host of the DigitalOcean Container Registry
pub const DOCR_HOST: &str = "registry.digitalocean.com";

/// Split an image repository into registry host, repository path and registry kind.
///
/// A first segment is only treated as a registry host when the reference has at
/// least three segments and the segment looks like a hostname. DOCR images get an
/// empty host and lose their registry namespace segment, as the API requires.
pub fn resolve_image(image: &ImageRef) -> ImageLocation {
    let parts: Vec<&str> = image.image.split('/').collect();

    let mut location = ImageLocation {
        registry_host: String::new(),
        repository_path: image.image.clone(),
        registry_kind: ImageSourceSpecRegistryType::Unspecified,
        tag: image.tag.clone(),
    };

    if parts.len() >= 3 && parts[0].contains('.') {
        if parts[0] == DOCR_HOST {
            location.registry_kind = ImageSourceSpecRegistryType::Docr;
            location.repository_path = parts[2..].join("/");
        } else {
            location.registry_host = parts[0].to_string();
            location.repository_path = parts[1..].join("/");
        }
    }

    location
}
