//! App spec assembly

use openapi_client::{AppRouteSpec, AppServiceSpec, AppSpec, ImageSourceSpec};

use crate::models::deployment::{DesiredSpec, ImageLocation};

/// Build the app document: a single service running `image`, routed at the base path.
/// Fields are passed through unchecked; the platform validates them.
pub fn build_app_spec(desired: &DesiredSpec, image: &ImageLocation) -> AppSpec {
    AppSpec {
        name: desired.name.clone(),
        region: desired.region.clone(),
        services: vec![AppServiceSpec {
            name: desired.name.clone(),
            image: Some(ImageSourceSpec {
                registry_type: image.registry_kind,
                registry: image.registry_host.clone(),
                repository: image.repository_path.clone(),
                tag: image.tag.clone(),
            }),
            instance_size_slug: desired.instance_size_slug.clone(),
            instance_count: desired.instance_count,
            http_port: desired.http_port,
            routes: vec![AppRouteSpec {
                path: desired.base_path.clone(),
            }],
        }],
    }
}
