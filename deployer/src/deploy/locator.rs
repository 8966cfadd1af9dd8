//! Existing app lookup

use openapi_client::{App, Links};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::errors::DeployError;
use crate::platform::{call, ListOptions, PlatformApi};
use crate::status::StatusSink;

/// Locator options
#[derive(Debug, Clone)]
pub struct LocatorOptions {
    /// Apps requested per page
    pub per_page: u32,

    /// Fail instead of picking the first match when several apps share a name
    pub strict_name_match: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            per_page: 200,
            strict_name_match: false,
        }
    }
}

/// Find the id of the app named `name`, if any.
///
/// Every page is fetched before filtering. Any page error aborts the lookup.
pub async fn find_existing_app<P>(
    platform: &P,
    name: &str,
    options: &LocatorOptions,
    status: &dyn StatusSink,
    cancel: &CancellationToken,
) -> Result<Option<String>, DeployError>
where
    P: PlatformApi + ?Sized,
{
    let apps = list_all_apps(platform, name, options.per_page, cancel).await?;
    let found = matching_ids(&apps, name);

    match found.as_slice() {
        [] => {
            status.update(&format!("No existing app found with name: {}", name));
            Ok(None)
        }
        [id, rest @ ..] => {
            if !rest.is_empty() {
                if options.strict_name_match {
                    return Err(DeployError::AmbiguousApp {
                        name: name.to_string(),
                        count: found.len(),
                    });
                }
                warn!("{} apps are named {}, using {}", found.len(), name, id);
            }
            status.update(&format!("Found existing app for {}, ID: {}", name, id));
            Ok(Some(id.clone()))
        }
    }
}

/// Fetch every page of apps
pub async fn list_all_apps<P>(
    platform: &P,
    name: &str,
    per_page: u32,
    cancel: &CancellationToken,
) -> Result<Vec<App>, DeployError>
where
    P: PlatformApi + ?Sized,
{
    let mut apps = Vec::new();
    let mut options = ListOptions { page: 1, per_page };

    loop {
        debug!("Listing apps, page {}", options.page);
        let page = call(cancel, "list apps", name, platform.list_apps(options)).await?;
        apps.extend(page.apps);

        let links = match page.links {
            Some(links) if !links.is_last_page() => links,
            _ => break,
        };

        options.page = current_page(&links)? + 1;
    }

    Ok(apps)
}

/// Ids of all apps whose spec name is `name`, in listing order
pub fn matching_ids(apps: &[App], name: &str) -> Vec<String> {
    apps.iter()
        .filter(|app| app.spec.name == name)
        .map(|app| app.id.clone())
        .collect()
}

/// Page number the links were returned for, derived from the `prev` link
pub fn current_page(links: &Links) -> Result<u32, DeployError> {
    let prev = match &links.pages {
        Some(pages) if !pages.prev.is_empty() => &pages.prev,
        _ => return Ok(1),
    };

    Ok(page_for_url(prev)? + 1)
}

fn page_for_url(link: &str) -> Result<u32, DeployError> {
    let url = Url::parse(link)
        .map_err(|e| DeployError::PaginationError(format!("invalid page link {}: {}", link, e)))?;

    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| DeployError::PaginationError(format!("no page in link {}", link)))?;

    page.parse()
        .map_err(|_| DeployError::PaginationError(format!("invalid page {} in link {}", page, link)))
}
