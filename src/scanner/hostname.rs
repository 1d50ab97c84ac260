//! Origin hostname derivation
//!
//! Maps a resource to the hostname it would present as a CDN origin. Gateway
//! APIs carry their API id in the identifier; load balancers need a DNS lookup.

use log::debug;

use crate::client::InventoryApi;
use crate::client::models::{Resource, ResourceType};
use crate::error::IdentifierError;

const HTTP_API_MARKER: &str = "/apis/";
const REST_API_MARKER: &str = "/restapis/";
const EXECUTE_API_SUFFIX: &str = "execute-api";
const CLOUD_DOMAIN_SUFFIX: &str = "amazonaws.com";

/// API id following `marker` in a gateway identifier.
fn api_id<'a>(resource_id: &'a str, marker: &'static str) -> Result<&'a str, IdentifierError> {
    let missing = || IdentifierError::MissingMarker {
        id: resource_id.to_string(),
        marker,
    };

    let (_, rest) = resource_id.rsplit_once(marker).ok_or_else(missing)?;
    let id = rest.split('/').next().unwrap_or_default();
    if id.is_empty() {
        return Err(IdentifierError::EmptyComponent(resource_id.to_string()));
    }
    Ok(id)
}

/// Hostname of a gateway API, derived from its identifier alone.
///
/// Returns `None` for every other resource type and for identifiers without
/// the expected marker.
pub fn derive_api_hostname(resource: &Resource) -> Option<String> {
    let marker = match resource.resource_type {
        ResourceType::HttpApi => HTTP_API_MARKER,
        ResourceType::RestApi => REST_API_MARKER,
        _ => return None,
    };

    match api_id(&resource.arn, marker) {
        Ok(id) => Some(format!(
            "{}.{}.{}.{}",
            id, EXECUTE_API_SUFFIX, resource.region, CLOUD_DOMAIN_SUFFIX
        )),
        Err(e) => {
            debug!("Cannot derive hostname: {}", e);
            None
        }
    }
}

/// Hostname a resource would present as a CDN origin.
///
/// Load balancers are resolved through the collaborator; a failed lookup is
/// logged and treated as "no hostname".
pub async fn resolve_hostname<C>(client: &C, resource: &Resource) -> Option<String>
where
    C: InventoryApi + ?Sized,
{
    match resource.resource_type {
        ResourceType::HttpApi | ResourceType::RestApi => derive_api_hostname(resource),
        ResourceType::LoadBalancer => {
            match client
                .resolve_load_balancer_hostname(&resource.arn, &resource.region)
                .await
            {
                Ok(hostname) => hostname,
                Err(e) => {
                    debug!("Could not resolve DNS name for {}: {}", resource.arn, e);
                    None
                }
            }
        }
        _ => None,
    }
}
