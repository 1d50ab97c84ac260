//! Fronted-by propagation
//!
//! A resource without a direct policy counts as protected when a CDN
//! distribution with a policy uses its hostname as an origin.

use std::sync::Arc;

use log::{debug, info};

use super::hostname::resolve_hostname;
use super::origins::{FrontingEntry, OriginIndex, first_protected};
use crate::client::InventoryApi;
use crate::client::models::{FrontedBy, Resource};
use crate::client::parallel::run_bounded;

/// Whether propagation should look at this resource at all.
pub fn needs_fronting_check(resource: &Resource) -> bool {
    resource.resource_type.is_frontable() && !resource.has_policy()
}

fn fronted_note(entry: &FrontingEntry, policy_name: &str) -> String {
    format!(
        "Fronted by CloudFront Distribution {} with WAF {}",
        entry.resource_id, policy_name
    )
}

/// Pick the fronting record for a hostname's entries: the first entry that
/// carries a policy. Unprotected distributions are never selected.
pub fn select_fronting(entries: &[FrontingEntry]) -> Option<FrontedBy> {
    let entry = first_protected(entries)?;
    let policy = entry.policy.clone()?;
    Some(FrontedBy {
        resource_id: entry.resource_id.clone(),
        note: fronted_note(entry, policy.name()),
        policy,
    })
}

/// Attach a fronting record unless the resource already has a direct policy.
///
/// Returns whether the resource changed.
pub fn apply_fronting(resource: &mut Resource, fronting: Option<FrontedBy>) -> bool {
    if resource.has_policy() {
        return false;
    }
    match fronting {
        Some(fronted_by) => {
            resource.fronted_by = Some(fronted_by);
            true
        }
        None => false,
    }
}

/// Mark resources fronted by a protected distribution.
///
/// Hostname lookups run with at most `max_concurrent` in flight; results are
/// applied in resource order. Returns the number of resources marked.
pub async fn propagate_fronting<C>(
    client: &Arc<C>,
    resources: &mut [Resource],
    index: &OriginIndex,
    max_concurrent: usize,
) -> usize
where
    C: InventoryApi + ?Sized + 'static,
{
    if index.is_empty() {
        debug!("Origin index is empty, skipping fronted-by propagation");
        return 0;
    }

    let candidates: Vec<usize> = resources
        .iter()
        .enumerate()
        .filter(|(_, r)| needs_fronting_check(r))
        .map(|(i, _)| i)
        .collect();

    let hostnames = {
        let current: &[Resource] = resources;
        run_bounded(
            candidates,
            |i| {
                let client = Arc::clone(client);
                let resource = current[i].clone();
                async move { resolve_hostname(client.as_ref(), &resource).await }
            },
            max_concurrent,
        )
        .await
    };

    let mut marked = 0;
    for (i, hostname) in hostnames {
        let Some(hostname) = hostname else {
            continue;
        };
        let fronting = select_fronting(index.entries(&hostname));
        let resource = &mut resources[i];
        if apply_fronting(resource, fronting) {
            marked += 1;
            debug!("{} is fronted via {}", resource, hostname);
        }
    }

    info!("Marked {} resources as fronted by a protected CDN", marked);
    marked
}
