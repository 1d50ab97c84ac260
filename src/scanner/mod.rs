//! Firewall coverage scanner
//!
//! Orchestrates one scan of an account:
//! 1. Identify the caller (the only step whose failure aborts the scan)
//! 2. Enumerate resources per (type, region), build the association index and
//!    build the origin index, all concurrently
//! 3. Attach direct policies, then propagate fronted-by protection
//!
//! Every other failure is recorded on the [`ScanResult`] and the scan goes on.

pub mod accounts;
pub mod associations;
pub mod compliance;
pub mod fronting;
pub mod hostname;
pub mod origins;

use std::sync::Arc;

use log::{debug, error, info};

use crate::client::CloudApi;
use crate::client::models::{GLOBAL_REGION, Resource, ResourceType, ScanError, ScanResult};
use crate::client::parallel::{DEFAULT_MAX_CONCURRENT, run_bounded};
use crate::error::ApiError;

use associations::{AssociationIndex, build_association_index};
use origins::{OriginIndex, build_origin_index};

/// What to scan and how.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub regions: Vec<String>,
    pub resource_types: Vec<ResourceType>,
    /// Resolve policy associations and fronting; when off, every resource is
    /// reported without a policy
    pub include_policy_lookup: bool,
    pub max_concurrent: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            regions: vec![GLOBAL_REGION.to_string()],
            resource_types: ResourceType::ALL.to_vec(),
            include_policy_lookup: true,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

fn dedup_preserving_order<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// (type, region) pairs to enumerate, region by region.
///
/// Globally scoped types are enumerated once from [`GLOBAL_REGION`], at the
/// position of the first region. They are still enumerated when no region
/// is requested.
pub fn enumeration_plan(
    regions: &[String],
    resource_types: &[ResourceType],
) -> Vec<(ResourceType, String)> {
    let regions = dedup_preserving_order(regions);
    let resource_types = dedup_preserving_order(resource_types);
    let mut plan = Vec::new();

    if regions.is_empty() {
        plan.extend(
            resource_types
                .iter()
                .filter(|rt| rt.uses_global_scope())
                .map(|&rt| (rt, GLOBAL_REGION.to_string())),
        );
    }

    for (i, region) in regions.iter().enumerate() {
        for &rt in &resource_types {
            if rt.uses_global_scope() {
                if i == 0 {
                    plan.push((rt, GLOBAL_REGION.to_string()));
                }
            } else {
                plan.push((rt, region.clone()));
            }
        }
    }
    plan
}

/// Attach direct policies from the association index.
///
/// CDN distributions missing from the index fall back to the policy parsed
/// from their own configuration. Returns the number of resources protected.
pub fn attach_direct_policies(
    resources: &mut [Resource],
    associations: &AssociationIndex,
    origins: &OriginIndex,
) -> usize {
    let mut attached = 0;
    for resource in resources.iter_mut() {
        let policy = associations.get(&resource.arn).or_else(|| {
            if resource.resource_type == ResourceType::CdnDistribution {
                origins.distribution_policy(&resource.arn)
            } else {
                None
            }
        });
        if let Some(policy) = policy {
            resource.policy = Some(policy.clone());
            attached += 1;
        }
    }
    attached
}

fn scan_error(region: &str, resource_type: Option<ResourceType>, message: String) -> ScanError {
    ScanError {
        region: region.to_string(),
        resource_type,
        message,
        timestamp: chrono::Utc::now(),
    }
}

/// Scanner bound to one cloud client.
pub struct Scanner<C: CloudApi + ?Sized> {
    client: Arc<C>,
    options: ScanOptions,
}

impl<C: CloudApi + ?Sized + 'static> Scanner<C> {
    pub fn new(client: Arc<C>, options: ScanOptions) -> Self {
        Self { client, options }
    }

    /// Run a full scan.
    ///
    /// Fails only when the caller identity cannot be established.
    pub async fn scan(&self) -> Result<ScanResult, ApiError> {
        let identity = self.client.caller_identity().await?;
        let regions = dedup_preserving_order(&self.options.regions);
        let plan = enumeration_plan(&regions, &self.options.resource_types);

        info!(
            "Starting WAF perimeter scan of account {} ({} regions, {} enumeration calls)",
            identity.account,
            regions.len(),
            plan.len()
        );

        let mut result = ScanResult::new(&identity.account, regions.clone());

        let (enumerated, (associations, association_errors), (origins, origin_errors)) = tokio::join!(
            self.enumerate(plan),
            self.associations(&regions),
            self.origins(),
        );

        for ((rt, region), outcome) in enumerated {
            match outcome {
                Ok(resources) => {
                    debug!("Found {} {} in {}", resources.len(), rt.display_name(), region);
                    for resource in resources {
                        result.add_resource(resource);
                    }
                }
                Err(e) => {
                    error!("Error scanning {} in {}: {}", rt, region, e);
                    result.add_error(
                        &region,
                        Some(rt),
                        format!("Error scanning {} in {}: {}", rt, region, e),
                    );
                }
            }
        }
        result.errors.extend(association_errors);
        result.errors.extend(origin_errors);

        if self.options.include_policy_lookup {
            let attached = attach_direct_policies(&mut result.resources, &associations, &origins);
            debug!("Attached direct policies to {} resources", attached);

            fronting::propagate_fronting(
                &self.client,
                &mut result.resources,
                &origins,
                self.options.max_concurrent,
            )
            .await;
        }

        result.complete();

        info!(
            "Scan completed: {} resources, {} with WAF, {:.1}% compliant, {} errors",
            result.total_resources(),
            result.resources_with_waf(),
            result.compliance_rate(),
            result.errors.len()
        );
        Ok(result)
    }

    async fn enumerate(
        &self,
        plan: Vec<(ResourceType, String)>,
    ) -> Vec<((ResourceType, String), Result<Vec<Resource>, ApiError>)> {
        let client = &self.client;
        run_bounded(
            plan,
            |(rt, region)| {
                let client = Arc::clone(client);
                async move { client.enumerate_resources(rt, &region).await }
            },
            self.options.max_concurrent,
        )
        .await
    }

    async fn associations(&self, regions: &[String]) -> (AssociationIndex, Vec<ScanError>) {
        if !self.options.include_policy_lookup {
            return (AssociationIndex::new(), Vec::new());
        }
        build_association_index(self.client.as_ref(), regions).await
    }

    async fn origins(&self) -> (OriginIndex, Vec<ScanError>) {
        if !self.options.include_policy_lookup {
            return (OriginIndex::default(), Vec::new());
        }
        match self.client.list_distribution_origins().await {
            Ok(distributions) => (build_origin_index(&distributions), Vec::new()),
            Err(e) => {
                error!("Failed to list CDN distributions for origin index: {}", e);
                let err = scan_error(
                    GLOBAL_REGION,
                    Some(ResourceType::CdnDistribution),
                    format!("Failed to build CDN origin index: {}", e),
                );
                (OriginIndex::default(), vec![err])
            }
        }
    }
}
