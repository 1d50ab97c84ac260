//! Association index: resource identifier -> protecting policy
//!
//! Built from one policy listing per scope/region instead of one lookup per
//! resource. Global policies are listed once from [`GLOBAL_REGION`], then each
//! requested region in caller order.

use std::collections::HashMap;

use log::{debug, warn};

use crate::client::FirewallApi;
use crate::client::models::{
    GLOBAL_REGION, PolicyAssociations, PolicyScope, ProtectionPolicy, ScanError,
};

const STAGE_MARKER: &str = "/stages/";
const REST_API_MARKER: &str = "/restapis/";

/// Map from protected resource identifier to the policy protecting it.
#[derive(Debug, Default, Clone)]
pub struct AssociationIndex {
    entries: HashMap<String, ProtectionPolicy>,
}

impl AssociationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource_id: &str) -> Option<&ProtectionPolicy> {
        self.entries.get(resource_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parent identifier of a REST API stage, if `resource_id` names one.
///
/// `.../restapis/{id}/stages/{stage}` -> `.../restapis/{id}`
pub fn stage_parent(resource_id: &str) -> Option<&str> {
    if !resource_id.contains(REST_API_MARKER) {
        return None;
    }
    resource_id
        .split_once(STAGE_MARKER)
        .map(|(parent, _)| parent)
}

/// Merge one policy's protected resources into the index.
///
/// Direct identifiers are last-write-wins. A stage also maps its parent API,
/// but only when the parent has no entry yet.
pub fn merge_associations(index: &mut AssociationIndex, associations: &PolicyAssociations) {
    for resource_id in &associations.resource_ids {
        index
            .entries
            .insert(resource_id.clone(), associations.policy.clone());

        if let Some(parent) = stage_parent(resource_id) {
            index
                .entries
                .entry(parent.to_string())
                .or_insert_with(|| associations.policy.clone());
        }
    }
}

/// Scope/region pairs to list, in processing order.
pub fn listing_plan(regions: &[String]) -> Vec<(PolicyScope, String)> {
    let mut plan = vec![(PolicyScope::Global, GLOBAL_REGION.to_string())];
    let mut seen: Vec<&str> = Vec::new();

    for region in regions {
        if seen.contains(&region.as_str()) {
            continue;
        }
        seen.push(region);
        plan.push((PolicyScope::Regional, region.clone()));
    }
    plan
}

/// Build the association index for the given regions.
///
/// A failed listing is recorded as a scan error for its region and
/// contributes nothing; the other listings still run.
pub async fn build_association_index<C>(
    client: &C,
    regions: &[String],
) -> (AssociationIndex, Vec<ScanError>)
where
    C: FirewallApi + ?Sized,
{
    let mut index = AssociationIndex::new();
    let mut errors = Vec::new();

    for (scope, region) in listing_plan(regions) {
        match client
            .list_policies_with_protected_resources(scope, &region)
            .await
        {
            Ok(listing) => {
                debug!("{} {} policies in {}", listing.len(), scope, region);
                for associations in &listing {
                    merge_associations(&mut index, associations);
                }
            }
            Err(e) => {
                warn!("Failed to list {} policies in {}: {}", scope, region, e);
                errors.push(ScanError {
                    region: region.clone(),
                    resource_type: None,
                    message: format!("Failed to list {} WAF associations: {}", scope, e),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    debug!("Association index holds {} resources", index.len());
    (index, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockCloudClient;
    use crate::client::fixtures::PolicyBuilder;
    use crate::error::ApiError;

    const STAGE: &str = "arn:aws:apigateway:us-east-1::/restapis/1lmtwo0tu8/stages/staging";
    const API: &str = "arn:aws:apigateway:us-east-1::/restapis/1lmtwo0tu8";

    fn assoc(policy: ProtectionPolicy, ids: &[&str]) -> PolicyAssociations {
        PolicyAssociations {
            policy,
            resource_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_stage_parent() {
        assert_eq!(stage_parent(STAGE), Some(API));
        assert_eq!(stage_parent(API), None);
        // Stage markers outside REST APIs are left alone
        assert_eq!(
            stage_parent("arn:aws:apigateway:us-east-1::/apis/abc/stages/$default"),
            None
        );
    }

    #[test]
    fn test_stage_maps_parent_when_absent() {
        let mut index = AssociationIndex::new();
        let p = PolicyBuilder::regional("p").build();
        merge_associations(&mut index, &assoc(p.clone(), &[STAGE]));

        assert_eq!(index.get(STAGE), Some(&p));
        assert_eq!(index.get(API), Some(&p));
    }

    #[test]
    fn test_first_policy_wins_for_parent() {
        let mut index = AssociationIndex::new();
        let p1 = PolicyBuilder::regional("p1").build();
        let p2 = PolicyBuilder::regional("p2").build();
        let other_stage = "arn:aws:apigateway:us-east-1::/restapis/1lmtwo0tu8/stages/prod";

        merge_associations(&mut index, &assoc(p1.clone(), &[STAGE]));
        merge_associations(&mut index, &assoc(p2.clone(), &[other_stage]));

        assert_eq!(index.get(API), Some(&p1));
        assert_eq!(index.get(other_stage), Some(&p2));
    }

    #[test]
    fn test_direct_ids_are_last_write_wins() {
        let mut index = AssociationIndex::new();
        let p1 = PolicyBuilder::regional("p1").build();
        let p2 = PolicyBuilder::regional("p2").build();

        merge_associations(&mut index, &assoc(p1, &[API]));
        merge_associations(&mut index, &assoc(p2.clone(), &[API]));
        assert_eq!(index.get(API), Some(&p2));

        // A later stage does not displace an existing parent entry
        let p3 = PolicyBuilder::regional("p3").build();
        merge_associations(&mut index, &assoc(p3, &[STAGE]));
        assert_eq!(index.get(API), Some(&p2));
    }

    #[test]
    fn test_empty_policy_contributes_nothing() {
        let mut index = AssociationIndex::new();
        merge_associations(&mut index, &assoc(PolicyBuilder::regional("p").build(), &[]));
        assert!(index.is_empty());
    }

    #[test]
    fn test_listing_plan_order() {
        let regions = vec![
            "eu-west-1".to_string(),
            "us-east-1".to_string(),
            "eu-west-1".to_string(),
        ];
        let plan = listing_plan(&regions);
        assert_eq!(
            plan,
            vec![
                (PolicyScope::Global, "us-east-1".to_string()),
                (PolicyScope::Regional, "eu-west-1".to_string()),
                (PolicyScope::Regional, "us-east-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_build_lists_global_once_then_regions() {
        let mock = MockCloudClient::new()
            .with_policies(vec![
                assoc(PolicyBuilder::global("edge").build(), &["arn:cdn"]),
                assoc(
                    PolicyBuilder::regional("eu").region("eu-west-1").build(),
                    &["arn:lb"],
                ),
            ])
            .await;

        let regions = vec!["eu-west-1".to_string(), "eu-west-1".to_string()];
        let (index, errors) = build_association_index(&mock, &regions).await;

        assert!(errors.is_empty());
        assert_eq!(index.get("arn:cdn").map(|p| p.name()), Some("edge"));
        assert_eq!(index.get("arn:lb").map(|p| p.name()), Some("eu"));
        assert_eq!(mock.call_counts().await.list_policies, 2);
    }

    #[tokio::test]
    async fn test_regional_policy_overrides_global_for_same_id() {
        let mock = MockCloudClient::new()
            .with_policies(vec![
                assoc(PolicyBuilder::global("edge").build(), &["arn:shared"]),
                assoc(PolicyBuilder::regional("local").build(), &["arn:shared"]),
            ])
            .await;

        let (index, _) = build_association_index(&mock, &["us-east-1".to_string()]).await;
        assert_eq!(index.get("arn:shared").map(|p| p.name()), Some("local"));
    }

    #[tokio::test]
    async fn test_failed_listing_is_recorded_and_skipped() {
        let mock = MockCloudClient::new()
            .with_policies(vec![assoc(
                PolicyBuilder::regional("ok").build(),
                &["arn:ok"],
            )])
            .await
            .with_policy_failure(
                PolicyScope::Regional,
                "eu-west-1",
                ApiError::AccessDenied("wafv2:ListWebACLs".to_string()),
            )
            .await;

        let regions = vec!["eu-west-1".to_string(), "us-east-1".to_string()];
        let (index, errors) = build_association_index(&mock, &regions).await;

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].region, "eu-west-1");
        assert!(errors[0].resource_type.is_none());
        assert!(index.get("arn:ok").is_some());
    }
}
