//! Live AWS client
//!
//! Implements the collaborator traits with the AWS SDK. SDK clients are built
//! lazily per region and memoized; globally scoped calls (identity, CDN,
//! global policies) go through [`GLOBAL_REGION`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use log::{debug, info};
use tokio::sync::{Mutex, OnceCell};

use super::api::{DistributionApi, FirewallApi, IdentityApi, InventoryApi};
use super::models::{
    CallerIdentity, DistributionRecord, GLOBAL_REGION, PolicyAssociations, PolicyScope,
    ProtectionPolicy, Resource, ResourceType,
};
use crate::error::ApiError;

const SESSION_NAME: &str = "edgeguard-scan";

/// Error codes AWS uses for rate limiting
const THROTTLE_CODES: [&str; 5] = [
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "WAFLimitsExceededException",
];

const ACCESS_DENIED_CODES: [&str; 3] = [
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
];

/// Firewall resource type strings listed for each regional policy
const REGIONAL_PROTECTED_TYPES: [&str; 6] = [
    "APPLICATION_LOAD_BALANCER",
    "API_GATEWAY",
    "APPSYNC",
    "COGNITO_USER_POOL",
    "APP_RUNNER_SERVICE",
    "VERIFIED_ACCESS_INSTANCE",
];

/// Map an SDK failure onto the collaborator error type.
fn api_error<E, R>(service: &str, err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let detail = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => ApiError::Network(detail),
        SdkError::ResponseError(_) => ApiError::InvalidResponse(detail),
        SdkError::ServiceError(_) => {
            let code = err.code().unwrap_or("Unknown").to_string();
            let message = err.message().unwrap_or_default().to_string();

            if THROTTLE_CODES.contains(&code.as_str()) {
                ApiError::Throttled {
                    service: service.to_string(),
                }
            } else if ACCESS_DENIED_CODES.contains(&code.as_str()) {
                ApiError::AccessDenied(format!("{}: {}", service, message))
            } else {
                ApiError::Service {
                    service: service.to_string(),
                    code,
                    message,
                }
            }
        }
        _ => ApiError::Unavailable(detail),
    }
}

/// Account id field of an ARN, if present
fn arn_account(arn: &str) -> Option<&str> {
    arn.split(':').nth(4).filter(|a| !a.is_empty())
}

/// Gateway ARNs carry no account, so the caller's account is recorded
fn gateway_resource(
    resource_type: ResourceType,
    region: &str,
    account: &str,
    api_id: &str,
    name: Option<&str>,
) -> Resource {
    let path = match resource_type {
        ResourceType::RestApi => "restapis",
        _ => "apis",
    };
    Resource::new(
        format!("arn:aws:apigateway:{}::/{}/{}", region, path, api_id),
        resource_type,
        region,
        account,
    )
    .with_name(name.map(String::from))
    .public(true)
}

/// SDK clients for one region
struct RegionClients {
    elb: aws_sdk_elasticloadbalancingv2::Client,
    cloudfront: aws_sdk_cloudfront::Client,
    apigateway: aws_sdk_apigateway::Client,
    apigatewayv2: aws_sdk_apigatewayv2::Client,
    appsync: aws_sdk_appsync::Client,
    cognito: aws_sdk_cognitoidentityprovider::Client,
    apprunner: aws_sdk_apprunner::Client,
    ec2: aws_sdk_ec2::Client,
    wafv2: aws_sdk_wafv2::Client,
}

impl RegionClients {
    fn new(config: &SdkConfig) -> Self {
        Self {
            elb: aws_sdk_elasticloadbalancingv2::Client::new(config),
            cloudfront: aws_sdk_cloudfront::Client::new(config),
            apigateway: aws_sdk_apigateway::Client::new(config),
            apigatewayv2: aws_sdk_apigatewayv2::Client::new(config),
            appsync: aws_sdk_appsync::Client::new(config),
            cognito: aws_sdk_cognitoidentityprovider::Client::new(config),
            apprunner: aws_sdk_apprunner::Client::new(config),
            ec2: aws_sdk_ec2::Client::new(config),
            wafv2: aws_sdk_wafv2::Client::new(config),
        }
    }
}

/// AWS SDK implementation of every collaborator trait.
pub struct AwsClient {
    base: SdkConfig,
    regions: Mutex<HashMap<String, Arc<RegionClients>>>,
    identity: OnceCell<CallerIdentity>,
}

impl AwsClient {
    /// Load credentials from the default chain, assuming `role_arn` when given.
    pub async fn new(role_arn: Option<&str>, external_id: Option<&str>) -> Result<Self, ApiError> {
        let base = aws_config::from_env()
            .region(Region::new(GLOBAL_REGION))
            .load()
            .await;

        let base = match role_arn {
            Some(role_arn) => assume_role(&base, role_arn, external_id).await?,
            None => base,
        };

        Ok(Self {
            base,
            regions: Mutex::new(HashMap::new()),
            identity: OnceCell::new(),
        })
    }

    async fn clients(&self, region: &str) -> Arc<RegionClients> {
        let mut regions = self.regions.lock().await;
        Arc::clone(regions.entry(region.to_string()).or_insert_with(|| {
            debug!("Creating SDK clients for {}", region);
            let config = self
                .base
                .to_builder()
                .region(Region::new(region.to_string()))
                .build();
            Arc::new(RegionClients::new(&config))
        }))
    }

    async fn account_id(&self) -> Result<String, ApiError> {
        Ok(self.caller_identity().await?.account)
    }

    async fn list_load_balancers(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let mut resources = Vec::new();
        let mut marker = None;

        loop {
            let page = clients
                .elb
                .describe_load_balancers()
                .set_marker(marker)
                .send()
                .await
                .map_err(|e| api_error("elasticloadbalancing", e))?;

            for lb in page.load_balancers() {
                let is_application = lb.r#type().is_some_and(|t| t.as_str() == "application");
                let Some(arn) = lb.load_balancer_arn().filter(|_| is_application) else {
                    continue;
                };
                let is_public = lb.scheme().is_some_and(|s| s.as_str() == "internet-facing");
                resources.push(
                    Resource::new(
                        arn,
                        ResourceType::LoadBalancer,
                        region,
                        arn_account(arn).unwrap_or_default(),
                    )
                    .with_name(lb.load_balancer_name().map(String::from))
                    .public(is_public),
                );
            }

            marker = page.next_marker().map(String::from);
            if marker.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn list_cdn_distributions(&self) -> Result<Vec<Resource>, ApiError> {
        Ok(self
            .distribution_records()
            .await?
            .into_iter()
            .map(|record| {
                let account = arn_account(&record.arn).unwrap_or_default().to_string();
                Resource::new(
                    record.arn,
                    ResourceType::CdnDistribution,
                    GLOBAL_REGION,
                    account,
                )
                .with_name(Some(record.domain_name))
                .public(true)
            })
            .collect())
    }

    async fn list_rest_apis(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let account = self.account_id().await?;
        let mut resources = Vec::new();
        let mut position = None;

        loop {
            let page = clients
                .apigateway
                .get_rest_apis()
                .limit(500)
                .set_position(position)
                .send()
                .await
                .map_err(|e| api_error("apigateway", e))?;

            for api in page.items() {
                let Some(id) = api.id() else { continue };
                resources.push(
                    gateway_resource(ResourceType::RestApi, region, &account, id, api.name())
                        .with_tags(api.tags().cloned().unwrap_or_default().into_iter().collect()),
                );
            }

            position = page.position().map(String::from);
            if position.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn list_http_apis(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let account = self.account_id().await?;
        let mut resources = Vec::new();
        let mut next_token = None;

        loop {
            let page = clients
                .apigatewayv2
                .get_apis()
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| api_error("apigateway", e))?;

            for api in page.items() {
                let Some(id) = api.api_id() else { continue };
                resources.push(gateway_resource(
                    ResourceType::HttpApi,
                    region,
                    &account,
                    id,
                    api.name(),
                ));
            }

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn list_graphql_apis(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let mut resources = Vec::new();
        let mut next_token = None;

        loop {
            let page = clients
                .appsync
                .list_graphql_apis()
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| api_error("appsync", e))?;

            for api in page.graphql_apis() {
                let Some(arn) = api.arn() else { continue };
                resources.push(
                    Resource::new(
                        arn,
                        ResourceType::GraphqlApi,
                        region,
                        arn_account(arn).unwrap_or_default(),
                    )
                    .with_name(api.name().map(String::from))
                    .public(true),
                );
            }

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn list_user_pools(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let account = self.account_id().await?;
        let mut resources = Vec::new();
        let mut next_token = None;

        loop {
            let page = clients
                .cognito
                .list_user_pools()
                .max_results(60)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| api_error("cognito-idp", e))?;

            for pool in page.user_pools() {
                let Some(id) = pool.id() else { continue };
                resources.push(
                    Resource::new(
                        format!("arn:aws:cognito-idp:{}:{}:userpool/{}", region, account, id),
                        ResourceType::UserPool,
                        region,
                        account.clone(),
                    )
                    .with_name(pool.name().map(String::from))
                    .public(true),
                );
            }

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn list_app_runner_services(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let mut resources = Vec::new();
        let mut next_token = None;

        loop {
            let page = clients
                .apprunner
                .list_services()
                .max_results(20)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| api_error("apprunner", e))?;

            for service in page.service_summary_list() {
                let Some(arn) = service.service_arn() else {
                    continue;
                };
                resources.push(
                    Resource::new(
                        arn,
                        ResourceType::AppRunnerService,
                        region,
                        arn_account(arn).unwrap_or_default(),
                    )
                    .with_name(service.service_name().map(String::from))
                    .public(true),
                );
            }

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn list_verified_access_instances(&self, region: &str) -> Result<Vec<Resource>, ApiError> {
        let clients = self.clients(region).await;
        let account = self.account_id().await?;
        let mut resources = Vec::new();
        let mut next_token = None;

        loop {
            let page = clients
                .ec2
                .describe_verified_access_instances()
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| api_error("ec2", e))?;

            for instance in page.verified_access_instances() {
                let Some(id) = instance.verified_access_instance_id() else {
                    continue;
                };
                let tags: std::collections::BTreeMap<String, String> = instance
                    .tags()
                    .iter()
                    .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
                    .collect();
                let name = tags.get("Name").cloned();

                resources.push(
                    Resource::new(
                        format!(
                            "arn:aws:ec2:{}:{}:verified-access-instance/{}",
                            region, account, id
                        ),
                        ResourceType::VerifiedAccessInstance,
                        region,
                        account.clone(),
                    )
                    .with_name(name)
                    .with_tags(tags)
                    .public(true),
                );
            }

            next_token = page.next_token().map(String::from);
            if next_token.is_none() {
                break;
            }
        }

        Ok(resources)
    }

    async fn distribution_records(&self) -> Result<Vec<DistributionRecord>, ApiError> {
        let clients = self.clients(GLOBAL_REGION).await;
        let mut records = Vec::new();
        let mut marker = None;

        loop {
            let page = clients
                .cloudfront
                .list_distributions()
                .set_marker(marker)
                .send()
                .await
                .map_err(|e| api_error("cloudfront", e))?;

            let Some(list) = page.distribution_list() else {
                break;
            };

            for summary in list.items() {
                let origins = summary
                    .origins()
                    .map(|o| o.items().iter().map(|i| i.domain_name().to_string()).collect())
                    .unwrap_or_default();
                let web_acl_id = Some(summary.web_acl_id().to_string()).filter(|id| !id.is_empty());

                records.push(DistributionRecord {
                    id: summary.id().to_string(),
                    arn: summary.arn().to_string(),
                    domain_name: summary.domain_name().to_string(),
                    web_acl_id,
                    origins,
                });
            }

            marker = list
                .is_truncated()
                .then(|| list.next_marker().map(String::from))
                .flatten();
            if marker.is_none() {
                break;
            }
        }

        Ok(records)
    }

    async fn protected_resources(
        &self,
        clients: &RegionClients,
        scope: PolicyScope,
        policy_arn: &str,
    ) -> Result<Vec<String>, ApiError> {
        if scope == PolicyScope::Global {
            let response = clients
                .cloudfront
                .list_distributions_by_web_acl_id()
                .web_acl_id(policy_arn)
                .send()
                .await
                .map_err(|e| api_error("cloudfront", e))?;

            return Ok(response
                .distribution_list()
                .map(|list| list.items().iter().map(|d| d.arn().to_string()).collect())
                .unwrap_or_default());
        }

        let mut arns = Vec::new();
        for resource_type in REGIONAL_PROTECTED_TYPES {
            let response = clients
                .wafv2
                .list_resources_for_web_acl()
                .web_acl_arn(policy_arn)
                .resource_type(aws_sdk_wafv2::types::ResourceType::from(resource_type))
                .send()
                .await;

            match response {
                Ok(output) => arns.extend(output.resource_arns().iter().cloned()),
                Err(e) => {
                    let err = api_error("wafv2", e);
                    if err.is_throttled() {
                        return Err(err);
                    }
                    debug!("No {} resources for {}: {}", resource_type, policy_arn, err);
                }
            }
        }

        Ok(arns)
    }
}

async fn assume_role(
    base: &SdkConfig,
    role_arn: &str,
    external_id: Option<&str>,
) -> Result<SdkConfig, ApiError> {
    info!("Assuming role {}", role_arn);
    let sts = aws_sdk_sts::Client::new(base);

    let assumed = sts
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(SESSION_NAME)
        .set_external_id(external_id.map(String::from))
        .send()
        .await
        .map_err(|e| api_error("sts", e))?;

    let creds = assumed
        .credentials()
        .ok_or_else(|| ApiError::InvalidResponse("No credentials returned from assume role".into()))?;

    let credentials = aws_credential_types::Credentials::new(
        creds.access_key_id(),
        creds.secret_access_key(),
        Some(creds.session_token().to_string()),
        None,
        "edgeguard-assumed",
    );

    Ok(aws_config::from_env()
        .credentials_provider(credentials)
        .region(Region::new(GLOBAL_REGION))
        .load()
        .await)
}

#[async_trait]
impl IdentityApi for AwsClient {
    async fn caller_identity(&self) -> Result<CallerIdentity, ApiError> {
        self.identity
            .get_or_try_init(|| async {
                let sts = aws_sdk_sts::Client::new(&self.base);
                let output = sts
                    .get_caller_identity()
                    .send()
                    .await
                    .map_err(|e| api_error("sts", e))?;

                Ok::<_, ApiError>(CallerIdentity {
                    account: output.account().unwrap_or_default().to_string(),
                    arn: output.arn().unwrap_or_default().to_string(),
                    user_id: output.user_id().unwrap_or_default().to_string(),
                })
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl InventoryApi for AwsClient {
    async fn enumerate_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
    ) -> Result<Vec<Resource>, ApiError> {
        debug!("Listing {} in {}", resource_type.display_name(), region);

        match resource_type {
            ResourceType::LoadBalancer => self.list_load_balancers(region).await,
            ResourceType::CdnDistribution => self.list_cdn_distributions().await,
            ResourceType::RestApi => self.list_rest_apis(region).await,
            ResourceType::HttpApi => self.list_http_apis(region).await,
            ResourceType::GraphqlApi => self.list_graphql_apis(region).await,
            ResourceType::UserPool => self.list_user_pools(region).await,
            ResourceType::AppRunnerService => self.list_app_runner_services(region).await,
            ResourceType::VerifiedAccessInstance => {
                self.list_verified_access_instances(region).await
            }
        }
    }

    async fn resolve_load_balancer_hostname(
        &self,
        resource_id: &str,
        region: &str,
    ) -> Result<Option<String>, ApiError> {
        let clients = self.clients(region).await;
        let output = clients
            .elb
            .describe_load_balancers()
            .load_balancer_arns(resource_id)
            .send()
            .await
            .map_err(|e| api_error("elasticloadbalancing", e))?;

        Ok(output
            .load_balancers()
            .first()
            .and_then(|lb| lb.dns_name())
            .map(String::from))
    }
}

#[async_trait]
impl FirewallApi for AwsClient {
    async fn list_policies_with_protected_resources(
        &self,
        scope: PolicyScope,
        region: &str,
    ) -> Result<Vec<PolicyAssociations>, ApiError> {
        let region = match scope {
            PolicyScope::Global => GLOBAL_REGION,
            PolicyScope::Regional => region,
        };
        let clients = self.clients(region).await;
        let sdk_scope = match scope {
            PolicyScope::Global => aws_sdk_wafv2::types::Scope::from("CLOUDFRONT"),
            PolicyScope::Regional => aws_sdk_wafv2::types::Scope::from("REGIONAL"),
        };

        let mut listing = Vec::new();
        let mut marker = None;

        loop {
            let page = clients
                .wafv2
                .list_web_acls()
                .scope(sdk_scope.clone())
                .set_next_marker(marker)
                .send()
                .await
                .map_err(|e| api_error("wafv2", e))?;

            for summary in page.web_acls() {
                let (Some(arn), Some(name), Some(id)) = (summary.arn(), summary.name(), summary.id())
                else {
                    continue;
                };
                let policy = ProtectionPolicy::new(arn, name, id, scope, region)
                    .with_description(summary.description().map(String::from));
                let resource_ids = self.protected_resources(&clients, scope, arn).await?;

                listing.push(PolicyAssociations {
                    policy,
                    resource_ids,
                });
            }

            marker = page.next_marker().map(String::from);
            if marker.is_none() || page.web_acls().is_empty() {
                break;
            }
        }

        Ok(listing)
    }
}

#[async_trait]
impl DistributionApi for AwsClient {
    async fn list_distribution_origins(&self) -> Result<Vec<DistributionRecord>, ApiError> {
        self.distribution_records().await
    }
}
