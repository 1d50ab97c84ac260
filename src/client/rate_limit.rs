//! Per-service rate limiting for collaborator calls
//!
//! Implements reactive rate limiting that only activates after a service
//! reports throttling. Each cloud service has its own control-plane budget,
//! so limiters are kept per service category.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use tokio::sync::RwLock;

use super::models::ResourceType;

/// Categories of cloud services with their sustained request rates.
///
/// Rates follow the documented control-plane quotas for list/describe calls:
/// - WAF: 5 req/sec per account and region
/// - CloudFront: 5 req/sec (global)
/// - Load balancing, API Gateway, EC2: 10 req/sec
/// - AppSync, Cognito, App Runner: 5 req/sec
/// - STS: 2 req/sec, identity lookups are rare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    Firewall,
    Cdn,
    LoadBalancing,
    ApiGateway,
    AppSync,
    Cognito,
    AppRunner,
    Ec2,
    Identity,
}

impl ServiceCategory {
    /// All service categories for initialization.
    pub const ALL: [ServiceCategory; 9] = [
        ServiceCategory::Firewall,
        ServiceCategory::Cdn,
        ServiceCategory::LoadBalancing,
        ServiceCategory::ApiGateway,
        ServiceCategory::AppSync,
        ServiceCategory::Cognito,
        ServiceCategory::AppRunner,
        ServiceCategory::Ec2,
        ServiceCategory::Identity,
    ];

    /// Category of the service that owns a resource type.
    pub fn for_resource_type(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::LoadBalancer => ServiceCategory::LoadBalancing,
            ResourceType::CdnDistribution => ServiceCategory::Cdn,
            ResourceType::RestApi | ResourceType::HttpApi => ServiceCategory::ApiGateway,
            ResourceType::GraphqlApi => ServiceCategory::AppSync,
            ResourceType::UserPool => ServiceCategory::Cognito,
            ResourceType::AppRunnerService => ServiceCategory::AppRunner,
            ResourceType::VerifiedAccessInstance => ServiceCategory::Ec2,
        }
    }

    /// Get the rate limit for this category (requests per second).
    pub fn rate_limit(&self) -> u32 {
        match self {
            ServiceCategory::Firewall => 5,
            ServiceCategory::Cdn => 5,
            ServiceCategory::LoadBalancing => 10,
            ServiceCategory::ApiGateway => 10,
            ServiceCategory::AppSync => 5,
            ServiceCategory::Cognito => 5,
            ServiceCategory::AppRunner => 5,
            ServiceCategory::Ec2 => 10,
            ServiceCategory::Identity => 2,
        }
    }
}

/// Rate limiter state for a single service category.
pub struct ServiceRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
    category: ServiceCategory,
}

impl ServiceRateLimiter {
    /// Create a new rate limiter for a service category.
    pub fn new(category: ServiceCategory) -> Self {
        let quota =
            Quota::per_second(NonZeroU32::new(category.rate_limit()).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: RateLimiter::direct(quota),
            active: AtomicBool::new(false),
            category,
        }
    }

    /// Activate rate limiting for this category.
    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated for {:?}", self.category);
        }
    }

    /// Check if rate limiting is active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for permission if rate limiting is active.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            debug!("Waiting for rate limiter {:?}", self.category);
            self.limiter.until_ready().await;
        }
    }
}

/// Collection of rate limiters for all service categories.
pub struct RateLimiterSet {
    limiters: RwLock<HashMap<ServiceCategory, ServiceRateLimiter>>,
}

impl Default for RateLimiterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterSet {
    /// Create a new set of rate limiters for all service categories.
    pub fn new() -> Self {
        let mut map = HashMap::new();

        for category in ServiceCategory::ALL {
            map.insert(category, ServiceRateLimiter::new(category));
        }

        Self {
            limiters: RwLock::new(map),
        }
    }

    /// Wait for rate limit permission for a category (if active).
    pub async fn wait_for(&self, category: ServiceCategory) {
        let limiters = self.limiters.read().await;
        if let Some(limiter) = limiters.get(&category) {
            limiter.wait_if_active().await;
        }
    }

    /// Activate rate limiting for a category (called on throttling).
    pub async fn activate(&self, category: ServiceCategory) {
        let limiters = self.limiters.read().await;
        if let Some(limiter) = limiters.get(&category) {
            limiter.activate();
        }
    }

    /// Check whether a category's limiter has been activated.
    #[cfg(test)]
    pub async fn is_active(&self, category: ServiceCategory) -> bool {
        let limiters = self.limiters.read().await;
        limiters
            .get(&category)
            .map(|l| l.is_active())
            .unwrap_or(false)
    }
}
