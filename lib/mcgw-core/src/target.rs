//! Resolved load balancing targets for a multi-cluster Gateway

use std::collections::BTreeMap;

use kube::ResourceExt;
use mcgw_api::v1alpha1::{DNSPolicy, GeoCode, LoadBalancingSpec};
use tracing::debug;

use crate::resolver::{self, Resolver};
use crate::short_code::{to_base36_hash_len, SHORT_CODE_LEN};
use crate::{ClusterGateway, GatewayAddress, Result};

/// Identity of a logical Gateway
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GatewayRef {
    pub name: String,
    pub namespace: String,
}

impl GatewayRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// The Gateway targeted by a DNSPolicy, defaulting to the policy's namespace
    pub fn for_policy(policy: &DNSPolicy) -> Self {
        let target = &policy.spec.target_ref;
        let namespace = target
            .namespace
            .clone()
            .or_else(|| policy.namespace())
            .unwrap_or_else(|| "default".to_string());
        Self::new(target.name.clone(), namespace)
    }
}

/// A Gateway placed on multiple clusters, with every cluster gateway resolved
/// to a geo code and weight
#[derive(Clone, Debug)]
pub struct GatewayTarget {
    gateway: GatewayRef,
    load_balancing: Option<LoadBalancingSpec>,
    cluster_gateway_targets: Vec<ClusterGatewayTarget>,
}

impl GatewayTarget {
    /// Resolve every cluster gateway under `load_balancing`.
    ///
    /// Targets keep the order of `cluster_gateways`. Fails if any custom
    /// weight selector that has to be evaluated is malformed.
    pub fn new(
        gateway: GatewayRef,
        cluster_gateways: impl IntoIterator<Item = ClusterGateway>,
        load_balancing: Option<LoadBalancingSpec>,
    ) -> Result<Self> {
        let name = format!("{}-{}", gateway.name, gateway.namespace);
        let resolver = Resolver::new(name.as_str(), load_balancing.as_ref());

        let cluster_gateway_targets = cluster_gateways
            .into_iter()
            .map(|cg| ClusterGatewayTarget::new(cg, &resolver))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Resolved {} cluster gateway targets for {}",
            cluster_gateway_targets.len(),
            name
        );

        Ok(Self {
            gateway,
            load_balancing,
            cluster_gateway_targets,
        })
    }

    /// `<name>-<namespace>` of the Gateway
    pub fn name(&self) -> String {
        format!("{}-{}", self.gateway.name, self.gateway.namespace)
    }

    pub fn short_code(&self) -> String {
        to_base36_hash_len(&self.name(), SHORT_CODE_LEN)
    }

    pub fn gateway(&self) -> &GatewayRef {
        &self.gateway
    }

    pub fn load_balancing(&self) -> Option<&LoadBalancingSpec> {
        self.load_balancing.as_ref()
    }

    pub fn targets(&self) -> &[ClusterGatewayTarget] {
        &self.cluster_gateway_targets
    }

    pub fn len(&self) -> usize {
        self.cluster_gateway_targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cluster_gateway_targets.is_empty()
    }

    /// Find the target for a cluster by name
    pub fn cluster_gateway_target(&self, cluster_name: &str) -> Option<&ClusterGatewayTarget> {
        self.cluster_gateway_targets
            .iter()
            .find(|t| t.name() == cluster_name)
    }

    /// Group targets by geo code, keeping target order within each group
    pub fn group_targets_by_geo(&self) -> BTreeMap<GeoCode, Vec<&ClusterGatewayTarget>> {
        let mut geo_targets: BTreeMap<GeoCode, Vec<&ClusterGatewayTarget>> = BTreeMap::new();
        for target in &self.cluster_gateway_targets {
            geo_targets
                .entry(target.geo.clone())
                .or_default()
                .push(target);
        }
        geo_targets
    }

    pub fn default_geo(&self) -> GeoCode {
        resolver::default_geo(self.load_balancing.as_ref())
    }

    pub fn default_weight(&self) -> u32 {
        resolver::default_weight(self.load_balancing.as_ref())
    }
}

/// A cluster gateway with its resolved geo code and weight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterGatewayTarget {
    cluster_gateway: ClusterGateway,
    geo: GeoCode,
    weight: u32,
}

impl ClusterGatewayTarget {
    pub fn new(cluster_gateway: ClusterGateway, resolver: &Resolver<'_>) -> Result<Self> {
        let geo = resolver.resolve_geo(&cluster_gateway);
        let weight = resolver.resolve_weight(&cluster_gateway)?;
        Ok(Self {
            cluster_gateway,
            geo,
            weight,
        })
    }

    /// Name of the cluster the gateway runs on
    pub fn name(&self) -> &str {
        &self.cluster_gateway.cluster_name
    }

    /// `<cluster>-<hash of namespace and name>`
    pub fn short_code(&self) -> String {
        let gateway = format!(
            "{}-{}",
            self.cluster_gateway.namespace, self.cluster_gateway.name
        );
        format!(
            "{}-{}",
            self.cluster_gateway.cluster_name,
            to_base36_hash_len(&gateway, SHORT_CODE_LEN)
        )
    }

    pub fn geo(&self) -> &GeoCode {
        &self.geo
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn cluster_gateway(&self) -> &ClusterGateway {
        &self.cluster_gateway
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.cluster_gateway.labels
    }

    pub fn addresses(&self) -> &[GatewayAddress] {
        &self.cluster_gateway.addresses
    }
}
