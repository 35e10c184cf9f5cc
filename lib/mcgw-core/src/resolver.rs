//! Geo code and weight resolution for cluster gateways

use mcgw_api::v1alpha1::{
    CustomWeight, GeoCode, LoadBalancingSpec, DEFAULT_WEIGHT, LABEL_LB_ATTRIBUTE_GEO_CODE,
};
use tracing::debug;

use crate::selector::{describe_label_selector, Selector};
use crate::{ClusterGateway, CoreError, Result};

/// Geo code applied when no label overrides it
pub fn default_geo(load_balancing: Option<&LoadBalancingSpec>) -> GeoCode {
    load_balancing
        .and_then(|lb| lb.geo.as_ref())
        .map(|geo| GeoCode::new(geo.default_geo.clone()))
        .unwrap_or_default()
}

/// Weight applied when no custom weight matches
pub fn default_weight(load_balancing: Option<&LoadBalancingSpec>) -> u32 {
    load_balancing
        .and_then(|lb| lb.weighted.as_ref())
        .map(|weighted| weighted.default_weight)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Resolves the effective geo code and weight of cluster gateways under one policy
#[derive(Clone, Debug)]
pub struct Resolver<'a> {
    gateway: String,
    default_geo: GeoCode,
    default_weight: u32,
    custom_weights: &'a [CustomWeight],
}

impl<'a> Resolver<'a> {
    /// Create a resolver for the Gateway named `gateway`
    pub fn new(gateway: impl Into<String>, load_balancing: Option<&'a LoadBalancingSpec>) -> Self {
        Self {
            gateway: gateway.into(),
            default_geo: default_geo(load_balancing),
            default_weight: default_weight(load_balancing),
            custom_weights: load_balancing
                .map(LoadBalancingSpec::custom_weights)
                .unwrap_or_default(),
        }
    }

    pub fn default_geo(&self) -> &GeoCode {
        &self.default_geo
    }

    pub fn default_weight(&self) -> u32 {
        self.default_weight
    }

    /// Geo code for a cluster gateway.
    ///
    /// The geo code label is only consulted when the policy sets a default geo
    /// other than the system default.
    pub fn resolve_geo(&self, cluster_gateway: &ClusterGateway) -> GeoCode {
        if self.default_geo.is_default_code() {
            return self.default_geo.clone();
        }

        match cluster_gateway.labels.get(LABEL_LB_ATTRIBUTE_GEO_CODE) {
            Some(code) => {
                debug!(
                    "Cluster gateway {} overrides geo {} with {}",
                    cluster_gateway.cluster_name, self.default_geo, code
                );
                GeoCode::new(code.clone())
            }
            None => self.default_geo.clone(),
        }
    }

    /// Weight for a cluster gateway: the first matching custom weight, else the default.
    ///
    /// Selectors are parsed as they are reached, so one after the first match
    /// is never inspected.
    pub fn resolve_weight(&self, cluster_gateway: &ClusterGateway) -> Result<u32> {
        for (index, custom) in self.custom_weights.iter().enumerate() {
            let selector = Selector::from_label_selector(custom.selector.as_ref()).map_err(
                |source| CoreError::InvalidSelector {
                    gateway: self.gateway.clone(),
                    index,
                    selector: describe_label_selector(custom.selector.as_ref()),
                    source,
                },
            )?;

            if selector.matches(&cluster_gateway.labels) {
                debug!(
                    "Cluster gateway {} matched custom weight {} ({}): weight {}",
                    cluster_gateway.cluster_name, index, selector, custom.weight
                );
                return Ok(custom.weight);
            }
        }

        Ok(self.default_weight)
    }
}
