//! Snapshot of a policy and the cluster gateways discovered for its Gateway

use std::path::Path;

use anyhow::{bail, Context, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use mcgw_api::v1alpha1::{DNSPolicy, LoadBalancingSpec};
use mcgw_core::{ClusterGateway, GatewayAddress, GatewayRef, GatewayTarget};
use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// DNSPolicy manifest carrying the load balancing configuration
    #[serde(default)]
    pub policy: Option<DNSPolicy>,

    /// Explicit Gateway identity, overrides the policy's targetRef
    #[serde(default)]
    pub gateway: Option<GatewayEntry>,

    #[serde(default)]
    pub cluster_gateways: Vec<ClusterGatewayEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GatewayEntry {
    pub name: String,
    pub namespace: String,
}

/// A Gateway object as found on one cluster
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGatewayEntry {
    pub cluster_name: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub addresses: Vec<GatewayAddress>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_yaml::from_str(raw)?;
        debug!(
            "Loaded snapshot with {} cluster gateways",
            snapshot.cluster_gateways.len()
        );
        Ok(snapshot)
    }

    /// The Gateway being resolved
    pub fn gateway_ref(&self) -> Result<GatewayRef> {
        if let Some(gateway) = &self.gateway {
            return Ok(GatewayRef::new(gateway.name.clone(), gateway.namespace.clone()));
        }
        match &self.policy {
            Some(policy) => Ok(GatewayRef::for_policy(policy)),
            None => bail!("snapshot names neither a gateway nor a policy"),
        }
    }

    pub fn load_balancing(&self) -> Option<LoadBalancingSpec> {
        self.policy
            .as_ref()
            .and_then(|p| p.spec.load_balancing.clone())
    }

    pub fn cluster_gateways(&self) -> Vec<ClusterGateway> {
        self.cluster_gateways
            .iter()
            .map(|entry| {
                let mut cg = ClusterGateway::from_metadata(entry.cluster_name.clone(), &entry.metadata);
                cg.addresses = entry.addresses.clone();
                cg
            })
            .collect()
    }

    /// Resolve the snapshot into a GatewayTarget
    pub fn build(&self) -> Result<GatewayTarget> {
        let gateway = self.gateway_ref()?;
        let name = format!("{}/{}", gateway.namespace, gateway.name);
        GatewayTarget::new(gateway, self.cluster_gateways(), self.load_balancing())
            .with_context(|| format!("resolving targets for gateway {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
policy:
  apiVersion: kuadrant.io/v1alpha1
  kind: DNSPolicy
  metadata:
    name: prod-web
    namespace: ingress
  spec:
    targetRef:
      name: prod-web
    loadBalancing:
      geo:
        defaultGeo: EU
      weighted:
        defaultWeight: 100
        custom:
          - selector:
              matchLabels:
                tier: premium
            weight: 200
clusterGateways:
  - clusterName: cluster-a
    metadata:
      name: prod-web
      namespace: ingress
      labels:
        kuadrant.io/lb-attribute-geo-code: US
        tier: premium
    addresses:
      - type: IPAddress
        value: 172.32.200.1
  - clusterName: cluster-b
    metadata:
      name: prod-web
      namespace: ingress
"#;

    #[test]
    fn test_parse_and_build() {
        let snapshot = Snapshot::parse(SNAPSHOT).unwrap();
        assert_eq!(snapshot.cluster_gateways.len(), 2);

        let target = snapshot.build().unwrap();
        assert_eq!(target.name(), "prod-web-ingress");

        let a = target.cluster_gateway_target("cluster-a").unwrap();
        assert_eq!(a.geo().as_str(), "US");
        assert_eq!(a.weight(), 200);
        assert_eq!(a.addresses(), &[GatewayAddress::ip("172.32.200.1")]);

        let b = target.cluster_gateway_target("cluster-b").unwrap();
        assert_eq!(b.geo().as_str(), "EU");
        assert_eq!(b.weight(), 100);
    }

    #[test]
    fn test_explicit_gateway_without_policy() {
        let snapshot = Snapshot::parse(
            r#"
gateway:
  name: web
  namespace: edge
clusterGateways:
  - clusterName: c1
    metadata:
      name: web
      namespace: edge
"#,
        )
        .unwrap();
        assert!(snapshot.load_balancing().is_none());

        let target = snapshot.build().unwrap();
        assert_eq!(target.name(), "web-edge");
        assert_eq!(target.targets()[0].weight(), mcgw_api::v1alpha1::DEFAULT_WEIGHT);
    }

    #[test]
    fn test_snapshot_without_gateway_or_policy() {
        let snapshot = Snapshot::parse("clusterGateways: []").unwrap();
        assert!(snapshot.build().is_err());
    }

    #[test]
    fn test_invalid_selector_reported() {
        let raw = SNAPSHOT.replace("matchLabels:\n                tier: premium", "matchExpressions:\n                - {key: tier, operator: Near}");
        let snapshot = Snapshot::parse(&raw).unwrap();
        let err = snapshot.build().unwrap_err();
        assert!(format!("{:#}", err).contains("not a valid label selector operator"));
    }
}
