//! Per-cluster instances of a multi-cluster Gateway
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Kind of address a cluster gateway is reachable on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    IPAddress,
    Hostname,
}

/// Address published in a cluster gateway's status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayAddress {
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub value: String,
}

impl GatewayAddress {
    pub fn ip(value: impl Into<String>) -> Self {
        Self {
            address_type: AddressType::IPAddress,
            value: value.into(),
        }
    }

    pub fn hostname(value: impl Into<String>) -> Self {
        Self {
            address_type: AddressType::Hostname,
            value: value.into(),
        }
    }
}

/// A Gateway discovered on one cluster
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterGateway {
    pub cluster_name: String,
    pub namespace: String,
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub addresses: Vec<GatewayAddress>,
}

impl ClusterGateway {
    pub fn new(
        cluster_name: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build from the metadata of the Gateway object found on `cluster_name`
    pub fn from_metadata(cluster_name: impl Into<String>, metadata: &ObjectMeta) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            namespace: metadata.namespace.clone().unwrap_or_default(),
            name: metadata.name.clone().unwrap_or_default(),
            labels: metadata.labels.clone().unwrap_or_default(),
            addresses: Vec::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_address(mut self, address: GatewayAddress) -> Self {
        self.addresses.push(address);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_metadata() {
        let metadata = ObjectMeta {
            name: Some("prod-web".to_string()),
            namespace: Some("ingress".to_string()),
            labels: Some(BTreeMap::from([("tier".to_string(), "premium".to_string())])),
            ..Default::default()
        };
        let cg = ClusterGateway::from_metadata("cluster-1", &metadata);
        assert_eq!(cg.cluster_name, "cluster-1");
        assert_eq!(cg.namespace, "ingress");
        assert_eq!(cg.name, "prod-web");
        assert_eq!(cg.labels.get("tier").map(String::as_str), Some("premium"));
        assert!(cg.addresses.is_empty());
    }

    #[test]
    fn test_from_metadata_without_labels() {
        let cg = ClusterGateway::from_metadata("cluster-1", &ObjectMeta::default());
        assert!(cg.labels.is_empty());
        assert_eq!(cg.name, "");
    }

    #[test]
    fn test_address_serialization() {
        let json = serde_json::to_value(GatewayAddress::hostname("gw.example.com")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Hostname", "value": "gw.example.com"})
        );
    }
}
