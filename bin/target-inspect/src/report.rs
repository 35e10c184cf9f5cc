//! JSON report of a resolved GatewayTarget

use std::collections::BTreeMap;

use mcgw_core::{ClusterGatewayTarget, GatewayAddress, GatewayTarget};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport {
    pub name: String,
    pub short_code: String,
    pub default_geo: String,
    pub default_weight: u32,
    pub geos: BTreeMap<String, Vec<ClusterTargetReport>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTargetReport {
    pub cluster: String,
    pub short_code: String,
    pub weight: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<GatewayAddress>,
}

impl From<&ClusterGatewayTarget> for ClusterTargetReport {
    fn from(target: &ClusterGatewayTarget) -> Self {
        Self {
            cluster: target.name().to_string(),
            short_code: target.short_code(),
            weight: target.weight(),
            addresses: target.addresses().to_vec(),
        }
    }
}

impl From<&GatewayTarget> for TargetReport {
    fn from(target: &GatewayTarget) -> Self {
        let geos = target
            .group_targets_by_geo()
            .into_iter()
            .map(|(geo, members)| {
                let members = members.into_iter().map(ClusterTargetReport::from).collect();
                (geo.to_string(), members)
            })
            .collect();

        Self {
            name: target.name(),
            short_code: target.short_code(),
            default_geo: target.default_geo().to_string(),
            default_weight: target.default_weight(),
            geos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcgw_api::v1alpha1::{LoadBalancingGeo, LoadBalancingSpec, LABEL_LB_ATTRIBUTE_GEO_CODE};
    use mcgw_core::{ClusterGateway, GatewayRef};

    #[test]
    fn test_report_groups_by_geo() {
        let policy = LoadBalancingSpec {
            geo: Some(LoadBalancingGeo {
                default_geo: "EU".to_string(),
            }),
            weighted: None,
        };
        let gateways = vec![
            ClusterGateway::new("c1", "ingress", "prod-web")
                .with_label(LABEL_LB_ATTRIBUTE_GEO_CODE, "US")
                .with_address(GatewayAddress::hostname("c1.example.com")),
            ClusterGateway::new("c2", "ingress", "prod-web"),
        ];
        let target =
            GatewayTarget::new(GatewayRef::new("prod-web", "ingress"), gateways, Some(policy))
                .unwrap();

        let report = TargetReport::from(&target);
        assert_eq!(report.name, "prod-web-ingress");
        assert_eq!(report.default_geo, "EU");
        assert_eq!(report.geos.len(), 2);
        assert_eq!(report.geos["US"][0].cluster, "c1");
        assert_eq!(report.geos["EU"][0].cluster, "c2");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["shortCode"], serde_json::json!(target.short_code()));
        assert_eq!(json["geos"]["US"][0]["addresses"][0]["type"], "Hostname");
        assert!(json["geos"]["EU"][0].get("addresses").is_none());
    }
}
