use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Geo code assigned to a cluster gateway when no policy says otherwise
pub const DEFAULT_GEO: &str = "default";

/// Weight assigned to a cluster gateway when no policy says otherwise
pub const DEFAULT_WEIGHT: u32 = 120;

/// Label on a cluster gateway that overrides the policy's default geo code
pub const LABEL_LB_ATTRIBUTE_GEO_CODE: &str = "kuadrant.io/lb-attribute-geo-code";

/// Geographic routing region of a cluster gateway
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct GeoCode(String);

impl GeoCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the system-wide default geo code
    pub fn is_default_code(&self) -> bool {
        self.0 == DEFAULT_GEO
    }
}

impl Default for GeoCode {
    fn default() -> Self {
        Self(DEFAULT_GEO.to_string())
    }
}

impl fmt::Display for GeoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeoCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for GeoCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Load balancing configuration for the DNS records of a multi-cluster Gateway
///
/// Either part may be omitted, in which case the system defaults
/// ([`DEFAULT_GEO`], [`DEFAULT_WEIGHT`]) apply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingSpec {
    /// Weighted routing between cluster gateways sharing a geo code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted: Option<LoadBalancingWeighted>,

    /// Geo routing configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<LoadBalancingGeo>,
}

impl LoadBalancingSpec {
    /// Custom weight overrides in source order, empty when weighting is not configured
    pub fn custom_weights(&self) -> &[CustomWeight] {
        self.weighted
            .as_ref()
            .map(|w| w.custom.as_slice())
            .unwrap_or_default()
    }
}

/// Weighted load balancing settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingWeighted {
    /// Weight applied to cluster gateways that match no custom weight
    #[serde(default = "default_weight")]
    pub default_weight: u32,

    /// Label selector based overrides, first match wins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomWeight>,
}

impl Default for LoadBalancingWeighted {
    fn default() -> Self {
        Self {
            default_weight: DEFAULT_WEIGHT,
            custom: Vec::new(),
        }
    }
}

/// Weight applied to cluster gateways whose labels match `selector`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomWeight {
    /// Label selector for cluster gateways. A missing selector matches nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,

    pub weight: u32,
}

/// Geo load balancing settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingGeo {
    /// Geo code used for cluster gateways without a geo code label.
    ///
    /// Per-gateway geo labels are only honoured once this differs from the
    /// system default geo code.
    #[schemars(length(min = 2))]
    pub default_geo: String,
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_code_default() {
        let geo = GeoCode::default();
        assert_eq!(geo.as_str(), DEFAULT_GEO);
        assert!(geo.is_default_code());
        assert!(!GeoCode::from("EU").is_default_code());
    }

    #[test]
    fn test_geo_code_is_case_sensitive() {
        assert!(!GeoCode::from("Default").is_default_code());
    }

    #[test]
    fn test_deserialize_full_spec() {
        let yaml = r#"
geo:
  defaultGeo: EU
weighted:
  defaultWeight: 100
  custom:
    - selector:
        matchLabels:
          tier: premium
      weight: 200
    - selector:
        matchExpressions:
          - key: region
            operator: In
            values: [us-east-1, us-west-2]
      weight: 50
"#;
        let spec: LoadBalancingSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.geo.as_ref().unwrap().default_geo, "EU");

        let weighted = spec.weighted.as_ref().unwrap();
        assert_eq!(weighted.default_weight, 100);
        assert_eq!(weighted.custom.len(), 2);
        assert_eq!(weighted.custom[0].weight, 200);

        let selector = weighted.custom[1].selector.as_ref().unwrap();
        let exprs = selector.match_expressions.as_ref().unwrap();
        assert_eq!(exprs[0].operator, "In");
        assert_eq!(spec.custom_weights().len(), 2);
    }

    #[test]
    fn test_default_weight_applied_when_omitted() {
        let spec: LoadBalancingSpec = serde_json::from_str(r#"{"weighted": {}}"#).unwrap();
        assert_eq!(spec.weighted.unwrap().default_weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result: Result<LoadBalancingSpec, _> =
            serde_json::from_str(r#"{"weighted": {"defaultWeight": -1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_spec_has_no_custom_weights() {
        let spec = LoadBalancingSpec::default();
        assert!(spec.geo.is_none());
        assert!(spec.custom_weights().is_empty());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let spec = LoadBalancingSpec {
            geo: Some(LoadBalancingGeo { default_geo: "US".to_string() }),
            weighted: None,
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json, serde_json::json!({"geo": {"defaultGeo": "US"}}));
    }
}
