use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::load_balancing::LoadBalancingSpec;

/// DNSPolicy configures how DNS records are published for a Gateway that is
/// placed on multiple clusters
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "kuadrant.io",
    version = "v1alpha1",
    kind = "DNSPolicy",
    plural = "dnspolicies",
    namespaced,
    derive = "Default",
    status = "DNSPolicyStatus",
    printcolumn = r#"{"name":"Target","type":"string","jsonPath":".spec.targetRef.name"}"#,
)]
#[serde(rename_all = "camelCase")]
pub struct DNSPolicySpec {
    /// The Gateway this policy applies to
    pub target_ref: PolicyTargetReference,

    /// Geo and weight assignment for the Gateway's cluster gateways
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing: Option<LoadBalancingSpec>,
}

/// Reference to the resource a policy is attached to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTargetReference {
    #[serde(default = "default_target_group")]
    pub group: String,

    #[serde(default = "default_target_kind")]
    pub kind: String,

    pub name: String,

    /// Namespace of the target, defaults to the policy's namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Default for PolicyTargetReference {
    fn default() -> Self {
        Self {
            group: default_target_group(),
            kind: default_target_kind(),
            name: String::new(),
            namespace: None,
        }
    }
}

/// Status of a DNSPolicy
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DNSPolicyStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// Condition for DNSPolicy status
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    #[serde(rename = "type")]
    pub condition_type: String,

    /// Status: "True", "False", "Unknown"
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_target_group() -> String {
    "gateway.networking.k8s.io".to_string()
}

fn default_target_kind() -> String {
    "Gateway".to_string()
}
