/// API version v1alpha1 for multi-cluster DNS load balancing

pub mod dns_policy;
pub mod load_balancing;

pub use dns_policy::{DNSPolicy, DNSPolicySpec, DNSPolicyStatus, PolicyTargetReference};
pub use load_balancing::{
    CustomWeight, GeoCode, LoadBalancingGeo, LoadBalancingSpec, LoadBalancingWeighted,
    DEFAULT_GEO, DEFAULT_WEIGHT, LABEL_LB_ATTRIBUTE_GEO_CODE,
};

/// API group for Kuadrant resources
pub const API_GROUP: &str = "kuadrant.io";
/// API version for Kuadrant resources
pub const API_VERSION: &str = "v1alpha1";
