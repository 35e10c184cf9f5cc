//! API types for multi-cluster Gateway load balancing
//!
//! This library defines:
//! - LoadBalancingSpec: default geo, default weight and label-selector weight overrides
//! - DNSPolicy: the custom resource that attaches a LoadBalancingSpec to a Gateway
//! - Well-known constants shared with deployed policy objects

pub mod v1alpha1;

pub use v1alpha1::{
    CustomWeight, DNSPolicy, GeoCode, LoadBalancingGeo, LoadBalancingSpec, LoadBalancingWeighted,
};
