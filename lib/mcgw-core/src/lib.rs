//! Geo and weight resolution for multi-cluster Gateways
//!
//! This library provides:
//! - Label selector parsing and matching
//! - Geo code and weight resolution for each cluster gateway under a load balancing policy
//! - GatewayTarget aggregation with grouping by geo code and lookup by cluster
//! - Deterministic short codes for DNS-safe identifiers

pub mod cluster_gateway;
pub mod error;
pub mod resolver;
pub mod selector;
pub mod short_code;
pub mod target;

pub use cluster_gateway::{AddressType, ClusterGateway, GatewayAddress};
pub use error::{CoreError, Result, SelectorError};
pub use resolver::Resolver;
pub use selector::Selector;
pub use short_code::{to_base36_hash, to_base36_hash_len, SHORT_CODE_LEN};
pub use target::{ClusterGatewayTarget, GatewayRef, GatewayTarget};
