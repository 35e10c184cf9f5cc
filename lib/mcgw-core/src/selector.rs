//! Label selector matching
//!
//! Kubernetes `LabelSelector` values are parsed into a [`Selector`], a list of
//! validated requirements that can be evaluated against any label set without
//! talking to a cluster.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use regex::Regex;

use crate::error::SelectorError;

const MAX_NAME_LEN: usize = 63;
const MAX_PREFIX_LEN: usize = 253;
const MAX_VALUE_LEN: usize = 63;

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").unwrap());

static PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap()
});

static VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$").unwrap());

/// Relationship between a label and a requirement's values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// Label must be present with the single given value
    Equals,
    /// Label must be present with one of the values
    In,
    /// Label must be absent or have none of the values
    NotIn,
    /// Label must be present, value ignored
    Exists,
    /// Label must be absent
    DoesNotExist,
}

impl Operator {
    /// Parse a `matchExpressions` operator
    pub fn parse(operator: &str) -> Result<Self, SelectorError> {
        match operator {
            "In" => Ok(Self::In),
            "NotIn" => Ok(Self::NotIn),
            "Exists" => Ok(Self::Exists),
            "DoesNotExist" => Ok(Self::DoesNotExist),
            other => Err(SelectorError::InvalidOperator(other.to_string())),
        }
    }
}

/// A single validated selector requirement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    pub fn new(
        key: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = String>,
    ) -> Result<Self, SelectorError> {
        let key = key.into();
        validate_key(&key)?;

        let values: BTreeSet<String> = values.into_iter().collect();
        match operator {
            Operator::Equals if values.len() != 1 => {
                return Err(SelectorError::InvalidValue {
                    key,
                    value: values.into_iter().collect::<Vec<_>>().join(","),
                    message: "exactly one value is required".to_string(),
                });
            }
            Operator::In | Operator::NotIn if values.is_empty() => {
                return Err(SelectorError::MissingValues(key));
            }
            Operator::Exists | Operator::DoesNotExist if !values.is_empty() => {
                return Err(SelectorError::UnexpectedValues(key));
            }
            _ => {}
        }

        for value in &values {
            validate_value(&key, value)?;
        }

        Ok(Self {
            key,
            operator,
            values,
        })
    }

    /// Check if a label set satisfies this requirement
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Equals | Operator::In => value.is_some_and(|v| self.values.contains(v)),
            Operator::NotIn => value.map_or(true, |v| !self.values.contains(v)),
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = || self.values.iter().cloned().collect::<Vec<_>>().join(",");
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.key, values()),
            Operator::In => write!(f, "{} in ({})", self.key, values()),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, values()),
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
        }
    }
}

/// A parsed label selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Matches no label set
    Nothing,
    /// Matches label sets satisfying every requirement; empty matches everything
    Requirements(Vec<Requirement>),
}

impl Selector {
    pub fn everything() -> Self {
        Self::Requirements(Vec::new())
    }

    /// Parse a Kubernetes label selector.
    ///
    /// A missing selector selects nothing, an empty one selects everything.
    pub fn from_label_selector(selector: Option<&LabelSelector>) -> Result<Self, SelectorError> {
        let Some(selector) = selector else {
            return Ok(Self::Nothing);
        };

        let mut requirements = Vec::new();
        for (key, value) in selector.match_labels.iter().flatten() {
            requirements.push(Requirement::new(
                key.clone(),
                Operator::Equals,
                [value.clone()],
            )?);
        }
        for expr in selector.match_expressions.iter().flatten() {
            let operator = Operator::parse(&expr.operator)?;
            requirements.push(Requirement::new(
                expr.key.clone(),
                operator,
                expr.values.iter().flatten().cloned(),
            )?);
        }
        requirements.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(Self::Requirements(requirements))
    }

    /// Check if a label set matches this selector
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            Self::Nothing => false,
            Self::Requirements(requirements) => requirements.iter().all(|r| r.matches(labels)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => f.write_str("<none>"),
            Self::Requirements(requirements) => {
                let parts: Vec<String> = requirements.iter().map(|r| r.to_string()).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// Render a selector as written, whether or not it parses
pub fn describe_label_selector(selector: Option<&LabelSelector>) -> String {
    let Some(selector) = selector else {
        return "<none>".to_string();
    };

    let mut parts: Vec<String> = selector
        .match_labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    for expr in selector.match_expressions.iter().flatten() {
        match expr.values.as_deref() {
            Some(values) if !values.is_empty() => {
                parts.push(format!("{} {} ({})", expr.key, expr.operator, values.join(",")))
            }
            _ => parts.push(format!("{} {}", expr.key, expr.operator)),
        }
    }
    parts.join(",")
}

fn validate_key(key: &str) -> Result<(), SelectorError> {
    let invalid = |message: &str| SelectorError::InvalidKey {
        key: key.to_string(),
        message: message.to_string(),
    };

    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            if prefix.is_empty() {
                return Err(invalid("prefix part must be non-empty"));
            }
            if prefix.len() > MAX_PREFIX_LEN {
                return Err(invalid("prefix part must be no more than 253 characters"));
            }
            if !PREFIX_REGEX.is_match(prefix) {
                return Err(invalid("prefix part must be a lowercase DNS-1123 subdomain"));
            }
            name
        }
        None => key,
    };

    if name.is_empty() {
        return Err(invalid("name part must be non-empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name part must be no more than 63 characters"));
    }
    if !NAME_REGEX.is_match(name) {
        return Err(invalid(
            "name part must consist of alphanumeric characters, '-', '_' or '.', \
             and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> Result<(), SelectorError> {
    let invalid = |message: &str| SelectorError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    };

    if value.len() > MAX_VALUE_LEN {
        return Err(invalid("must be no more than 63 characters"));
    }
    if !VALUE_REGEX.is_match(value) {
        return Err(invalid(
            "must be empty or consist of alphanumeric characters, '-', '_' or '.', \
             and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}
