//! Scope entry domain model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirgateError;

/// Literal scope value matching every host.
pub const WILDCARD_HOST: &str = "*";

/// Longest host name accepted (RFC 1035 presentation form).
pub const MAX_HOST_LEN: usize = 253;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    #[serde(rename = "HOST")]
    Host,
}

impl ScopeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::Host => "HOST",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = DirgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOST" => Ok(ScopeType::Host),
            other => Err(DirgateError::Validation {
                message: format!("unknown scope type: {other}"),
            }),
        }
    }
}

/// A `(member_uid, scope_type, scope_value)` triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub member_uid: String,
    pub scope_type: ScopeType,
    pub scope_value: String,
}

/// Check that `host` is a plausible lowercase domain name, or the wildcard.
///
/// Matching is exact and case-sensitive, so upper-case input is rejected
/// here rather than silently never matching.
pub fn validate_host(host: &str) -> Result<(), DirgateError> {
    let invalid = || DirgateError::InvalidHost {
        host: host.to_string(),
    };

    if host == WILDCARD_HOST {
        return Ok(());
    }
    if host.is_empty() || host.len() > MAX_HOST_LEN {
        return Err(invalid());
    }

    for label in host.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(invalid());
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid());
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(invalid());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_nested_hosts() {
        assert!(validate_host("plnetwork.io").is_ok());
        assert!(validate_host("founders.plnetwork.io").is_ok());
        assert!(validate_host("enterprise.ai.plnetwork.io").is_ok());
        assert!(validate_host("localhost").is_ok());
        assert!(validate_host(WILDCARD_HOST).is_ok());
    }

    #[test]
    fn rejects_malformed_hosts() {
        for bad in [
            "",
            ".plnetwork.io",
            "plnetwork.io.",
            "pl..network.io",
            "-pl.io",
            "pl-.io",
            "PLNETWORK.io",
            "pl network.io",
            "https://plnetwork.io",
            "*.plnetwork.io",
        ] {
            match validate_host(bad) {
                Err(DirgateError::InvalidHost { host }) => assert_eq!(host, bad),
                other => panic!("{bad:?}: expected InvalidHost, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_overlong_hosts() {
        let label = "a".repeat(63);
        let host = [label.as_str(); 5].join(".");
        assert!(host.len() > MAX_HOST_LEN);
        assert!(validate_host(&host).is_err());
        assert!(validate_host(&"b".repeat(64)).is_err());
    }

    #[test]
    fn scope_type_parses_wire_form() {
        assert_eq!("HOST".parse::<ScopeType>().unwrap(), ScopeType::Host);
        assert!("host".parse::<ScopeType>().is_err());
    }
}
