//! Boot policy for a persisted token

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How [`Session::initialize`](super::Session::initialize) treats a token
/// found in storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootPolicy {
    /// Confirm the token against the profile endpoint
    #[default]
    Validate,
    /// Token presence alone means authenticated
    TrustToken,
}

impl fmt::Display for BootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootPolicy::Validate => f.write_str("validate"),
            BootPolicy::TrustToken => f.write_str("trust_token"),
        }
    }
}

impl FromStr for BootPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "validate" => Ok(BootPolicy::Validate),
            "trust_token" | "trust" => Ok(BootPolicy::TrustToken),
            other => Err(format!(
                "unknown boot policy '{}', expected 'validate' or 'trust_token'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("validate".parse::<BootPolicy>().unwrap(), BootPolicy::Validate);
        assert_eq!("trust-token".parse::<BootPolicy>().unwrap(), BootPolicy::TrustToken);
        assert_eq!(" TRUST_TOKEN ".parse::<BootPolicy>().unwrap(), BootPolicy::TrustToken);
        assert!("sometimes".parse::<BootPolicy>().is_err());
    }

    #[test]
    fn test_display_matches_config_names() {
        for policy in [BootPolicy::Validate, BootPolicy::TrustToken] {
            assert_eq!(policy.to_string().parse::<BootPolicy>().unwrap(), policy);
        }
    }
}
