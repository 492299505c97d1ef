//! Detection specification types
//!
//! These are the typed parameters the engine operates on. Loading and merging
//! configuration files is the job of an external collaborator; this module
//! only defines the wire shape (serde) and the variant/sub-spec pairing
//! rules a valid specification must satisfy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// IP address family a detection run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkStack {
    /// IPv4
    #[serde(rename = "IPv4")]
    V4,
    /// IPv6
    #[serde(rename = "IPv6")]
    V6,
}

/// Policy governing private/local-scope candidates
///
/// Defaults to `Ignore` so a misconfigured endpoint can never accidentally
/// publish a private address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalAddressPolicy {
    /// Fail detection when the candidate is a private/local address
    #[default]
    Ignore,
    /// Accept a private/local candidate
    Allow,
    /// Accept a private/local candidate, preferring it over public ones
    /// (precedence between multiple candidates is the caller's concern)
    Prefer,
}

/// Detector variant selected by a detection spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionKind {
    /// Read the address from a local network interface
    Interface,
    /// Query a third-party HTTP service
    ThirdParty,
}

impl DetectionKind {
    /// Stable registry name for this variant
    pub fn name(&self) -> &'static str {
        match self {
            DetectionKind::Interface => "interface",
            DetectionKind::ThirdParty => "third_party",
        }
    }
}

/// Interface-based detection parameters
///
/// The interface detector itself lives outside this workspace; the type
/// exists so specs round-trip and the registry can dispatch to an externally
/// registered factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    /// Name of the interface to inspect (e.g. "eth0")
    pub name: String,
}

/// Third-party HTTP service detection parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyServiceSpec {
    /// Endpoint URL
    pub url: String,

    /// Query expression locating the address inside a JSON response
    #[serde(default, rename = "jsonPath", skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,

    /// Query-string parameters appended to the URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,

    /// Headers attached to the request
    #[serde(default, rename = "customHeaders", skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// HTTP basic-auth username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// HTTP basic-auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Declarative description of how to obtain a candidate address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSpec {
    /// Detector variant to use
    #[serde(rename = "type")]
    pub kind: DetectionKind,

    /// Treatment of private/local-scope candidates; `Ignore` when absent
    #[serde(
        default,
        rename = "localAddressPolicy",
        skip_serializing_if = "Option::is_none"
    )]
    pub local_address_policy: Option<LocalAddressPolicy>,

    /// Interface parameters, present iff `kind == Interface`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<InterfaceSpec>,

    /// Third-party service parameters, present iff `kind == ThirdParty`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ThirdPartyServiceSpec>,
}

impl DetectionSpec {
    /// Local-address policy with the conservative default applied
    pub fn policy(&self) -> LocalAddressPolicy {
        self.local_address_policy.unwrap_or_default()
    }

    /// Validate the variant/sub-spec pairing
    ///
    /// A spec whose `kind` does not match the sub-spec it carries is a
    /// configuration error, never a runtime detection error.
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self.kind {
            DetectionKind::Interface => {
                let iface = self.interface.as_ref().ok_or_else(|| {
                    crate::Error::config("interface detection requires an `interface` section")
                })?;
                if iface.name.is_empty() {
                    return Err(crate::Error::config("interface name cannot be empty"));
                }
            }
            DetectionKind::ThirdParty => {
                let api = self.api.as_ref().ok_or_else(|| {
                    crate::Error::config("third-party detection requires an `api` section")
                })?;
                if api.url.is_empty() {
                    return Err(crate::Error::config(
                        "third-party service URL cannot be empty",
                    ));
                }
            }
        }
        Ok(())
    }
}
