//! Detection policy evaluator
//!
//! Turns a raw candidate string into a final address or a typed rejection.
//! Validation is stack-specific: an IPv6 literal handed to a v4-configured
//! detector is rejected here rather than silently accepted.

use crate::addr;
use crate::config::{LocalAddressPolicy, NetworkStack};
use crate::error::{Error, Result};

/// Evaluate a raw candidate against the selected stack and local-address
/// policy, returning the validated literal on success.
pub fn evaluate(
    candidate: &str,
    stack: NetworkStack,
    policy: LocalAddressPolicy,
) -> Result<String> {
    let valid = match stack {
        NetworkStack::V4 => addr::is_valid_v4(candidate),
        NetworkStack::V6 => addr::is_valid_v6(candidate),
    };
    if !valid {
        return Err(Error::invalid_address(candidate));
    }

    if addr::is_private(candidate) && policy == LocalAddressPolicy::Ignore {
        return Err(Error::local_address_rejected(candidate, stack));
    }

    Ok(candidate.to_owned())
}
