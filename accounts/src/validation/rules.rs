//! Reusable field rules referenced from `#[validate(custom(...))]`.

use validator::ValidationError;

/// Validates a hardware address.
///
/// Requirements:
/// - Six octets of two hex digits each
/// - Octets separated by `:` or `-`, one separator style throughout
pub fn validate_mac_address(mac: &str) -> Result<(), ValidationError> {
    let separator = if mac.contains(':') { ':' } else { '-' };
    let octets: Vec<&str> = mac.split(separator).collect();

    if octets.len() != 6 {
        return Err(ValidationError::new("mac_address_invalid_length"));
    }

    let all_hex = octets
        .iter()
        .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()));
    if !all_hex {
        return Err(ValidationError::new("mac_address_invalid_characters"));
    }

    Ok(())
}
