use pnet::util::MacAddr;

use crate::wake::WakeError;

const HEX_LEN: usize = 12;
const SEPARATED_LEN: usize = 17;

/// Validates and canonicalizes a MAC address string into a [`MacAddr`].
///
/// Two shapes are accepted: 12 contiguous hex digits ("00CAFEBABE00"), or six
/// hex pairs joined by a single repeated separator character
/// ("00:CA:FE:BA:BE:00", "00-ca-fe-ba-be-00", ...). The separator is inferred
/// from position 2 and must recur at every pair boundary. Anything else fails
/// with [`WakeError::InvalidAddressFormat`] carrying the unmodified input.
pub fn normalize(input: &str) -> Result<MacAddr, WakeError> {
    let invalid = || WakeError::InvalidAddressFormat(input.to_string());

    let digits = strip_separator(input).ok_or_else(invalid)?;
    if digits.len() != HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let mut octets = [0u8; 6];
    for (octet, pair) in octets.iter_mut().zip(digits.as_bytes().chunks_exact(2)) {
        // chunks are guaranteed ASCII hex at this point
        let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
        *octet = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
    }

    Ok(MacAddr::new(
        octets[0], octets[1], octets[2], octets[3], octets[4], octets[5],
    ))
}

/// Reduces the input to its 12 hex digits, or None if it matches neither
/// accepted shape.
fn strip_separator(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    match bytes.len() {
        HEX_LEN => Some(input.to_string()),
        SEPARATED_LEN => {
            let sep = bytes[2];
            if sep.is_ascii_hexdigit() {
                return None;
            }

            let mut digits = String::with_capacity(HEX_LEN);
            for (i, &b) in bytes.iter().enumerate() {
                if i % 3 == 2 {
                    if b != sep {
                        return None;
                    }
                } else {
                    digits.push(b as char);
                }
            }
            Some(digits)
        }
        _ => None,
    }
}
