use crate::algorithm::HmacAlgorithm;
use crate::error::{Error, Result};

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

macro_rules! compute_mac {
    ($digest:ty, $secret:expr, $input:expr) => {{
        let mut mac = Hmac::<$digest>::new_from_slice($secret)
            .map_err(|e| Error::ConfigurationInvalid(format!("HMAC key rejected: {e}")))?;
        mac.update($input);
        mac.finalize().into_bytes().to_vec()
    }};
}

/// Compute the HMAC of `signing_input` with the given digest
pub(crate) fn sign(algorithm: HmacAlgorithm, signing_input: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let signature = match algorithm {
        HmacAlgorithm::HS256 => compute_mac!(Sha256, secret, signing_input),
        HmacAlgorithm::HS384 => compute_mac!(Sha384, secret, signing_input),
        HmacAlgorithm::HS512 => compute_mac!(Sha512, secret, signing_input),
    };
    Ok(signature)
}

/// Verify an HMAC signature with constant-time comparison
///
/// A mismatch is a normal `false`, never an error.
pub(crate) fn verify(
    algorithm: HmacAlgorithm,
    signing_input: &[u8],
    signature: &[u8],
    secret: &[u8],
) -> bool {
    let Ok(expected_signature) = sign(algorithm, signing_input, secret) else {
        return false;
    };

    if signature.len() != expected_signature.len() {
        return false;
    }

    constant_time_eq(signature, &expected_signature)
}
