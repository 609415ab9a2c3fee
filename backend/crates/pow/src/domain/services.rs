//! Domain Services
//!
//! Pure Hashcash logic: minting, mining and verifying headers.

use platform::crypto::{random_bytes, sha256};
use rand::Rng;

use crate::domain::header::{Header, RANDOM_LEN};
use crate::error::{PowError, PowResult};

/// Width of the SHA-256 digest in bits
pub const DIGEST_BITS: u32 = 256;

/// Mints a serialized challenge for `(bits, resource)`
pub type ChallengeFn = fn(u32, &str) -> PowResult<String>;

/// Checks a serialized result against a serialized challenge
pub type VerifyFn = fn(&str, &str) -> PowResult<bool>;

/// Count leading zero bits in a digest
pub fn leading_zero_bits(digest: &[u8]) -> u32 {
    let mut count = 0;
    for &byte in digest {
        if byte == 0 {
            count += 8;
        } else {
            count += byte.leading_zeros();
            break;
        }
    }
    count
}

/// Whether the top `bits` bits of `digest` are zero
///
/// Only the first `bits / 8` bytes and, when `bits % 8 > 0`, the byte right
/// after them are inspected. A digest too short to hold `bits` fails.
pub fn has_leading_zero_bits(digest: &[u8], bits: u32) -> bool {
    let whole = (bits / 8) as usize;
    let rest = bits % 8;

    let Some(prefix) = digest.get(..whole) else {
        return false;
    };
    if prefix.iter().any(|&b| b != 0) {
        return false;
    }
    if rest == 0 {
        return true;
    }
    digest.get(whole).is_some_and(|&b| b < (1u8 << (8 - rest)))
}

/// SHA-256 of the serialized header
pub fn header_digest(header: &Header) -> [u8; 32] {
    sha256(header.to_string().as_bytes())
}

/// Create a fresh challenge header string
///
/// Fails only when the OS random source is unavailable.
pub fn challenge(bits: u32, resource: &str) -> PowResult<String> {
    let random = random_bytes(RANDOM_LEN)?;
    let counter = rand::rng().random::<i64>();
    Ok(Header::new(bits, resource, &random, counter).to_string())
}

/// Mine a result for `header`
///
/// CPU-bound and blind to cancellation; run it where it can be abandoned.
/// The counter wraps around at the end of the `i64` range.
pub fn calculate(header: &str) -> PowResult<String> {
    let mut header = Header::parse(header)?;
    if header.bits > DIGEST_BITS {
        return Err(PowError::UnsatisfiableBits(header.bits));
    }

    loop {
        let candidate = header.to_string();
        if has_leading_zero_bits(&sha256(candidate.as_bytes()), header.bits) {
            return Ok(candidate);
        }
        header.counter = header.counter.wrapping_add(1);
    }
}

/// Verify a calculated header against the challenge it claims to answer
///
/// An insufficient digest is `Ok(false)`, not an error.
pub fn verify(calculated: &str, challenge: &str) -> PowResult<bool> {
    let calculated = Header::parse(calculated).map_err(PowError::CalculatedHeader)?;
    let challenge = Header::parse(challenge).map_err(PowError::ChallengeHeader)?;

    if !calculated.same_challenge(&challenge) {
        return Err(PowError::ChallengeMismatch);
    }

    let digest = header_digest(&calculated);
    let valid = has_leading_zero_bits(&digest, calculated.bits);
    if !valid {
        tracing::debug!(
            zero_bits = leading_zero_bits(&digest),
            required = calculated.bits,
            "digest below target"
        );
    }
    Ok(valid)
}
