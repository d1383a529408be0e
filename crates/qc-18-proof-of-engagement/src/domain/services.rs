//! # Domain Services
//!
//! Pure functions used by the orchestrator and the init-message builders.
//! Deterministic, no I/O, no async.

use crate::domain::value_objects::{Address, CodeId, Decimal, InstanceId};
use crate::errors::{PoeError, PoeResult};
use sha3::{Digest, Keccak256};
use std::time::Duration;

// =============================================================================
// CONTRACT ADDRESS DERIVATION
// =============================================================================

/// Domain tag mixed into every derived contract address.
const CONTRACT_ADDRESS_TAG: &[u8] = b"poe/contract";

/// Derives a contract address from the code and instance sequence numbers.
///
/// Address = keccak256(tag ++ `be64(code_id)` ++ `be64(instance_id)`)\[12:\]
///
/// The derivation depends only on the two counters, so the address of a
/// future instantiation can be computed before it happens.
#[must_use]
pub fn contract_address(code_id: CodeId, instance_id: InstanceId) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(CONTRACT_ADDRESS_TAG);
    hasher.update(code_id.to_be_bytes());
    hasher.update(instance_id.to_be_bytes());
    let hash = hasher.finalize();

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}

// =============================================================================
// NUMERIC CONVERSIONS
// =============================================================================

/// Converts a percentage in `[0, 100]` into a ratio in `[0, 1]`.
///
/// The division is carried out on the 18-decimal atomics. Digits that fall
/// below that precision are floored.
///
/// # Errors
///
/// `InvalidConfig` if the percentage exceeds 100.
pub fn ratio_from_percentage(percentage: Decimal) -> PoeResult<Decimal> {
    if percentage > Decimal::percent(10_000) {
        return Err(PoeError::InvalidConfig(format!(
            "percentage {percentage} exceeds 100"
        )));
    }
    Ok(Decimal::raw(percentage.atomics().u128() / 100))
}

/// Whole seconds of a duration, truncating any fraction.
#[must_use]
pub fn duration_to_seconds(duration: Duration) -> u64 {
    duration.as_secs()
}

// =============================================================================
// WEIGHT MIXING
// =============================================================================

/// Integer square root (floor).
#[must_use]
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton iteration from an upper bound.
    let mut x = 1u128 << (128 - n.leading_zeros()).div_ceil(2);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Geometric mean of two group weights, floored.
#[must_use]
pub fn geometric_mean(left: u64, right: u64) -> u64 {
    let product = u128::from(left) * u128::from(right);
    // sqrt of a product of two u64 always fits in u64.
    u64::try_from(isqrt(product)).unwrap_or(u64::MAX)
}

// =============================================================================
// TESTS
// =============================================================================
