//! 256-bit intermediates for u128 amount math
//!
//! The product of two u128 amounts always fits in 256 bits, so `a * b / c`
//! is exact as long as the quotient fits back into u128. Products of three
//! factors go through [`U512`].

pub use ethereum_types::{U256, U512};

/// `floor(a * b / denominator)`, `None` on a zero denominator or a quotient
/// wider than u128
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(denominator))
}

/// `ceil(a * b / denominator)`, `None` on a zero denominator or a quotient
/// wider than u128
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from(a) * U256::from(b);
    let (quotient, remainder) = product.div_mod(U256::from(denominator));
    let quotient = narrow(quotient)?;
    if remainder.is_zero() {
        Some(quotient)
    } else {
        quotient.checked_add(1)
    }
}

/// `floor(a * b / denominator)` for 256-bit factors, `None` on a zero
/// denominator or a quotient wider than u128
pub fn wide_mul_div_floor(a: U256, b: U256, denominator: U256) -> Option<u128> {
    if denominator.is_zero() {
        return None;
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    if quotient.bits() > 128 {
        None
    } else {
        Some(quotient.low_u128())
    }
}

/// Narrow a 256-bit value back to u128
pub fn narrow(value: U256) -> Option<u128> {
    if value.bits() > 128 {
        None
    } else {
        Some(value.low_u128())
    }
}
