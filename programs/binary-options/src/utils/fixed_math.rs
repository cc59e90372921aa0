//! 18-decimal unsigned fixed point.
//!
//! Every monetary amount, price and fee fraction is a `u128` scaled by
//! `UNIT` (10^18). Rounding is half-up on the 19th decimal.

use anchor_lang::prelude::*;

use crate::constants::UNIT;
use crate::errors::BinaryOptionError;

pub fn add(a: u128, b: u128) -> Result<u128> {
    Ok(a.checked_add(b).ok_or(BinaryOptionError::ArithmeticOverflow)?)
}

pub fn sub(a: u128, b: u128) -> Result<u128> {
    Ok(a.checked_sub(b).ok_or(BinaryOptionError::ArithmeticUnderflow)?)
}

/// a × b / UNIT, rounded half-up.
pub fn multiply_round(a: u128, b: u128) -> Result<u128> {
    mul_div_round(a, b, UNIT)
}

/// a × UNIT / b, rounded half-up.
pub fn divide_round(a: u128, b: u128) -> Result<u128> {
    require!(b != 0, BinaryOptionError::DivisionByZero);
    mul_div_round(a, UNIT, b)
}

/// a × UNIT / b, truncated. Used for limit checks where rounding up would
/// let a bid slip past the bound.
pub fn divide_decimal(a: u128, b: u128) -> Result<u128> {
    require!(b != 0, BinaryOptionError::DivisionByZero);
    let (quotient, _) = mul_div(a, UNIT, b)?;
    Ok(quotient)
}

fn mul_div_round(a: u128, b: u128, denominator: u128) -> Result<u128> {
    let (quotient, remainder) = mul_div(a, b, denominator)?;
    // remainder / denominator >= 0.5 without doubling the remainder
    if remainder >= denominator - remainder {
        add(quotient, 1)
    } else {
        Ok(quotient)
    }
}

/// `(a × b / denominator, a × b % denominator)` with a 256-bit intermediate,
/// so large deposits can be scaled by `UNIT` without overflowing.
fn mul_div(a: u128, b: u128, denominator: u128) -> Result<(u128, u128)> {
    require!(denominator != 0, BinaryOptionError::DivisionByZero);

    let (hi, lo) = widening_mul(a, b);
    require!(hi < denominator, BinaryOptionError::ArithmeticOverflow);

    // Binary long division of hi:lo; the quotient fits since hi < denominator.
    let mut remainder = hi;
    let mut quotient = 0u128;
    for bit in (0..128).rev() {
        let carry = remainder >> 127;
        remainder = (remainder << 1) | ((lo >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient |= 1;
        }
    }
    Ok((quotient, remainder))
}

/// Full 256-bit product as `(high, low)` halves.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const LOW: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & LOW);
    let (b_hi, b_lo) = (b >> 64, b & LOW);

    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    let middle = (lo_lo >> 64) + (lo_hi & LOW) + (hi_lo & LOW);
    let low = (lo_lo & LOW) | (middle << 64);
    let high = hi_hi + (lo_hi >> 64) + (hi_lo >> 64) + (middle >> 64);
    (high, low)
}

/// Whole units expressed in fixed point, e.g. `units(5)` is 5.0.
pub fn units(whole: u128) -> Result<u128> {
    Ok(whole
        .checked_mul(UNIT)
        .ok_or(BinaryOptionError::ArithmeticOverflow)?)
}
