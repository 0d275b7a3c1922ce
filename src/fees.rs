// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pure fee arithmetic for the two supported fee models.
//!
//! EVM chains price execution as `gas_used × gas_price`, with the gas price
//! quoted in wei (18-decimal smallest unit). Solana prices execution as a
//! flat base fee per signature plus a priority rate bid per compute unit,
//! both quoted in lamports (9-decimal smallest unit).
//!
//! Gas prices arrive as decimal integer strings because wei values overflow
//! the exact range of `f64` (2^53). Scaling down by 10^18 happens on the
//! integer representation via [`U256`] before any float conversion, so large
//! gas prices keep their precision.
//!
//! All functions are total: malformed input produces `0.0`, never a panic.
//! Callers exclude failed fetches (placeholder `"0"` payloads) upstream.

use std::str::FromStr;

use alloy::primitives::U256;

/// Decimals of the native currency on EVM chains (wei per ETH).
pub const EVM_NATIVE_DECIMALS: u32 = 18;

/// Micro-lamports per lamport (Solana priority fees are quoted per CU in
/// micro-lamports).
const MICRO_LAMPORTS_PER_LAMPORT: f64 = 1e6;

/// Lamports per SOL.
const LAMPORTS_PER_SOL: f64 = 1e9;

/// Convert a smallest-unit decimal string into native units.
///
/// The division by `10^decimals` is performed as an integer divmod with the
/// fractional part rendered as a zero-padded decimal string, so the only
/// rounding happens in the final `f64` parse.
pub fn units_to_native(raw: &str, decimals: u32) -> f64 {
    let Ok(value) = U256::from_str(raw) else {
        return 0.0;
    };
    if value.is_zero() {
        return 0.0;
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let frac = value % divisor;
    let decimal_str = format!("{:0>width$}", frac, width = decimals as usize);

    format!("{whole}.{decimal_str}").parse().unwrap_or(0.0)
}

/// EVM: fee in native currency units (ETH, AVAX, ...).
pub fn native_fee_evm(gas_used: u64, gas_price_wei: &str) -> f64 {
    gas_used as f64 * units_to_native(gas_price_wei, EVM_NATIVE_DECIMALS)
}

/// EVM: fee in USD (native fee × native USD price).
pub fn usd_fee_evm(gas_used: u64, gas_price_wei: &str, native_usd: f64) -> f64 {
    native_fee_evm(gas_used, gas_price_wei) * native_usd
}

/// Solana: fee in SOL.
///
/// `total_lamports = base_fee + compute_units × priority_rate / 1e6`,
/// then scaled from lamports to SOL.
pub fn native_fee_solana(
    base_fee_lamports: u64,
    priority_micro_lamports_per_cu: f64,
    compute_units: u64,
) -> f64 {
    let total_lamports = base_fee_lamports as f64
        + (compute_units as f64 * priority_micro_lamports_per_cu) / MICRO_LAMPORTS_PER_LAMPORT;
    total_lamports / LAMPORTS_PER_SOL
}

/// Solana: fee in USD.
pub fn usd_fee_solana(
    base_fee_lamports: u64,
    priority_micro_lamports_per_cu: f64,
    compute_units: u64,
    sol_usd: f64,
) -> f64 {
    native_fee_solana(base_fee_lamports, priority_micro_lamports_per_cu, compute_units) * sol_usd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs().max(1e-12) * 1e-9;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn evm_native_fee_two_gwei_transfer() {
        // 21000 gas at 2 gwei = 4.2e-5 ETH
        assert_close(native_fee_evm(21_000, "2000000000"), 4.2e-5);
    }

    #[test]
    fn evm_usd_fee() {
        // 50000 gas at 1 gwei with ETH at $4000 = $0.20
        assert_close(usd_fee_evm(50_000, "1000000000", 4000.0), 0.2);
    }

    #[test]
    fn evm_fee_preserves_large_gas_price_precision() {
        // 10^20 + 1 wei: exceeds f64's exact integer range. The integer
        // scaling must see the full value before the float conversion.
        let native = units_to_native("100000000000000000001", EVM_NATIVE_DECIMALS);
        assert_close(native, 100.0);
        assert_close(native_fee_evm(1, "100000000000000000001"), 100.0);
    }

    #[test]
    fn evm_fee_zero_and_malformed_inputs() {
        assert_eq!(native_fee_evm(21_000, "0"), 0.0);
        assert_eq!(native_fee_evm(21_000, "not-a-number"), 0.0);
        assert_eq!(native_fee_evm(0, "2000000000"), 0.0);
    }

    #[test]
    fn solana_base_fee_only() {
        // 5000 lamports base, no priority = 0.000005 SOL
        assert_close(native_fee_solana(5_000, 0.0, 300), 0.000005);
    }

    #[test]
    fn solana_fee_with_priority() {
        // 5000 CU at 1000 micro-lamports/CU adds 5 lamports
        assert_close(native_fee_solana(5_000, 1000.0, 5_000), 0.000005005);
    }

    #[test]
    fn solana_usd_fee() {
        // (5000 + 5000*2000/1e6) lamports = 5010 lamports, at $200/SOL
        assert_close(usd_fee_solana(5_000, 2000.0, 5_000, 200.0), 0.001002);
    }

    #[test]
    fn units_to_native_handles_sub_unit_values() {
        assert_close(units_to_native("1", EVM_NATIVE_DECIMALS), 1e-18);
        assert_close(units_to_native("500000000000000000", EVM_NATIVE_DECIMALS), 0.5);
    }
}
