//! Smooth bonding curve: y(x) = A - K / (C + x)
//!
//! - `A`: asymptotic maximum token supply
//! - `K`: curve scale constant (token * lamport on chain)
//! - `C`: virtual pool offset (lamports on chain)
//! - `x`: base asset deposited so far
//!
//! Two evaluation paths:
//! - exact integer math on [`SmoothBondingCurve`], matching the on-chain
//!   program, for anything that must agree with chain state;
//! - `f64` math on [`CurveParams`] for charts and display only. Converting
//!   the `u64`/`u128` parameters to `f64` is lossy.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{Error, Result};

/// Curve parameters as stored inside the XyberCore account (40 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize, BorshSerialize)]
pub struct SmoothBondingCurve {
    /// Asymptotic total token supply (raw token units)
    pub a_total_tokens: u64,
    /// Scale constant, full 128 bits
    pub k_virtual_pool_offset: u128,
    /// Virtual pool offset (base units)
    pub c_bonding_scale_factor: u64,
    /// Base asset deposited so far (base units)
    pub x_total_base_deposit: u64,
}

/// Result of an exact trade quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Tokens or base units, depending on the quote
    pub amount: u64,
    /// Pool deposit after the trade
    pub new_x: u64,
}

/// Exact marginal price `(C + x)^2 / K`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRatio {
    pub numerator: u128,
    pub denominator: u128,
}

impl PriceRatio {
    /// Lossy conversion for display
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl SmoothBondingCurve {
    /// Total minted tokens at deposit `x`, integer math:
    /// y(x) = A - floor(K / (C + x)), clamped at zero like the program does
    pub fn minted_at(&self, x: u64) -> Result<u64> {
        let denom = self
            .c_bonding_scale_factor
            .checked_add(x)
            .ok_or(Error::MathOverflow)?;
        if denom == 0 {
            return Err(Error::Domain("C + x must be non-zero".to_string()));
        }

        let k_over_denom = self.k_virtual_pool_offset / denom as u128;
        let minted = (self.a_total_tokens as u128).saturating_sub(k_over_denom);
        Ok(minted as u64)
    }

    /// Minted tokens at the deposit recorded in the account
    pub fn minted_now(&self) -> Result<u64> {
        self.minted_at(self.x_total_base_deposit)
    }

    /// Exact marginal price at deposit `x`
    pub fn marginal_price_at(&self, x: u64) -> Result<PriceRatio> {
        if self.k_virtual_pool_offset == 0 {
            return Err(Error::Domain("K must be non-zero".to_string()));
        }

        let denom = self.c_bonding_scale_factor as u128 + x as u128;
        if denom == 0 {
            return Err(Error::Domain("C + x must be non-zero".to_string()));
        }

        let numerator = denom.checked_mul(denom).ok_or(Error::MathOverflow)?;
        Ok(PriceRatio {
            numerator,
            denominator: self.k_virtual_pool_offset,
        })
    }

    /// Invert the curve: x' such that y(x') = new_y
    ///
    /// (C + x') = K / (A - new_y)  =>  x' = K / (A - new_y) - C
    fn solve_for_x(&self, new_y: u128) -> Result<u128> {
        let a = self.a_total_tokens as u128;
        if new_y >= a {
            return Err(Error::InsufficientTokenSupply);
        }

        let big_val = self
            .k_virtual_pool_offset
            .checked_div(a - new_y)
            .ok_or(Error::MathOverflow)?;

        big_val
            .checked_sub(self.c_bonding_scale_factor as u128)
            .ok_or(Error::MathOverflow)
    }

    /// Buy with exactly `base_in`; returns tokens minted
    pub fn buy_exact_input(&self, old_x: u64, base_in: u64) -> Result<Quote> {
        let new_x = old_x.checked_add(base_in).ok_or(Error::MathOverflow)?;

        let old_y = self.minted_at(old_x)?;
        let new_y = self.minted_at(new_x)?;
        let minted = new_y.checked_sub(old_y).ok_or(Error::MathOverflow)?;

        Ok(Quote {
            amount: minted,
            new_x,
        })
    }

    /// Buy exactly `tokens_out`; returns base required
    pub fn buy_exact_output(&self, old_x: u64, tokens_out: u64) -> Result<Quote> {
        let old_y = self.minted_at(old_x)?;
        let new_y = old_y.checked_add(tokens_out).ok_or(Error::MathOverflow)?;

        let x_prime = self.solve_for_x(new_y as u128)?;
        let base_in = x_prime
            .checked_sub(old_x as u128)
            .ok_or(Error::MathOverflow)?;

        Ok(Quote {
            amount: to_u64(base_in)?,
            new_x: to_u64(x_prime)?,
        })
    }

    /// Sell exactly `tokens_in`; returns base paid out
    pub fn sell_exact_input(&self, old_x: u64, tokens_in: u64) -> Result<Quote> {
        let old_y = self.minted_at(old_x)?;
        let new_y = old_y
            .checked_sub(tokens_in)
            .ok_or(Error::InsufficientTokenSupply)?;

        let x_prime = self.solve_for_x(new_y as u128)?;
        let base_out = (old_x as u128)
            .checked_sub(x_prime)
            .ok_or(Error::MathOverflow)?;

        Ok(Quote {
            amount: to_u64(base_out)?,
            new_x: to_u64(x_prime)?,
        })
    }

    /// Sell enough tokens to receive exactly `base_out`; returns tokens burned
    pub fn sell_exact_output(&self, old_x: u64, base_out: u64) -> Result<Quote> {
        let new_x = old_x
            .checked_sub(base_out)
            .ok_or(Error::InsufficientTokenSupply)?;

        let old_y = self.minted_at(old_x)?;
        let new_y = self.minted_at(new_x)?;
        let burned = old_y.checked_sub(new_y).ok_or(Error::MathOverflow)?;

        Ok(Quote {
            amount: burned,
            new_x,
        })
    }
}

fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::MathOverflow)
}

/// y(x) = A - K / (C + x)
pub fn cumulative_minted(x: f64, a: f64, k: f64, c: f64) -> Result<f64> {
    let denom = c + x;
    if denom == 0.0 {
        return Err(Error::Domain(format!("C + x == 0 (C={}, x={})", c, x)));
    }
    Ok(a - k / denom)
}

/// price(x) = (C + x)^2 / K
pub fn marginal_price(x: f64, k: f64, c: f64) -> Result<f64> {
    let denom = c + x;
    if denom == 0.0 {
        return Err(Error::Domain(format!("C + x == 0 (C={}, x={})", c, x)));
    }
    if k == 0.0 {
        return Err(Error::Domain("K == 0".to_string()));
    }
    Ok(denom * denom / k)
}

/// One evaluated point of the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub x: f64,
    pub minted: f64,
    pub price: f64,
}

/// Floating-point curve constants, for display and charts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub a: f64,
    pub k: f64,
    pub c: f64,
}

impl CurveParams {
    pub fn new(a: f64, k: f64, c: f64) -> Self {
        Self { a, k, c }
    }

    /// Lossy: `u128`/`u64` values above 2^53 lose precision
    pub fn from_curve(curve: &SmoothBondingCurve) -> Self {
        Self {
            a: curve.a_total_tokens as f64,
            k: curve.k_virtual_pool_offset as f64,
            c: curve.c_bonding_scale_factor as f64,
        }
    }

    /// Like [`CurveParams::from_curve`], with x measured in whole base units
    /// (e.g. SOL instead of lamports). Lossy.
    pub fn from_curve_scaled(curve: &SmoothBondingCurve, base_unit: u64) -> Self {
        let unit = base_unit as f64;
        Self {
            a: curve.a_total_tokens as f64,
            k: curve.k_virtual_pool_offset as f64 / unit,
            c: curve.c_bonding_scale_factor as f64 / unit,
        }
    }

    pub fn minted(&self, x: f64) -> Result<f64> {
        cumulative_minted(x, self.a, self.k, self.c)
    }

    pub fn price(&self, x: f64) -> Result<f64> {
        marginal_price(x, self.k, self.c)
    }

    pub fn sample(&self, x: f64) -> Result<CurveSample> {
        Ok(CurveSample {
            x,
            minted: self.minted(x)?,
            price: self.price(x)?,
        })
    }
}

/// Evenly spaced samples over `[x_min, x_max]`, both endpoints included
#[derive(Debug, Clone)]
pub struct Sweep {
    params: CurveParams,
    x_min: f64,
    x_max: f64,
    count: usize,
    index: usize,
}

impl Sweep {
    fn x_at(&self, i: usize) -> f64 {
        if self.count == 1 {
            return self.x_min;
        }
        if i + 1 == self.count {
            // land exactly on the upper bound
            return self.x_max;
        }
        let step = (self.x_max - self.x_min) / (self.count - 1) as f64;
        self.x_min + step * i as f64
    }
}

impl Iterator for Sweep {
    type Item = Result<CurveSample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let x = self.x_at(self.index);
        self.index += 1;
        Some(self.params.sample(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Sweep {}

/// Sample the curve at `sample_count` points from `x_min` to `x_max`
pub fn sweep(params: CurveParams, x_min: f64, x_max: f64, sample_count: usize) -> Result<Sweep> {
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(Error::Domain(format!(
            "sweep bounds must be finite, got [{}, {}]",
            x_min, x_max
        )));
    }

    Ok(Sweep {
        params,
        x_min,
        x_max,
        count: sample_count,
        index: 0,
    })
}

/// Collect a whole sweep, stopping at the first domain error
pub fn sample_curve(
    params: CurveParams,
    x_min: f64,
    x_max: f64,
    sample_count: usize,
) -> Result<Vec<CurveSample>> {
    sweep(params, x_min, x_max, sample_count)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xyber::program::LAMPORTS_PER_SOL;

    const A: f64 = 1_073_000_191.0;
    const K: f64 = 32_190_005_730.0;
    const C: f64 = 30.0;

    /// On-chain units: x and C in lamports
    fn default_curve() -> SmoothBondingCurve {
        SmoothBondingCurve {
            a_total_tokens: 1_073_000_191,
            k_virtual_pool_offset: 32_190_005_730 * LAMPORTS_PER_SOL as u128,
            c_bonding_scale_factor: 30 * LAMPORTS_PER_SOL,
            x_total_base_deposit: 0,
        }
    }

    #[test]
    fn test_minted_at_zero() {
        let y = cumulative_minted(0.0, A, K, C).unwrap();
        assert_eq!(y, A - K / C);
        // these constants are tuned so nothing is minted at x = 0
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_minted_approaches_a() {
        let y = cumulative_minted(1e15, A, K, C).unwrap();
        assert!((A - y).abs() < 1e-3, "y = {}", y);
        assert!(y < A);
    }

    #[test]
    fn test_minted_increasing_and_concave() {
        let samples = sample_curve(CurveParams::new(A, K, C), 0.0, 300.0, 301).unwrap();
        for w in samples.windows(3) {
            assert!(w[1].minted > w[0].minted);
            let d1 = w[1].minted - w[0].minted;
            let d2 = w[2].minted - w[1].minted;
            assert!(d2 < d1, "not concave at x = {}", w[1].x);
        }
    }

    #[test]
    fn test_price_strictly_increasing() {
        let mut prev = marginal_price(0.0, K, C).unwrap();
        for i in 1..=300 {
            let p = marginal_price(i as f64, K, C).unwrap();
            assert!(p > prev, "price not increasing at x = {}", i);
            prev = p;
        }
    }

    #[test]
    fn test_reference_scenario() {
        let y = cumulative_minted(0.0, 1_073_000_191.0, 32_190_005_730.0, 30.0).unwrap();
        assert_eq!(y, 1_073_000_191.0 - 32_190_005_730.0 / 30.0);

        let p = marginal_price(0.0, 32_190_005_730.0, 30.0).unwrap();
        assert_eq!(p, 30.0 * 30.0 / 32_190_005_730.0);
        assert!((p - 2.7959e-8).abs() < 1e-11);
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(
            cumulative_minted(5.0, A, K, -5.0),
            Err(Error::Domain(_))
        ));
        assert!(matches!(marginal_price(5.0, K, -5.0), Err(Error::Domain(_))));
        assert!(matches!(marginal_price(1.0, 0.0, C), Err(Error::Domain(_))));
        // K == 0 is fine for the minted curve
        assert_eq!(cumulative_minted(1.0, A, 0.0, C).unwrap(), A);
    }

    #[test]
    fn test_sweep_endpoints_and_count() {
        let samples = sample_curve(CurveParams::new(A, K, C), 0.0, 300.0, 301).unwrap();
        assert_eq!(samples.len(), 301);
        assert_eq!(samples[0].x, 0.0);
        assert_eq!(samples[150].x, 150.0);
        assert_eq!(samples[300].x, 300.0);

        let samples = sample_curve(CurveParams::new(A, K, C), 0.0, 1.0, 4).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3].x, 1.0);
    }

    #[test]
    fn test_sweep_degenerate_counts() {
        let params = CurveParams::new(A, K, C);
        assert!(sample_curve(params, 0.0, 10.0, 0).unwrap().is_empty());

        let one = sample_curve(params, 0.0, 10.0, 1).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].x, 0.0);
    }

    #[test]
    fn test_sweep_is_exact_size() {
        let sweep = sweep(CurveParams::new(A, K, C), 0.0, 10.0, 11).unwrap();
        assert_eq!(sweep.len(), 11);
    }

    #[test]
    fn test_sweep_rejects_bad_bounds() {
        let params = CurveParams::new(A, K, C);
        assert!(matches!(
            sweep(params, f64::NAN, 1.0, 10),
            Err(Error::Domain(_))
        ));
        assert!(matches!(
            sweep(params, 0.0, f64::INFINITY, 10),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn test_sweep_surfaces_domain_error() {
        let params = CurveParams::new(A, K, -5.0);
        assert!(matches!(
            sample_curve(params, 0.0, 10.0, 11),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn test_from_curve_scaled_matches_constants() {
        let params = CurveParams::from_curve_scaled(&default_curve(), LAMPORTS_PER_SOL);
        assert_eq!(params.a, A);
        assert_eq!(params.c, C);
        assert!((params.k - K).abs() / K < 1e-12);
    }

    #[test]
    fn test_exact_minted_at() {
        let curve = default_curve();
        assert_eq!(curve.minted_at(0).unwrap(), 0);
        // K / 40 SOL = 804_750_143.25 -> floor
        assert_eq!(
            curve.minted_at(10 * LAMPORTS_PER_SOL).unwrap(),
            1_073_000_191 - 804_750_143
        );
    }

    #[test]
    fn test_exact_minted_saturates() {
        let curve = SmoothBondingCurve {
            a_total_tokens: 10,
            k_virtual_pool_offset: 1_000,
            c_bonding_scale_factor: 1,
            x_total_base_deposit: 0,
        };
        assert_eq!(curve.minted_at(0).unwrap(), 0);
    }

    #[test]
    fn test_exact_keeps_u128_precision() {
        // K / C = 2^60 + 5, which f64 cannot hold
        let k = (1u128 << 70) + 5 * 1024;
        let curve = SmoothBondingCurve {
            a_total_tokens: u64::MAX,
            k_virtual_pool_offset: k,
            c_bonding_scale_factor: 1024,
            x_total_base_deposit: 0,
        };
        assert_eq!(curve.minted_at(0).unwrap(), u64::MAX - (1u64 << 60) - 5);

        let price = curve.marginal_price_at(0).unwrap();
        assert_eq!(price.numerator, 1024 * 1024);
        assert_eq!(price.denominator, k);
    }

    #[test]
    fn test_exact_domain_errors() {
        let mut curve = default_curve();
        curve.c_bonding_scale_factor = 0;
        assert!(matches!(curve.minted_at(0), Err(Error::Domain(_))));
        assert!(matches!(curve.marginal_price_at(0), Err(Error::Domain(_))));

        let mut curve = default_curve();
        curve.k_virtual_pool_offset = 0;
        assert!(matches!(curve.marginal_price_at(5), Err(Error::Domain(_))));
    }

    #[test]
    fn test_exact_overflow() {
        let curve = SmoothBondingCurve {
            a_total_tokens: 1,
            k_virtual_pool_offset: 1,
            c_bonding_scale_factor: u64::MAX,
            x_total_base_deposit: 0,
        };
        assert!(matches!(curve.minted_at(1), Err(Error::MathOverflow)));
    }

    #[test]
    fn test_exact_price_matches_float() {
        let curve = default_curve();
        let exact = curve.marginal_price_at(0).unwrap().to_f64();
        let float = CurveParams::from_curve(&curve).price(0.0).unwrap();
        assert!((exact - float).abs() <= float * 1e-12);
    }

    #[test]
    fn test_buy_exact_input() {
        let curve = default_curve();
        let quote = curve.buy_exact_input(0, 10 * LAMPORTS_PER_SOL).unwrap();
        assert!(
            (265_250_000..270_300_000).contains(&quote.amount),
            "minted {}",
            quote.amount
        );
        assert_eq!(quote.new_x, 10 * LAMPORTS_PER_SOL);
    }

    #[test]
    fn test_buy_exact_output() {
        let curve = default_curve();
        let quote = curve.buy_exact_output(0, 10_000).unwrap();
        assert!(quote.amount > 0);
        assert_eq!(curve.minted_at(quote.new_x).unwrap(), 10_000);
    }

    #[test]
    fn test_buy_smaller_amounts_mint_less() {
        let curve = default_curve();
        let mut prev = u64::MAX;
        for lamports in [10_000_000_000u64, 1_000_000_000, 100_000_000, 10_000_000] {
            let minted = curve.buy_exact_input(0, lamports).unwrap().amount;
            assert!(minted > 0);
            assert!(minted <= prev);
            prev = minted;
        }
    }

    #[test]
    fn test_buy_sell_symmetry() {
        let curve = default_curve();
        let base_in = 2 * LAMPORTS_PER_SOL;

        let buy = curve.buy_exact_input(0, base_in).unwrap();
        let sell = curve.sell_exact_input(buy.new_x, buy.amount).unwrap();
        assert_eq!(sell.amount, base_in);
        assert_eq!(sell.new_x, 0);
    }

    #[test]
    fn test_sell_exact_output() {
        let curve = default_curve();
        let buy = curve.buy_exact_input(0, LAMPORTS_PER_SOL / 10).unwrap();

        let base_out = buy.new_x / 2;
        let sell = curve.sell_exact_output(buy.new_x, base_out).unwrap();
        assert_eq!(sell.new_x, buy.new_x - base_out);

        let real_burn =
            curve.minted_at(buy.new_x).unwrap() - curve.minted_at(sell.new_x).unwrap();
        assert_eq!(sell.amount, real_burn);
    }

    #[test]
    fn test_insufficient_supply() {
        let curve = default_curve();
        assert!(matches!(
            curve.buy_exact_output(0, 1_073_000_191),
            Err(Error::InsufficientTokenSupply)
        ));
        assert!(matches!(
            curve.sell_exact_input(0, 1),
            Err(Error::InsufficientTokenSupply)
        ));
        assert!(matches!(
            curve.sell_exact_output(5, 6),
            Err(Error::InsufficientTokenSupply)
        ));
    }
}
