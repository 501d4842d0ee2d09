//! Off-chain bonding-curve price approximation.
//!
//! The projected price is a linear proxy over the market's progress:
//! the share of the liquidity threshold already raised, weighted by the
//! share of supply already sold off the curve. Both bonding types are
//! priced with the same proxy.

use bigdecimal::{BigDecimal, Zero};

/// Spot price of a live bonding-curve market.
///
/// Returns zero when `total_supply` or `threshold_liquidity` is not
/// positive, and never returns a negative price.
pub fn spot_price(
    current_supply: &BigDecimal,
    liquidity_raised: &BigDecimal,
    total_supply: &BigDecimal,
    threshold_liquidity: &BigDecimal,
) -> BigDecimal {
    let zero = BigDecimal::zero();
    if total_supply <= &zero || threshold_liquidity <= &zero {
        return zero;
    }
    let progress = liquidity_raised / threshold_liquidity;
    let sold_fraction = (total_supply - current_supply) / total_supply;
    let price = progress * sold_fraction;
    if price < zero {
        zero
    } else {
        price
    }
}

/// Fully-diluted market cap at the given spot price.
pub fn market_cap(total_supply: &BigDecimal, price: &BigDecimal) -> BigDecimal {
    total_supply * price
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn degenerate_markets_price_at_zero() {
        assert_eq!(
            spot_price(&dec("0"), &dec("10"), &dec("0"), &dec("500")),
            BigDecimal::zero()
        );
        assert_eq!(
            spot_price(&dec("900"), &dec("10"), &dec("1000"), &dec("0")),
            BigDecimal::zero()
        );
        assert_eq!(
            spot_price(&dec("900"), &dec("10"), &dec("-1"), &dec("500")),
            BigDecimal::zero()
        );
    }

    #[test]
    fn hundred_token_buy_prices_at_one_cent() {
        // 1000 supply, 100 sold, 50 raised of a 500 threshold
        let price = spot_price(&dec("900"), &dec("50"), &dec("1000"), &dec("500"));
        assert_eq!(price, dec("0.01"));
        assert_eq!(market_cap(&dec("1000"), &price), dec("10"));
    }

    #[test]
    fn price_rises_as_the_curve_fills() {
        let total = dec("1000");
        let threshold = dec("500");
        let mut last = BigDecimal::zero();
        for step in 0..=10 {
            let sold = BigDecimal::from(step * 100);
            let raised = BigDecimal::from(step * 50);
            let price = spot_price(&(&total - &sold), &raised, &total, &threshold);
            assert!(price >= last, "price regressed at step {step}");
            last = price;
        }
        // fully sold, threshold reached
        assert_eq!(last, dec("1"));
    }

    #[test]
    fn oversold_supply_never_goes_negative() {
        // current_supply above total (bad upstream state) would make the
        // sold fraction negative
        let price = spot_price(&dec("1100"), &dec("50"), &dec("1000"), &dec("500"));
        assert_eq!(price, BigDecimal::zero());
    }
}
