//! Coin variant table.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinVariant {
    /// 1-based variant number as recorded in timelines.
    pub id: u32,
    /// Reward granted when the coin is collected.
    pub value: f64,
    /// Relative spawn weight used by the recorder.
    pub weight: u32,
}

pub const COIN_VARIANTS: [CoinVariant; 5] = [
    CoinVariant { id: 1, value: 20.0, weight: 1 },
    CoinVariant { id: 2, value: 15.0, weight: 2 },
    CoinVariant { id: 3, value: 12.5, weight: 3 },
    CoinVariant { id: 4, value: 10.0, weight: 4 },
    CoinVariant { id: 5, value: 5.0, weight: 10 },
];

/// Look up a coin variant. Missing or `0` resolves to variant 1; numbers past
/// the table clamp to the last entry.
pub fn coin_variant(variant: Option<u32>) -> &'static CoinVariant {
    let n = variant.unwrap_or(1).max(1) as usize;
    &COIN_VARIANTS[(n - 1).min(COIN_VARIANTS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_one_based() {
        assert_eq!(coin_variant(Some(1)).value, 20.0);
        assert_eq!(coin_variant(Some(3)).value, 12.5);
        assert_eq!(coin_variant(Some(5)).weight, 10);
    }

    #[test]
    fn lookup_clamps_out_of_range() {
        assert_eq!(coin_variant(None).id, 1);
        assert_eq!(coin_variant(Some(0)).id, 1);
        assert_eq!(coin_variant(Some(42)).id, 5);
    }
}
