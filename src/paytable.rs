//! Payout tables: binomial landing odds and RTP-scaled multipliers.
//!
//! A table is one multiplier per bucket, symmetric around the center.
//! Tables are derived from the binomial landing distribution, shaped by a
//! volatility curve, then scaled so the expected payout hits [`TARGET_RTP`].
//! [`board_multipliers`] converts a table back into the ascending distinct
//! list a [`BoardConfig`](crate::BoardConfig) wants.

use serde::{Deserialize, Serialize};

/// Expected long-run payout per unit wagered
pub const TARGET_RTP: f64 = 0.95;

/// Payout curve shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Volatility {
    /// Shallow curve, frequent small wins
    Normal,
    /// Steep curve with boosted edge buckets
    Degen,
}

impl Volatility {
    /// Physical peg rows for a board at this volatility
    pub fn rows(self) -> u32 {
        match self {
            Volatility::Normal => 14,
            Volatility::Degen => 16,
        }
    }

    /// Binomial depth of the payout table. The table has `table_rows + 1`
    /// buckets, shallower than the physical board so the curve stays flat
    /// enough near the center.
    pub fn table_rows(self) -> u32 {
        match self {
            Volatility::Normal => 8,
            Volatility::Degen => 10,
        }
    }

    /// The built-in multiplier table for this volatility
    pub fn table(self) -> Vec<f32> {
        multiplier_table(self.table_rows(), TARGET_RTP, self)
    }
}

/// C(n, k) computed with a short float product, so it stays exact for the
/// board depths in play here
pub fn binomial_coefficient(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }
    let k = k.min(n - k);
    let mut c = 1.0;
    for i in 0..k {
        c = c * f64::from(n - i) / f64::from(i + 1);
    }
    c
}

/// Probability of a fair ball landing in each of the `rows + 1` buckets
pub fn bucket_probabilities(rows: u32) -> Vec<f64> {
    let half = 0.5_f64.powi(rows as i32);
    (0..=rows)
        .map(|k| binomial_coefficient(rows, k) * half)
        .collect()
}

fn round2(x: f64) -> f32 {
    ((x * 100.0).round() / 100.0) as f32
}

/// Build a `rows + 1` bucket payout table.
///
/// Each bucket starts at `1 + (distance + bias)^pow`, edge buckets get an
/// extra boost in degen mode, then the whole curve is scaled so the
/// binomial-weighted payout meets `target_rtp`. Buckets are clamped to 1.0
/// after scaling, which nudges the real RTP slightly above target.
pub fn multiplier_table(rows: u32, target_rtp: f64, volatility: Volatility) -> Vec<f32> {
    let probs = bucket_probabilities(rows);
    let center = f64::from(rows) / 2.0;
    let (pow, bias) = match volatility {
        Volatility::Normal => (1.6, 0.15),
        Volatility::Degen => (2.0, 0.3),
    };
    let mut raw: Vec<f64> = (0..probs.len())
        .map(|k| {
            let d = (k as f64 - center).abs();
            (1.0 + (d + bias).powf(pow)).max(1.0)
        })
        .collect();
    if volatility == Volatility::Degen {
        if let Some(first) = raw.first_mut() {
            *first *= 1.5;
        }
        if let Some(last) = raw.last_mut() {
            *last *= 1.5;
        }
    }
    let expected_raw: f64 = raw.iter().zip(&probs).map(|(w, p)| w * p).sum();
    let scale = target_rtp / expected_raw;
    raw.iter().map(|w| round2((w * scale).max(1.0))).collect()
}

/// Approximate landing odds for an arbitrary bucket count on a board of
/// `rows` peg rows: a gaussian of width `rows / 4`, normalized to sum to
/// one. `rows == 0` means uniform odds.
pub fn gaussian_probabilities(buckets: u32, rows: u32) -> Vec<f64> {
    if buckets == 0 {
        return Vec::new();
    }
    let center = f64::from(buckets - 1) / 2.0;
    let probs: Vec<f64> = (0..buckets)
        .map(|k| {
            if rows > 0 {
                let z = (f64::from(k) - center) / (f64::from(rows) / 4.0);
                (-z * z / 2.0).exp()
            } else {
                1.0 / f64::from(buckets)
            }
        })
        .collect();
    let total: f64 = probs.iter().sum();
    probs.iter().map(|p| p / total).collect()
}

/// Payout table for an arbitrary bucket count on a board of `rows` peg rows.
///
/// Landing odds come from [`gaussian_probabilities`], and unlike
/// [`multiplier_table`] the result is not floored at 1.0, so center buckets
/// on wide boards can pay less than the wager.
pub fn custom_table(buckets: u32, rows: u32, volatility: Volatility) -> Vec<f32> {
    if buckets == 0 {
        return Vec::new();
    }
    let probs = gaussian_probabilities(buckets, rows);
    let center = f64::from(buckets - 1) / 2.0;
    let (pow, bias) = match volatility {
        Volatility::Normal => (1.8, 0.2),
        Volatility::Degen => (2.2, 0.4),
    };
    let mut raw: Vec<f64> = (0..buckets)
        .map(|k| {
            let d = (f64::from(k) - center).abs();
            1.0 + (d + bias).powf(pow)
        })
        .collect();
    if volatility == Volatility::Degen {
        if let Some(first) = raw.first_mut() {
            *first *= 2.5;
        }
        if let Some(last) = raw.last_mut() {
            *last *= 2.5;
        }
    }
    let expected_raw: f64 = raw.iter().zip(&probs).map(|(w, p)| w * p).sum();
    let scale = TARGET_RTP / expected_raw;
    raw.iter().map(|w| round2(w * scale)).collect()
}

/// Table where every bucket contributes the same expected payout:
/// `m = target / (buckets * p)`
pub fn fair_table(rows: u32, target_rtp: f64) -> Vec<f32> {
    let probs = bucket_probabilities(rows);
    let buckets = probs.len() as f64;
    probs
        .iter()
        .map(|&p| {
            if p > 0.0 {
                round2(target_rtp / (buckets * p))
            } else {
                0.0
            }
        })
        .collect()
}

/// Ascending distinct multipliers read from the center of a symmetric table
/// outward. Feeding the result to
/// [`bucket_layout`](crate::sim::bucket_layout) reproduces the table.
pub fn board_multipliers(table: &[f32]) -> Vec<f32> {
    let mut out: Vec<f32> = Vec::new();
    for &m in &table[table.len() / 2..] {
        if !out.contains(&m) {
            out.push(m);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bucket_layout;

    #[test]
    fn test_binomial_coefficient_matches_pascal() {
        assert!((binomial_coefficient(8, 4) - 70.0).abs() < 1e-9);
        assert!((binomial_coefficient(10, 3) - 120.0).abs() < 1e-9);
        assert!((binomial_coefficient(10, 5) - 252.0).abs() < 1e-9);
        assert!((binomial_coefficient(5, 0) - 1.0).abs() < 1e-9);
        assert!((binomial_coefficient(5, 5) - 1.0).abs() < 1e-9);
        assert_eq!(binomial_coefficient(3, 7), 0.0);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        for rows in [1, 8, 14, 16] {
            let sum: f64 = bucket_probabilities(rows).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "rows {rows}: sum {sum}");
        }
    }

    #[test]
    fn test_builtin_normal_table() {
        let expected = vec![3.68, 2.49, 1.51, 1.0, 1.0, 1.0, 1.51, 2.49, 3.68];
        assert_eq!(Volatility::Normal.table(), expected);
    }

    #[test]
    fn test_builtin_degen_table() {
        let expected = vec![
            9.51, 4.25, 2.59, 1.37, 1.0, 1.0, 1.0, 1.37, 2.59, 4.25, 9.51,
        ];
        assert_eq!(Volatility::Degen.table(), expected);
    }

    #[test]
    fn test_tables_are_symmetric_with_floor() {
        for volatility in [Volatility::Normal, Volatility::Degen] {
            let table = volatility.table();
            assert_eq!(table.len() as u32, volatility.table_rows() + 1);
            for (i, &m) in table.iter().enumerate() {
                assert_eq!(m, table[table.len() - 1 - i]);
                assert!(m >= 1.0);
            }
        }
    }

    #[test]
    fn test_tables_round_trip_through_board_layout() {
        for volatility in [Volatility::Normal, Volatility::Degen] {
            let table = volatility.table();
            let distinct = board_multipliers(&table);
            assert_eq!(bucket_layout(&distinct), table);
        }
    }

    #[test]
    fn test_board_multipliers_reads_center_out() {
        let table = [6.0, 3.0, 1.5, 0.5, 0.5, 0.5, 1.5, 3.0, 6.0];
        assert_eq!(board_multipliers(&table), vec![0.5, 1.5, 3.0, 6.0]);
        assert!(board_multipliers(&[]).is_empty());
    }

    #[test]
    fn test_fair_table_hits_target_rtp() {
        for rows in [14, 16] {
            let probs = bucket_probabilities(rows);
            let table = fair_table(rows, TARGET_RTP);
            let rtp: f64 = probs
                .iter()
                .zip(&table)
                .map(|(p, &m)| p * f64::from(m))
                .sum();
            assert!((rtp - TARGET_RTP).abs() < 0.01, "rows {rows}: rtp {rtp}");
        }
    }

    #[test]
    fn test_gaussian_probabilities_sum_to_one() {
        for (buckets, rows) in [(9, 14), (13, 16), (5, 0)] {
            let probs = gaussian_probabilities(buckets, rows);
            assert_eq!(probs.len(), buckets as usize);
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{buckets}/{rows}: sum {sum}");
        }
        assert!(gaussian_probabilities(0, 14).is_empty());
    }

    #[test]
    fn test_gaussian_probabilities_peak_at_center() {
        let probs = gaussian_probabilities(9, 14);
        for (k, &p) in probs.iter().enumerate() {
            assert!(p <= probs[4], "bucket {k} outweighs the center");
            assert_eq!(p, probs[8 - k]);
        }
    }

    #[test]
    fn test_custom_table_shape() {
        let table = custom_table(9, 14, Volatility::Normal);
        assert_eq!(table.len(), 9);
        for (i, &m) in table.iter().enumerate() {
            assert_eq!(m, table[table.len() - 1 - i]);
        }
        // No floor: wide gaussians push the center below the wager
        assert!(table[4] < 1.0);
        assert!(table[0] > table[4]);
    }

    #[test]
    fn test_custom_table_uniform_when_rowless() {
        let table = custom_table(5, 0, Volatility::Degen);
        assert_eq!(table.len(), 5);
        assert_eq!(table[0], table[4]);
        assert_eq!(table[1], table[3]);
        // Edge boost survives the uniform odds
        assert!(table[0] > table[1]);
    }

    #[test]
    fn test_custom_table_empty_when_no_buckets() {
        assert!(custom_table(0, 14, Volatility::Normal).is_empty());
    }
}
