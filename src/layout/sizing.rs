//! Track length arithmetic: splitting an axis by weight and enforcing minimum sizes.

/// How `clamp_tracks` brought an axis back within its minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampOutcome {
    /// Every track already satisfied the minimum
    Unchanged,
    /// Deficits were covered by borrowing from neighbouring tracks
    Redistributed,
    /// The axis is too small for every minimum; fell back to weighted sizing
    Proportional,
}

fn usable_weights(weights: &[f64]) -> bool {
    weights.iter().all(|w| w.is_finite() && *w > 0.0)
}

/// Split `total` cells across tracks in proportion to `weights`.
///
/// Lengths always sum to `total`. Leftover cells from rounding go to the tracks
/// with the largest fractional parts, earliest track first on ties. Invalid
/// weights (non-finite, zero or negative) fall back to equal shares.
pub fn distribute(total: u16, weights: &[f64]) -> Vec<u16> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }
    let equal;
    let weights = if usable_weights(weights) {
        weights
    } else {
        equal = vec![1.0; n];
        &equal
    };
    let sum: f64 = weights.iter().sum();

    let mut lengths = Vec::with_capacity(n);
    let mut fractions = Vec::with_capacity(n);
    let mut assigned: u32 = 0;
    for (i, w) in weights.iter().enumerate() {
        let exact = f64::from(total) * w / sum;
        // 79.999999 should count as 80
        let floor = (exact + 1e-9).floor();
        lengths.push(floor as u16);
        fractions.push(((exact - floor).max(0.0), i));
        assigned += floor as u32;
    }

    // The epsilon above can push a floor one past the true value
    while assigned > u32::from(total) {
        if let Some(longest) = lengths.iter_mut().max() {
            *longest -= 1;
        }
        assigned -= 1;
    }

    let mut leftover = u32::from(total).saturating_sub(assigned);
    fractions.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, i) in fractions.iter().cycle() {
        if leftover == 0 {
            break;
        }
        lengths[*i] += 1;
        leftover -= 1;
    }
    lengths
}

/// Raise every track to at least `min` cells.
///
/// A short track borrows from the nearest tracks that have cells to spare above
/// the minimum, checking the following track before the preceding one at each
/// distance. If the axis cannot hold `min` cells per track the lengths are
/// recomputed from `weights` instead. The total length never changes.
pub fn clamp_tracks(lengths: &mut [u16], min: u16, weights: &[f64]) -> ClampOutcome {
    if lengths.iter().all(|&l| l >= min) {
        return ClampOutcome::Unchanged;
    }
    let total: u32 = lengths.iter().map(|&l| u32::from(l)).sum();
    if u32::from(min) * lengths.len() as u32 > total {
        let total = total.min(u32::from(u16::MAX)) as u16;
        let proportional = distribute(total, weights);
        lengths.copy_from_slice(&proportional);
        return ClampOutcome::Proportional;
    }

    let n = lengths.len();
    for i in 0..n {
        let mut distance = 1;
        while lengths[i] < min && distance < n {
            for donor in [i.checked_add(distance), i.checked_sub(distance)]
                .into_iter()
                .flatten()
            {
                if donor >= n || lengths[i] >= min {
                    continue;
                }
                let spare = lengths[donor].saturating_sub(min);
                let give = spare.min(min - lengths[i]);
                lengths[donor] -= give;
                lengths[i] += give;
            }
            distance += 1;
        }
    }
    ClampOutcome::Redistributed
}

/// Turn concrete lengths back into weights with mean 1.0
pub fn weights_from_lengths(lengths: &[u16]) -> Vec<f64> {
    let total: f64 = lengths.iter().map(|&l| f64::from(l)).sum();
    if total <= 0.0 {
        return vec![1.0; lengths.len()];
    }
    let mean = total / lengths.len() as f64;
    lengths.iter().map(|&l| f64::from(l) / mean).collect()
}

/// Start offsets of consecutive tracks beginning at `origin`
pub fn offsets(origin: u16, lengths: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(lengths.len());
    let mut at = origin;
    for &len in lengths {
        out.push(at);
        at = at.saturating_add(len);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribute_equal_split_with_remainder() {
        assert_eq!(distribute(10, &[1.0, 1.0, 1.0]), vec![4, 3, 3]);
        assert_eq!(distribute(9, &[1.0, 1.0, 1.0]), vec![3, 3, 3]);
        assert_eq!(distribute(0, &[1.0, 1.0]), vec![0, 0]);
        assert!(distribute(10, &[]).is_empty());
    }

    #[test]
    fn distribute_master_ratio() {
        assert_eq!(distribute(100, &[1.2, 0.8]), vec![60, 40]);
        assert_eq!(distribute(81, &[1.2, 0.8]), vec![49, 32]);
    }

    #[test]
    fn distribute_always_sums_to_total() {
        let weights = [0.3, 1.7, 1.0, 0.9];
        for total in 0..200u16 {
            let lengths = distribute(total, &weights);
            assert_eq!(lengths.iter().map(|&l| u32::from(l)).sum::<u32>(), u32::from(total));
        }
    }

    #[test]
    fn distribute_ignores_bad_weights() {
        assert_eq!(distribute(10, &[1.0, f64::NAN]), vec![5, 5]);
        assert_eq!(distribute(10, &[0.0, 1.0]), vec![5, 5]);
        assert_eq!(distribute(10, &[-1.0, 3.0]), vec![5, 5]);
    }

    #[test]
    fn clamp_noop_when_satisfied() {
        let mut lengths = [10, 10, 10];
        assert_eq!(clamp_tracks(&mut lengths, 5, &[1.0; 3]), ClampOutcome::Unchanged);
        assert_eq!(lengths, [10, 10, 10]);
    }

    #[test]
    fn clamp_borrows_from_adjacent() {
        let mut lengths = [2, 18, 10];
        assert_eq!(
            clamp_tracks(&mut lengths, 5, &[1.0; 3]),
            ClampOutcome::Redistributed
        );
        assert_eq!(lengths, [5, 15, 10]);
    }

    #[test]
    fn clamp_reaches_past_exhausted_neighbour() {
        let mut lengths = [1, 5, 24];
        assert_eq!(
            clamp_tracks(&mut lengths, 5, &[1.0; 3]),
            ClampOutcome::Redistributed
        );
        assert_eq!(lengths, [5, 5, 20]);
    }

    #[test]
    fn clamp_prefers_following_track() {
        let mut lengths = [20, 1, 20];
        clamp_tracks(&mut lengths, 5, &[1.0; 3]);
        assert_eq!(lengths, [20, 5, 16]);
    }

    #[test]
    fn clamp_falls_back_to_proportional() {
        let mut lengths = [1, 1, 10];
        assert_eq!(
            clamp_tracks(&mut lengths, 5, &[1.0, 1.0, 2.0]),
            ClampOutcome::Proportional
        );
        assert_eq!(lengths, [3, 3, 6]);
    }

    #[test]
    fn clamp_preserves_total() {
        let mut lengths = [0, 0, 0, 40];
        clamp_tracks(&mut lengths, 6, &[1.0; 4]);
        assert_eq!(lengths.iter().sum::<u16>(), 40);
        assert!(lengths.iter().all(|&l| l >= 6));
    }

    #[test]
    fn weights_round_trip_lengths() {
        let weights = weights_from_lengths(&[30, 10]);
        assert_eq!(weights, vec![1.5, 0.5]);
        assert_eq!(distribute(40, &weights), vec![30, 10]);
        assert_eq!(weights_from_lengths(&[0, 0]), vec![1.0, 1.0]);
    }

    #[test]
    fn offsets_accumulate() {
        assert_eq!(offsets(2, &[3, 4, 5]), vec![2, 5, 9]);
    }
}
