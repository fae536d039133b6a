/// Index of the candidate closest to `target`, if it is strictly closer than
/// `tolerance`. Exact ties go to the earlier candidate.
pub fn nearest_index(target: i64, candidates: &[i64], tolerance: i64) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (i, &t) in candidates.iter().enumerate() {
        let diff = (t - target).abs();
        match best {
            Some((_, d)) if d <= diff => {},
            _ => best = Some((i, diff)),
        }
    }
    best.filter(|&(_, d)| d < tolerance).map(|(i, _)| i)
}

/// Same result as [`nearest_index`] for ascending `candidates`, found by
/// binary search.
pub fn nearest_index_sorted(target: i64, candidates: &[i64], tolerance: i64) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    // first candidate >= target
    let next_idx = candidates.partition_point(|&t| t < target);

    let next = candidates.get(next_idx).map(|&t| (next_idx, (t - target).abs()));
    let prev = if next_idx > 0 {
        let value = candidates[next_idx - 1];
        // duplicates: the linear scan would report the first one
        let first = candidates.partition_point(|&t| t < value);
        Some((first, (target - value).abs()))
    } else {
        None
    };

    let nearest = match (prev, next) {
        (Some(p), Some(n)) => {
            if p.1 <= n.1 {
                p
            } else {
                n
            }
        },
        (Some(p), None) => p,
        (None, Some(n)) => n,
        (None, None) => return None,
    };

    if nearest.1 < tolerance {
        Some(nearest.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MATCH_TOLERANCE_SECS;
    use crate::utils::to_secs;
    use chrono::NaiveDate;

    fn secs(h: u32, m: u32, s: u32) -> i64 {
        to_secs(&NaiveDate::from_ymd_opt(2019, 5, 1).unwrap().and_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn nearest_wins_within_tolerance() {
        let candidates = [secs(0, 0, 0), secs(0, 21, 0)];
        let target = secs(0, 5, 0);
        assert_eq!(nearest_index(target, &candidates, MATCH_TOLERANCE_SECS), Some(0));
        assert_eq!(nearest_index_sorted(target, &candidates, MATCH_TOLERANCE_SECS), Some(0));
    }

    #[test]
    fn no_match_outside_tolerance() {
        let candidates = [secs(0, 0, 0), secs(1, 0, 0)];
        let target = secs(0, 30, 0);
        assert_eq!(nearest_index(target, &candidates, MATCH_TOLERANCE_SECS), None);
        assert_eq!(nearest_index_sorted(target, &candidates, MATCH_TOLERANCE_SECS), None);
        // exactly at the tolerance is not a match
        let target = secs(0, 20, 0);
        assert_eq!(nearest_index(target, &candidates, MATCH_TOLERANCE_SECS), None);
        assert_eq!(nearest_index(target, &[], MATCH_TOLERANCE_SECS), None);
        assert_eq!(nearest_index_sorted(target, &[], MATCH_TOLERANCE_SECS), None);
    }

    #[test]
    fn ties_go_to_earlier_candidate() {
        let candidates = [100, 200, 300];
        assert_eq!(nearest_index(250, &candidates, 1200), Some(1));
        assert_eq!(nearest_index_sorted(250, &candidates, 1200), Some(1));
        let dups = [100, 200, 200, 200, 400];
        assert_eq!(nearest_index(210, &dups, 1200), Some(1));
        assert_eq!(nearest_index_sorted(210, &dups, 1200), Some(1));
        assert_eq!(nearest_index(200, &dups, 1200), Some(1));
        assert_eq!(nearest_index_sorted(200, &dups, 1200), Some(1));
    }

    #[test]
    fn binary_search_matches_linear_scan() {
        let candidates: Vec<i64> = (0..200).map(|i| i * 300 + (i % 7) * 13).collect();
        for target in (-2000..62000).step_by(97) {
            assert_eq!(
                nearest_index(target, &candidates, 1200),
                nearest_index_sorted(target, &candidates, 1200),
                "target {target}"
            );
        }
    }
}
