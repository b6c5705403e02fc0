//! Net Promoter Score computation.

/// Promoter threshold: scores of 9 or 10.
pub const PROMOTER_MIN: i64 = 9;
/// Detractor threshold: scores of 6 or below. 7-8 are passive.
pub const DETRACTOR_MAX: i64 = 6;

/// Compute the NPS for a set of 0-10 scores.
///
/// `round((promoters - detractors) / total * 100)`. Passives count in the
/// denominator only. Returns `None` for an empty slice.
pub fn nps_score(scores: &[i64]) -> Option<i32> {
    if scores.is_empty() {
        return None;
    }
    let promoters = scores.iter().filter(|&&s| s >= PROMOTER_MIN).count() as f64;
    let detractors = scores.iter().filter(|&&s| s <= DETRACTOR_MAX).count() as f64;
    Some(((promoters - detractors) / scores.len() as f64 * 100.0).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_score() {
        assert_eq!(nps_score(&[]), None);
    }

    #[test]
    fn mixed_scores() {
        // Scenario D: promoters=8, detractors=2 -> (8-2)/10*100 = 60.
        let scores = [9, 9, 9, 9, 9, 9, 10, 10, 2, 2];
        assert_eq!(nps_score(&scores), Some(60));
    }

    #[test]
    fn passives_dilute_but_do_not_subtract() {
        assert_eq!(nps_score(&[7, 8, 7, 8]), Some(0));
        assert_eq!(nps_score(&[9, 7, 7, 7]), Some(25));
    }

    #[test]
    fn extremes() {
        assert_eq!(nps_score(&[10, 10, 9]), Some(100));
        assert_eq!(nps_score(&[0, 3, 6]), Some(-100));
    }

    #[test]
    fn score_is_bounded() {
        // Any non-empty set of 0-10 scores yields an integer in [-100, 100].
        for a in 0..=10i64 {
            for b in 0..=10i64 {
                let s = nps_score(&[a, b]).unwrap();
                assert!((-100..=100).contains(&s));
            }
        }
    }

    #[test]
    fn rounding() {
        // 1 promoter, 0 detractors, 3 total -> 33.33 -> 33
        assert_eq!(nps_score(&[9, 7, 7]), Some(33));
        // 2 promoters, 1 detractor, 3 total -> 33.33 -> 33
        assert_eq!(nps_score(&[9, 10, 2]), Some(33));
    }
}
