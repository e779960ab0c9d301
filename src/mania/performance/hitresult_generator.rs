use std::cmp;

use crate::mania::{performance::HitResultPriority, score_state::ManiaScoreState};

/// Everything needed to fill in the judgements of a score from its accuracy.
pub struct ManiaHitResultParams {
    // Guaranteed to be correct
    pub total_hits: u32,
    pub classic: bool,
    pub priority: HitResultPriority,

    // Provided by user; may be infeasable
    pub acc: Option<f64>,
    pub n320: Option<u32>,
    pub n300: Option<u32>,
    pub n200: Option<u32>,
    pub n100: Option<u32>,
    pub n50: Option<u32>,
    pub misses: u32,
}

impl ManiaHitResultParams {
    /// Accuracy weights of 320s, 300s, 200s, 100s, and 50s divided by 5.
    const fn weights(&self) -> [u32; 5] {
        if self.classic {
            [60, 60, 40, 20, 10]
        } else {
            [64, 60, 40, 20, 10]
        }
    }
}

pub fn generate_hitresults(params: &ManiaHitResultParams) -> ManiaScoreState {
    let misses = cmp::min(params.misses, params.total_hits);
    let mut remain = params.total_hits - misses;

    let given = [
        params.n320,
        params.n300,
        params.n200,
        params.n100,
        params.n50,
    ];

    let mut counts = [0; 5];

    for (count, given) in counts.iter_mut().zip(given) {
        if let Some(n) = given {
            *count = cmp::min(n, remain);
            remain -= *count;
        }
    }

    let weights = params.weights();

    // Unspecified judgements, best first; equally weighted ones are
    // filled as the better judgement
    let mut free: Vec<usize> = (0..5).filter(|&i| given[i].is_none()).collect();
    free.dedup_by_key(|&mut i| weights[i]);

    if remain > 0 {
        match (free.first(), free.last()) {
            (Some(&best), Some(&worst)) => match params.acc {
                Some(acc) => {
                    let (hi, lo) = bracket(params, &free, &counts, acc, remain);
                    let n_hi = split(params, &counts, acc, remain, hi, lo);

                    counts[hi] += n_hi;
                    counts[lo] += remain - n_hi;
                }
                None => match params.priority {
                    HitResultPriority::BestCase => counts[best] += remain,
                    HitResultPriority::WorstCase => counts[worst] += remain,
                },
            },
            _ => match params.priority {
                HitResultPriority::BestCase => counts[0] += remain,
                HitResultPriority::WorstCase => counts[4] += remain,
            },
        }
    }

    let [n320, n300, n200, n100, n50] = counts;

    ManiaScoreState {
        n320,
        n300,
        n200,
        n100,
        n50,
        misses,
    }
}

/// Points required from the remaining hits to reach `acc`.
fn needed_points(params: &ManiaHitResultParams, counts: &[u32; 5], acc: f64) -> f64 {
    let weights = params.weights();
    let target = acc * f64::from(weights[0] * params.total_hits);

    let fixed: u32 = counts.iter().zip(weights).map(|(n, w)| n * w).sum();

    target - f64::from(fixed)
}

/// The two judgements that the remaining hits are split between.
///
/// The best case uses the two closest judgements around the required
/// average, the worst case uses the most extreme ones.
fn bracket(
    params: &ManiaHitResultParams,
    free: &[usize],
    counts: &[u32; 5],
    acc: f64,
    remain: u32,
) -> (usize, usize) {
    let weights = params.weights();
    let best = free[0];
    let worst = free[free.len() - 1];

    match params.priority {
        HitResultPriority::WorstCase => (best, worst),
        HitResultPriority::BestCase => {
            let avg = needed_points(params, counts, acc) / f64::from(remain);

            free.windows(2)
                .map(|pair| (pair[0], pair[1]))
                .find(|&(_, lo)| f64::from(weights[lo]) <= avg)
                .unwrap_or((best, worst))
        }
    }
}

/// Amount of the remaining hits that go to `hi`.
fn split(
    params: &ManiaHitResultParams,
    counts: &[u32; 5],
    acc: f64,
    remain: u32,
    hi: usize,
    lo: usize,
) -> u32 {
    let weights = params.weights();

    if hi == lo {
        return remain;
    }

    let needed = needed_points(params, counts, acc);
    let (w_hi, w_lo) = (f64::from(weights[hi]), f64::from(weights[lo]));

    let n_hi = ((needed - f64::from(remain) * w_lo) / (w_hi - w_lo)).round();

    n_hi.clamp(0.0, f64::from(remain)) as u32
}

#[cfg(test)]
mod tests {
    use crate::util::float_ext::FloatExt;

    use super::*;

    fn params(acc: Option<f64>, priority: HitResultPriority) -> ManiaHitResultParams {
        ManiaHitResultParams {
            total_hits: 1000,
            classic: false,
            priority,
            acc,
            n320: None,
            n300: None,
            n200: None,
            n100: None,
            n50: None,
            misses: 0,
        }
    }

    #[test]
    fn no_accuracy() {
        let best = generate_hitresults(&params(None, HitResultPriority::BestCase));
        assert_eq!(best.n320, 1000);

        let worst = generate_hitresults(&params(None, HitResultPriority::WorstCase));
        assert_eq!(worst.n50, 1000);
    }

    #[test]
    fn best_case_uses_neighbours() {
        let state = generate_hitresults(&params(Some(0.95), HitResultPriority::BestCase));

        assert_eq!(state.total_hits(), 1000);
        assert_eq!(state.n100 + state.n50, 0);
        assert!(state.accuracy(false).almost_eq(0.95, 1e-3));
    }

    #[test]
    fn worst_case_uses_extremes() {
        let state = generate_hitresults(&params(Some(0.95), HitResultPriority::WorstCase));

        assert_eq!(state.total_hits(), 1000);
        assert_eq!(state.n300 + state.n200 + state.n100, 0);
        assert!(state.n50 > 0);
        assert!(state.accuracy(false).almost_eq(0.95, 1e-3));
    }

    #[test]
    fn given_counts_are_kept() {
        let mut params = params(Some(0.9), HitResultPriority::BestCase);
        params.n200 = Some(30);
        params.misses = 20;

        let state = generate_hitresults(&params);

        assert_eq!(state.n200, 30);
        assert_eq!(state.misses, 20);
        assert_eq!(state.total_hits(), 1000);
    }

    #[test]
    fn classic_prefers_320s() {
        let mut params = params(Some(1.0), HitResultPriority::BestCase);
        params.classic = true;

        let state = generate_hitresults(&params);

        assert_eq!(state.n320, 1000);
        assert_eq!(state.n300, 0);
    }
}
