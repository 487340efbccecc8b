use crate::model::question::Difficulty;

/// Number of difficulty buckets in a mock test.
pub const BUCKET_COUNT: usize = Difficulty::ALL.len();

/// Percent of a mock test drawn from each bucket, indexed by target then
/// bucket, both in `Difficulty::ALL` order. Every row sums to 100.
const MOCK_TEST_TABLE: [[u32; BUCKET_COUNT]; BUCKET_COUNT] = [
    [60, 30, 10, 0, 0],
    [30, 40, 20, 10, 0],
    [10, 30, 40, 15, 5],
    [0, 10, 30, 40, 20],
    [0, 0, 10, 30, 60],
];

/// Blend of difficulty levels used by a mock test aimed at one target level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distribution {
    target: Difficulty,
}

impl Distribution {
    #[must_use]
    pub fn for_target(target: Difficulty) -> Self {
        Self { target }
    }

    #[must_use]
    pub fn target(&self) -> Difficulty {
        self.target
    }

    /// Percent of the test drawn from `bucket`.
    #[must_use]
    pub fn percent(&self, bucket: Difficulty) -> u32 {
        MOCK_TEST_TABLE[self.target.index()][bucket.index()]
    }

    /// `(bucket, percent)` rows in table order, for previews.
    pub fn rows(&self) -> impl Iterator<Item = (Difficulty, u32)> + '_ {
        Difficulty::ALL
            .into_iter()
            .map(|bucket| (bucket, self.percent(bucket)))
    }

    /// Number of questions to draw from each bucket for a test of `count`.
    ///
    /// Each quota is `round(percent / 100 * count)` with halves rounded up.
    /// When rounding makes the quotas overshoot `count`, the buckets that
    /// gained most from rounding give one back (later buckets first on ties);
    /// when they undershoot, weighted buckets that lost most take one more
    /// (earlier buckets first). Quotas therefore always sum to `count` and
    /// stay within one of the exact share.
    #[must_use]
    pub fn quotas(&self, count: usize) -> [usize; BUCKET_COUNT] {
        let row = MOCK_TEST_TABLE[self.target.index()];
        // Exact shares in hundredths of a question.
        let exact: [usize; BUCKET_COUNT] = row.map(|pct| pct as usize * count);
        let mut quotas = exact.map(|hundredths| (hundredths + 50) / 100);

        let mut total: usize = quotas.iter().sum();
        while total > count {
            let Some(bucket) = (0..BUCKET_COUNT)
                .filter(|&i| quotas[i] > 0)
                .max_by_key(|&i| (quotas[i] * 100).saturating_sub(exact[i]))
            else {
                break;
            };
            quotas[bucket] -= 1;
            total -= 1;
        }
        while total < count {
            let Some(bucket) = (0..BUCKET_COUNT)
                .rev()
                .filter(|&i| row[i] > 0)
                .max_by_key(|&i| exact[i].saturating_sub(quotas[i] * 100))
            else {
                break;
            };
            quotas[bucket] += 1;
            total += 1;
        }

        quotas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_sums_to_one_hundred() {
        for target in Difficulty::ALL {
            let sum: u32 = Distribution::for_target(target).rows().map(|(_, p)| p).sum();
            assert_eq!(sum, 100, "row for {target}");
        }
    }

    #[test]
    fn medium_row_matches_table() {
        let rows: Vec<_> = Distribution::for_target(Difficulty::Medium).rows().collect();
        assert_eq!(
            rows,
            vec![
                (Difficulty::VeryEasy, 10),
                (Difficulty::Easy, 30),
                (Difficulty::Medium, 40),
                (Difficulty::Hard, 15),
                (Difficulty::VeryHard, 5),
            ]
        );
    }

    #[test]
    fn medium_ten_trims_the_rounded_up_tail() {
        // 1 + 3 + 4 + 1.5 + 0.5 rounds to 11; the hardest half-bucket gives one back.
        let quotas = Distribution::for_target(Difficulty::Medium).quotas(10);
        assert_eq!(quotas, [1, 3, 4, 2, 0]);
    }

    #[test]
    fn twenty_questions_round_exactly() {
        assert_eq!(
            Distribution::for_target(Difficulty::Medium).quotas(20),
            [2, 6, 8, 3, 1]
        );
        assert_eq!(
            Distribution::for_target(Difficulty::VeryEasy).quotas(20),
            [12, 6, 2, 0, 0]
        );
    }

    #[test]
    fn quotas_sum_to_count_and_stay_near_exact_share() {
        for target in Difficulty::ALL {
            let dist = Distribution::for_target(target);
            for count in 0..=100 {
                let quotas = dist.quotas(count);
                assert_eq!(quotas.iter().sum::<usize>(), count, "{target} x {count}");
                for bucket in Difficulty::ALL {
                    let exact = dist.percent(bucket) as usize * count;
                    let got = quotas[bucket.index()] * 100;
                    assert!(got.abs_diff(exact) < 100, "{target} x {count} at {bucket}");
                    if dist.percent(bucket) == 0 {
                        assert_eq!(quotas[bucket.index()], 0);
                    }
                }
            }
        }
    }
}
