use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use exam_core::model::{BUCKET_COUNT, Difficulty, Distribution, ModeConfig, Question};

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub questions: Vec<Question>,
    /// Selected questions per difficulty level, in `Difficulty::ALL` order.
    /// Questions with an unrecognised difficulty tag are not counted.
    pub per_difficulty: [usize; BUCKET_COUNT],
}

impl SelectionPlan {
    fn new(questions: Vec<Question>) -> Self {
        let mut per_difficulty = [0; BUCKET_COUNT];
        for level in questions.iter().filter_map(Question::difficulty_level) {
            per_difficulty[level.index()] += 1;
        }
        Self {
            questions,
            per_difficulty,
        }
    }

    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn count_for(&self, level: Difficulty) -> usize {
        self.per_difficulty[level.index()]
    }
}

/// Picks the ordered question list for a session from the full pool.
///
/// Selection is a pure function of the pool, the mode and the random source;
/// it never fails and may return fewer questions than requested.
pub struct SessionSelector<'a> {
    pool: &'a [Question],
}

impl<'a> SessionSelector<'a> {
    #[must_use]
    pub fn new(pool: &'a [Question]) -> Self {
        Self { pool }
    }

    pub fn build<R: Rng + ?Sized>(&self, config: &ModeConfig, rng: &mut R) -> SelectionPlan {
        let count = usize::try_from(config.params().question_count()).unwrap_or(usize::MAX);

        let questions = match config {
            ModeConfig::SubjectFiltered {
                subject,
                difficulty,
                ..
            } => {
                let matching = self
                    .pool
                    .iter()
                    .filter(|q| subject.matches(q.subject()))
                    .filter(|q| difficulty.is_none_or(|level| level.matches(q.difficulty())))
                    .cloned()
                    .collect();
                shuffle_take(matching, count, rng)
            }
            ModeConfig::MockTest { target, .. } => self.blend(*target, count, rng),
            ModeConfig::Random { .. } => shuffle_take(self.pool.to_vec(), count, rng),
        };

        SelectionPlan::new(questions)
    }

    /// Draws each difficulty bucket's quota without replacement, then
    /// shuffles the concatenation so buckets are interleaved.
    fn blend<R: Rng + ?Sized>(
        &self,
        target: Difficulty,
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let quotas = Distribution::for_target(target).quotas(count);
        let mut selected = Vec::with_capacity(count);

        for bucket in Difficulty::ALL {
            let quota = quotas[bucket.index()];
            if quota == 0 {
                continue;
            }
            let candidates: Vec<&Question> = self
                .pool
                .iter()
                .filter(|q| bucket.matches(q.difficulty()))
                .collect();
            selected.extend(
                candidates
                    .choose_multiple(rng, quota)
                    .map(|question| (*question).clone()),
            );
        }

        selected.shuffle(rng);
        selected
    }
}

/// Selects questions for `config` from `pool`. See [`SessionSelector`].
pub fn select<R: Rng + ?Sized>(
    pool: &[Question],
    config: &ModeConfig,
    rng: &mut R,
) -> Vec<Question> {
    SessionSelector::new(pool).build(config, rng).questions
}

fn shuffle_take<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    questions.shuffle(rng);
    questions.truncate(count);
    questions
}
