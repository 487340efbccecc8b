use exam_core::model::{AnswerLabel, Difficulty, ModeKind, Options, Question, QuestionId, Subject};
use exam_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{
    Clock, CompletionCause, InMemoryQuestionSource, ManualTicks, QuestionPool, SessionPhase,
    SessionRunner,
};

fn question(id: u64, subject: Subject, difficulty: Difficulty, correct: AnswerLabel) -> Question {
    Question::new(
        QuestionId::new(id),
        subject.name(),
        difficulty.name(),
        format!("Question {id}"),
        Options::new("alpha", "beta", "gamma", "delta"),
        correct,
        format!("Explanation {id}"),
    )
    .unwrap()
}

fn runner() -> SessionRunner<ManualTicks> {
    SessionRunner::new(Clock::fixed(fixed_now()), ManualTicks::new())
}

#[tokio::test]
async fn subject_test_with_short_pool_starts_with_what_exists() {
    // 20 questions, only 3 tagged Logical Reasoning.
    let mut questions = Vec::new();
    for id in 1..=20 {
        let subject = if id <= 3 {
            Subject::LogicalReasoning
        } else {
            Subject::GeneralKnowledge
        };
        questions.push(question(id, subject, Difficulty::Easy, AnswerLabel::A));
    }
    let pool = QuestionPool::load(&InMemoryQuestionSource::new(questions))
        .await
        .unwrap();

    let mut runner = runner();
    runner.choose_mode(ModeKind::SubjectFiltered).unwrap();
    {
        let draft = runner.draft_mut().unwrap();
        draft.subject = Some(Subject::LogicalReasoning);
        draft.question_count = 5;
        draft.timer_minutes = 1;
    }

    let selected = runner
        .start_test(pool.questions(), &mut StdRng::seed_from_u64(17))
        .unwrap();

    assert_eq!(selected, 3);
    assert_eq!(runner.phase(), SessionPhase::Running);
    let session = runner.session().unwrap();
    assert!(
        session
            .questions()
            .iter()
            .all(|q| Subject::LogicalReasoning.matches(q.subject()))
    );
}

#[test]
fn mock_test_medium_ten_uses_rounded_bucket_counts() {
    let mut questions = Vec::new();
    let mut id = 0;
    for level in Difficulty::ALL {
        for _ in 0..12 {
            id += 1;
            questions.push(question(id, Subject::GeneralScience, level, AnswerLabel::B));
        }
    }

    let mut runner = runner();
    runner.choose_mode(ModeKind::MockTest).unwrap();
    {
        let draft = runner.draft_mut().unwrap();
        draft.difficulty = Some(Difficulty::Medium);
        draft.question_count = 10;
    }
    let selected = runner
        .start_test(&questions, &mut StdRng::seed_from_u64(10))
        .unwrap();
    assert!(selected <= 10);

    let session = runner.session().unwrap();
    let count = |level: Difficulty| {
        session
            .questions()
            .iter()
            .filter(|q| q.difficulty_level() == Some(level))
            .count()
    };
    assert_eq!(count(Difficulty::VeryEasy), 1);
    assert_eq!(count(Difficulty::Easy), 3);
    assert_eq!(count(Difficulty::Medium), 4);
    assert_eq!(count(Difficulty::Hard), 2);
    assert_eq!(selected, 10);
}

#[test]
fn scoring_three_questions_one_right_one_wrong_one_blank() {
    let questions = vec![
        question(1, Subject::VerbalAbility, Difficulty::Easy, AnswerLabel::A),
        question(2, Subject::VerbalAbility, Difficulty::Easy, AnswerLabel::B),
        question(3, Subject::VerbalAbility, Difficulty::Easy, AnswerLabel::C),
    ];

    let mut runner = runner();
    runner.choose_mode(ModeKind::SubjectFiltered).unwrap();
    runner.draft_mut().unwrap().subject = Some(Subject::VerbalAbility);
    runner
        .start_test(&questions, &mut StdRng::seed_from_u64(5))
        .unwrap();

    // Answer by position: first right, second wrong, third blank.
    let order: Vec<AnswerLabel> = runner
        .session()
        .unwrap()
        .questions()
        .iter()
        .map(Question::correct_answer)
        .collect();
    runner.record_answer(0, order[0]).unwrap();
    let wrong = AnswerLabel::ALL
        .into_iter()
        .find(|label| *label != order[1])
        .unwrap();
    runner.record_answer(1, wrong).unwrap();

    let score = runner.score_upto(2).unwrap();
    assert_eq!(score.correct(), 1);
    assert_eq!(score.wrong(), 1);
    assert_eq!(score.unanswered(), 1);
    assert_eq!(score.total(), 3);
    assert_eq!(score.percentage(), 33);
}

#[test]
fn full_run_walks_every_question_then_resets() {
    let questions: Vec<Question> = (1..=6)
        .map(|id| question(id, Subject::QuantitativeAptitude, Difficulty::Hard, AnswerLabel::D))
        .collect();

    let mut runner = runner();
    runner.choose_mode(ModeKind::Random).unwrap();
    runner
        .start_test(&questions, &mut StdRng::seed_from_u64(2))
        .unwrap();

    while runner.is_running() {
        runner.answer_current(AnswerLabel::D).unwrap();
        runner.tick();
        runner.advance().unwrap();
    }

    let report = runner.report().unwrap();
    assert_eq!(report.cause, Some(CompletionCause::Finished));
    assert_eq!(report.score.total(), 6);
    assert_eq!(report.score.percentage(), 100);
    assert_eq!(report.time_taken_secs, 6);
    assert_eq!(runner.ticks().starts(), 1);
    assert_eq!(runner.ticks().cancels(), 1);

    runner.reset();
    assert_eq!(runner.phase(), SessionPhase::Unconfigured);
    assert!(runner.score().is_none());
    assert_eq!(runner.ticks().cancels(), 1);
}
