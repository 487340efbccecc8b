use exam_core::model::{Difficulty, Distribution, ModeKind, ReviewStatus, Subject};
use exam_core::time::{format_countdown, is_time_critical};
use services::{ActiveSession, CompletionCause, SessionReport};

pub const MODES: [ModeKind; 3] = [ModeKind::SubjectFiltered, ModeKind::MockTest, ModeKind::Random];

pub fn print_modes() {
    println!();
    println!("Choose a mode:");
    for (i, mode) in MODES.iter().enumerate() {
        let blurb = match mode {
            ModeKind::SubjectFiltered => "focus on one subject",
            ModeKind::MockTest => "blended difficulties around a target level",
            ModeKind::Random => "random questions from all subjects",
        };
        println!("  {}) {} - {blurb}", i + 1, mode.title());
    }
    println!("  q) quit");
}

pub fn print_subjects() {
    for (i, subject) in Subject::ALL.iter().enumerate() {
        println!("  {}) {subject}", i + 1);
    }
}

pub fn print_difficulties() {
    for (i, level) in Difficulty::ALL.iter().enumerate() {
        println!("  {}) {level}", i + 1);
    }
}

pub fn print_distribution(target: Difficulty) {
    println!("Question distribution:");
    for (bucket, percent) in Distribution::for_target(target).rows() {
        println!("  {:<10} {percent:>3}%", bucket.name());
    }
}

pub fn print_help() {
    println!("  a/b/c/d  answer    n  next    p  previous    t  time left    s  stop test");
}

pub fn print_question(session: &ActiveSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();
    let clock = format_countdown(progress.remaining_secs);
    let clock = if is_time_critical(progress.remaining_secs) {
        format!("{clock} !")
    } else {
        clock
    };

    println!();
    println!(
        "Question {} of {}  [{}]  {} | {}",
        progress.position,
        progress.total,
        clock,
        question.subject().trim(),
        question.difficulty().trim()
    );
    println!("{}", question.text());
    let chosen = session.answer(session.current_index());
    for (label, text) in question.options().iter() {
        let marker = if chosen == Some(label) { '*' } else { ' ' };
        println!(" {marker}{label}. {text}");
    }
    if progress.is_last {
        println!("(last question: n finishes the test)");
    }
}

pub fn print_report(report: &SessionReport) {
    let score = &report.score;
    println!();
    match report.cause {
        Some(CompletionCause::Empty) => {
            println!("No questions matched this selection.");
            return;
        }
        Some(CompletionCause::TimedOut) => println!("Time is up!"),
        Some(CompletionCause::Stopped) => {
            println!("Test stopped early: only questions you reached are scored.");
        }
        Some(CompletionCause::Finished) | None => println!("Test complete!"),
    }
    println!("{}%", score.percentage());
    println!(
        "You scored {} out of {} questions ({} wrong, {} unanswered)",
        score.correct(),
        score.total(),
        score.wrong(),
        score.unanswered()
    );
    println!("Time taken: {}", format_countdown(report.time_taken_secs));

    for review in &report.reviews {
        let status = match review.status {
            ReviewStatus::Correct => "correct",
            ReviewStatus::Wrong => "wrong",
            ReviewStatus::Unanswered => "not answered",
        };
        println!();
        println!("{}. {} [{status}]", review.index + 1, review.prompt);
        match &review.chosen {
            Some((label, text)) => println!("   Your answer: {label}. {text}"),
            None => println!("   Your answer: Not answered"),
        }
        println!("   Correct answer: {}. {}", review.correct.0, review.correct.1);
        if !review.explanation.trim().is_empty() {
            println!("   {}", review.explanation);
        }
    }
}
