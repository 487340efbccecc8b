use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use exam_core::model::{
    AnswerLabel, Difficulty, ModeDraft, ModeKind, QUESTION_COUNT_DEFAULT, Subject,
    TIMER_MINUTES_DEFAULT,
};
use exam_core::time::{CRITICAL_SECS, format_countdown};
use services::{
    Clock, HttpQuestionSource, InMemoryQuestionSource, QuestionPool, QuestionSourceConfig,
    QuestionSourceError, SessionRunner, TickOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin, stdin};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

mod console;
mod ticker;

use ticker::IntervalTicks;

type Input = Lines<BufReader<Stdin>>;

#[derive(Parser)]
#[command(name = "exam", version, about = "Timed multiple-choice exam practice")]
struct Cli {
    /// Question bank listing endpoint (overrides EXAM_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Load questions from a local JSON file of the same shape instead
    #[arg(long, conflicts_with = "api_url")]
    questions_file: Option<PathBuf>,

    /// Start this mode directly instead of showing the menu
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Subject for --mode subject
    #[arg(long, value_parser = Subject::from_str)]
    subject: Option<Subject>,

    /// Difficulty filter for --mode subject, target level for --mode mock
    #[arg(long, value_parser = Difficulty::from_str)]
    difficulty: Option<Difficulty>,

    /// Number of questions (5-100)
    #[arg(long, default_value_t = QUESTION_COUNT_DEFAULT)]
    count: u32,

    /// Timer length in minutes (5-180)
    #[arg(long, default_value_t = TIMER_MINUTES_DEFAULT)]
    minutes: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Subject,
    Mock,
    Random,
}

impl From<ModeArg> for ModeKind {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Subject => ModeKind::SubjectFiltered,
            ModeArg::Mock => ModeKind::MockTest,
            ModeArg::Random => ModeKind::Random,
        }
    }
}

impl Cli {
    fn preset(&self) -> Option<ModeDraft> {
        let mut draft = ModeDraft::new(ModeKind::from(self.mode?))
            .with_question_count(self.count)
            .with_timer_minutes(self.minutes);
        if let Some(subject) = self.subject {
            draft = draft.with_subject(subject);
        }
        if let Some(difficulty) = self.difficulty {
            draft = draft.with_difficulty(difficulty);
        }
        Some(draft)
    }
}

/// In-test keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Answer(AnswerLabel),
    Next,
    Previous,
    TimeLeft,
    Stop,
    Help,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let word = line.trim().to_ascii_lowercase();
        match word.as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "t" | "time" => Some(Self::TimeLeft),
            "s" | "stop" => Some(Self::Stop),
            "?" | "h" | "help" => Some(Self::Help),
            other => other.parse::<AnswerLabel>().ok().map(Self::Answer),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("EXAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn load_pool(cli: &Cli) -> Result<QuestionPool, QuestionSourceError> {
    if let Some(path) = &cli.questions_file {
        let source = InMemoryQuestionSource::from_path(path)?;
        return QuestionPool::load(&source).await;
    }

    let mut config = QuestionSourceConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = QuestionSourceConfig::new(url)?.with_timeout(config.timeout());
    }
    let source = HttpQuestionSource::new(config)?;
    QuestionPool::load(&source).await
}

/// Reads one trimmed line. `None` means stdin closed.
async fn ask(input: &mut Input, prompt: &str) -> std::io::Result<Option<String>> {
    println!("{prompt}");
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

/// Accepts a 1-based menu number or anything `FromStr` understands.
fn pick<T: Copy + FromStr>(answer: &str, items: &[T]) -> Option<T> {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| items.get(i).copied())
        .or_else(|| answer.parse::<T>().ok())
}

/// Walks the user through mode selection. `None` means quit.
async fn prompt_draft(input: &mut Input) -> std::io::Result<Option<ModeDraft>> {
    let kind = loop {
        console::print_modes();
        let Some(answer) = ask(input, "Mode:").await? else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        if let Some(kind) = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| console::MODES.get(i).copied())
        {
            break kind;
        }
    };
    let mut draft = ModeDraft::new(kind);

    match kind {
        ModeKind::SubjectFiltered => {
            while draft.subject.is_none() {
                console::print_subjects();
                let Some(answer) = ask(input, "Subject:").await? else {
                    return Ok(None);
                };
                draft.subject = pick(&answer, &Subject::ALL);
            }
            console::print_difficulties();
            let Some(answer) = ask(input, "Difficulty (Enter for any):").await? else {
                return Ok(None);
            };
            draft.difficulty = pick(&answer, &Difficulty::ALL);
        }
        ModeKind::MockTest => {
            while draft.difficulty.is_none() {
                console::print_difficulties();
                let Some(answer) = ask(input, "Target difficulty:").await? else {
                    return Ok(None);
                };
                draft.difficulty = pick(&answer, &Difficulty::ALL);
            }
            if let Some(target) = draft.difficulty {
                console::print_distribution(target);
            }
        }
        ModeKind::Random => {}
    }

    let prompt = format!("Number of questions, 5-100 [{QUESTION_COUNT_DEFAULT}]:");
    let Some(answer) = ask(input, &prompt).await? else {
        return Ok(None);
    };
    draft.question_count = answer.parse().unwrap_or(QUESTION_COUNT_DEFAULT);

    let prompt = format!("Timer in minutes, 5-180 [{TIMER_MINUTES_DEFAULT}]:");
    let Some(answer) = ask(input, &prompt).await? else {
        return Ok(None);
    };
    draft.timer_minutes = answer.parse().unwrap_or(TIMER_MINUTES_DEFAULT);

    Ok(Some(draft))
}

/// Runs the question loop until the session completes by any path.
async fn run_session(
    runner: &mut SessionRunner<IntervalTicks>,
    ticks: &mut UnboundedReceiver<u64>,
    input: &mut Input,
) -> Result<(), Box<dyn std::error::Error>> {
    console::print_help();
    if let Some(session) = runner.session() {
        console::print_question(session);
    }

    while runner.is_running() {
        tokio::select! {
            Some(generation) = ticks.recv() => {
                if !runner.ticks().is_current(generation) {
                    continue;
                }
                match runner.tick() {
                    TickOutcome::Ticked { remaining_secs } if remaining_secs == CRITICAL_SECS => {
                        println!("{} left!", format_countdown(remaining_secs));
                    }
                    TickOutcome::Expired => println!("Time is up."),
                    _ => {}
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    runner.stop();
                    break;
                };
                let Some(command) = Command::parse(&line) else {
                    console::print_help();
                    continue;
                };
                match command {
                    Command::Answer(label) => {
                        runner.answer_current(label)?;
                        println!("Answer {label} recorded.");
                        continue;
                    }
                    Command::Next => runner.advance()?,
                    Command::Previous => runner.retreat()?,
                    Command::Stop => runner.stop(),
                    Command::TimeLeft => {
                        if let Some(progress) = runner.progress() {
                            println!("{} left", format_countdown(progress.remaining_secs));
                        }
                        continue;
                    }
                    Command::Help => {
                        console::print_help();
                        continue;
                    }
                }
                if let (true, Some(session)) = (runner.is_running(), runner.session()) {
                    console::print_question(session);
                }
            }
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let pool = load_pool(&cli).await.map_err(|err| {
        eprintln!(
            "Failed to load questions. Check that the question bank is reachable and try again."
        );
        err
    })?;
    tracing::debug!(questions = pool.len(), "question pool ready");
    println!("Loaded {} questions.", pool.len());

    let (ticks, mut tick_rx) = IntervalTicks::new(Duration::from_secs(1));
    let mut runner = SessionRunner::new(Clock::default(), ticks);
    let mut input = BufReader::new(stdin()).lines();
    let mut rng = rand::rng();
    let preset = cli.preset();

    loop {
        let draft = match preset {
            Some(draft) => draft,
            None => match prompt_draft(&mut input).await? {
                Some(draft) => draft,
                None => break,
            },
        };

        runner.choose_mode(draft.kind)?;
        *runner.draft_mut()? = draft;
        if let Err(err) = runner.start_test(pool.questions(), &mut rng) {
            if preset.is_some() {
                return Err(err.into());
            }
            println!("{err}");
            runner.reset();
            continue;
        }

        run_session(&mut runner, &mut tick_rx, &mut input).await?;
        if let Some(report) = runner.report() {
            console::print_report(&report);
        }
        runner.reset();

        if preset.is_some() {
            break;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
