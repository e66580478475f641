//! Drives one play session over the console.

use anyhow::Context;
use quiz_core::model::Award;
use quiz_core::{Answered, SessionOutcome, SessionPhase, SessionResult, Step, Verdict};
use services::{PersistStatus, PlayService};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::console::Console;
use crate::screens;
use crate::theme::Theme;

/// Play one session to its end.
///
/// Returns `None` when no session could be started. Read failures abort the
/// session; only write failures are returned as errors.
pub async fn run_session<R, W>(
    console: &mut Console<R, W>,
    service: &PlayService,
    theme: Theme,
) -> anyhow::Result<Option<SessionOutcome>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = match service.start_session() {
        Ok(session) => session,
        Err(err) => {
            console
                .writeln(&theme.error(&format!("Cannot start a game: {err}.")))
                .await?;
            return Ok(None);
        }
    };

    console.writeln(&theme.heading("=== Play Game ===")).await?;

    loop {
        let prompt = match session.phase() {
            SessionPhase::AwaitingName => screens::name_prompt(),
            SessionPhase::AwaitingAnswer => {
                let progress = service.progress(&session);
                let question = session
                    .current_question()
                    .context("session has no current question")?;
                screens::question(
                    theme,
                    progress.current.unwrap_or(1),
                    progress.total,
                    question,
                )
            }
            SessionPhase::AwaitingHelpAnswer => "Your answer (A/B/C/D): ".to_owned(),
            SessionPhase::Terminated => break,
        };
        console.write(&prompt).await?;

        let line = match console.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                return abort(console, service, &mut session, theme, "end of input").await;
            }
            Err(err) => {
                let reason = err.to_string();
                return abort(console, service, &mut session, theme, &reason).await;
            }
        };

        let result = service
            .submit(&mut session, &line)
            .await
            .context("session rejected input")?;
        render_step(console, theme, &result.step).await?;

        if let Some(finished) = result.finished() {
            render_finish(console, theme, finished).await?;
        }
        if let Some(PersistStatus::Failed(reason)) = &result.persisted {
            console
                .writeln(&theme.error(&format!(
                    "Error: could not save your result ({reason})."
                )))
                .await?;
        }
    }

    Ok(session.outcome())
}

async fn abort<R, W>(
    console: &mut Console<R, W>,
    service: &PlayService,
    session: &mut quiz_core::PlaySession,
    theme: Theme,
    reason: &str,
) -> anyhow::Result<Option<SessionOutcome>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::debug!(reason, "input unavailable during session");
    let outcome = service.abort(session);
    console.writeln("").await?;
    console
        .writeln(&theme.error("Error reading input! The game was abandoned."))
        .await?;
    Ok(Some(outcome))
}

async fn render_step<R, W>(
    console: &mut Console<R, W>,
    theme: Theme,
    step: &Step,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match step {
        Step::NameRejected(err) => {
            console
                .writeln(&theme.error(&format!("Invalid input: {err}.")))
                .await?;
        }
        Step::NameAccepted(name) => {
            console.writeln(&format!("Good luck, {name}!")).await?;
        }
        Step::InvalidAnswer => {
            console
                .writeln(&theme.error("Invalid answer. Please enter A, B, C, D, or H."))
                .await?;
        }
        Step::HelpRevealed { correct } => {
            console
                .writeln(&theme.hint(&format!(
                    "50/50 Help: The correct answer is {correct}."
                )))
                .await?;
            console
                .writeln(&theme.hint("You now get 0.5 points if correct."))
                .await?;
        }
        Step::InvalidHelpAnswer => {
            console
                .writeln(&theme.error("Invalid answer. Please enter A, B, C, or D."))
                .await?;
        }
        Step::Answered(Answered { verdict, .. }) => match verdict {
            Verdict::Correct(award) => {
                console.writeln(&theme.success("✓ CORRECT!")).await?;
                let points = match award {
                    Award::Full => "+1 point.",
                    Award::Half => "+0.5 points.",
                };
                console.writeln(&theme.success(points)).await?;
            }
            Verdict::Wrong { correct } => {
                console
                    .writeln(&theme.error(&format!(
                        "✗ Wrong! The correct answer was {correct}."
                    )))
                    .await?;
            }
        },
    }
    Ok(())
}

async fn render_finish<R, W>(
    console: &mut Console<R, W>,
    theme: Theme,
    finished: &SessionResult,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let record = &finished.record;
    match finished.outcome {
        SessionOutcome::WrongAnswer => {
            console
                .writeln(&format!(
                    "\n{} You scored {} points ({}/{} questions correct).",
                    theme.error("Game Over!"),
                    record.score(),
                    record.questions_answered(),
                    finished.questions_presented
                ))
                .await?;
        }
        SessionOutcome::Completed => {
            console
                .writeln(&format!(
                    "\n{} You finished all questions!",
                    theme.success("🎉 Congratulations!")
                ))
                .await?;
            console
                .writeln(&format!(
                    "Total score: {} ({}/{} questions correct)",
                    theme.label(&format!("{} points", record.score())),
                    record.questions_answered(),
                    finished.total_questions
                ))
                .await?;
        }
        SessionOutcome::Aborted => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quiz_core::QuestionBank;
    use quiz_core::model::{OptionLetter, Question};
    use quiz_core::time::fixed_clock;
    use services::Clock;
    use storage::repository::{HistoryRepository, InMemoryRepository};

    fn service(correct: &[OptionLetter], repo: &InMemoryRepository) -> PlayService {
        let bank: QuestionBank = correct
            .iter()
            .enumerate()
            .map(|(i, letter)| {
                Question::new(
                    format!("Question text {i}"),
                    ["w".into(), "x".into(), "y".into(), "z".into()],
                    *letter,
                )
            })
            .collect();
        let clock: Clock = fixed_clock();
        PlayService::new(clock, Arc::new(bank), Arc::new(repo.clone()))
    }

    async fn play(input: &str, service: &PlayService) -> (Option<SessionOutcome>, String) {
        play_bytes(input.as_bytes(), service).await
    }

    async fn play_bytes(input: &[u8], service: &PlayService) -> (Option<SessionOutcome>, String) {
        let mut console = Console::new(input, Vec::new());
        let outcome = run_session(&mut console, service, Theme::plain())
            .await
            .unwrap();
        (outcome, String::from_utf8(console.into_writer()).unwrap())
    }

    #[tokio::test]
    async fn scripted_game_with_help_and_wrong_answer() {
        use OptionLetter::{A, B, C};
        let repo = InMemoryRepository::new();
        let service = service(&[B, A, C], &repo);

        let (outcome, out) = play("Ada 99\nAda\nB\nh\nA\nD\n", &service).await;
        assert_eq!(outcome, Some(SessionOutcome::WrongAnswer));
        assert!(out.contains("Invalid input: name may only contain letters and spaces"));
        assert!(out.contains("50/50 Help: The correct answer is A."));
        assert!(out.contains("+0.5 points."));
        assert!(out.contains("Game Over! You scored 1.5 points (2/3 questions correct)."));
        assert_eq!(repo.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_token_re_presents_question() {
        let repo = InMemoryRepository::new();
        let service = service(&[OptionLetter::C], &repo);

        let (outcome, out) = play("Ada\nX\nc\n", &service).await;
        assert_eq!(outcome, Some(SessionOutcome::Completed));
        assert_eq!(out.matches("Question 1/1").count(), 2);
        assert!(out.contains("Invalid answer. Please enter A, B, C, D, or H."));
        assert!(out.contains("Total score: 1.0 points (1/1 questions correct)"));
    }

    #[tokio::test]
    async fn end_of_input_aborts_without_record() {
        let repo = InMemoryRepository::new();
        let service = service(&[OptionLetter::A, OptionLetter::A], &repo);

        let (outcome, out) = play("Ada\nA\n", &service).await;
        assert_eq!(outcome, Some(SessionOutcome::Aborted));
        assert!(out.contains("Error reading input!"));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn unreadable_answer_aborts_without_record() {
        let repo = InMemoryRepository::new();
        let service = service(&[OptionLetter::A, OptionLetter::A], &repo);

        let (outcome, out) = play_bytes(b"Ada\nA\n\xff\xfe\nA\n", &service).await;
        assert_eq!(outcome, Some(SessionOutcome::Aborted));
        assert!(out.contains("✓ CORRECT!"));
        assert!(out.contains("Error reading input! The game was abandoned."));
        assert!(!out.contains("Congratulations!"));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn empty_bank_issues_no_prompt() {
        let repo = InMemoryRepository::new();
        let service = service(&[], &repo);

        let (outcome, out) = play("Ada\n", &service).await;
        assert_eq!(outcome, None);
        assert!(!out.contains("Enter your name"));
        assert!(repo.is_empty());
    }
}
