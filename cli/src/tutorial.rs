//! Warm-up comprehension quiz shown before the elicitation.
//!
//! The subject must answer every question correctly to continue. Wrong and
//! missing answers are reported per question and the whole quiz repeats.

use std::io::{BufRead, Write};

use deep_core::UserInputError;
use deep_types::ProcedureKind;

use crate::console::Console;
use crate::host::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    /// Index into `options`.
    pub answer: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quiz {
    pub introduction: &'static [&'static str],
    /// Scenario shown above the questions it applies to, keyed by question index.
    pub scenarios: &'static [(usize, &'static [&'static str])],
    pub questions: &'static [QuizQuestion],
}

/// Grade for a single quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
    Missing,
}

const TIME_QUIZ: Quiz = Quiz {
    introduction: &[
        "You will now be presented with a series of questions about your time preferences.",
        "Each question consists of options to compare. All options are about receiving a \
         certain amount at a specific time.",
        "For example, an option could be: \"Receive $10 in 3 days\", while another option \
         could be: \"Receive $5 today\".",
    ],
    scenarios: &[(
        0,
        &[
            "Consider the following choice:",
            "  Option A: Receive $30 in 3 months",
            "  Option B: Receive $5 today",
        ],
    )],
    questions: &[
        QuizQuestion {
            prompt: "Which of the following is the most you could receive?",
            options: &["$20", "$5", "$30", "$0"],
            answer: 2,
        },
        QuizQuestion {
            prompt: "Which of the following options is more attractive financially?",
            options: &["Receive $10 in 2 weeks", "Receive $10 today"],
            answer: 1,
        },
        QuizQuestion {
            prompt: "Which of the following options is more attractive financially?",
            options: &["Receive $10 in 2 weeks", "Receive $20 in 2 weeks"],
            answer: 1,
        },
    ],
};

const RISK_QUIZ: Quiz = Quiz {
    introduction: &[
        "You will now be presented with a series of questions about gambles.",
        "Each gamble has two potential outcomes, which may be gains or losses. Each outcome \
         has some chance of occurring, and the two chances add up to 100%.",
        "For example, one gamble could be: 10% chance to win $50, 90% chance to lose $1.",
        "In each question you will indicate which of the two options you would rather play.",
    ],
    scenarios: &[
        (
            0,
            &[
                "Consider the following gamble:",
                "  Gamble A: 30% chance to win $20, 70% chance to win $5",
            ],
        ),
        (
            2,
            &[
                "Now consider the following gamble:",
                "  Gamble B: 10% chance to win $50, 90% chance to lose $1",
            ],
        ),
    ],
    questions: &[
        QuizQuestion {
            prompt: "What is the most money you could win if you played Gamble A?",
            options: &["$20", "$5", "$50", "I would lose $1"],
            answer: 0,
        },
        QuizQuestion {
            prompt: "Is the following statement true or false? \
                     \"If I played Gamble A, I would make at least $5.\"",
            options: &["True", "False"],
            answer: 0,
        },
        QuizQuestion {
            prompt: "What is the chance that you would lose money playing Gamble B?",
            options: &["30%", "70%", "90%", "10%"],
            answer: 2,
        },
        QuizQuestion {
            prompt: "What is the most likely outcome in Gamble B?",
            options: &["Winning $50", "Winning $1", "Losing $1"],
            answer: 2,
        },
    ],
};

#[must_use]
pub const fn quiz_for(kind: ProcedureKind) -> &'static Quiz {
    match kind {
        ProcedureKind::Time => &TIME_QUIZ,
        ProcedureKind::Risk => &RISK_QUIZ,
    }
}

impl Quiz {
    /// Grade `answers` (one slot per question, `None` for unanswered).
    #[must_use]
    pub fn grade(&self, answers: &[Option<usize>]) -> Vec<Feedback> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, question)| match answers.get(i).copied().flatten() {
                None => Feedback::Missing,
                Some(answer) if answer == question.answer => Feedback::Correct,
                Some(_) => Feedback::Incorrect,
            })
            .collect()
    }

    #[must_use]
    pub fn passed(feedback: &[Feedback]) -> bool {
        feedback.iter().all(|f| *f == Feedback::Correct)
    }

    fn scenario_before(&self, index: usize) -> Option<&'static [&'static str]> {
        self.scenarios
            .iter()
            .find(|(at, _)| *at == index)
            .map(|(_, lines)| *lines)
    }
}

/// Parse a 1-based option number typed by the subject.
fn parse_answer(raw: &str, option_count: usize) -> Option<usize> {
    let n: usize = raw.trim().parse().ok()?;
    (1..=option_count).contains(&n).then(|| n - 1)
}

/// Run the quiz until every answer is correct.
pub fn run<R: BufRead, W: Write>(
    kind: ProcedureKind,
    console: &mut Console<R, W>,
) -> Result<(), HostError> {
    let quiz = quiz_for(kind);
    for line in quiz.introduction {
        console.say(line)?;
    }

    let mut attempt = 1u32;
    loop {
        console.blank()?;
        console.say("Warm Up Questions")?;
        console.say(
            "To make sure that you understand your task, please answer a few simple \
             questions. You will continue only if you respond correctly.",
        )?;

        let mut answers = Vec::with_capacity(quiz.questions.len());
        for (i, question) in quiz.questions.iter().enumerate() {
            if let Some(lines) = quiz.scenario_before(i) {
                console.blank()?;
                for line in lines {
                    console.say(line)?;
                }
            }
            console.blank()?;
            console.say(format!("{}. {}", i + 1, question.prompt))?;
            for (n, option) in question.options.iter().enumerate() {
                console.say(format!("  {}) {option}", n + 1))?;
            }
            let reply = console
                .ask(&format!("Your answer (1-{}):", question.options.len()))?
                .ok_or(HostError::InputClosed)?;
            answers.push(parse_answer(&reply, question.options.len()));
        }

        let feedback = quiz.grade(&answers);
        if Quiz::passed(&feedback) {
            tracing::debug!(?kind, attempt, "warm-up quiz passed");
            console.blank()?;
            console.say("Thank you. The survey will now begin.")?;
            return Ok(());
        }

        tracing::debug!(?kind, attempt, ?feedback, "warm-up quiz failed");
        console.blank()?;
        for (i, grade) in feedback.iter().enumerate() {
            match grade {
                Feedback::Correct => {}
                Feedback::Missing => {
                    console.say(format!("Question {}: {}", i + 1, UserInputError::NoSelection))?;
                }
                Feedback::Incorrect => {
                    console.say(format!(
                        "Question {}: That answer is incorrect. Please try again.",
                        i + 1
                    ))?;
                }
            }
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use deep_types::ProcedureKind;

    use super::{Feedback, Quiz, parse_answer, quiz_for, run};
    use crate::console::Console;
    use crate::host::HostError;

    #[test]
    fn answer_keys_are_in_range() {
        for kind in ProcedureKind::ALL {
            for question in quiz_for(kind).questions {
                assert!(question.answer < question.options.len(), "{}", question.prompt);
            }
        }
    }

    #[test]
    fn answer_keys_match_expected_options() {
        let key = |kind| -> Vec<&'static str> {
            quiz_for(kind)
                .questions
                .iter()
                .map(|q| q.options[q.answer])
                .collect()
        };
        assert_eq!(
            key(ProcedureKind::Time),
            ["$30", "Receive $10 today", "Receive $20 in 2 weeks"]
        );
        assert_eq!(key(ProcedureKind::Risk), ["$20", "True", "90%", "Losing $1"]);
    }

    #[test]
    fn grade_reports_each_question() {
        let quiz = quiz_for(ProcedureKind::Time);
        let feedback = quiz.grade(&[Some(2), None, Some(0)]);
        assert_eq!(
            feedback,
            [Feedback::Correct, Feedback::Missing, Feedback::Incorrect]
        );
        assert!(!Quiz::passed(&feedback));
        assert!(Quiz::passed(&quiz.grade(&[Some(2), Some(1), Some(1)])));
    }

    #[test]
    fn parse_answer_is_one_based_and_bounded() {
        assert_eq!(parse_answer(" 3 ", 4), Some(2));
        assert_eq!(parse_answer("0", 4), None);
        assert_eq!(parse_answer("5", 4), None);
        assert_eq!(parse_answer("", 4), None);
        assert_eq!(parse_answer("two", 4), None);
    }

    #[test]
    fn quiz_repeats_until_correct() {
        // First attempt: last answer wrong and second missing. Second attempt passes.
        let input = "3\n\n1\n3\n2\n2\n";
        let mut console = Console::new(input.as_bytes(), Vec::new());

        run(ProcedureKind::Time, &mut console).unwrap();

        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output.matches("Warm Up Questions").count(), 2);
        assert!(output.contains("Question 2: Please answer this question."));
        assert!(output.contains("Question 3: That answer is incorrect."));
        assert!(output.contains("The survey will now begin."));
    }

    #[test]
    fn quiz_fails_when_input_ends() {
        let mut console = Console::new("1\n2\n".as_bytes(), Vec::new());
        let err = run(ProcedureKind::Risk, &mut console).unwrap_err();
        assert!(matches!(err, HostError::InputClosed));
    }
}
