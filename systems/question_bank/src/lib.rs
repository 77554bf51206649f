#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static question bank grouped into (period, difficulty) tiers.
//!
//! The built-in table ships with the crate as TOML and is validated when the
//! bank is constructed, so the session can treat every stored question as
//! well formed.

use std::collections::{BTreeMap, BTreeSet};

use hellas_quest_core::{CategoryFilter, Difficulty, Period, Question, OPTIONS_PER_QUESTION};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_TABLE: &str = include_str!("../data/questions.toml");
const SUPPORTED_TABLE_VERSION: u32 = 1;

/// Reasons a question table may be rejected.
#[derive(Debug, Error)]
pub enum BankError {
    /// The table is not valid TOML or does not match the expected layout.
    #[error("failed to parse question table: {0}")]
    Parse(#[from] toml::de::Error),
    /// The table declares a layout version this build cannot read.
    #[error("unsupported question table version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version declared by the table.
        found: u32,
        /// Version understood by this build.
        expected: u32,
    },
    /// A question does not carry exactly four options.
    #[error("question {text:?} has {found} options; expected {expected}")]
    OptionCount {
        /// Text of the offending question.
        text: String,
        /// Number of options provided.
        found: usize,
        /// Number of options required.
        expected: usize,
    },
    /// A question lists the same option twice.
    #[error("question {text:?} repeats an option")]
    RepeatedOption {
        /// Text of the offending question.
        text: String,
    },
    /// The correct answer is not among the options.
    #[error("question {text:?} names {correct:?} as correct but it is not an option")]
    UnknownAnswer {
        /// Text of the offending question.
        text: String,
        /// Correct answer named by the table.
        correct: String,
    },
    /// Two questions share the same text.
    #[error("question {text:?} appears more than once")]
    DuplicateQuestion {
        /// Repeated question text.
        text: String,
    },
}

#[derive(Debug, Deserialize)]
struct Table {
    version: u32,
    #[serde(default)]
    questions: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    period: Period,
    difficulty: Difficulty,
    text: String,
    options: Vec<String>,
    correct: String,
}

impl Entry {
    fn into_question(self) -> Result<(Difficulty, Question), BankError> {
        let found = self.options.len();
        let Some(correct) = self.options.iter().position(|option| *option == self.correct) else {
            return Err(BankError::UnknownAnswer {
                text: self.text,
                correct: self.correct,
            });
        };
        let options: [String; OPTIONS_PER_QUESTION] =
            self.options.try_into().map_err(|_| BankError::OptionCount {
                text: self.text.clone(),
                found,
                expected: OPTIONS_PER_QUESTION,
            })?;
        let question = Question::new(self.period, self.text.clone(), options, correct)
            .ok_or(BankError::RepeatedOption { text: self.text })?;
        Ok((self.difficulty, question))
    }
}

/// Questions indexed by tier.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    tiers: BTreeMap<(Period, Difficulty), Vec<Question>>,
}

impl QuestionBank {
    /// Loads the question table bundled with the crate.
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Parses and validates a question table.
    pub fn from_toml_str(contents: &str) -> Result<Self, BankError> {
        let table: Table = toml::from_str(contents)?;
        if table.version != SUPPORTED_TABLE_VERSION {
            return Err(BankError::UnsupportedVersion {
                found: table.version,
                expected: SUPPORTED_TABLE_VERSION,
            });
        }

        let questions = table
            .questions
            .into_iter()
            .map(Entry::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_questions(questions)
    }

    /// Builds a bank from already constructed questions, keeping their order.
    pub fn from_questions<I>(questions: I) -> Result<Self, BankError>
    where
        I: IntoIterator<Item = (Difficulty, Question)>,
    {
        let mut seen = BTreeSet::new();
        let mut tiers: BTreeMap<(Period, Difficulty), Vec<Question>> = BTreeMap::new();
        for (difficulty, question) in questions {
            if !seen.insert(question.text().to_owned()) {
                return Err(BankError::DuplicateQuestion {
                    text: question.text().to_owned(),
                });
            }
            tiers
                .entry((question.period(), difficulty))
                .or_default()
                .push(question);
        }
        Ok(Self { tiers })
    }

    /// Questions of a single tier in authored order.
    #[must_use]
    pub fn tier(&self, period: Period, difficulty: Difficulty) -> &[Question] {
        self.tiers
            .get(&(period, difficulty))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of questions across every tier.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Reports whether the bank holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects the unanswered questions matching the filters in random order.
    ///
    /// The `All` filter unions the three periods at `difficulty`. Questions
    /// whose text is in `answered` are skipped. An empty result means the tier
    /// is exhausted.
    pub fn available_questions<R>(
        &self,
        category: CategoryFilter,
        difficulty: Difficulty,
        answered: &BTreeSet<String>,
        rng: &mut R,
    ) -> Vec<&Question>
    where
        R: Rng + ?Sized,
    {
        let mut available: Vec<&Question> = category
            .periods()
            .iter()
            .flat_map(|period| self.tier(*period, difficulty))
            .filter(|question| !answered.contains(question.text()))
            .collect();
        available.shuffle(rng);
        available
    }
}
