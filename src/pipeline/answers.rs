//! Where interview answers come from.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("failed to read answer: {0}")]
    Io(#[from] io::Error),

    #[error("input closed before the interview finished")]
    Closed,
}

/// Asks the author a question and waits for the answer.
pub trait AnswerProvider {
    fn ask(&mut self, prompt: &str) -> Result<String, AnswerError>;
}

/// Reads answers from a terminal, one line per answer.
pub struct StdinAnswers<R, W> {
    input: R,
    output: W,
}

impl StdinAnswers<io::StdinLock<'static>, io::Stdout> {
    pub fn new() -> Self {
        Self::with_io(io::stdin().lock(), io::stdout())
    }
}

impl Default for StdinAnswers<io::StdinLock<'static>, io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinAnswers<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> AnswerProvider for StdinAnswers<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String, AnswerError> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AnswerError::Closed);
        }
        let trimmed = line.trim_end_matches(|c| c == '\n' || c == '\r').len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// Replays canned answers in order and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts seen so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl AnswerProvider for ScriptedAnswers {
    fn ask(&mut self, prompt: &str) -> Result<String, AnswerError> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or(AnswerError::Closed)
    }
}
