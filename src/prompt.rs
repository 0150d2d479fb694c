//! User input handling.
//! A [`Prompter`] only reads raw answers; defaults, coercion and validation live in
//! [`crate::parser`] so every input source behaves the same way.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use dialoguer::{Confirm, Input, MultiSelect, Select};
use log::debug;

use crate::error::Result;
use crate::question::{Question, ValueType};
use crate::style::Style;

/// What the collector asks a prompter for.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub question: &'a Question,
    /// Default rendered as text, the same text the user would type to choose it.
    pub default: Option<&'a str>,
    pub style: &'a Style,
}

impl PromptRequest<'_> {
    /// Prompt line: prompt text followed by the help text, if any.
    pub fn header(&self) -> String {
        let question = self.question;
        if question.help.is_empty() {
            question.prompt.clone()
        } else {
            format!("{}{}{}", question.prompt, self.style.prompt.help_separator, question.help)
        }
    }
}

/// One raw answer as read by a [`Prompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Typed text. Blank text takes the question's default.
    Text(String),
    /// Picked in a selection widget. Used as is, so an empty multiselect stays empty.
    Selection(String),
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        RawInput::Text(text.to_string())
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        RawInput::Text(text)
    }
}

/// Source of raw answers.
pub trait Prompter {
    /// Reads one raw answer. `Ok(None)` means the input source is closed.
    ///
    /// Choice answers are returned as the 1-based index or the value of the choice,
    /// multiselect answers as a comma-separated list of either.
    fn read(&mut self, request: &PromptRequest<'_>) -> Result<Option<RawInput>>;

    /// Reports why the last answer was rejected before the question is asked again.
    fn invalid(&mut self, message: &str, style: &Style);
}

/// Interactive terminal prompter built on dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }

    fn select(
        &self,
        request: &PromptRequest<'_>,
    ) -> std::result::Result<Option<RawInput>, dialoguer::Error> {
        let question = request.question;
        let labels: Vec<&str> = question.choices.iter().map(|c| c.display()).collect();
        let defaults: Vec<&str> =
            request.default.map(|d| d.split(',').map(str::trim).collect()).unwrap_or_default();
        let is_default = |idx: usize| {
            let choice = &question.choices[idx];
            defaults.iter().any(|d| *d == choice.value || *d == (idx + 1).to_string())
        };

        if question.multiselect {
            let flags: Vec<bool> = (0..labels.len()).map(is_default).collect();
            let selection = MultiSelect::new()
                .with_prompt(request.header())
                .items(&labels)
                .defaults(&flags)
                .interact_opt()?;
            Ok(selection.map(|indexes| {
                RawInput::Selection(
                    indexes.iter().map(|idx| (idx + 1).to_string()).collect::<Vec<_>>().join(","),
                )
            }))
        } else {
            let default = (0..labels.len()).find(|idx| is_default(*idx)).unwrap_or(0);
            let selection = Select::new()
                .with_prompt(request.header())
                .default(default)
                .items(&labels)
                .interact_opt()?;
            Ok(selection.map(|idx| RawInput::Selection((idx + 1).to_string())))
        }
    }

    fn confirm(
        &self,
        request: &PromptRequest<'_>,
    ) -> std::result::Result<Option<RawInput>, dialoguer::Error> {
        let default = request
            .default
            .map(|d| matches!(d.to_lowercase().as_str(), "y" | "yes" | "true" | "1"))
            .unwrap_or(false);
        let answer = Confirm::new().with_prompt(request.header()).default(default).interact_opt()?;
        Ok(answer.map(|yes| RawInput::Selection(if yes { "yes" } else { "no" }.to_string())))
    }

    fn text(
        &self,
        request: &PromptRequest<'_>,
    ) -> std::result::Result<Option<RawInput>, dialoguer::Error> {
        let mut input = Input::<String>::new().with_prompt(request.header()).allow_empty(true);
        if let Some(default) = request.default {
            input = input.default(default.to_string());
        }
        input.interact_text().map(|text| Some(RawInput::Text(text)))
    }
}

impl Prompter for DialoguerPrompter {
    fn read(&mut self, request: &PromptRequest<'_>) -> Result<Option<RawInput>> {
        let answer = if request.question.is_choice() {
            self.select(request)
        } else if request.question.value_type == ValueType::Bool {
            self.confirm(request)
        } else {
            self.text(request)
        };
        // Interrupts and closed terminals end the session.
        answer.or_else(|e| {
            debug!("Prompt failed: {e}");
            Ok(None)
        })
    }

    fn invalid(&mut self, message: &str, style: &Style) {
        eprintln!("{} {message}", style.error.label);
    }
}

/// Line-oriented prompter for non-interactive input, such as a pipe.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_header(&mut self, request: &PromptRequest<'_>) -> std::io::Result<()> {
        let style = request.style;
        writeln!(self.output, "{}{}", style.prompt.prefix, request.header())?;
        for (idx, choice) in request.question.choices.iter().enumerate() {
            writeln!(self.output, "  {}) {}", idx + 1, choice.display())?;
        }
        if request.question.multiselect {
            writeln!(self.output, "  Enter comma-separated numbers or values")?;
        }
        if let Some(default) = request.default.filter(|d| !d.is_empty()) {
            writeln!(self.output, "  default: {default}")?;
        }
        write!(self.output, "{} ", style.input_prefix)?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read(&mut self, request: &PromptRequest<'_>) -> Result<Option<RawInput>> {
        self.write_header(request)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(RawInput::Text(line.trim_end_matches(['\r', '\n']).to_string())))
    }

    fn invalid(&mut self, message: &str, style: &Style) {
        let _ = writeln!(self.output, "{} {message}", style.error.label);
    }
}

/// Prompter replaying a fixed list of answers, for embedding and tests.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<RawInput>,
    asked: Vec<String>,
    rejections: Vec<String>,
}

impl ScriptedPrompter {
    /// Replays typed answers. Anything convertible to [`RawInput`] is accepted, so
    /// plain strings and explicit selections can be mixed.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RawInput>,
    {
        Self { answers: answers.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Keys of the questions asked, one entry per attempt.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Messages reported for rejected answers.
    pub fn rejections(&self) -> &[String] {
        &self.rejections
    }
}

impl Prompter for ScriptedPrompter {
    fn read(&mut self, request: &PromptRequest<'_>) -> Result<Option<RawInput>> {
        self.asked.push(request.question.key.clone());
        Ok(self.answers.pop_front())
    }

    fn invalid(&mut self, message: &str, _style: &Style) {
        self.rejections.push(message.to_string());
    }
}
