//! Pending input requests and validators.
//!
//! An [`InputRequest`] describes one outstanding prompt. It exists only for
//! the duration of one [`Console::read`](crate::Console::read). Option sets
//! generate their own validator depending on the transport's
//! [`InputMode`]: a 1-based index for terminals, the literal option value
//! for structured peers.

use latian_proto::{InputPrompt, as_control_option, control_option};

use crate::{InputMode, InvalidInput};

/// Glyph shown before a first attempt.
pub const PROMPT_GLYPH: &str = "> ";

/// Glyph shown after a rejected attempt.
pub const RETRY_GLYPH: &str = "try again > ";

/// Glyph shown for signal-only reads.
pub const SIGNAL_GLYPH: &str = "press enter...";

/// One input event delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A raw line or answer from the user.
    Line(String),
    /// The user is gone: interrupt, end of input, or disconnect.
    Closed,
}

/// Enumerated options plus trailing control options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    /// Regular options, in display order.
    pub options: Vec<String>,
    /// Control options (`back`, `done`, `cancel`), shown after `options`.
    pub controls: Vec<String>,
}

/// A validated selection from a [`ChoiceSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// One of the regular options.
    Option(String),
    /// The bare name of a control option.
    Control(String),
}

impl ChoiceSet {
    /// Options without controls.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { options: options.into_iter().map(Into::into).collect(), controls: Vec::new() }
    }

    /// Append control options after the regular ones.
    pub fn with_controls<I, S>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controls.extend(controls.into_iter().map(Into::into));
        self
    }

    /// Total number of selectable entries.
    pub fn len(&self) -> usize {
        self.options.len() + self.controls.len()
    }

    /// Whether nothing is selectable.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels as shown on a terminal, controls by bare name.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().chain(self.controls.iter()).map(String::as_str)
    }

    /// Labels as sent on the wire, controls wrapped in markers.
    pub fn wire_options(&self) -> Vec<String> {
        self.options
            .iter()
            .cloned()
            .chain(self.controls.iter().map(|c| control_option(c)))
            .collect()
    }

    /// Resolve a 1-based index.
    pub fn select_index(&self, raw: &str) -> Result<Choice, InvalidInput> {
        let index: usize =
            raw.trim().parse().map_err(|_| InvalidInput::new("expected an option number"))?;
        if index == 0 || index > self.len() {
            return Err(InvalidInput::new("option out of range"));
        }

        let index = index - 1;
        Ok(match self.options.get(index) {
            Some(option) => Choice::Option(option.clone()),
            None => Choice::Control(self.controls[index - self.options.len()].clone()),
        })
    }

    /// Resolve a literal option value, controls in their wire form.
    pub fn select_literal(&self, raw: &str) -> Result<Choice, InvalidInput> {
        if let Some(option) = self.options.iter().find(|o| o.as_str() == raw) {
            return Ok(Choice::Option(option.clone()));
        }
        as_control_option(raw)
            .and_then(|name| self.controls.iter().find(|c| c.as_str() == name))
            .map(|name| Choice::Control(name.clone()))
            .ok_or(InvalidInput::new("not an option"))
    }

    /// Resolve an answer the way `mode` presents options.
    pub fn select(&self, mode: InputMode, raw: &str) -> Result<Choice, InvalidInput> {
        match mode {
            InputMode::Terminal => self.select_index(raw),
            InputMode::Remote => self.select_literal(raw),
        }
    }
}

/// One outstanding prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRequest {
    /// Prompt text.
    pub message: Option<String>,
    /// Enumerated options.
    pub choices: Option<ChoiceSet>,
    /// Any event satisfies the request.
    pub signal_only: bool,
}

impl InputRequest {
    /// Free-form request with an optional message.
    pub fn new(message: Option<&str>) -> Self {
        Self { message: message.map(str::to_string), ..Self::default() }
    }

    /// Signal-only request.
    pub fn signal(message: Option<&str>) -> Self {
        Self { signal_only: true, ..Self::new(message) }
    }

    /// Choice request.
    pub fn choice(choices: ChoiceSet, message: Option<&str>) -> Self {
        Self { choices: Some(choices), ..Self::new(message) }
    }

    /// Wire form sent with an `input` directive.
    pub fn to_prompt(&self) -> InputPrompt {
        InputPrompt {
            message: self.message.clone(),
            signal_only: self.signal_only,
            options: self.choices.as_ref().map(ChoiceSet::wire_options),
        }
    }

    /// Glyph for the given attempt on a terminal.
    pub fn glyph(&self, retry: bool) -> &'static str {
        match (self.signal_only, retry) {
            (true, _) => SIGNAL_GLYPH,
            (false, false) => PROMPT_GLYPH,
            (false, true) => RETRY_GLYPH,
        }
    }
}

/// Accept any non-empty string.
pub fn non_empty(raw: &str) -> Result<String, InvalidInput> {
    if raw.is_empty() {
        return Err(InvalidInput::new("empty"));
    }
    Ok(raw.to_string())
}

/// Accept an integer in the inclusive range `[min, max]`, `max` unbounded if
/// `None`.
pub fn int_in_range(min: i64, max: Option<i64>) -> impl Fn(&str) -> Result<i64, InvalidInput> {
    move |raw| {
        let value: i64 = raw.trim().parse().map_err(|_| InvalidInput::new("not an integer"))?;
        if value < min {
            return Err(InvalidInput::new("below minimum"));
        }
        if max.is_some_and(|max| value > max) {
            return Err(InvalidInput::new("above maximum"));
        }
        Ok(value)
    }
}
