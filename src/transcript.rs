//! Chat transcript model.
//!
//! DESIGN
//! ======
//! The transcript is a list of exchange units, each holding at most one user
//! turn and one assistant turn. Appending reuses the last unit unless it is
//! missing or already holds a turn of the same role. The "thinking"
//! placeholder belongs to the unit waiting for its assistant turn, so the
//! real answer lands next to the question it answers.

use crate::answer::{ChartSpec, ResponseDescriptor};
use crate::presets::{ImageSpec, TableSpec};

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

pub const TYPING_TEXT: &str = "正在思考…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Avatar image shown next to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    pub src: &'static str,
    pub alt: &'static str,
}

impl Role {
    #[must_use]
    pub fn avatar(self) -> Avatar {
        match self {
            Self::User => Avatar { src: "images/user.svg", alt: "用户" },
            Self::Assistant => Avatar { src: "images/assistant.svg", alt: "助手" },
        }
    }
}

/// One rendered message with its optional payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBlock {
    pub role: Role,
    pub text: String,
    pub chart: Option<ChartSpec>,
    pub table: Option<TableSpec>,
    pub image: Option<ImageSpec>,
    pub list: Option<Vec<String>>,
}

impl MessageBlock {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), chart: None, table: None, image: None, list: None }
    }

    #[must_use]
    pub fn assistant(answer: ResponseDescriptor) -> Self {
        Self {
            role: Role::Assistant,
            text: answer.text,
            chart: answer.chart_spec,
            table: answer.table_spec,
            image: answer.image_spec,
            list: answer.list_spec.filter(|items| !items.is_empty()),
        }
    }

    #[must_use]
    pub fn avatar(&self) -> Avatar {
        self.role.avatar()
    }
}

/// A user turn and the assistant turn answering it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeUnit {
    pub user: Option<MessageBlock>,
    pub assistant: Option<MessageBlock>,
    pub typing: bool,
}

impl ExchangeUnit {
    fn holds(&self, role: Role) -> bool {
        match role {
            Role::User => self.user.is_some(),
            Role::Assistant => self.assistant.is_some(),
        }
    }

    fn put(&mut self, block: MessageBlock) {
        match block.role {
            Role::User => self.user = Some(block),
            Role::Assistant => self.assistant = Some(block),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    exchanges: Vec<ExchangeUnit>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exchanges(&self) -> &[ExchangeUnit] {
        &self.exchanges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Append `block`, grouping it into the last exchange when possible.
    pub fn append(&mut self, block: MessageBlock) {
        let needs_new = self
            .exchanges
            .last()
            .is_none_or(|last| last.holds(block.role));
        if needs_new {
            self.exchanges.push(ExchangeUnit::default());
        }
        if let Some(last) = self.exchanges.last_mut() {
            last.put(block);
        }
    }

    /// Show the thinking placeholder on the exchange awaiting an answer.
    pub fn show_typing(&mut self) {
        match self.exchanges.last_mut() {
            Some(last) if last.assistant.is_none() => last.typing = true,
            _ => self.exchanges.push(ExchangeUnit { typing: true, ..ExchangeUnit::default() }),
        }
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.exchanges.iter().any(|e| e.typing)
    }

    /// Remove the placeholder. Returns whether one was shown. An exchange
    /// that only held the placeholder is dropped with it.
    pub fn clear_typing(&mut self) -> bool {
        let mut cleared = false;
        for exchange in &mut self.exchanges {
            cleared |= std::mem::take(&mut exchange.typing);
        }
        self.exchanges
            .retain(|e| e.typing || e.user.is_some() || e.assistant.is_some());
        cleared
    }

    /// Replace the placeholder with the assistant's answer.
    pub fn resolve(&mut self, answer: ResponseDescriptor) {
        self.clear_typing();
        self.append(MessageBlock::assistant(answer));
    }
}
