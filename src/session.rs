use crate::dataset::Dataset;
use crate::error::{InsightsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A conversation over one prepared dataset. History only grows.
pub struct ChatSession<'a> {
    dataset: &'a Dataset,
    history: Vec<ChatMessage>,
}

impl<'a> ChatSession<'a> {
    pub fn new(dataset: &'a Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(InsightsError::EmptyDataset);
        }
        Ok(Self {
            dataset,
            history: Vec::new(),
        })
    }

    /// Records the question, answers it and records the answer.
    pub fn ask(&mut self, query: &str) -> &str {
        self.push(Role::User, query.to_string());
        let reply = crate::answer(query, self.dataset);
        self.push(Role::Assistant, reply);
        &self.history[self.history.len() - 1].content
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn transcript_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.history)?)
    }

    fn push(&mut self, role: Role, content: String) {
        self.history.push(ChatMessage {
            role,
            content,
            timestamp: Utc::now(),
        });
    }
}
