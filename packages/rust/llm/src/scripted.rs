//! Canned-response model for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use postbrief_shared::{PostbriefError, Result};

use crate::LanguageModel;
use crate::message::{Completion, CompletionRequest};

/// Replays queued completions in order and records every request it sees.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    model: String,
    replies: Mutex<VecDeque<Completion>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Queue a completion.
    pub fn reply(self, completion: Completion) -> Self {
        self.lock_replies().push_back(completion);
        self
    }

    /// Queue a text-only completion.
    pub fn reply_text(self, text: impl Into<String>) -> Self {
        self.reply(Completion::with_text(text))
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Completion>> {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        self.lock_replies()
            .pop_front()
            .ok_or_else(|| PostbriefError::Model(format!("{}: script exhausted", self.model)))
    }
}
