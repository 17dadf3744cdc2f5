//! Maps a classified intent to the canned response text.

use std::sync::Arc;
use tracing::debug;

use super::intent::{Intent, IntentClassifier, IntentResult, MatchMode};
use super::knowledge::KnowledgeBase;
use crate::error::AppError;

/// Total, pure `input -> text` function over one knowledge base.
pub struct ResponseResolver {
    classifier: IntentClassifier,
}

impl ResponseResolver {
    pub fn new(kb: Arc<KnowledgeBase>, mode: MatchMode) -> Result<Self, AppError> {
        Ok(Self {
            classifier: IntentClassifier::new(kb, mode)?,
        })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        self.classifier.knowledge()
    }

    pub fn classify(&self, input: &str) -> IntentResult {
        self.classifier.classify(input)
    }

    /// Resolve a user message to its response. Never fails.
    pub fn resolve(&self, input: &str) -> String {
        let result = self.classify(input);
        debug!(intent = %result.intent, matched = ?result.matched, "Resolved chat intent");
        self.text_for(result.intent).to_string()
    }

    fn text_for(&self, intent: Intent) -> &str {
        let kb = self.knowledge();
        match intent {
            Intent::Greeting => &kb.greeting,
            Intent::Farewell => &kb.farewell,
            Intent::Keyword(i) => kb
                .entries
                .get(i)
                .map(|e| e.text.as_str())
                .unwrap_or(&kb.fallback),
            Intent::Category(i) => kb
                .categories
                .get(i)
                .map(|c| c.text.as_str())
                .unwrap_or(&kb.fallback),
            Intent::Default => &kb.fallback,
        }
    }
}
