//! Intent classification over a knowledge base.
//!
//! Deterministic rule list: greeting, farewell, keyword table, category
//! fallbacks, default. No scoring.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::knowledge::KnowledgeBase;
use crate::error::AppError;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting (hello, hi, howdy, etc.)
    Greeting,
    /// Farewell (bye, see you, exit, etc.)
    Farewell,
    /// Knowledge base entry at this index
    Keyword(usize),
    /// Category fallback at this index
    Category(usize),
    /// Nothing matched
    Default,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a human-readable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Keyword(_) => "keyword",
            Intent::Category(_) => "category",
            Intent::Default => "default",
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// The keyword or trigger that matched, if any
    pub matched: Option<String>,
}

/// How greeting and farewell words are matched against the input.
///
/// `Substring` is the long-standing behaviour: "hi" matches inside "this" or
/// "machinery". `WholeWord` requires word boundaries on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    WholeWord,
}

impl FromStr for MatchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "whole_word" | "word" => Ok(MatchMode::WholeWord),
            other => Err(AppError::Config(format!(
                "Unknown match mode '{}' (expected substring or whole_word)",
                other
            ))),
        }
    }
}

enum WordMatcher {
    Substring(Vec<String>),
    WholeWord(Vec<(String, Regex)>),
}

impl WordMatcher {
    fn new(words: &[String], mode: MatchMode) -> Result<Self, AppError> {
        match mode {
            MatchMode::Substring => Ok(WordMatcher::Substring(words.to_vec())),
            MatchMode::WholeWord => {
                let patterns = words
                    .iter()
                    .map(|w| {
                        Regex::new(&format!(r"\b{}\b", regex::escape(w)))
                            .map(|re| (w.clone(), re))
                            .map_err(|e| AppError::Config(format!("Invalid word pattern '{}': {}", w, e)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(WordMatcher::WholeWord(patterns))
            }
        }
    }

    fn find(&self, text: &str) -> Option<&str> {
        match self {
            WordMatcher::Substring(words) => words
                .iter()
                .find(|w| text.contains(w.as_str()))
                .map(String::as_str),
            WordMatcher::WholeWord(patterns) => patterns
                .iter()
                .find(|(_, re)| re.is_match(text))
                .map(|(w, _)| w.as_str()),
        }
    }
}

/// Intent classifier bound to one knowledge base
pub struct IntentClassifier {
    kb: Arc<KnowledgeBase>,
    greetings: WordMatcher,
    farewells: WordMatcher,
}

impl IntentClassifier {
    pub fn new(kb: Arc<KnowledgeBase>, mode: MatchMode) -> Result<Self, AppError> {
        let greetings = WordMatcher::new(&kb.greetings, mode)?;
        let farewells = WordMatcher::new(&kb.farewells, mode)?;
        Ok(Self {
            kb,
            greetings,
            farewells,
        })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Classify the intent of a text
    pub fn classify(&self, text: &str) -> IntentResult {
        let text = text.trim().to_lowercase();

        if let Some(word) = self.greetings.find(&text) {
            return IntentResult {
                intent: Intent::Greeting,
                matched: Some(word.to_string()),
            };
        }

        if let Some(word) = self.farewells.find(&text) {
            return IntentResult {
                intent: Intent::Farewell,
                matched: Some(word.to_string()),
            };
        }

        if let Some((index, entry)) = self.kb.lookup(&text) {
            return IntentResult {
                intent: Intent::Keyword(index),
                matched: Some(entry.keyword.clone()),
            };
        }

        if let Some((index, rule)) = self.kb.category(&text) {
            return IntentResult {
                intent: Intent::Category(index),
                matched: Some(rule.name.clone()),
            };
        }

        IntentResult {
            intent: Intent::Default,
            matched: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::knowledge::Domain;

    fn classifier(mode: MatchMode) -> IntentClassifier {
        let kb = Arc::new(KnowledgeBase::bundled(Domain::Coal).unwrap());
        IntentClassifier::new(kb, mode).unwrap()
    }

    #[test]
    fn test_greeting_detection() {
        let c = classifier(MatchMode::Substring);
        assert_eq!(c.classify("Hello there").intent, Intent::Greeting);
        assert_eq!(c.classify("  GOOD MORNING  ").intent, Intent::Greeting);
        assert_eq!(c.classify("howdy").intent, Intent::Greeting);
    }

    #[test]
    fn test_farewell_detection() {
        let c = classifier(MatchMode::Substring);
        let result = c.classify("goodbye");
        assert_eq!(result.intent, Intent::Farewell);
        assert_eq!(result.matched.as_deref(), Some("bye"));
    }

    #[test]
    fn test_substring_mode_matches_inside_words() {
        let c = classifier(MatchMode::Substring);
        // "this" contains "hi"
        assert_eq!(c.classify("is this safe").intent, Intent::Greeting);
    }

    #[test]
    fn test_whole_word_mode_ignores_inner_matches() {
        let c = classifier(MatchMode::WholeWord);
        assert_ne!(c.classify("is this safe").intent, Intent::Greeting);
        assert_eq!(c.classify("hi, anyone there?").intent, Intent::Greeting);
        assert_eq!(c.classify("see you tomorrow").intent, Intent::Farewell);
    }

    #[test]
    fn test_keyword_and_category() {
        let c = classifier(MatchMode::Substring);
        let result = c.classify("Tell me about lignite");
        assert!(matches!(result.intent, Intent::Keyword(_)));
        assert_eq!(result.matched.as_deref(), Some("lignite"));

        let result = c.classify("seam depth");
        assert_eq!(result.intent, Intent::Category(0));
        assert_eq!(result.matched.as_deref(), Some("coal"));
    }

    #[test]
    fn test_default_for_empty() {
        let c = classifier(MatchMode::Substring);
        assert_eq!(c.classify("").intent, Intent::Default);
        assert_eq!(c.classify("   ").intent, Intent::Default);
        assert_eq!(c.classify("").matched, None);
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("substring".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert_eq!("WHOLE_WORD".parse::<MatchMode>().unwrap(), MatchMode::WholeWord);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
