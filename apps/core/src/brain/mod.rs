//! # Brain Module
//!
//! Canned-answer engine for the chat endpoint. No model is involved: the
//! input is classified against a fixed rule list and mapped to text.
//!
//! ## Components
//! - `knowledge`: versioned keyword tables, one per domain
//! - `intent`: greeting/farewell/keyword/category/default classification
//! - `resolver`: intent to response text

pub mod intent;
pub mod knowledge;
pub mod resolver;

pub use intent::{Intent, IntentClassifier, IntentResult, MatchMode};
pub use knowledge::{CategoryRule, Domain, KnowledgeBase, KnowledgeEntry};
pub use resolver::ResponseResolver;
