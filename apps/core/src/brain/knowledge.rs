//! Knowledge base domains.
//!
//! A domain is one versioned table of canned answers. The bundled domains are
//! compiled into the binary; an external JSON file with the same shape can
//! replace them at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::AppError;

const COAL_DOMAIN: &str = include_str!("../../knowledge/coal.json");
const CRYPTO_DOMAIN: &str = include_str!("../../knowledge/crypto.json");

/// Bundled knowledge base domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Coal mining (the default product)
    Coal,
    /// Cryptocurrency mining
    Crypto,
}

impl Domain {
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Coal => "coal",
            Domain::Crypto => "crypto",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Domain::Coal => COAL_DOMAIN,
            Domain::Crypto => CRYPTO_DOMAIN,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Domain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coal" => Ok(Domain::Coal),
            "crypto" => Ok(Domain::Crypto),
            other => Err(AppError::Config(format!(
                "Unknown knowledge domain '{}' (expected coal or crypto)",
                other
            ))),
        }
    }
}

/// A single keyword and the text returned when it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub keyword: String,
    pub text: String,
}

/// A broad topic checked after the keyword table misses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub triggers: Vec<String>,
    pub text: String,
}

/// The full rule table for one domain. Order of `entries` and `categories`
/// is significant: the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub domain: String,
    pub greetings: Vec<String>,
    pub farewells: Vec<String>,
    pub greeting: String,
    pub farewell: String,
    pub fallback: String,
    pub entries: Vec<KnowledgeEntry>,
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
}

impl KnowledgeBase {
    /// Load one of the bundled domains.
    pub fn bundled(domain: Domain) -> Result<Self, AppError> {
        Self::from_json(domain.source())
    }

    /// Load a domain from an external JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        info!("Loading knowledge base from {:?}", path);
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and normalise a domain definition.
    ///
    /// Keywords and triggers are lowercased because matching runs against the
    /// lowercased input. Duplicate keywords are rejected.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let mut kb: KnowledgeBase = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("Invalid knowledge base: {}", e)))?;

        let lower_all = |words: &mut Vec<String>| {
            for w in words.iter_mut() {
                *w = w.trim().to_lowercase();
            }
            words.retain(|w| !w.is_empty());
        };
        lower_all(&mut kb.greetings);
        lower_all(&mut kb.farewells);
        for category in &mut kb.categories {
            lower_all(&mut category.triggers);
        }

        let mut seen = HashSet::new();
        for entry in &mut kb.entries {
            entry.keyword = entry.keyword.trim().to_lowercase();
            if entry.keyword.is_empty() {
                return Err(AppError::Config(format!(
                    "Empty keyword in knowledge base '{}'",
                    kb.domain
                )));
            }
            if !seen.insert(entry.keyword.clone()) {
                return Err(AppError::Config(format!(
                    "Duplicate keyword '{}' in knowledge base '{}'",
                    entry.keyword, kb.domain
                )));
            }
        }

        Ok(kb)
    }

    /// First entry whose keyword is contained in `text`, in table order.
    /// `text` must already be lowercased.
    pub fn lookup(&self, text: &str) -> Option<(usize, &KnowledgeEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| text.contains(entry.keyword.as_str()))
    }

    /// First category with a trigger contained in `text`.
    pub fn category(&self, text: &str) -> Option<(usize, &CategoryRule)> {
        self.categories
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.triggers.iter().any(|t| text.contains(t.as_str())))
    }
}
