//! Brain Module Tests
//!
//! Resolution of chat messages against the bundled coal and crypto domains.

use std::sync::Arc;

use crate::brain::{Domain, Intent, KnowledgeBase, MatchMode, ResponseResolver};

fn resolver(domain: Domain, mode: MatchMode) -> ResponseResolver {
    let kb = Arc::new(KnowledgeBase::bundled(domain).expect("bundled domain loads"));
    ResponseResolver::new(kb, mode).expect("resolver builds")
}

fn entry_text<'a>(r: &'a ResponseResolver, keyword: &str) -> &'a str {
    &r.knowledge()
        .entries
        .iter()
        .find(|e| e.keyword == keyword)
        .unwrap_or_else(|| panic!("no entry for '{}'", keyword))
        .text
}

#[cfg(test)]
mod coal_domain_tests {
    use super::*;

    #[test]
    fn test_keyword_inputs_return_entry_text() {
        let r = resolver(Domain::Coal, MatchMode::Substring);

        let cases = vec![
            ("Tell me about anthracite", "anthracite"),
            ("What is the ash content of Indian coal?", "ash content"),
            ("Explain longwall mining", "longwall"),
            ("DGMS rules for blasting", "dgms"),
            ("coal dust explosion risk", "coal dust"),
        ];

        for (input, keyword) in cases {
            assert_eq!(
                r.resolve(input),
                entry_text(&r, keyword),
                "Expected '{}' entry for '{}'",
                keyword,
                input
            );
        }
    }

    #[test]
    fn test_first_entry_in_table_order_wins() {
        let r = resolver(Domain::Coal, MatchMode::Substring);
        // "sub-bituminous" is listed before "bituminous"
        assert_eq!(r.resolve("sub-bituminous coal"), entry_text(&r, "sub-bituminous"));
        assert_eq!(r.resolve("bituminous coal"), entry_text(&r, "bituminous"));
        // "methane" precedes "ventilation"
        assert_eq!(
            r.resolve("methane and ventilation"),
            entry_text(&r, "methane")
        );
    }

    #[test]
    fn test_greeting_and_farewell_beat_keywords() {
        let r = resolver(Domain::Coal, MatchMode::Substring);
        let kb = r.knowledge();

        assert_eq!(r.resolve("Hello there"), kb.greeting);
        assert_eq!(r.resolve("hello, what is lignite?"), kb.greeting);
        assert_eq!(r.resolve("goodbye"), kb.farewell);
        assert_eq!(r.resolve("bye, thanks for the lignite info"), kb.farewell);
    }

    #[test]
    fn test_category_fallbacks() {
        let r = resolver(Domain::Coal, MatchMode::Substring);
        let kb = r.knowledge();

        assert_eq!(r.classify("open a new coal seam").intent, Intent::Category(0));
        assert_eq!(r.resolve("mining permits"), kb.categories[1].text);
        assert_eq!(r.resolve("analyze my data"), kb.categories[2].text);
        assert_eq!(r.resolve("new equipment"), kb.categories[3].text);
    }

    #[test]
    fn test_fallback_for_unknown_and_blank() {
        let r = resolver(Domain::Coal, MatchMode::Substring);
        let kb = r.knowledge();

        assert_eq!(r.resolve(""), kb.fallback);
        assert_eq!(r.resolve("   "), kb.fallback);
        assert_eq!(r.resolve("weather forecast"), kb.fallback);
        assert!(kb.fallback.starts_with("I specialize in coal mining topics"));
    }

    #[test]
    fn test_substring_mode_greets_on_inner_match() {
        let r = resolver(Domain::Coal, MatchMode::Substring);
        // "machinery" contains "hi"
        assert_eq!(r.resolve("machinery"), r.knowledge().greeting);
    }

    #[test]
    fn test_whole_word_mode_reaches_category() {
        let r = resolver(Domain::Coal, MatchMode::WholeWord);
        assert_eq!(r.resolve("machinery"), r.knowledge().categories[3].text);
        assert_eq!(r.resolve("hi"), r.knowledge().greeting);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let r = resolver(Domain::Coal, MatchMode::Substring);
        assert_eq!(r.resolve("LIGNITE"), r.resolve("lignite"));
    }
}

#[cfg(test)]
mod crypto_domain_tests {
    use super::*;

    #[test]
    fn test_crypto_keywords() {
        let r = resolver(Domain::Crypto, MatchMode::Substring);
        assert_eq!(r.resolve("How profitable is bitcoin"), entry_text(&r, "bitcoin"));
        assert_eq!(r.resolve("best ASIC"), entry_text(&r, "asic"));
        assert_eq!(r.resolve("join a pool"), entry_text(&r, "pool"));
    }

    #[test]
    fn test_crypto_texts() {
        let r = resolver(Domain::Crypto, MatchMode::Substring);
        assert_eq!(
            r.resolve("hello"),
            "Hello! I'm your mining assistant. How can I help you today?"
        );
        assert_eq!(r.resolve("goodbye"), "Goodbye! Happy mining!");
        assert_eq!(
            r.resolve("weather"),
            "I'm not sure about that. Could you ask something about mining?"
        );
    }

    #[test]
    fn test_crypto_has_no_categories() {
        let r = resolver(Domain::Crypto, MatchMode::Substring);
        assert!(r.knowledge().categories.is_empty());
        assert_eq!(r.classify("coal").intent, Intent::Default);
    }
}
