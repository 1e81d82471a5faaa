//! Property-based tests for extension exclusion parsing

use proptest::prelude::*;
use spellcascade_config::ExtensionExclusionSet;

fn extension_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,6}"
}

fn separator_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![" ", ",", ";", ", ", "\t", " | "])
}

proptest! {
    /// Property: every listed extension is excluded, with or without its period, in any case
    #[test]
    fn prop_listed_extensions_excluded(
        extensions in prop::collection::vec(extension_strategy(), 1..8),
        separator in separator_strategy(),
        dotted in any::<bool>(),
    ) {
        let raw = extensions
            .iter()
            .map(|ext| if dotted { format!(".{}", ext) } else { ext.clone() })
            .collect::<Vec<_>>()
            .join(separator);
        let set = ExtensionExclusionSet::parse(&raw);

        for ext in &extensions {
            let upper = ext.to_uppercase();
            let dotted_lower = format!(".{}", ext.to_lowercase());
            prop_assert!(set.contains(Some(upper.as_str())));
            prop_assert!(set.contains(Some(dotted_lower.as_str())));
        }
    }

    /// Property: every entry is normalized to a lowercase, period-prefixed form
    #[test]
    fn prop_entries_normalized(raw in "[a-zA-Z0-9_., ;]{0,40}") {
        let set = ExtensionExclusionSet::parse(&raw);

        for entry in set.iter() {
            prop_assert!(entry.starts_with('.'));
            prop_assert_eq!(entry.to_lowercase(), entry);
        }
    }

    /// Property: the display form parses back to the same set
    #[test]
    fn prop_display_round_trip(raw in "[a-zA-Z0-9_., ;]{0,40}") {
        let set = ExtensionExclusionSet::parse(&raw);
        prop_assert_eq!(ExtensionExclusionSet::parse(&set.to_string()), set);
    }

    /// Property: whitespace-only input excludes nothing
    #[test]
    fn prop_blank_is_empty(raw in "[ \t\r\n]{0,10}") {
        prop_assert!(ExtensionExclusionSet::parse(&raw).is_empty());
    }

    /// Property: an unknown extension is never excluded
    #[test]
    fn prop_none_never_excluded(raw in "[a-z., ]{0,20}") {
        prop_assert!(!ExtensionExclusionSet::parse(&raw).contains(None));
    }
}

#[test]
fn test_documented_examples() {
    let set = ExtensionExclusionSet::parse("txt, .md;log");
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![".log", ".md", ".txt"]);

    let set = ExtensionExclusionSet::parse(".");
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!["."]);

    assert!(ExtensionExclusionSet::parse("").is_empty());
    assert!(ExtensionExclusionSet::parse("   ").is_empty());
}
