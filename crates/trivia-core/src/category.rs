//! Static keyword classifier for the four trivia domains.
//!
//! Tables are checked in a fixed priority order (entertainment, sports,
//! geography, science) and the first table with a hit wins. There is no
//! scoring. Keywords are lowercase and no keyword appears in two tables.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Entertainment,
    Sports,
    Geography,
    Science,
    General,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entertainment => "entertainment",
            Self::Sports => "sports",
            Self::Geography => "geography",
            Self::Science => "science",
            Self::General => "general",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Entertainment => "🎬",
            Self::Sports => "🏆",
            Self::Geography => "🌍",
            Self::Science => "🔬",
            Self::General => "🧠",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ENTERTAINMENT: &[&str] = &[
    "entertainment",
    "movie",
    "movies",
    "film",
    "films",
    "cinema",
    "tv",
    "television",
    "show",
    "sitcom",
    "actor",
    "actress",
    "celebrity",
    "music",
    "song",
    "album",
    "singer",
    "rapper",
    "oscar",
    "oscars",
    "academy award",
    "emmy",
    "emmys",
    "grammy",
    "broadway",
    "hollywood",
    "netflix",
    "pop culture",
    "director",
];

const SPORTS: &[&str] = &[
    "sports",
    "sport",
    "nfl",
    "nba",
    "mlb",
    "nhl",
    "mls",
    "football",
    "basketball",
    "baseball",
    "hockey",
    "soccer",
    "tennis",
    "golf",
    "boxing",
    "olympics",
    "olympic",
    "super bowl",
    "world series",
    "stanley cup",
    "world cup",
    "championship",
    "quarterback",
    "athlete",
    "premier league",
];

const GEOGRAPHY: &[&str] = &[
    "geography",
    "country",
    "countries",
    "capital",
    "continent",
    "river",
    "mountain",
    "ocean",
    "island",
    "desert",
    "lake",
    "landmark",
    "flag",
    "border",
    "population",
    "city",
    "nation",
    "volcano",
];

const SCIENCE: &[&str] = &[
    "science",
    "physics",
    "chemistry",
    "biology",
    "astronomy",
    "space",
    "nasa",
    "planet",
    "element",
    "atom",
    "dna",
    "genetics",
    "invention",
    "inventor",
    "technology",
    "tech",
    "computer",
    "animal",
    "dinosaur",
    "scientist",
    "discovery",
    "math",
    "medicine",
];

/// Priority-ordered keyword tables.
pub const TABLES: &[(Category, &[&str])] = &[
    (Category::Entertainment, ENTERTAINMENT),
    (Category::Sports, SPORTS),
    (Category::Geography, GEOGRAPHY),
    (Category::Science, SCIENCE),
];

fn first_table(pred: impl Fn(&str) -> bool) -> Option<Category> {
    TABLES
        .iter()
        .find(|(_, kws)| kws.iter().any(|k| pred(k)))
        .map(|(c, _)| *c)
}

/// Map a query plus optional hint to a domain.
///
/// A non-empty hint is tried first: whole-keyword equality across all tables,
/// then "hint contains keyword". Only when the hint names nothing is the query
/// scanned for keyword substrings.
pub fn classify(query: &str, hint: &str) -> Category {
    let hint = hint.trim().to_lowercase();
    if !hint.is_empty() {
        if let Some(c) = first_table(|k| k == hint) {
            return c;
        }
        if let Some(c) = first_table(|k| hint.contains(k)) {
            return c;
        }
    }
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Category::General;
    }
    first_table(|k| query.contains(k)).unwrap_or(Category::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn tables_are_disjoint_and_lowercase() {
        let mut seen = BTreeSet::new();
        for (_, kws) in TABLES {
            for k in kws.iter() {
                assert_eq!(*k, k.to_lowercase());
                assert!(seen.insert(*k), "duplicate keyword {k}");
            }
        }
    }

    #[test]
    fn hint_wins_over_query() {
        assert_eq!(classify("the eiffel tower movie", "nba"), Category::Sports);
        assert_eq!(classify("super bowl", "Chemistry"), Category::Science);
    }

    #[test]
    fn hint_substring_match() {
        assert_eq!(classify("", "pro football stats"), Category::Sports);
        assert_eq!(classify("", "Capital cities"), Category::Geography);
    }

    #[test]
    fn unknown_hint_falls_through_to_query() {
        assert_eq!(classify("Mount Everest river", "zzz"), Category::Geography);
    }

    #[test]
    fn query_scan_uses_priority_order() {
        // Both "movie" (entertainment) and "nba" (sports) match.
        assert_eq!(classify("nba movie", ""), Category::Entertainment);
        assert_eq!(classify("Planet of the apes", ""), Category::Science);
    }

    #[test]
    fn query_scan_matches_inside_words() {
        // Plain containment, no word boundaries: "electricity" holds "city".
        assert_eq!(classify("history of electricity", ""), Category::Geography);
    }

    #[test]
    fn no_match_is_general() {
        assert_eq!(classify("Roman Empire", ""), Category::General);
        assert_eq!(classify("", ""), Category::General);
        assert_eq!(classify("   ", "   "), Category::General);
    }

    proptest! {
        #[test]
        fn sports_keyword_hint_always_sports(idx in 0usize..SPORTS.len(), query in ".{0,40}") {
            prop_assert_eq!(classify(&query, SPORTS[idx]), Category::Sports);
        }

        #[test]
        fn classify_is_deterministic(query in ".{0,40}", hint in ".{0,12}") {
            prop_assert_eq!(classify(&query, &hint), classify(&query, &hint));
        }
    }
}
