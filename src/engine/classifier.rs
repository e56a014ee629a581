use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Greeting,
    Interaction,
    Art,
    Introduction,
    Closing,
    History,
    General,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Greeting => "Greeting",
            Tag::Interaction => "Interaction",
            Tag::Art => "Art",
            Tag::Introduction => "Introduction",
            Tag::Closing => "Closing",
            Tag::History => "History",
            Tag::General => "General",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Keyword rules in priority order: the first rule with any match wins,
/// so a phrase like "Bonjour et merci" tags as Greeting, not Closing.
const RULES: &[(&[&str], Tag)] = &[
    (&["bonjour", "bienvenue", "salut"], Tag::Greeting),
    (&["question", "poser", "demander"], Tag::Interaction),
    (&["œuvre", "peinture", "tableau", "salle", "artiste"], Tag::Art),
    (&["commencer", "visite", "aujourd'hui"], Tag::Introduction),
    (&["merci", "au revoir", "bonne journée"], Tag::Closing),
    (&["histoire", "siècle", "époque"], Tag::History),
];

/// Assign a topic tag by case-insensitive keyword lookup.
pub fn classify(text: &str) -> Tag {
    let lower = text.to_lowercase();
    for (keywords, tag) in RULES {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *tag;
        }
    }
    Tag::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        assert_eq!(classify("Bonjour tout le monde"), Tag::Greeting);
    }

    #[test]
    fn test_closing() {
        assert_eq!(classify("merci et au revoir"), Tag::Closing);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("BIENVENUE AU MUSÉE"), Tag::Greeting);
    }

    #[test]
    fn test_earlier_rule_wins() {
        // Contains both Greeting and Closing keywords
        assert_eq!(classify("Bonjour et merci d'être venus"), Tag::Greeting);
    }

    #[test]
    fn test_art_and_history() {
        assert_eq!(classify("Cette peinture date du XVIIe"), Tag::Art);
        assert_eq!(classify("Un peu d'histoire sur ce château"), Tag::History);
    }

    #[test]
    fn test_introduction() {
        assert_eq!(classify("Nous allons commencer la visite"), Tag::Introduction);
    }

    #[test]
    fn test_default_general() {
        assert_eq!(classify("Le déjeuner est servi à midi"), Tag::General);
    }
}
