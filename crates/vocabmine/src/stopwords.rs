//! Fixed stop-word list consulted by the normalizer.
//!
//! This list is a behavioral constant, not something to re-derive: it holds
//! articles, conjunctions, the full simple and compound preposition set,
//! auxiliaries and modals, every pronoun class, a closed set of common
//! adverbs and determiners, negation words, and the bound fragments that
//! naive punctuation stripping leaves behind from contractions
//! ("don't" -> "don", "t").

/// Grammatical words excluded from content analysis.
pub const STOP_WORDS: &[&str] = &[
    // Articles
    "the", "a", "an",
    // Conjunctions
    "and", "or", "but", "nor", "so", "yet",
    // Prepositions
    "in", "on", "at", "to", "for", "of", "with", "by", "from", "as",
    "into", "onto", "upon", "about", "above", "across", "after", "against",
    "along", "among", "around", "before", "behind", "below", "beneath",
    "beside", "between", "beyond", "during", "except", "inside", "near",
    "off", "out", "over", "through", "toward", "towards", "under", "until", "til", "till",
    "without", "within", "outside", "throughout", "via", "per", "plus", "minus",
    "despite", "concerning", "considering", "regarding", "including", "excluding",
    "following", "past", "since", "unlike", "like", "worth",
    // Compound prepositions
    "according", "because", "instead", "ahead", "apart", "aside", "away",
    // Auxiliary verbs
    "is", "was", "are", "were", "been", "be", "being",
    "have", "has", "had", "having",
    "do", "does", "did", "doing", "done",
    "will", "would", "could", "should", "may", "might", "can", "must", "shall",
    // Personal pronouns (subject)
    "i", "you", "he", "she", "it", "we", "they",
    // Personal pronouns (object)
    "me", "him", "her", "us", "them",
    // Possessive pronouns
    "my", "mine", "your", "yours", "his", "her", "hers", "its", "our", "ours", "their", "theirs",
    // Reflexive pronouns
    "myself", "yourself", "himself", "herself", "itself", "ourselves", "yourselves", "themselves",
    // Demonstrative pronouns
    "this", "that", "these", "those",
    // Interrogative pronouns
    "who", "whom", "whose", "what", "which",
    // Relative pronouns
    "whoever", "whomever", "whichever", "whatever",
    // Indefinite pronouns
    "all", "another", "any", "anybody", "anyone", "anything", "both",
    "each", "either", "everybody", "everyone", "everything",
    "few", "many", "most", "much", "neither", "nobody", "none", "nothing",
    "one", "other", "others", "several", "some", "somebody", "someone", "something",
    // Adverbs (common)
    "when", "where", "why", "how", "then", "there", "here",
    "now", "just", "only", "very", "too", "also", "well",
    "than", "such", "even", "still", "yet",
    // Determiners
    "every", "own", "same",
    // Negation
    "no", "not", "never",
    // Contraction stems
    "s", "t", "don", "ve", "ll", "d", "re", "m",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn covers_every_category() {
        let set: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        for word in [
            "the", "an", // articles
            "and", "nor", // conjunctions
            "in", "between", "throughout", "according", // prepositions
            "is", "having", "shall", // auxiliaries
            "i", "them", "theirs", "themselves", // pronouns
            "this", "whom", "whoever", "everything", // more pronouns
            "when", "very", "still", // adverbs
            "every", "own", // determiners
            "no", "never", // negation
            "don", "ll", "t", // contraction stems
        ] {
            assert!(set.contains(word), "missing stop word: {word}");
        }
    }

    #[test]
    fn entries_are_lowercase_and_clean() {
        for word in STOP_WORDS {
            assert!(!word.is_empty());
            assert!(word.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
