//! Satisfaction-phrase detection for the trigger hook.

use regex::Regex;
use std::sync::OnceLock;

/// Word-boundary patterns treated as a completion/satisfaction signal,
/// matched case-insensitively against the user's message.
///
/// Known limitation: the list includes common conversational words
/// ("great", "perfect", "done"), so unrelated praise can fire the trigger.
/// No scope-limiting heuristic is applied.
const SATISFACTION_PATTERNS: &[&str] = &[
    r"\blooks?\s+good\b",
    r"\bdone\b",
    r"\bship\s+it\b",
    r"\blgtm\b",
    r"\bperfect\b",
    r"\bgreat\b",
    r"\bawesome\b",
    r"\ball\s+good\b",
    r"\bwe'?re\s+done\b",
    r"\bthat'?s\s+it\b",
    r"\bfinished\b",
    r"\bcomplete\b",
    r"\bapproved\b",
];

static SATISFACTION_RES: OnceLock<Vec<Regex>> = OnceLock::new();

fn satisfaction_res() -> &'static [Regex] {
    SATISFACTION_RES.get_or_init(|| {
        SATISFACTION_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("satisfaction pattern must compile"))
            .collect()
    })
}

/// Whether `text` contains a satisfaction phrase.
pub fn contains_satisfaction(text: &str) -> bool {
    let lower = text.to_lowercase();
    satisfaction_res().iter().any(|re| re.is_match(&lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_common_phrases() {
        for msg in [
            "looks good to me",
            "look good?",
            "we are done here",
            "ship it!",
            "LGTM",
            "that's it, thanks",
            "thats it",
            "we're done",
            "all good on my end",
            "Approved.",
        ] {
            assert!(contains_satisfaction(msg), "expected match: {msg}");
        }
    }

    #[test]
    fn word_boundaries_prevent_substring_matches() {
        for msg in [
            "this is completely different",
            "the donetsk region",
            "that greatness escapes me",
            "unfinishedness",
        ] {
            assert!(!contains_satisfaction(msg), "expected no match: {msg}");
        }
    }

    #[test]
    fn case_insensitive() {
        assert!(contains_satisfaction("DONE"));
        assert!(contains_satisfaction("Perfect"));
    }

    #[test]
    fn plain_text_does_not_match() {
        assert!(!contains_satisfaction("can you also add a flag for this?"));
        assert!(!contains_satisfaction(""));
    }
}
