//! Regex-backed helpers for pulling structured fragments out of free-form
//! model text. All helpers are total: on no match they return an empty
//! collection or `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:\w+)?\n(.*?)\n```").expect("static pattern"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s*([^\n]+)").expect("static pattern"));

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*•]\s*([^\n]+)").expect("static pattern"));

static NUMBERED_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s*([^?]*\?)").expect("static pattern"));

static BULLET_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-*•]\s*([^?]*\?)").expect("static pattern"));

static STANDALONE_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][^.!?]*\?)").expect("static pattern"));

static HINT_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)level\s*(\d)").expect("static pattern"));

static TIME_COMPLEXITY_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)time complexity.*?O\([^)]+\)").expect("static pattern"));

static SPACE_COMPLEXITY_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)space complexity.*?O\([^)]+\)").expect("static pattern"));

static TIME_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)time.*?O\([^)]+\)").expect("static pattern"));

static SPACE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)space.*?O\([^)]+\)").expect("static pattern"));

static TIME_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)time.*?O\([^)]+\).*?O\([^)]+\)").expect("static pattern"));

static SPACE_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)space.*?O\([^)]+\).*?O\([^)]+\)").expect("static pattern"));

static APPROACH_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:approach|solution|method)\s*\d*:?\s*([^\n]+)").expect("static pattern")
});

/// The longest fenced code block in the text, fence language tag stripped.
pub fn longest_code_block(text: &str) -> Option<String> {
    CODE_BLOCK
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .max_by_key(|block| block.len())
        .map(|block| block.as_str().trim().to_string())
}

/// Numbered and bulleted list items, optionally filtered to those mentioning
/// any of `keywords` (case-insensitive). At most 10 items, numbered first.
pub fn list_items(text: &str, keywords: &[&str]) -> Vec<String> {
    let items = NUMBERED_ITEM
        .captures_iter(text)
        .chain(BULLET_ITEM.captures_iter(text))
        .filter_map(|captures| captures.get(1))
        .map(|item| item.as_str().trim().to_string());

    if keywords.is_empty() {
        items.take(10).collect()
    } else {
        items
            .filter(|item| {
                let lowered = item.to_lowercase();
                keywords.iter().any(|keyword| lowered.contains(&keyword.to_lowercase()))
            })
            .take(10)
            .collect()
    }
}

/// Questions found in numbered lists, bullet lists, or standing alone.
/// Duplicates are dropped, order of first appearance kept. Only questions
/// longer than `min_chars` survive; at most `cap` are returned.
pub fn questions(text: &str, cap: usize, min_chars: usize) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let sources = [&NUMBERED_QUESTION, &BULLET_QUESTION, &STANDALONE_QUESTION];
    for pattern in sources {
        for captures in pattern.captures_iter(text) {
            if let Some(question) = captures.get(1) {
                let trimmed = question.as_str().trim();
                if trimmed.chars().count() > min_chars
                    && !found.iter().any(|existing| existing == trimmed)
                {
                    found.push(trimmed.to_string());
                }
            }
        }
    }
    found.truncate(cap);
    found
}

/// The single digit following "level" in the text, or `default`.
pub fn hint_level(text: &str, default: u8) -> u8 {
    HINT_LEVEL
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|digit| digit.as_str().parse().ok())
        .unwrap_or(default)
}

/// Full "time complexity ... O(...)" phrase, when present.
pub fn time_complexity_phrase(text: &str) -> Option<String> {
    TIME_COMPLEXITY_PHRASE.find(text).map(|found| found.as_str().to_string())
}

pub fn space_complexity_phrase(text: &str) -> Option<String> {
    SPACE_COMPLEXITY_PHRASE.find(text).map(|found| found.as_str().to_string())
}

/// Looser "time ... O(...)" mention used when a full phrase is not required.
pub fn time_complexity_mention(text: &str) -> Option<String> {
    TIME_MENTION.find(text).map(|found| found.as_str().to_string())
}

pub fn space_complexity_mention(text: &str) -> Option<String> {
    SPACE_MENTION.find(text).map(|found| found.as_str().to_string())
}

/// Before/after comparison: a time (or space) mention followed by a second
/// O(...) expression on the same logical stretch of text.
pub fn time_complexity_comparison(text: &str) -> Option<String> {
    TIME_COMPARISON.find(text).map(|found| found.as_str().to_string())
}

pub fn space_complexity_comparison(text: &str) -> Option<String> {
    SPACE_COMPARISON.find(text).map(|found| found.as_str().to_string())
}

/// Headlines like "Approach 1: ..." or "Solution: ...", at most three.
pub fn approach_headers(text: &str) -> Vec<String> {
    APPROACH_HEADER
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|header| header.as_str().trim().to_string())
        .take(3)
        .collect()
}

/// First sentence (split on '.') containing any indicator, case-insensitive.
pub fn sentence_containing(text: &str, indicators: &[&str]) -> Option<String> {
    text.split('.').find_map(|sentence| {
        let lowered = sentence.to_lowercase();
        indicators
            .iter()
            .any(|indicator| lowered.contains(&indicator.to_lowercase()))
            .then(|| sentence.trim().to_string())
    })
}

/// Every sentence containing any indicator, in order, at most `cap`.
pub fn sentences_containing(text: &str, indicators: &[&str], cap: usize) -> Vec<String> {
    text.split('.')
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            indicators.iter().any(|indicator| lowered.contains(&indicator.to_lowercase()))
        })
        .map(|sentence| sentence.trim().to_string())
        .take(cap)
        .collect()
}

/// Which of `terms` appear in the text (case-insensitive), in the order given,
/// at most `cap`.
pub fn terms_present(text: &str, terms: &[&str], cap: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    terms
        .iter()
        .filter(|term| lowered.contains(&term.to_lowercase()))
        .map(|term| term.to_string())
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        approach_headers, hint_level, list_items, longest_code_block, questions,
        sentence_containing, sentences_containing, space_complexity_phrase, terms_present,
        time_complexity_comparison, time_complexity_phrase,
    };

    #[test]
    fn longest_code_block_wins_over_shorter_ones() {
        let text = "Short:\n```python\nx = 1\n```\nLonger:\n```python\ndef solve(nums):\n    return sorted(nums)\n```\n";
        let block = longest_code_block(text).expect("block");
        assert!(block.starts_with("def solve"));
    }

    #[test]
    fn no_fence_means_no_code() {
        assert_eq!(longest_code_block("just prose, no code"), None);
    }

    #[test]
    fn list_items_collects_numbered_then_bullets() {
        let text = "1. First idea\n2. Second idea\n- bullet one\n* bullet two\n";
        let items = list_items(text, &[]);
        assert_eq!(items, vec!["First idea", "Second idea", "bullet one", "bullet two"]);
    }

    #[test]
    fn list_items_keyword_filter_is_case_insensitive() {
        let text = "1. Try a hash map\n2. Consider sorting first\n- Improve the loop\n";
        let items = list_items(text, &["try", "consider"]);
        assert_eq!(items, vec!["Try a hash map", "Consider sorting first"]);
    }

    #[test]
    fn list_items_caps_at_ten() {
        let text = (1..=14).map(|n| format!("{n}. item {n}\n")).collect::<String>();
        assert_eq!(list_items(&text, &[]).len(), 10);
    }

    #[test]
    fn questions_dedupe_across_patterns() {
        // The numbered question also matches the standalone pattern.
        let text = "1. What happens with an empty input?\n- How about duplicates?\nWhy does sorting help here?";
        let found = questions(text, 8, 0);
        assert_eq!(
            found,
            vec![
                "What happens with an empty input?",
                "How about duplicates?",
                "Why does sorting help here?"
            ]
        );
    }

    #[test]
    fn short_questions_are_filtered_by_min_chars() {
        let text = "Why?\nWhat trade-offs appear if the input no longer fits in memory?";
        let found = questions(text, 6, 30);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("What trade-offs"));
    }

    #[test]
    fn hint_level_reads_the_digit_or_falls_back() {
        assert_eq!(hint_level("This is a Level 4 hint.", 3), 4);
        assert_eq!(hint_level("no level marker here", 3), 3);
    }

    #[test]
    fn complexity_phrases_capture_the_big_o() {
        let text = "The time complexity is O(n log n) while the space complexity stays O(1).";
        assert_eq!(time_complexity_phrase(text).as_deref(), Some("time complexity is O(n log n)"));
        assert_eq!(space_complexity_phrase(text).as_deref(), Some("space complexity stays O(1)"));
        assert_eq!(time_complexity_phrase("no big-o here"), None);
    }

    #[test]
    fn comparison_needs_two_big_o_expressions() {
        let text = "Time went from O(n^2) down to O(n) after the rewrite.";
        let comparison = time_complexity_comparison(text).expect("comparison");
        assert!(comparison.contains("O(n^2)"));
        assert!(comparison.ends_with("O(n)"));
        assert_eq!(time_complexity_comparison("Time is O(n)."), None);
    }

    #[test]
    fn approach_headers_stop_at_three() {
        let text = "Approach 1: brute force\nApproach 2: hash map\nMethod: two pointers\nSolution 4: dp\n";
        let headers = approach_headers(text);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0], "brute force");
    }

    #[test]
    fn sentence_containing_returns_the_first_hit() {
        let text = "The rewrite is faster. However, it uses more memory. It is still worth it.";
        let sentence = sentence_containing(text, &["however", "trade-off"]);
        assert_eq!(sentence.as_deref(), Some("However, it uses more memory"));
        assert_eq!(sentence_containing(text, &["trade-off"]), None);
    }

    #[test]
    fn sentences_containing_collects_every_hit_up_to_cap() {
        let text = "This maps to production use. Unrelated filler. \
                    In practice the index would be sharded. More filler. \
                    Industry systems cache this. A final industry note.";
        let found = sentences_containing(text, &["production", "practice", "industry"], 3);
        assert_eq!(found.len(), 3);
        assert!(found[0].contains("production"));
        assert!(found[2].contains("Industry systems"));
    }

    #[test]
    fn terms_present_keeps_catalog_order() {
        let text = "Use a sliding window after the two pointer pass.";
        let found =
            terms_present(text, &["two pointer", "sliding window", "binary search"], 3);
        assert_eq!(found, vec!["two pointer", "sliding window"]);
    }
}
