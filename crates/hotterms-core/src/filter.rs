use regex::{Regex, RegexBuilder};

use crate::error::{HotTermsError, Result};

const PROFANITY_PATTERNS: &[&str] = &[
    r"fuck",
    r"shit",
    r"bitch",
    r"cunt",
    r"asshole",
    r"motherf",
    r"傻[逼比屄]",
    r"他妈的",
    r"操你",
    r"草泥马",
    r"贱人",
];

const GAMBLING_PATTERNS: &[&str] = &[r"赌博", r"博彩", r"六合彩", r"online\s*casino"];

const DRUG_PATTERNS: &[&str] = &[
    r"冰毒",
    r"海洛因",
    // "大麻烦" (big trouble) is an everyday phrase.
    r"大麻(?:$|[^烦])",
    r"cocaine",
    r"heroin",
    r"meth\b",
];

const ADULT_PATTERNS: &[&str] = &[r"色情", r"黄片", r"av女优", r"porn", r"hentai", r"\bxxx\b"];

const VIOLENCE_PATTERNS: &[&str] = &[r"枪支", r"炸药", r"自制炸弹", r"bomb\s*making"];

/// Case-insensitive deny-list matched against the trimmed term at record time.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    pattern: Regex,
    pattern_count: usize,
}

impl ContentFilter {
    pub fn builtin() -> Result<Self> {
        Self::with_extra_patterns(&[])
    }

    /// Extends the built-in deny-list. Extra entries are regular expressions and
    /// can only add to what is blocked.
    pub fn with_extra_patterns(extra: &[String]) -> Result<Self> {
        let mut patterns = builtin_patterns()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        for raw in extra {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            RegexBuilder::new(trimmed).build().map_err(|err| {
                HotTermsError::Validation(format!("invalid blocked pattern {trimmed:?}: {err}"))
            })?;
            patterns.push(trimmed.to_string());
        }

        let joined = patterns
            .iter()
            .map(|pattern| format!("(?:{pattern})"))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&joined)
            .case_insensitive(true)
            .unicode(true)
            .build()
            .map_err(|err| HotTermsError::Internal(format!("content filter build failed: {err}")))?;

        Ok(Self {
            pattern,
            pattern_count: patterns.len(),
        })
    }

    #[must_use]
    pub fn is_blocked(&self, term: &str) -> bool {
        self.pattern.is_match(term.trim())
    }

    #[must_use]
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }
}

fn builtin_patterns() -> impl Iterator<Item = &'static str> {
    PROFANITY_PATTERNS
        .iter()
        .chain(GAMBLING_PATTERNS)
        .chain(DRUG_PATTERNS)
        .chain(ADULT_PATTERNS)
        .chain(VIOLENCE_PATTERNS)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_profanity_case_insensitively_as_substring() {
        let filter = ContentFilter::builtin().expect("filter");
        assert!(filter.is_blocked("FuCk"));
        assert!(filter.is_blocked("what the shit movie"));
        assert!(filter.is_blocked("你个傻逼"));
        assert!(filter.is_blocked("  PORN  "));
    }

    #[test]
    fn blocks_disallowed_topical_categories() {
        let filter = ContentFilter::builtin().expect("filter");
        assert!(filter.is_blocked("网上赌博"));
        assert!(filter.is_blocked("哪里买冰毒"));
        assert!(filter.is_blocked("Online Casino bonus"));
        assert!(filter.is_blocked("自制炸弹教程"));
        assert!(filter.is_blocked("买大麻"));
        assert!(filter.is_blocked("大麻种子"));
        assert!(filter.is_blocked("真他妈的"));
    }

    #[test]
    fn allows_ordinary_terms() {
        let filter = ContentFilter::builtin().expect("filter");
        for term in [
            "电影",
            "游戏",
            "rust async",
            "weather tomorrow",
            "java method",
            "其他妈妈",
            "大麻烦",
        ] {
            assert!(!filter.is_blocked(term), "{term} should be allowed");
        }
    }

    #[test]
    fn extra_patterns_extend_the_builtin_list() {
        let filter = ContentFilter::with_extra_patterns(&[
            "spoiler".to_string(),
            "   ".to_string(),
        ])
        .expect("filter");
        assert!(filter.is_blocked("Endgame SPOILER"));
        assert!(filter.is_blocked("fuck"));
        assert_eq!(
            filter.pattern_count(),
            ContentFilter::builtin().expect("builtin").pattern_count() + 1
        );
    }

    #[test]
    fn invalid_extra_pattern_is_a_validation_error() {
        let err = ContentFilter::with_extra_patterns(&["(unclosed".to_string()])
            .expect_err("must reject");
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }
}
