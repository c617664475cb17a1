use crate::error::{HotTermsError, Result};

#[must_use]
pub(super) fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(super) fn parse_usize_at_least(name: &str, raw: &str, min_value: usize) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|value| *value >= min_value)
        .ok_or_else(|| {
            HotTermsError::Validation(format!(
                "invalid {name}: {raw:?} (expected an integer >= {min_value})"
            ))
        })
}

#[must_use]
pub(super) fn std_env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
