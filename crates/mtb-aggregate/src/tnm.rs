//! Normalization of hierarchical TNM staging fragments.
//!
//! The source vocabulary carries values the destination terminology cannot
//! represent. Normalization only ever narrows: it returns a cleaned fragment
//! or `None`, never a guess.

use std::sync::LazyLock;

use regex::Regex;

/// Fragment grammar: a main value, then optional subsite letter, count digit
/// and parenthesized tail.
static TNM_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<mainvalue>[0-4X]|is|a)(?P<subsite>[a-e])?(?P<count>\d)?(?P<tail>\(.+\))?")
        .expect("valid TNM fragment pattern")
});

/// Values that exist in the source vocabulary but have no destination
/// representation.
const EXCLUDED_VALUES: &[&str] = &["a", "1mi"];
const EXCLUDED_SUBSITE: &str = "e";

/// Normalizes a raw staging fragment, or returns `None` if the destination
/// terminology has no safe representation for it.
pub fn normalize_tnm(raw: &str) -> Option<String> {
    let captures = TNM_FRAGMENT.captures(raw)?;

    if EXCLUDED_VALUES.contains(&raw) {
        return None;
    }

    let mut normalized = String::new();
    normalized.push_str(captures.name("mainvalue")?.as_str());

    if let Some(subsite) = captures.name("subsite") {
        if subsite.as_str() == EXCLUDED_SUBSITE {
            return None;
        }
        normalized.push_str(subsite.as_str());
    }

    if let Some(count) = captures.name("count") {
        normalized.push('(');
        normalized.push_str(count.as_str());
        normalized.push(')');
    }

    if let Some(tail) = captures.name("tail") {
        normalized.push_str(tail.as_str());
    }

    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(normalize_tnm("0").as_deref(), Some("0"));
        assert_eq!(normalize_tnm("4").as_deref(), Some("4"));
        assert_eq!(normalize_tnm("X").as_deref(), Some("X"));
        assert_eq!(normalize_tnm("is").as_deref(), Some("is"));
    }

    #[test]
    fn subsites_are_kept_except_the_excluded_letter() {
        assert_eq!(normalize_tnm("1a").as_deref(), Some("1a"));
        assert_eq!(normalize_tnm("2b").as_deref(), Some("2b"));
        assert_eq!(normalize_tnm("4e"), None);
    }

    #[test]
    fn excluded_source_values_are_dropped() {
        assert_eq!(normalize_tnm("a"), None);
        assert_eq!(normalize_tnm("1mi"), None);
    }

    #[test]
    fn unparseable_input_is_never_passed_through() {
        assert_eq!(normalize_tnm("xyz"), None);
        assert_eq!(normalize_tnm(""), None);
    }

    #[test]
    fn count_is_parenthesized_and_tail_preserved() {
        assert_eq!(normalize_tnm("22").as_deref(), Some("2(2)"));
        assert_eq!(normalize_tnm("2(sn)").as_deref(), Some("2(sn)"));
        assert_eq!(normalize_tnm("1a2(sn)").as_deref(), Some("1a(2)(sn)"));
    }
}
