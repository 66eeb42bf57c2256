//! Task name predicates
//!
//! A predicate is a stateless test over a task identifier.

use crate::error::{ConfigError, ConfigResult};
use globset::{Glob, GlobMatcher};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Case-insensitive containment check
///
/// An empty `substring` matches every identifier.
pub fn matches(task_id: &str, substring: &str) -> bool {
    task_id.to_lowercase().contains(&substring.to_lowercase())
}

/// Callable predicate body
pub type PredicateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A condition over a task identifier
#[derive(Clone)]
pub enum Predicate {
    /// Identifier equals the value
    Exact(String),

    /// Identifier contains the value, case-sensitive
    Substring(String),

    /// Identifier contains the value, ignoring case
    CaseInsensitiveSubstring(String),

    /// Identifier matches a glob pattern
    Glob(GlobMatcher),

    /// Identifier matches a regular expression
    Regex(Regex),

    /// Arbitrary test, named for display
    Custom { name: String, test: PredicateFn },
}

impl Predicate {
    /// Default predicate for a plain pattern: case-insensitive substring
    pub fn from_pattern(pattern: impl Into<String>) -> Self {
        Predicate::CaseInsensitiveSubstring(pattern.into())
    }

    pub fn glob(pattern: &str) -> ConfigResult<Self> {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            error: e.to_string(),
        })?;
        Ok(Predicate::Glob(glob.compile_matcher()))
    }

    pub fn regex(pattern: &str) -> ConfigResult<Self> {
        let re = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            error: e.to_string(),
        })?;
        Ok(Predicate::Regex(re))
    }

    pub fn custom<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Evaluate the predicate against a task identifier
    pub fn matches(&self, task_id: &str) -> bool {
        match self {
            Predicate::Exact(value) => task_id == value,
            Predicate::Substring(value) => task_id.contains(value.as_str()),
            Predicate::CaseInsensitiveSubstring(value) => matches(task_id, value),
            Predicate::Glob(matcher) => matcher.is_match(task_id),
            Predicate::Regex(re) => re.is_match(task_id),
            Predicate::Custom { test, .. } => test(task_id),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Exact(value) => write!(f, "is '{}'", value),
            Predicate::Substring(value) => write!(f, "contains '{}' (case-sensitive)", value),
            Predicate::CaseInsensitiveSubstring(value) => write!(f, "contains '{}'", value),
            Predicate::Glob(matcher) => write!(f, "matches glob '{}'", matcher.glob()),
            Predicate::Regex(re) => write!(f, "matches /{}/", re.as_str()),
            Predicate::Custom { name, .. } => write!(f, "{}", name),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_case() {
        assert!(matches("stripReleaseDebugSymbols", "STRIP"));
        assert!(matches("mergeNativeDebugMetadata", "nativedebug"));
        assert!(!matches("compileKotlin", "strip"));
    }

    #[test]
    fn test_matches_empty_substring() {
        assert!(matches("anything", ""));
        assert!(matches("", ""));
        assert!(!matches("", "x"));
    }

    #[test]
    fn test_exact_and_substring() {
        assert!(Predicate::Exact("build".to_string()).matches("build"));
        assert!(!Predicate::Exact("build".to_string()).matches("prebuild"));

        let sub = Predicate::Substring("Native".to_string());
        assert!(sub.matches("extractNativeSymbols"));
        assert!(!sub.matches("extractnativesymbols"));
    }

    #[test]
    fn test_from_pattern_is_case_insensitive() {
        let p = Predicate::from_pattern("extractNativeSymbol");
        assert!(!p.matches("ExtractReleaseNativeSymbolTables"));
        assert!(p.matches("extractnativesymboltables"));
    }

    #[test]
    fn test_glob_predicate() {
        let p = Predicate::glob("merge*DebugMetadata").unwrap();
        assert!(p.matches("mergeReleaseNativeDebugMetadata"));
        assert!(!p.matches("mergeResources"));
    }

    #[test]
    fn test_regex_predicate() {
        let p = Predicate::regex("^strip.*Symbols$").unwrap();
        assert!(p.matches("stripReleaseDebugSymbols"));
        assert!(!p.matches("doNotstripSymbols"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            Predicate::regex("(unclosed"),
            Err(ConfigError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Predicate::glob("[unclosed"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_custom_predicate() {
        let p = Predicate::custom("long names", |id| id.len() > 10);
        assert!(p.matches("aVeryLongTaskName"));
        assert!(!p.matches("short"));
        assert_eq!(p.to_string(), "long names");
    }
}
