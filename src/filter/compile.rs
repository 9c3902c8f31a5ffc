use super::error::FilterError;
use super::alternation::GlobAlternation;
use std::collections::HashSet;

/// Characters that turn a pattern into a glob.
pub const GLOB_META: &[char] = &['*', '?', '['];

/// Reports whether `pattern` contains any glob metacharacter.
pub fn has_meta(pattern: &str) -> bool {
    pattern.contains(GLOB_META)
}

/// A compiled, immutable name matcher.
///
/// The literal variants are shortcuts for pattern sets without
/// metacharacters and answer exactly what the glob engine would.
#[derive(Debug, Clone)]
pub enum Filter {
    Single(String),
    Set(HashSet<String>),
    Glob(GlobAlternation),
}

impl Filter {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Filter::Single(literal) => literal == name,
            Filter::Set(literals) => literals.contains(name),
            Filter::Glob(glob) => glob.matches(name),
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, Filter::Glob(_))
    }
}

/// Compiles a list of name patterns into the cheapest equivalent matcher.
///
/// Returns `Ok(None)` for an empty list; callers treat an absent filter as
/// "do not filter". If any pattern has a glob metacharacter the whole list
/// goes through the glob engine, otherwise plain string comparison is used.
///
/// ```
/// use mecury_agent::filter::compile_filter;
///
/// let filter = compile_filter(&["cpu", "mem", "net*"]).unwrap().unwrap();
/// assert!(filter.matches("cpu"));
/// assert!(filter.matches("network"));
/// assert!(!filter.matches("memory"));
/// ```
pub fn compile_filter<S: AsRef<str>>(patterns: &[S]) -> Result<Option<Filter>, FilterError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    if patterns.iter().any(|pattern| has_meta(pattern.as_ref())) {
        return GlobAlternation::compile(patterns).map(|glob| Some(Filter::Glob(glob)));
    }

    let filter = match patterns {
        [single] => Filter::Single(str::to_string(single.as_ref())),
        _ => Filter::Set(
            patterns
                .iter()
                .map(|pattern| str::to_string(pattern.as_ref()))
                .collect(),
        ),
    };
    Ok(Some(filter))
}
