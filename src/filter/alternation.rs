use super::error::FilterError;
use super::syntax::expand;
use glob::{Pattern, PatternError};

/// A set of glob patterns evaluated as one alternation, `{a,b,c}`.
///
/// Each pattern may itself expand into several branches (`{a,b}`), and a
/// name matches when any branch matches. Wildcards also match `/` and
/// leading dots since metric names are not paths.
#[derive(Debug, Clone)]
pub struct GlobAlternation {
    expression: String,
    branches: Vec<Pattern>,
}

impl GlobAlternation {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FilterError> {
        let mut branches = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compile_error = |source: PatternError| FilterError::PatternCompile {
                pattern: pattern.to_string(),
                source,
            };
            for branch in expand(pattern).map_err(compile_error)? {
                branches.push(Pattern::new(&branch).map_err(compile_error)?);
            }
        }

        let expression = match patterns {
            [single] => str::to_string(single.as_ref()),
            _ => {
                let branches: Vec<&str> = patterns.iter().map(|p| p.as_ref()).collect();
                format!("{{{}}}", branches.join(","))
            }
        };

        Ok(Self {
            expression,
            branches,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.branches.iter().any(|branch| branch.matches(name))
    }

    /// The alternation in `{a,b}` form, or the lone pattern.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}
