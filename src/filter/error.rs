use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    /// A glob pattern could not be compiled.
    #[error("Failed to compile pattern '{pattern}': {source}")]
    PatternCompile {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl FilterError {
    pub fn pattern(&self) -> &str {
        match self {
            FilterError::PatternCompile { pattern, .. } => pattern,
        }
    }
}
