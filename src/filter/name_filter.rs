use super::compile::{Filter, compile_filter};
use super::error::FilterError;

/// Per-input allow/deny lists applied to metric names.
///
/// A name passes when it matches `namepass` (if set) and does not match
/// `namedrop` (if set). Empty lists leave that side unfiltered.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    namepass: Option<Filter>,
    namedrop: Option<Filter>,
}

impl NameFilter {
    pub fn compile<S: AsRef<str>>(namepass: &[S], namedrop: &[S]) -> Result<Self, FilterError> {
        Ok(Self {
            namepass: compile_filter(namepass)?,
            namedrop: compile_filter(namedrop)?,
        })
    }

    pub fn should_pass(&self, name: &str) -> bool {
        if let Some(pass) = &self.namepass
            && !pass.matches(name)
        {
            return false;
        }
        if let Some(drop) = &self.namedrop
            && drop.matches(name)
        {
            return false;
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.namepass.is_some() || self.namedrop.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_lists_passes_everything() {
        let filter = NameFilter::compile::<&str>(&[], &[]).unwrap();
        assert!(!filter.is_active());
        assert!(filter.should_pass("anything"));
    }

    #[test]
    fn test_namepass_only() {
        let filter = NameFilter::compile(&["cpu*"], &[]).unwrap();
        assert!(filter.should_pass("cpu_usage"));
        assert!(!filter.should_pass("mem"));
    }

    #[test]
    fn test_namedrop_wins_over_namepass() {
        let filter = NameFilter::compile(&["cpu*"], &["cpu_guest"]).unwrap();
        assert!(filter.should_pass("cpu_usage"));
        assert!(!filter.should_pass("cpu_guest"));
    }

    #[test]
    fn test_bad_namedrop_fails() {
        assert!(NameFilter::compile(&["cpu"], &["[cpu"]).is_err());
    }
}
