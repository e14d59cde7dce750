use std::path::PathBuf;

/// Go program loading options
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Load `_test.go` files and external test packages
    pub include_tests: bool,

    /// Directory patterns are resolved against; go.mod is searched from here
    pub working_dir: PathBuf,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            include_tests: true,
            working_dir: PathBuf::from("."),
        }
    }
}

impl LoadConfig {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }
}
