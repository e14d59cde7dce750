/// Extraction policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Keep symbols declared in test-only files (tagged with `test`)
    pub include_tests: bool,

    /// Emit member-access links when the receiver is interface-typed
    pub interface_member_links: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            include_tests: true,
            interface_member_links: false,
        }
    }
}

impl ExtractConfig {
    pub fn without_tests(mut self) -> Self {
        self.include_tests = false;
        self
    }

    pub fn with_interface_member_links(mut self, enabled: bool) -> Self {
        self.interface_member_links = enabled;
        self
    }
}
