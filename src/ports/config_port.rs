//! Configuration access port trait.

pub trait ConfigPort {
    /// Raw value, trimmed by the implementation. `None` when absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Comma-separated value split into trimmed, non-empty items.
    fn get_list(&self, section: &str, key: &str) -> Option<Vec<String>> {
        self.get_string(section, key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}
