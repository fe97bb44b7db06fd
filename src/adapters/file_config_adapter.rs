//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive (stored lower-cased).

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    /// A configuration with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn section_keys(&self, section: &str) -> Option<Vec<String>> {
        let map = self.config.get_map_ref();
        let entries = map.get(&section.to_lowercase())?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[account]
id = alice
initial_deposit = 1000.0

[prices]
AAPL = 150.0
TSLA = 800.0
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("account", "id"), Some("alice".to_string()));
        assert_eq!(
            adapter.get_string("prices", "aapl"),
            Some("150.0".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[account]\nid = a\n").unwrap();
        assert_eq!(adapter.get_string("account", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[account]\ninitial_deposit = 1000.5\n").unwrap();
        assert_eq!(adapter.get_double("account", "initial_deposit", 0.0), 1000.5);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[account]\ninitial_deposit = plenty\n").unwrap();
        assert_eq!(adapter.get_double("account", "initial_deposit", 99.9), 99.9);
        assert_eq!(adapter.get_double("account", "missing", 1.5), 1.5);
    }

    #[test]
    fn get_bool_parses_variants() {
        let adapter = FileConfigAdapter::from_string(
            "[replay]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        assert!(adapter.get_bool("replay", "a", false));
        assert!(adapter.get_bool("replay", "b", false));
        assert!(adapter.get_bool("replay", "c", false));
        assert!(!adapter.get_bool("replay", "d", true));
        assert!(!adapter.get_bool("replay", "e", true));
        assert!(!adapter.get_bool("replay", "f", true));
        assert!(adapter.get_bool("replay", "missing", true));
    }

    #[test]
    fn section_keys_lists_sorted_lowercase_keys() {
        let adapter =
            FileConfigAdapter::from_string("[prices]\nTSLA = 800\nAAPL = 150\n").unwrap();
        assert_eq!(
            adapter.section_keys("prices"),
            Some(vec!["aapl".to_string(), "tsla".to_string()])
        );
        assert_eq!(adapter.section_keys("PRICES").map(|k| k.len()), Some(2));
        assert_eq!(adapter.section_keys("missing"), None);
    }

    #[test]
    fn empty_has_no_sections() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("account", "id"), None);
        assert_eq!(adapter.section_keys("prices"), None);
        assert_eq!(adapter.get_double("account", "initial_deposit", 3.0), 3.0);
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[account]\nid = from_disk\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("account", "id"),
            Some("from_disk".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
