use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::Error;
use crate::files::file_timestamp;

/// Characters which mark a line as a comment when first.
const COMMENT_CHARS: [char; 3] = ['#', ';', '/'];

/// Settings stored as `key=value` lines.
///
/// This is the device's own plain-text format: blank lines and lines
/// starting with `#`, `;` or `/` are ignored, the first `=` splits key
/// from value (any later `=` belongs to the value), and a key on its own
/// maps to the empty string. Keys and values are whitespace-trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings(BTreeMap<String, String>);

impl FromStr for Settings {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut data = BTreeMap::new();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT_CHARS) {
                continue;
            }

            match line.split_once('=') {
                // Only a key, no value.
                None => {
                    data.insert(line.to_string(), String::new());
                }
                Some((key, value)) => {
                    data.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        Ok(Self(data))
    }
}

impl Settings {
    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert or replace a value.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    /// Whether the key is present with a non-empty value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read settings from a file.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        debug!(path = ?path.as_ref(), "Reading settings");
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    /// The file form: a `timestamp=` line followed by `key=value` lines.
    pub fn render(&self) -> String {
        let mut out = format!("timestamp={}\n", file_timestamp());
        for (key, value) in self.iter() {
            out += &format!("{key}={value}\n");
        }
        out
    }

    /// Write the settings to a file, timestamp line included.
    /// Returns the number of lines written.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<usize, Error> {
        std::fs::write(path, self.render())?;
        Ok(self.len() + 1)
    }
}

impl Display for Settings {
    /// Keys right-aligned to the longest, one `key : value` per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let widest = self.0.keys().map(String::len).max().unwrap_or(0);

        for (key, value) in self.iter() {
            writeln!(f, "{key:>widest$} : {value}")?;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for Settings {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_entries() {
        let settings: Settings = "host=mail.example.com\nport=465\n".parse().unwrap();

        assert_eq!(settings.get("host"), Some("mail.example.com"));
        assert_eq!(settings.get("port"), Some("465"));
        assert_eq!(settings.len(), 2);
    }

    #[test]
    fn skips_comments_and_blanks() {
        let input = "# a comment\n; another\n/ and a third\n\nkey=value\n";
        let settings: Settings = input.parse().unwrap();

        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get("key"), Some("value"));
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let settings: Settings = "pass=a=b=c".parse().unwrap();

        assert_eq!(settings.get("pass"), Some("a=b=c"));
    }

    #[test]
    fn key_without_value_maps_to_empty() {
        let settings: Settings = "lonely".parse().unwrap();

        assert_eq!(settings.get("lonely"), Some(""));
        assert!(!settings.has("lonely"));
    }

    #[test]
    fn keys_and_values_are_trimmed() {
        let settings: Settings = "  host =  mail.example.com  ".parse().unwrap();

        assert_eq!(settings.get("host"), Some("mail.example.com"));
    }

    #[test]
    fn file_round_trip_adds_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("email.cfg");

        let mut settings = Settings::default();
        settings.set("host", "mail.example.com");
        settings.set("user", "someone@example.com");

        let lines = settings.write_to_path(&path).unwrap();
        assert_eq!(lines, 3);

        let read_back = Settings::read_from_path(&path).unwrap();
        assert_eq!(read_back.get("host"), Some("mail.example.com"));
        assert_eq!(read_back.get("user"), Some("someone@example.com"));
        assert!(read_back.has("timestamp"));
    }

    #[test]
    fn display_aligns_keys() {
        let mut settings = Settings::default();
        settings.set("host", "h");
        settings.set("use_tls", "no");

        let printed = settings.to_string();

        assert_eq!(printed, "   host : h\nuse_tls : no\n");
    }
}
