use crate::AccelError;
use std::path::Path;

/// Class-id to human-readable name mapping.
///
/// Label files are either a JSON string array or one name per line.
#[derive(Clone, Debug, Default)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AccelError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if trimmed.starts_with('[') {
            if let Ok(names) = serde_json::from_str::<Vec<String>>(trimmed) {
                return Self { names };
            }
        }

        let names = trimmed
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { names }
    }

    pub fn get(&self, class_id: u32) -> Option<&str> {
        self.names.get(class_id as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_newline_list() {
        let labels = Labels::parse("ok\ncracked\n\nmissing_cap\n");
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get(1), Some("cracked"));
    }

    #[test]
    fn parses_json_array() {
        let labels = Labels::parse(r#"["ok", "cracked"]"#);
        assert_eq!(labels.get(0), Some("ok"));
        assert_eq!(labels.get(1), Some("cracked"));
    }

    #[test]
    fn malformed_json_falls_back_to_lines() {
        // Not valid JSON, but still line-splittable.
        let labels = Labels::parse("[oops\nsecond");
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn out_of_range_id_is_none() {
        let labels = Labels::parse("only");
        assert_eq!(labels.get(5), None);
    }
}
