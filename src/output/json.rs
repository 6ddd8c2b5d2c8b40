//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    /// The actual data
    pub data: T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Position within a paged result set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,

    /// Non-fatal problem encountered while producing the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Page position for search output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Total matches reported by the registry
    pub total: usize,
}

impl<T> JsonOutput<T> {
    /// Create a new JSON output with metadata
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                pagination: None,
                notice: None,
            },
        }
    }

    pub fn with_pagination(mut self, pagination: PageMeta) -> Self {
        self.meta.pagination = Some(pagination);
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.meta.notice = notice;
        self
    }
}

impl<T: Serialize> JsonOutput<T> {
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    JsonOutput::new(data).to_pretty_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Clone)]
    struct TestItem {
        id: String,
        name: String,
    }

    #[test]
    fn test_json_output_new() {
        let output = JsonOutput::new(vec!["item1", "item2"]);

        assert_eq!(output.data, vec!["item1", "item2"]);
        assert_eq!(output.meta.version, env!("CARGO_PKG_VERSION"));
        assert!(!output.meta.timestamp.is_empty());
        assert!(output.meta.pagination.is_none());
    }

    #[test]
    fn test_format_json_basic() {
        let items = vec![TestItem {
            id: "1".to_string(),
            name: "Test".to_string(),
        }];

        let result = format_json(&items).unwrap();

        assert!(result.contains("\"data\""));
        assert!(result.contains("\"meta\""));
        assert!(result.contains("\"id\": \"1\""));
        assert!(!result.contains("\"pagination\""));
        assert!(!result.contains("\"notice\""));
    }

    #[test]
    fn test_format_json_empty_vec() {
        let items: Vec<TestItem> = vec![];
        let result = format_json(&items).unwrap();

        assert!(result.contains("\"data\": []"));
    }

    #[test]
    fn test_pagination_and_notice_in_meta() {
        let output = JsonOutput::new(Vec::<TestItem>::new())
            .with_pagination(PageMeta {
                page: 2,
                total_pages: 3,
                page_size: 10,
                total: 23,
            })
            .with_notice(Some("Unable to connect".to_string()));

        let result = output.to_pretty_string().unwrap();

        assert!(result.contains("\"total_pages\": 3"));
        assert!(result.contains("\"total\": 23"));
        assert!(result.contains("\"notice\": \"Unable to connect\""));
    }
}
