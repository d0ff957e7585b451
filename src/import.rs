//! Bulk import of simple HTTP monitors
//!
//! Rows come from a spreadsheet export with the columns `Monitor Name`,
//! `Frequency`, `Enabled`, `Type`, `URL`, `Method`, `Request Body`,
//! `Locations` and optionally `Description`. Any other column is a tag whose
//! key is the column name. Reading the file is left to the caller; this
//! module only turns already split rows into monitor documents.

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::monitor::Tag;

const NAME: &str = "Monitor Name";
const FREQUENCY: &str = "Frequency";
const ENABLED: &str = "Enabled";
const TYPE: &str = "Type";
const URL: &str = "URL";
const METHOD: &str = "Method";
const DESCRIPTION: &str = "Description";
const REQUEST_BODY: &str = "Request Body";
const LOCATIONS: &str = "Locations";

const KNOWN_COLUMNS: &[&str] = &[
    NAME,
    FREQUENCY,
    ENABLED,
    TYPE,
    URL,
    METHOD,
    DESCRIPTION,
    REQUEST_BODY,
    LOCATIONS,
];

/// One row of a simple HTTP monitor sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleHttpRow {
    pub name: String,
    pub frequency_min: u32,
    pub enabled: bool,
    pub monitor_type: String,
    pub url: String,
    pub method: String,
    /// Falls back to the URL
    pub description: Option<String>,
    pub request_body: Option<String>,
    pub locations: Vec<String>,
    pub tags: Vec<Tag>,
}

impl SimpleHttpRow {
    /// Build a row from `(column name, cell)` pairs in sheet order.
    ///
    /// Empty cells count as missing. Tag columns with an empty cell become
    /// key-only tags.
    pub fn from_columns<I, K, V>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cells: Vec<(String, String)> = Vec::new();
        let mut tags = Vec::new();
        for (column, cell) in columns {
            let (column, cell) = (column.as_ref().trim(), cell.as_ref().trim());
            if KNOWN_COLUMNS.contains(&column) {
                cells.push((column.to_string(), cell.to_string()));
            } else {
                let value = (!cell.is_empty()).then(|| cell.to_string());
                tags.push(Tag::new(column, value));
            }
        }

        let cell = |column: &str| -> Option<String> {
            cells
                .iter()
                .find(|(c, v)| c == column && !v.is_empty())
                .map(|(_, v)| v.clone())
        };
        let required =
            |column: &str| cell(column).ok_or_else(|| Error::import_row(column, "missing value"));

        let frequency = required(FREQUENCY)?;
        let frequency_min = frequency
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u32)
            .ok_or_else(|| {
                Error::import_row(FREQUENCY, format!("not a whole number: {}", frequency))
            })?;

        let enabled = required(ENABLED)?;
        let enabled = match enabled.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => return Err(Error::import_row(ENABLED, format!("not a boolean: {}", enabled))),
        };

        Ok(Self {
            name: required(NAME)?,
            frequency_min,
            enabled,
            monitor_type: required(TYPE)?,
            url: required(URL)?,
            method: required(METHOD)?,
            description: cell(DESCRIPTION),
            request_body: cell(REQUEST_BODY),
            locations: required(LOCATIONS)?
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            tags,
        })
    }

    pub fn is_http(&self) -> bool {
        self.monitor_type == "HTTP"
    }

    /// Monitor document for a single-request HTTP monitor
    pub fn to_document(&self) -> Result<Value> {
        let mut request = json!({
            "description": self.description.as_deref().unwrap_or(&self.url),
            "url": self.url,
            "method": self.method,
            "configuration": {
                "acceptAnyCertificate": true,
                "followRedirects": true
            },
            "preProcessingScript": "",
            "postProcessingScript": ""
        });
        if let Some(ref body) = self.request_body {
            request["requestBody"] = Value::String(body.clone());
        }

        Ok(json!({
            "name": self.name,
            "frequencyMin": self.frequency_min,
            "enabled": self.enabled,
            "type": "HTTP",
            "script": {
                "version": "1.0",
                "requests": [request]
            },
            "locations": self.locations,
            "tags": serde_json::to_value(&self.tags)?,
            "manuallyAssignedApps": []
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Monitor Name", "shop home"),
            ("Frequency", "15"),
            ("Enabled", "True"),
            ("Type", "HTTP"),
            ("URL", "https://shop.example.com"),
            ("Method", "GET"),
            ("Request Body", ""),
            ("Locations", "GEOLOCATION-1, GEOLOCATION-2"),
            ("team", "web"),
            ("critical", ""),
        ]
    }

    #[test]
    fn test_row_from_columns() {
        let row = SimpleHttpRow::from_columns(columns()).unwrap();
        assert_eq!(row.frequency_min, 15);
        assert!(row.enabled);
        assert!(row.is_http());
        assert_eq!(row.request_body, None);
        assert_eq!(row.locations, ["GEOLOCATION-1", "GEOLOCATION-2"]);
        assert_eq!(
            row.tags,
            vec![
                Tag::new("team", Some("web".to_string())),
                Tag::new("critical", None)
            ]
        );
    }

    #[test]
    fn test_document_keeps_tags_and_frequency_apart() {
        let doc = SimpleHttpRow::from_columns(columns())
            .unwrap()
            .to_document()
            .unwrap();
        assert_eq!(doc["frequencyMin"], 15);
        assert_eq!(
            doc["tags"],
            json!([{"key": "team", "value": "web"}, {"key": "critical"}])
        );
        let request = &doc["script"]["requests"][0];
        assert_eq!(request["description"], "https://shop.example.com");
        assert!(request.get("requestBody").is_none());
        assert_eq!(request["configuration"]["followRedirects"], true);
    }

    #[test]
    fn test_body_and_description() {
        let mut cols = columns();
        cols[6] = ("Request Body", "{\"q\":1}");
        cols.push(("Description", "search"));
        let doc = SimpleHttpRow::from_columns(cols).unwrap().to_document().unwrap();
        let request = &doc["script"]["requests"][0];
        assert_eq!(request["requestBody"], "{\"q\":1}");
        assert_eq!(request["description"], "search");
    }

    #[test]
    fn test_float_frequency_from_spreadsheet() {
        let mut cols = columns();
        cols[1] = ("Frequency", "5.0");
        assert_eq!(SimpleHttpRow::from_columns(cols).unwrap().frequency_min, 5);
    }

    #[test]
    fn test_bad_cells() {
        let mut cols = columns();
        cols[1] = ("Frequency", "often");
        assert!(matches!(
            SimpleHttpRow::from_columns(cols),
            Err(Error::InvalidImportRow { ref column, .. }) if column == "Frequency"
        ));

        let mut cols = columns();
        cols[2] = ("Enabled", "maybe");
        assert!(SimpleHttpRow::from_columns(cols).is_err());

        let mut cols = columns();
        cols.remove(4);
        assert!(matches!(
            SimpleHttpRow::from_columns(cols),
            Err(Error::InvalidImportRow { ref column, .. }) if column == "URL"
        ));
    }
}
