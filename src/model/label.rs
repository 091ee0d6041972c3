use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::error::ProfileError;

/// Names of the LTSV labels carrying each required logical field.
///
/// Loaded from a small YAML document so logs with non-default label names can
/// be profiled without rewriting them. Keys absent from the document keep
/// their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelSet {
    pub apptime_label: String,
    pub reqtime_label: String,
    pub status_label: String,
    pub size_label: String,
    pub method_label: String,
    pub uri_label: String,
    pub time_label: String,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            apptime_label: "apptime".into(),
            reqtime_label: "request_time".into(),
            status_label: "status".into(),
            size_label: "size".into(),
            method_label: "method".into(),
            uri_label: "uri".into(),
            time_label: "time".into(),
        }
    }
}

impl LabelSet {
    pub fn from_yaml(path: &Path) -> Result<Self, ProfileError> {
        let load = || -> anyhow::Result<LabelSet> {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            let labels =
                serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
            Ok(labels)
        };
        load().map_err(ProfileError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let labels: LabelSet =
            serde_yaml::from_str("status_label: code\nuri_label: path\n").unwrap();
        assert_eq!(labels.status_label, "code");
        assert_eq!(labels.uri_label, "path");
        assert_eq!(labels.apptime_label, "apptime");
        assert_eq!(labels.reqtime_label, "request_time");
        assert_eq!(labels.size_label, "size");
    }

    #[test]
    fn unreadable_document_is_a_config_error() {
        let err = LabelSet::from_yaml(Path::new("/nonexistent/labels.yml")).unwrap_err();
        assert!(matches!(err, ProfileError::Config(_)));
        assert_eq!(err.exit_code(), 70);
    }
}
