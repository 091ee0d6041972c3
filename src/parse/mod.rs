use std::collections::HashMap;

use crate::model::{
    label::LabelSet,
    record::{Record, StatusClass},
};

/// Split one LTSV line into label -> value pairs.
///
/// A stateless scan: fields are tab-separated, a label runs up to the first
/// ':'. A field without a ':' contributes nothing.
pub fn tokenize(line: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for part in line.split('\t') {
        if let Some((label, value)) = part.split_once(':') {
            fields.insert(label.to_string(), value.to_string());
        }
    }
    fields
}

/// What became of one tokenized line.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Normalized and ready to aggregate.
    Accepted(Record),
    /// A present field failed numeric or URI parsing; the line is dropped.
    Skipped,
}

/// A required label absent from a line. Fatal once a line number is attached.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MissingField {
    pub label: String,
}

/// Validate one label map against the configured labels.
///
/// The apptime value is preferred; when it is present but not numeric (nginx
/// writes "-" for requests that never reach the app) the request-time value
/// is consulted instead. Absence of a required label is fatal, an unparsable
/// fallback is a skip.
pub fn parse_record(
    fields: &HashMap<String, String>,
    labels: &LabelSet,
) -> Result<Parsed, MissingField> {
    let raw_uri = require(fields, &labels.uri_label)?;
    let Some(uri) = normalize_uri(raw_uri) else {
        return Ok(Parsed::Skipped);
    };

    let status = require(fields, &labels.status_label)?;

    let apptime = require(fields, &labels.apptime_label)?;
    let response_time = match apptime.parse::<f64>() {
        Ok(t) => t,
        Err(_) => {
            let reqtime = require(fields, &labels.reqtime_label)?;
            match reqtime.parse::<f64>() {
                Ok(t) => t,
                Err(_) => return Ok(Parsed::Skipped),
            }
        }
    };

    let size = require(fields, &labels.size_label)?;
    let Ok(body_size) = size.parse::<f64>() else {
        return Ok(Parsed::Skipped);
    };

    let method = require(fields, &labels.method_label)?;

    Ok(Parsed::Accepted(Record {
        uri,
        method: method.clone(),
        status: StatusClass::from_code(status),
        response_time,
        body_size,
    }))
}

fn require<'a>(
    fields: &'a HashMap<String, String>,
    label: &str,
) -> Result<&'a String, MissingField> {
    fields.get(label).ok_or_else(|| MissingField {
        label: label.to_string(),
    })
}

/// Strip query and fragment. Values with embedded control bytes are rejected
/// the way a URL parser would reject them.
fn normalize_uri(raw: &str) -> Option<String> {
    if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return None;
    }
    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelSet {
        LabelSet::default()
    }

    fn line(s: &str) -> HashMap<String, String> {
        tokenize(s)
    }

    #[test]
    fn tokenize_splits_on_tabs_and_first_colon() {
        let fields = tokenize("uri:/foo\tstatus:200\ttime:12:34:56\tjunk");
        assert_eq!(fields["uri"], "/foo");
        assert_eq!(fields["status"], "200");
        assert_eq!(fields["time"], "12:34:56");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn accepts_a_complete_line() {
        let fields = line("uri:/foo?q=1\tstatus:200\tapptime:0.123\tsize:512\tmethod:GET");
        let parsed = parse_record(&fields, &labels()).unwrap();
        let Parsed::Accepted(record) = parsed else {
            panic!("expected an accepted record");
        };
        assert_eq!(record.uri, "/foo");
        assert_eq!(record.method, "GET");
        assert_eq!(record.status, Some(StatusClass::Success));
        assert_eq!(record.response_time, 0.123);
        assert_eq!(record.body_size, 512.0);
    }

    #[test]
    fn missing_status_label_is_fatal() {
        let fields = line("uri:/foo\tapptime:0.1\tsize:10\tmethod:GET");
        let err = parse_record(&fields, &labels()).unwrap_err();
        assert_eq!(err.label, "status");
    }

    #[test]
    fn missing_uri_label_is_fatal() {
        let fields = line("status:200\tapptime:0.1\tsize:10\tmethod:GET");
        let err = parse_record(&fields, &labels()).unwrap_err();
        assert_eq!(err.label, "uri");
    }

    #[test]
    fn non_numeric_apptime_falls_back_to_request_time() {
        let fields =
            line("uri:/foo\tstatus:200\tapptime:-\trequest_time:0.456\tsize:10\tmethod:GET");
        let Parsed::Accepted(record) = parse_record(&fields, &labels()).unwrap() else {
            panic!("expected an accepted record");
        };
        assert_eq!(record.response_time, 0.456);
    }

    #[test]
    fn non_numeric_apptime_without_request_time_is_fatal() {
        let fields = line("uri:/foo\tstatus:200\tapptime:-\tsize:10\tmethod:GET");
        let err = parse_record(&fields, &labels()).unwrap_err();
        assert_eq!(err.label, "request_time");
    }

    #[test]
    fn non_numeric_fallback_is_a_skip() {
        let fields =
            line("uri:/foo\tstatus:200\tapptime:-\trequest_time:-\tsize:10\tmethod:GET");
        assert_eq!(parse_record(&fields, &labels()).unwrap(), Parsed::Skipped);
    }

    #[test]
    fn non_numeric_size_is_a_skip() {
        let fields = line("uri:/foo\tstatus:200\tapptime:0.1\tsize:xyz\tmethod:GET");
        assert_eq!(parse_record(&fields, &labels()).unwrap(), Parsed::Skipped);
    }

    #[test]
    fn fragment_is_stripped_from_the_uri() {
        let fields = line("uri:/foo#frag\tstatus:200\tapptime:0.1\tsize:10\tmethod:GET");
        let Parsed::Accepted(record) = parse_record(&fields, &labels()).unwrap() else {
            panic!("expected an accepted record");
        };
        assert_eq!(record.uri, "/foo");
    }

    #[test]
    fn custom_labels_are_honored() {
        let mut labels = LabelSet::default();
        labels.status_label = "code".to_string();
        labels.uri_label = "path".to_string();
        let fields = line("path:/x\tcode:404\tapptime:0.2\tsize:1\tmethod:GET");
        let Parsed::Accepted(record) = parse_record(&fields, &labels).unwrap() else {
            panic!("expected an accepted record");
        };
        assert_eq!(record.status, Some(StatusClass::ClientError));
        assert_eq!(record.uri, "/x");
    }
}
