use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::kind::LogicalKind;

/// Transport-level hints about what a fetched object is.
///
/// Built once per fetch from the `Content-Type` and `Content-Disposition`
/// response headers, then only read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub mime_type: Option<String>,
    pub suggested_file_name: Option<String>,
}

impl ContentMetadata {
    pub fn new(mime_type: Option<String>, suggested_file_name: Option<String>) -> Self {
        Self {
            mime_type,
            suggested_file_name,
        }
    }

    /// Build metadata from raw header values.
    ///
    /// Blank headers count as absent. The file name is taken from the
    /// `Content-Disposition` value (see [`parse_content_disposition`]).
    pub fn from_headers(content_type: Option<&str>, content_disposition: Option<&str>) -> Self {
        let mime_type = content_type
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let suggested_file_name = content_disposition.and_then(parse_content_disposition);
        Self {
            mime_type,
            suggested_file_name,
        }
    }

    /// Metadata a gateway would report for an object uploaded as `kind`
    /// under its default file name.
    pub fn for_kind(kind: LogicalKind) -> Self {
        Self {
            mime_type: Some(kind.mime_type().to_string()),
            suggested_file_name: Some(kind.default_file_name()),
        }
    }

    /// Infer the logical kind of the object this metadata describes.
    ///
    /// First match wins: a mapped `Content-Type`, then the suffix of the
    /// suggested file name, then `Raw`. An unmapped content type falls
    /// through to the file name.
    pub fn resolve(&self) -> LogicalKind {
        if let Some(kind) = self.mime_type.as_deref().and_then(LogicalKind::from_mime_type) {
            return kind;
        }
        self.suggested_file_name
            .as_deref()
            .and_then(LogicalKind::from_file_name)
            .unwrap_or(LogicalKind::Raw)
    }
}

/// Extract the file name from a `Content-Disposition` header value.
///
/// Accepts `filename="x"`, bare `filename=x`, and the extended
/// `filename*=UTF-8''x` form. The extended form wins when both are present.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let raw = raw.trim();
        if key.eq_ignore_ascii_case("filename*") {
            extended = decode_ext_value(raw);
        } else if key.eq_ignore_ascii_case("filename") {
            plain = Some(unquote(raw));
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

// Splits on `;` outside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => raw.to_string(),
    }
}

// RFC 5987: charset'language'percent-encoded-value
fn decode_ext_value(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, '\'');
    let _charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn content_type_wins_over_file_name() {
        let meta = ContentMetadata::new(
            Some("application/json".into()),
            Some("table.csv".into()),
        );
        assert_eq!(meta.resolve(), LogicalKind::Json);
    }

    #[test]
    fn file_name_used_without_content_type() {
        let meta = ContentMetadata::from_headers(None, Some("attachment; filename=\"file.json\""));
        assert_eq!(meta.suggested_file_name.as_deref(), Some("file.json"));
        assert_eq!(meta.resolve(), LogicalKind::Json);
    }

    #[test]
    fn unknown_content_type_falls_through_to_file_name() {
        let meta = ContentMetadata::new(Some("text/plain".into()), Some("data.parquet".into()));
        assert_eq!(meta.resolve(), LogicalKind::Columnar);
    }

    #[test]
    fn explicit_octet_stream_is_raw() {
        let meta = ContentMetadata::new(
            Some("application/octet-stream".into()),
            Some("data.csv".into()),
        );
        assert_eq!(meta.resolve(), LogicalKind::Raw);
    }

    #[test]
    fn nothing_known_is_raw() {
        assert_eq!(ContentMetadata::default().resolve(), LogicalKind::Raw);
        let meta = ContentMetadata::new(None, Some("notes.txt".into()));
        assert_eq!(meta.resolve(), LogicalKind::Raw);
    }

    #[test]
    fn blank_content_type_is_absent() {
        let meta = ContentMetadata::from_headers(Some("  "), None);
        assert!(meta.mime_type.is_none());
    }

    #[test]
    fn disposition_forms() {
        assert_eq!(
            parse_content_disposition("attachment; filename=\"file.csv\"").as_deref(),
            Some("file.csv")
        );
        assert_eq!(
            parse_content_disposition("inline; filename=report.parquet").as_deref(),
            Some("report.parquet")
        );
        assert_eq!(
            parse_content_disposition(
                "attachment; filename=\"fallback.bin\"; filename*=UTF-8''na%C3%AFve.json"
            )
            .as_deref(),
            Some("naïve.json")
        );
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition("attachment; filename=\"\""), None);
    }

    #[test]
    fn broken_extended_value_keeps_plain_name() {
        assert_eq!(
            parse_content_disposition("attachment; filename=a.csv; filename*=UTF-8''bad%FF")
                .as_deref(),
            Some("a.csv")
        );
    }

    #[test]
    fn semicolon_inside_quoted_name() {
        let meta = ContentMetadata::from_headers(None, Some("attachment; filename=\"q1;final.csv\""));
        assert_eq!(meta.suggested_file_name.as_deref(), Some("q1;final.csv"));
        assert_eq!(meta.resolve(), LogicalKind::Csv);

        assert_eq!(
            parse_content_disposition("inline; filename=\"a\\\";b.json\"; size=3").as_deref(),
            Some("a\";b.json")
        );
    }

    proptest! {
        #[test]
        fn metadata_for_kind_resolves_back(idx in 0usize..4) {
            let kind = LogicalKind::ALL[idx];
            prop_assert_eq!(ContentMetadata::for_kind(kind).resolve(), kind);

            let by_mime = ContentMetadata::new(Some(kind.mime_type().into()), None);
            prop_assert_eq!(by_mime.resolve(), kind);

            let by_name = ContentMetadata::new(None, Some(kind.default_file_name()));
            prop_assert_eq!(by_name.resolve(), kind);
        }

        #[test]
        fn content_type_always_outranks_name(idx in 0usize..4, jdx in 0usize..4) {
            let by_type = LogicalKind::ALL[idx];
            let by_name = LogicalKind::ALL[jdx];
            let meta = ContentMetadata::new(
                Some(by_type.mime_type().into()),
                Some(by_name.default_file_name()),
            );
            prop_assert_eq!(meta.resolve(), by_type);
        }
    }
}
