use reqwest::Url;
use reqwest::header::HeaderValue;
use serde_json::Value;

const REDACTION: &str = "***REDACTED***";
const SENSITIVE_KEYS: [&str; 9] = [
    "key",
    "api_key",
    "apikey",
    "token",
    "access_token",
    "authorization",
    "secret",
    "password",
    "x-api-key",
];

/// Hosted gateways often embed the key as a path segment (`/v2/<key>`).
/// Segments at least this long made only of key characters are masked.
const PATH_KEY_MIN_CHARS: usize = 24;

pub const DEFAULT_MAX_BODY_CHARS: usize = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugConfig {
    pub enabled: bool,
    pub redact_secrets: bool,
    pub max_body_chars: usize,
}

impl HttpDebugConfig {
    pub fn from_verbose(verbose: bool) -> Self {
        Self {
            enabled: verbose,
            redact_secrets: true,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
        }
    }

    pub fn disabled() -> Self {
        Self::from_verbose(false)
    }

    /// Gateway URL as it appears in the debug log.
    pub fn shown_url(&self, url: &Url) -> String {
        if !self.redact_secrets {
            return url.to_string();
        }

        let mut shown = url.clone();
        let segments: Option<Vec<String>> = url.path_segments().map(|segments| {
            segments
                .map(|segment| {
                    if looks_like_path_key(segment) {
                        REDACTION.to_string()
                    } else {
                        segment.to_string()
                    }
                })
                .collect()
        });
        if let Some(segments) = segments {
            shown.set_path(&format!("/{}", segments.join("/")));
        }

        if url.query().is_some() {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(name, value)| {
                    let value = if is_sensitive_key(&name) {
                        REDACTION.to_string()
                    } else {
                        value.into_owned()
                    };
                    (name.into_owned(), value)
                })
                .collect();
            shown.query_pairs_mut().clear().extend_pairs(pairs);
        }

        shown.to_string()
    }

    pub fn shown_header(&self, name: &str, value: &HeaderValue) -> String {
        if self.redact_secrets && is_sensitive_key(name) {
            REDACTION.to_string()
        } else {
            header_text(value)
        }
    }

    /// JSON-RPC envelope with secret fields masked, cut to `max_body_chars`.
    /// Bodies that are not JSON (gateway error pages) pass through unmasked.
    pub fn shown_body(&self, raw: &str) -> String {
        let body = if self.redact_secrets {
            redact_json_text(raw)
        } else {
            raw.to_string()
        };
        truncate_for_log(&body, self.max_body_chars)
    }
}

pub fn header_text(value: &HeaderValue) -> String {
    value
        .to_str()
        .map_or_else(|_| "<non-utf8>".to_string(), str::to_string)
}

fn redact_json_text(raw: &str) -> String {
    let Ok(mut json) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };
    mask_sensitive_fields(&mut json);
    serde_json::to_string(&json).unwrap_or_else(|_| raw.to_string())
}

fn mask_sensitive_fields(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            for (name, field) in fields.iter_mut() {
                if is_sensitive_key(name) {
                    *field = Value::String(REDACTION.to_string());
                } else {
                    mask_sensitive_fields(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_sensitive_fields),
        _ => {}
    }
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        None => input.to_string(),
        Some((cut, _)) => {
            let dropped = input[cut..].chars().count();
            format!("{}... <truncated {dropped} chars>", &input[..cut])
        }
    }
}

fn is_sensitive_key(name: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|key| key.eq_ignore_ascii_case(name))
}

/// Hex addresses and hashes are long too, so `0x` segments are left alone.
fn looks_like_path_key(segment: &str) -> bool {
    segment.len() >= PATH_KEY_MIN_CHARS
        && !segment.starts_with("0x")
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
