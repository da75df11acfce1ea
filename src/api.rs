use serde::{Deserialize, Serialize};

/// Body of `POST /shorten`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
    /// The service also reports the bare code; older deployments omit it.
    #[serde(default)]
    pub short_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResolveResponse {
    pub url: String,
}

/// Failure body shared by every endpoint. Anything that does not decode into
/// this shape is treated as an empty object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_request_omits_missing_code() {
        let request = ShortenRequest {
            url: "https://example.com".to_owned(),
            custom_code: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"url":"https://example.com"}"#
        );
    }

    #[test]
    fn test_shorten_request_includes_code() {
        let request = ShortenRequest {
            url: "https://example.com".to_owned(),
            custom_code: Some("promo24".to_owned()),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"url":"https://example.com","custom_code":"promo24"}"#
        );
    }

    #[test]
    fn test_shorten_response_accepts_short_code() {
        let response: ShortenResponse = serde_json::from_str(
            r#"{"short_code":"g8","short_url":"https://s.example/g8","extra":1}"#,
        )
        .unwrap();
        assert_eq!(response.short_url, "https://s.example/g8");
        assert_eq!(response.short_code.as_deref(), Some("g8"));
    }

    #[test]
    fn test_error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body, ErrorBody::default());
    }
}
