use crate::error::ParseError;
use crate::models::CheckInRequest;
use crate::startup::config::DEFAULT_URL_PATTERN;

const EVENT_ID_PREFIX: &str = "evt-";
const PROXY_KEY_PREFIX: &str = "g-";
const PROXY_KEY_PARAM: &str = "?pk=";

/// Validates decoded QR text against the check-in URL grammar:
/// `<url_pattern>evt-<id>?pk=g-<key>[&...]`.
#[derive(Debug, Clone)]
pub struct PayloadParser {
    url_pattern: String,
}

impl Default for PayloadParser {
    fn default() -> Self {
        Self::new(DEFAULT_URL_PATTERN)
    }
}

impl PayloadParser {
    pub fn new(url_pattern: impl Into<String>) -> Self {
        Self {
            url_pattern: url_pattern.into(),
        }
    }

    pub fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    pub fn validate(&self, text: &str) -> bool {
        self.parse(text).is_ok()
    }

    /// Extract the event id and proxy key.
    pub fn parse(&self, text: &str) -> Result<CheckInRequest, ParseError> {
        let decoded = urlencoding::decode(text.trim()).map_err(|_| ParseError::InvalidEncoding)?;

        let rest = decoded
            .strip_prefix(self.url_pattern.as_str())
            .ok_or_else(|| ParseError::PrefixMismatch {
                expected: self.url_pattern.clone(),
            })?;

        let (event_id, query) = rest
            .split_once(PROXY_KEY_PARAM)
            .ok_or(ParseError::MissingProxyKey)?;

        // Anything after the first `&` (or a fragment) is ignored.
        let proxy_key = query
            .split(|c| c == '&' || c == '#')
            .next()
            .unwrap_or_default();

        if !has_token(event_id, EVENT_ID_PREFIX) {
            return Err(ParseError::InvalidEventId(event_id.to_string()));
        }
        if !has_token(proxy_key, PROXY_KEY_PREFIX) {
            return Err(ParseError::InvalidProxyKey(proxy_key.to_string()));
        }

        Ok(CheckInRequest::new(event_id, proxy_key))
    }
}

fn has_token(value: &str, prefix: &str) -> bool {
    value.len() > prefix.len() && value.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PayloadParser {
        PayloadParser::default()
    }

    #[test]
    fn test_parse_canonical_url() {
        let req = parser()
            .parse("https://lu.ma/check-in/evt-ABC123?pk=g-XYZ789")
            .unwrap();
        assert_eq!(req, CheckInRequest::new("evt-ABC123", "g-XYZ789"));
    }

    #[test]
    fn test_extra_params_ignored() {
        let req = parser()
            .parse("https://lu.ma/check-in/evt-ABC123?pk=g-XYZ789&extra=1&utm=qr")
            .unwrap();
        assert_eq!(req.proxy_key, "g-XYZ789");
    }

    #[test]
    fn test_fragment_ignored() {
        let req = parser()
            .parse("https://lu.ma/check-in/evt-ABC123?pk=g-XYZ789#top")
            .unwrap();
        assert_eq!(req.proxy_key, "g-XYZ789");
    }

    #[test]
    fn test_percent_encoded_input() {
        let req = parser()
            .parse("https%3A%2F%2Flu.ma%2Fcheck-in%2Fevt-ABC123%3Fpk%3Dg-XYZ789")
            .unwrap();
        assert_eq!(req, CheckInRequest::new("evt-ABC123", "g-XYZ789"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert!(parser().validate("  https://lu.ma/check-in/evt-A?pk=g-B\n"));
    }

    #[test]
    fn test_prefix_mismatch() {
        let p = parser();
        let text = "https://example.com/check-in/evt-ABC123?pk=g-XYZ789";
        assert!(!p.validate(text));
        assert!(matches!(p.parse(text), Err(ParseError::PrefixMismatch { .. })));
    }

    #[test]
    fn test_missing_proxy_key() {
        assert_eq!(
            parser().parse("https://lu.ma/check-in/evt-ABC123"),
            Err(ParseError::MissingProxyKey)
        );
    }

    #[test]
    fn test_invalid_event_id() {
        assert_eq!(
            parser().parse("https://lu.ma/check-in/abc?pk=g-XYZ789"),
            Err(ParseError::InvalidEventId("abc".to_string()))
        );
        assert_eq!(
            parser().parse("https://lu.ma/check-in/evt-?pk=g-XYZ789"),
            Err(ParseError::InvalidEventId("evt-".to_string()))
        );
    }

    #[test]
    fn test_invalid_proxy_key() {
        assert_eq!(
            parser().parse("https://lu.ma/check-in/evt-ABC?pk=XYZ"),
            Err(ParseError::InvalidProxyKey("XYZ".to_string()))
        );
        assert_eq!(
            parser().parse("https://lu.ma/check-in/evt-ABC?pk=&g-XYZ"),
            Err(ParseError::InvalidProxyKey(String::new()))
        );
    }

    #[test]
    fn test_invalid_encoding() {
        assert_eq!(
            parser().parse("https://lu.ma/check-in/evt-A?pk=g-%FF%FE"),
            Err(ParseError::InvalidEncoding)
        );
    }

    #[test]
    fn test_custom_pattern() {
        let p = PayloadParser::new("https://staging.lu.ma/check-in/");
        assert!(p.validate("https://staging.lu.ma/check-in/evt-A?pk=g-B"));
        assert!(!p.validate("https://lu.ma/check-in/evt-A?pk=g-B"));
    }

    #[test]
    fn test_arbitrary_text_never_panics() {
        let p = parser();
        for text in ["", "?pk=", "%", "%%%", "https://lu.ma/check-in/", "\u{1F600}"] {
            let _ = p.parse(text);
        }
    }
}
