use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::MAX_MEDIA_URLS;

lazy_static! {
    /// Regex for media URLs attached to a report
    /// Must be an absolute http(s) URL without whitespace
    /// - Valid: "https://cdn.example.org/issue-media/u1/a.jpg", "http://localhost:9000/b/c.png"
    /// - Invalid: "ftp://host/file", "/relative/path.jpg", "https://host/has space.jpg"
    pub static ref MEDIA_URL_REGEX: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
}

/// Validator for text fields that must contain something besides whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validator for `Vec<String>` media URL fields
pub fn validate_media_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.len() > MAX_MEDIA_URLS {
        let mut err = ValidationError::new("media_url_count");
        err.message = Some(format!("at most {} media URLs are allowed", MAX_MEDIA_URLS).into());
        return Err(err);
    }
    if urls.iter().all(|url| MEDIA_URL_REGEX.is_match(url)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("media_url");
        err.message = Some("mediaUrls must contain absolute http(s) URLs".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url_regex_valid() {
        assert!(MEDIA_URL_REGEX.is_match("https://cdn.example.org/issue-media/u1/a.jpg"));
        assert!(MEDIA_URL_REGEX.is_match("http://localhost:9000/bucket/c.png"));
        assert!(MEDIA_URL_REGEX.is_match("https://x.io/v.mp4?token=abc"));
    }

    #[test]
    fn test_media_url_regex_invalid() {
        assert!(!MEDIA_URL_REGEX.is_match("ftp://host/file")); // wrong scheme
        assert!(!MEDIA_URL_REGEX.is_match("/relative/path.jpg")); // not absolute
        assert!(!MEDIA_URL_REGEX.is_match("https://host/has space.jpg")); // whitespace
        assert!(!MEDIA_URL_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("pothole").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \n\t").is_err());
    }

    #[test]
    fn test_validate_media_urls() {
        assert!(validate_media_urls(&[]).is_ok());
        assert!(validate_media_urls(&["https://a.b/c.jpg".to_string()]).is_ok());
        assert!(validate_media_urls(&[
            "https://a.b/c.jpg".to_string(),
            "not a url".to_string()
        ])
        .is_err());

        let too_many: Vec<String> = (0..=MAX_MEDIA_URLS)
            .map(|i| format!("https://a.b/{}.jpg", i))
            .collect();
        assert!(validate_media_urls(&too_many).is_err());
    }
}
