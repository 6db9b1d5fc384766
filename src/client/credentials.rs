use anyhow::{anyhow, Result};

/// Connection material for the speech backend. The base URL is normalized
/// once here so every request can join paths without double slashes.
#[derive(Debug, Clone)]
pub struct Credentials {
    base_url: String,
    api_key: String,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(anyhow!("base url must not be empty"));
        }
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(anyhow!("api key must not be empty"));
        }
        Ok(Self { base_url, api_key })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(crate::BASE_URL.clone(), crate::API_KEY.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_are_stripped() {
        let credentials = Credentials::new("https://api.example.com///", "key").unwrap();
        assert_eq!(credentials.base_url(), "https://api.example.com");
        assert_eq!(
            credentials.endpoint("/api/v1/transcribe/do_transcribe"),
            "https://api.example.com/api/v1/transcribe/do_transcribe"
        );
    }

    #[test]
    fn test_empty_fields_are_rejected() {
        assert!(Credentials::new("", "key").is_err());
        assert!(Credentials::new("   /", "key").is_err());
        assert!(Credentials::new("https://api.example.com", " ").is_err());
    }
}
