use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum ImageStoreError {
    #[error("image upload failed: {0}")]
    Upload(String),
    #[error("image delete failed: {0}")]
    Delete(String),
    #[error("object url `{0}` has no object name")]
    MalformedUrl(String),
}

/// Seam to the external object-storage bucket. Uploads return a publicly
/// resolvable URL; deletes take that URL back.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, ImageStoreError>;
    async fn delete(&self, url: &str) -> Result<(), ImageStoreError>;
}

/// Unique object name for an upload: `<unix-millis>-<random>.<ext>`,
/// keeping the original file's extension (`bin` when it has none).
pub fn object_name(original_name: &str, at: DateTime<Utc>) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.trim()))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();

    format!("{}-{suffix}.{extension}", at.timestamp_millis())
}

/// Object name carried by a public URL — the final path segment.
pub fn object_name_from_url(url: &str) -> Result<&str, ImageStoreError> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| ImageStoreError::MalformedUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::{object_name, object_name_from_url};

    #[test]
    fn object_name_keeps_extension_and_prefixes_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let name = object_name("swatch photo.PNG", at);

        assert!(name.starts_with("1700000000000-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn object_name_defaults_missing_extension_to_bin() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert!(object_name("swatch", at).ends_with(".bin"));
        assert!(object_name(".hidden", at).ends_with(".bin"));
    }

    #[test]
    fn url_parsing_extracts_final_segment() {
        let url = "https://cdn.example.com/storage/v1/object/public/images/1700-ab12cd.png";
        assert_eq!(object_name_from_url(url).expect("segment"), "1700-ab12cd.png");
    }
}
