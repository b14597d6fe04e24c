use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

use yardage_core::config::StorageConfig;
use yardage_core::storage::{object_name, object_name_from_url, ImageStore, ImageStoreError};

/// Client for the external object-storage bucket: binary uploads under a
/// generated unique object name, public URLs back, deletes by URL.
pub struct HttpBucketStore {
    client: Client,
    base_url: String,
    bucket: String,
}

impl HttpBucketStore {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            bucket: bucket.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.base_url.trim_end_matches('/').to_string(), config.bucket.clone())
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/{}/{name}", self.base_url, self.bucket)
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{name}", self.base_url, self.bucket)
    }
}

#[async_trait]
impl ImageStore for HttpBucketStore {
    async fn upload(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, ImageStoreError> {
        let name = object_name(original_name, Utc::now());

        let response = self
            .client
            .post(self.object_url(&name))
            .body(bytes)
            .send()
            .await
            .map_err(|error| ImageStoreError::Upload(error.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageStoreError::Upload(format!(
                "bucket returned {} for `{name}`",
                response.status()
            )));
        }

        Ok(self.public_url(&name))
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStoreError> {
        let name = object_name_from_url(url)?;

        let response = self
            .client
            .delete(self.object_url(name))
            .send()
            .await
            .map_err(|error| ImageStoreError::Delete(error.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageStoreError::Delete(format!(
                "bucket returned {} for `{name}`",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HttpBucketStore;

    #[test]
    fn urls_follow_the_bucket_layout() {
        let store = HttpBucketStore::new("https://cdn.example.com", "images");

        assert_eq!(
            store.object_url("1700-ab12cd.png"),
            "https://cdn.example.com/storage/v1/object/images/1700-ab12cd.png"
        );
        assert_eq!(
            store.public_url("1700-ab12cd.png"),
            "https://cdn.example.com/storage/v1/object/public/images/1700-ab12cd.png"
        );
    }
}
