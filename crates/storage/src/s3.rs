//! S3-backed asset store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use folio_core::asset_policy::AssetKind;
use uuid::Uuid;

use crate::{AssetStore, StorageError, StoredObject};

/// Configuration for the S3 provider.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket that holds all portfolio assets.
    pub bucket: String,
    /// Base URL under which uploaded objects are publicly reachable
    /// (bucket website endpoint or CDN distribution), without a trailing
    /// slash.
    pub public_base_url: String,
}

/// Asset store backed by an S3 bucket.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    config: S3Config,
}

impl S3Store {
    /// Build a store from the ambient AWS configuration (environment
    /// credentials, region, etc.).
    pub async fn from_env(config: S3Config) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            config,
        }
    }

    /// Object key for a fresh upload: a UUID prefix keeps keys unique even
    /// when the same file name is uploaded twice.
    fn object_key(folder: &str, file_name: &str) -> String {
        let safe_name: String = file_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            })
            .collect();
        format!("{folder}/{}-{safe_name}", Uuid::new_v4())
    }
}

#[async_trait]
impl AssetStore for S3Store {
    fn provider(&self) -> &'static str {
        "s3"
    }

    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
        kind: AssetKind,
    ) -> Result<StoredObject, StorageError> {
        let key = Self::object_key(folder, file_name);
        let content_type = match kind {
            AssetKind::Image => "image/*",
            AssetKind::Video => "video/*",
        };

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        let url = format!("{}/{key}", self.config.public_base_url);
        Ok(StoredObject {
            storage_key: key,
            url,
        })
    }

    async fn delete(&self, storage_key: &str, _kind: AssetKind) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(storage_key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;
        Ok(())
    }
}
