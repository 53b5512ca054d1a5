//! Cloud storage destinations (S3, R2, GCS, Azure, local)

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, Attributes, MultipartUpload, ObjectStore, PutMultipartOpts, PutOptions,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Part size for multipart uploads; files at or below it go up in one put
const UPLOAD_CHUNK_BYTES: u64 = 10 * 1024 * 1024;

/// Uploads sealed export files to their destination
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// Upload one local file under the given object name
    async fn upload(&self, object_name: &str, local_path: &Path, mime_type: &str) -> Result<()>;
}

/// Cloud storage destination parsed from URL
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URL and create appropriate object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            // Local filesystem
            Self::parse_local(url)
        }
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let without_scheme = url
            .strip_prefix(&format!("{scheme}://"))
            .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        // AWS_ENDPOINT is read automatically by from_env()
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: scheme.to_string(),
        })
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("az://")
            .ok_or_else(|| Error::config(format!("Invalid Azure URL: {url}")))?;

        let (container, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = if let Some(stripped) = path.strip_prefix("file://") {
            stripped
        } else {
            path
        };

        // Create directory if it doesn't exist
        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    fn object_path(&self, object_name: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(object_name)
        } else {
            ObjectPath::from(format!(
                "{}/{object_name}",
                self.prefix.trim_end_matches('/')
            ))
        }
    }
}

impl CloudDestination {
    /// Content-type attributes for a put. LocalFileSystem rejects
    /// attributes, so content type is only set on cloud stores.
    fn put_attributes(&self, mime_type: &str) -> Attributes {
        let mut attributes = Attributes::new();
        if self.is_cloud() {
            attributes.insert(Attribute::ContentType, mime_type.to_string().into());
        }
        attributes
    }

    async fn put_whole(&self, path: &ObjectPath, local_path: &Path, mime_type: &str) -> Result<()> {
        let data = Bytes::from(tokio::fs::read(local_path).await?);
        let options = PutOptions {
            attributes: self.put_attributes(mime_type),
            ..Default::default()
        };
        self.store
            .put_opts(path, data.into(), options)
            .await
            .map_err(|e| Error::upload(format!("Failed to write {path}: {e}")))?;
        Ok(())
    }

    /// Stream the file up in fixed-size parts, keeping memory O(part)
    async fn put_streaming(
        &self,
        path: &ObjectPath,
        local_path: &Path,
        mime_type: &str,
    ) -> Result<()> {
        let opts = PutMultipartOpts {
            attributes: self.put_attributes(mime_type),
            ..Default::default()
        };
        let mut upload = self
            .store
            .put_multipart_opts(path, opts)
            .await
            .map_err(|e| Error::upload(format!("Failed to start upload of {path}: {e}")))?;

        let mut file = tokio::fs::File::open(local_path).await?;
        loop {
            let mut part = Vec::with_capacity(UPLOAD_CHUNK_BYTES as usize);
            let n = (&mut file)
                .take(UPLOAD_CHUNK_BYTES)
                .read_to_end(&mut part)
                .await?;
            if n == 0 {
                break;
            }
            upload
                .put_part(part.into())
                .await
                .map_err(|e| Error::upload(format!("Failed to write {path}: {e}")))?;
        }

        upload
            .complete()
            .await
            .map_err(|e| Error::upload(format!("Failed to finish upload of {path}: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl ObjectUploader for CloudDestination {
    async fn upload(&self, object_name: &str, local_path: &Path, mime_type: &str) -> Result<()> {
        let path = self.object_path(object_name);
        let size = tokio::fs::metadata(local_path).await?.len();

        if size <= UPLOAD_CHUNK_BYTES {
            self.put_whole(&path, local_path, mime_type).await?;
        } else {
            self.put_streaming(&path, local_path, mime_type).await?;
        }

        tracing::info!(
            object = %format!("{}://{path}", self.scheme),
            bytes = size,
            content_type = mime_type,
            "uploaded export file"
        );
        Ok(())
    }
}
