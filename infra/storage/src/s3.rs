//! Uploaded files kept in an S3-compatible bucket.

use crate::error::StorageError;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Connection details for the bucket.
#[derive(Debug, Clone)]
pub struct S3Options {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO and friends); empty means the AWS default.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: SecretString,
}

#[derive(Debug)]
struct S3Inner {
    options: S3Options,
    client: OnceLock<Client>,
}

/// Bucket-backed handler. The SDK client is only built on the first operation.
#[derive(Debug, Clone)]
pub struct S3FileHandler {
    inner: Arc<S3Inner>,
}

impl S3FileHandler {
    pub fn new(options: S3Options) -> Self {
        Self { inner: Arc::new(S3Inner { options, client: OnceLock::new() }) }
    }

    pub fn bucket(&self) -> &str {
        &self.inner.options.bucket
    }

    /// Whether the SDK client has been constructed yet.
    pub fn is_client_built(&self) -> bool {
        self.inner.client.get().is_some()
    }

    /// Builds the SDK client now instead of on the first operation. No request is sent.
    pub fn connect(&self) -> &Self {
        self.client();
        self
    }

    fn client(&self) -> &Client {
        self.inner.client.get_or_init(|| {
            let options = &self.inner.options;
            let credentials = Credentials::new(
                &options.access_key,
                options.secret_key.expose_secret(),
                None,
                None,
                "kissj",
            );

            let mut config = aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new(options.region.clone()))
                .credentials_provider(credentials)
                .force_path_style(true);
            if !options.endpoint.is_empty() {
                config = config.endpoint_url(&options.endpoint);
            }

            info!(bucket = %options.bucket, endpoint = %options.endpoint, "S3 client initialized");
            Client::from_conf(config.build())
        })
    }

    /// # Errors
    /// Returns [`StorageError::ObjectStore`] if the upload is rejected.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        self.client()
            .put_object()
            .bucket(self.bucket())
            .key(name)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| object_store("put", name, &e))?;

        debug!(name, bytes = data.len(), "Upload stored in bucket");
        Ok(())
    }

    /// # Errors
    /// Returns [`StorageError::FileNotFound`] for a missing key, [`StorageError::ObjectStore`]
    /// for every other failure.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let object = match self.client().get_object().bucket(self.bucket()).key(name).send().await {
            Ok(object) => object,
            Err(e) => {
                let service = e.into_service_error();
                if service.is_no_such_key() {
                    return Err(StorageError::FileNotFound {
                        message: name.to_owned().into(),
                        context: Some("S3 bucket".into()),
                    });
                }
                return Err(object_store("get", name, &service));
            },
        };

        let body = object.body.collect().await.map_err(|e| object_store("read body", name, &e))?;
        Ok(body.into_bytes().to_vec())
    }

    /// # Errors
    /// Returns [`StorageError::ObjectStore`] if the bucket rejects the request.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.client()
            .delete_object()
            .bucket(self.bucket())
            .key(name)
            .send()
            .await
            .map_err(|e| object_store("delete", name, &e))?;
        debug!(name, "Upload deleted from bucket");
        Ok(())
    }

    /// # Errors
    /// Returns [`StorageError::ObjectStore`] for failures other than "not found".
    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.client().head_object().bucket(self.bucket()).key(name).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let service = e.into_service_error();
                if service.is_not_found() { Ok(false) } else { Err(object_store("head", name, &service)) }
            },
        }
    }
}

fn object_store(
    operation: &'static str,
    name: &str,
    err: &(dyn std::error::Error + 'static),
) -> StorageError {
    StorageError::ObjectStore {
        message: DisplayErrorContext(err).to_string().into(),
        context: Some(format!("{operation} {name}").into()),
    }
}
