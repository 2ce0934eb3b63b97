use std::time::Duration;

use anyhow::{anyhow, Context};
use log::info;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;

use super::ContentStore;
use crate::{
    common::AnyResult,
    constants::storage::{PINATA_FILES_PATH, PINATA_NETWORK, PINATA_UPLOAD_URL},
};

const METADATA_FILENAME: &str = "metadata.json";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    cid: String,
}

/// Pinata v3 file uploads.
#[derive(Clone)]
pub struct PinataClient {
    pub base_url: String,
    jwt: String,
    http_client: Client,
}

impl PinataClient {
    pub fn new(jwt: impl Into<String>) -> AnyResult<Self> {
        Self::with_base_url(jwt, PINATA_UPLOAD_URL)
    }

    pub fn with_base_url(
        jwt: impl Into<String>,
        base_url: impl Into<String>,
    ) -> AnyResult<Self> {
        let http_client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            base_url: base_url.into(),
            jwt: jwt.into(),
            http_client,
        })
    }

    fn form(bytes: Vec<u8>, filename: &str) -> Form {
        let file = Part::bytes(bytes).file_name(filename.to_string());
        Form::new()
            .part("file", file)
            .text("pinataOptions", pinata_options().to_string())
            .text("network", PINATA_NETWORK)
    }
}

fn pinata_options() -> serde_json::Value {
    serde_json::json!({
        "cidVersion": 1,
        "wrapWithDirectory": false,
    })
}

fn parse_cid(body: &str) -> AnyResult<String> {
    let response: UploadResponse = serde_json::from_str(body)
        .with_context(|| format!("unexpected pinata response: {}", body))?;
    if response.data.cid.is_empty() {
        return Err(anyhow!("pinata response carries an empty cid"));
    }
    Ok(response.data.cid)
}

#[async_trait::async_trait]
impl ContentStore for PinataClient {
    async fn upload_file(&self, bytes: Vec<u8>, filename: &str) -> AnyResult<String> {
        let endpoint = format!("{}{}", self.base_url, PINATA_FILES_PATH);
        let size = bytes.len();

        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.jwt)
            .multipart(Self::form(bytes, filename))
            .send()
            .await
            .with_context(|| format!("failed to upload {} to pinata", filename))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read pinata response")?;
        if !status.is_success() {
            return Err(anyhow!("pinata API error: {} - {}", status, body));
        }

        let cid = parse_cid(&body)?;
        info!("Uploaded {} ({} bytes): {}", filename, size, cid);
        Ok(cid)
    }

    async fn upload_json(&self, document: &serde_json::Value) -> AnyResult<String> {
        let bytes = serde_json::to_vec(document).context("failed to serialize json document")?;
        self.upload_file(bytes, METADATA_FILENAME).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cid() {
        let body = r#"{"data":{"id":"0195f815","cid":"bafkreigh2akiscaildc","size":245}}"#;
        assert_eq!(parse_cid(body).unwrap(), "bafkreigh2akiscaildc");

        assert!(parse_cid(r#"{"error":"Unauthorized"}"#).is_err());
        assert!(parse_cid(r#"{"data":{"cid":""}}"#).is_err());
    }

    #[test]
    fn test_pinata_options() {
        assert_eq!(
            pinata_options().to_string(),
            r#"{"cidVersion":1,"wrapWithDirectory":false}"#
        );
    }
}
