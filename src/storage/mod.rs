pub mod pinata;

use serde::{Deserialize, Serialize};

use crate::{common::AnyResult, constants::trade::IPFS_URI_SCHEME};

pub use pinata::PinataClient;

/// Off-chain metadata document the token's `uri` points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub show_name: bool,
    pub created_on: String,
    pub twitter: String,
    pub telegram: String,
    pub website: String,
}

/// Content-addressed storage. Both uploads return the content id of what was stored.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn upload_file(&self, bytes: Vec<u8>, filename: &str) -> AnyResult<String>;

    async fn upload_json(&self, document: &serde_json::Value) -> AnyResult<String>;
}

/// `ipfs://<cid>`
pub fn ipfs_uri(cid: &str) -> String {
    format!("{}{}", IPFS_URI_SCHEME, cid)
}
