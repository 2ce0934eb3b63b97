use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::{anyhow, Context};
use pump_launch_sdk::{
    common::{AnyResult, LaunchConfig, TokenInfo},
    storage::{ipfs_uri, ContentStore, PinataClient, TokenMetadata},
    PumpLaunch,
};
use solana_sdk::signature::Keypair;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_BUY_AMOUNT_LAMPORTS: u64 = 10_000_000;

struct CliConfig {
    rpc_url: String,
    payer: Keypair,
    pinata_jwt: String,
    image_path: PathBuf,
    metadata: TokenMetadata,
    buy_amount_lamports: u64,
}

fn required_var(name: &str) -> AnyResult<String> {
    std::env::var(name).map_err(|_| anyhow!("{} is not set", name))
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl CliConfig {
    fn from_env() -> AnyResult<Self> {
        let rpc_url = required_var("RPC")?;

        let secret = bs58::decode(required_var("PRIVATE_KEY")?.trim())
            .into_vec()
            .context("PRIVATE_KEY is not valid base58")?;
        let payer = Keypair::from_bytes(&secret)
            .map_err(|e| anyhow!("PRIVATE_KEY is not a 64-byte keypair: {}", e))?;

        let pinata_jwt = required_var("PINATA_JWT_SECRET")?;
        let image_path = PathBuf::from(var_or("IMAGE_PATH", "token.jpg"));

        let metadata = TokenMetadata {
            name: var_or("TOKEN_NAME", "Test Token"),
            symbol: var_or("TOKEN_SYMBOL", "TEST"),
            description: var_or("TOKEN_DESCRIPTION", "Test Description"),
            twitter: var_or("TWITTER", ""),
            telegram: var_or("TELEGRAM", ""),
            website: var_or("WEBSITE", ""),
            ..TokenMetadata::default()
        };

        let buy_amount_lamports: u64 = var_or(
            "BUY_AMOUNT_LAMPORTS",
            &DEFAULT_BUY_AMOUNT_LAMPORTS.to_string(),
        )
        .parse()
        .context("invalid BUY_AMOUNT_LAMPORTS")?;

        Ok(Self {
            rpc_url,
            payer,
            pinata_jwt,
            image_path,
            metadata,
            buy_amount_lamports,
        })
    }
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let start = Instant::now();
    let CliConfig {
        rpc_url,
        payer,
        pinata_jwt,
        image_path,
        mut metadata,
        buy_amount_lamports,
    } = CliConfig::from_env()?;

    let pinata = PinataClient::new(pinata_jwt)?;

    let image = tokio::fs::read(&image_path)
        .await
        .with_context(|| format!("failed to read {}", image_path.display()))?;
    let filename = image_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image");
    let image_cid = pinata.upload_file(image, filename).await?;

    metadata.image = ipfs_uri(&image_cid);
    let metadata_cid = pinata
        .upload_json(&serde_json::to_value(&metadata).context("failed to encode metadata")?)
        .await?;

    let token = TokenInfo::new(metadata.name, metadata.symbol, ipfs_uri(&metadata_cid));
    let client = PumpLaunch::new(Arc::new(payer), LaunchConfig::new(rpc_url));
    let receipt = client.launch(&token, buy_amount_lamports).await?;

    info!("Mint: {}", receipt.mint);
    info!("Signature: {}", receipt.signature);
    info!(
        "Bought {} tokens for at most {} lamports",
        receipt.token_amount, receipt.max_sol_cost
    );
    info!("Launch took {:?}", start.elapsed());
    Ok(())
}
