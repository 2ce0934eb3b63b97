pub mod pumpfun;
pub mod trade;

pub mod storage {
    pub const PINATA_UPLOAD_URL: &str = "https://uploads.pinata.cloud";
    pub const PINATA_FILES_PATH: &str = "/v3/files";
    pub const PINATA_NETWORK: &str = "public";
}
