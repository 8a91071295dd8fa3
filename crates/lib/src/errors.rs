use thiserror::Error;

/// Errors produced when calling the generative or embedding model APIs.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the model API: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize the model API response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Model API returned an error: {0}")]
    Api(String),
}
