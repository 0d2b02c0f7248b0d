//! Error mapping shared by the client's request methods.

use anyhow::anyhow;
use reqwest::{Error, Response};

/// what can go wrong talking to the push service
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// the request never produced a response
    #[error("request error: {0}")]
    Generic(#[from] anyhow::Error),
    /// the service answered with a non-success status
    #[error("network error: {status_code} {message}")]
    NetworkError {
        /// the HTTP status
        status_code: u16,
        /// the response body, when readable
        message: String,
    },
}

/// collapse a reqwest result into success or [ClientError]
pub async fn map_client_error(
    result: Result<Response, Error>,
) -> Result<Response, ClientError> {
    let response = match result {
        Ok(response) => response,
        Err(e) => return Err(ClientError::Generic(anyhow!(e.to_string()))),
    };
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::NetworkError {
            status_code: response.status().as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}
