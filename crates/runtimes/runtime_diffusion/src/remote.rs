//! HTTP diffusion backend
//!
//! POSTs an [`ImageGenRequest`] as JSON and expects an encoded image
//! (PNG, JPEG, ...) as the response body.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use roadscene_core::config::BackendConfig;
use std::time::Duration;
use thiserror::Error;

use crate::{DiffusionModel, ImageGenRequest, ImageGenResponse};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("backend returned an undecodable image: {0}")]
    Decode(#[from] image::ImageError),
}

pub struct RemoteDiffusion {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl RemoteDiffusion {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn build_request(&self, request: &ImageGenRequest) -> Result<reqwest::Request> {
        let mut builder = self
            .client
            .post(&self.url)
            .header(ACCEPT, "image/*")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl DiffusionModel for RemoteDiffusion {
    async fn generate(&self, request: &ImageGenRequest) -> Result<ImageGenResponse> {
        let http_request = self.build_request(request)?;
        tracing::info!(
            "Requesting {}x{} image ({} steps) from {}",
            request.width,
            request.height,
            request.steps,
            self.url
        );

        let response = self.client.execute(http_request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body }.into());
        }

        let bytes = response.bytes().await?;
        Ok(decode_image(&bytes)?)
    }

    fn name(&self) -> &str {
        &self.url
    }
}

/// Decode an encoded image into RGB pixels
pub fn decode_image(bytes: &[u8]) -> Result<ImageGenResponse, BackendError> {
    let img = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = img.dimensions();
    Ok(ImageGenResponse {
        pixels: img.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn backend(api_key: Option<&str>) -> RemoteDiffusion {
        RemoteDiffusion::new(&BackendConfig {
            url: "http://127.0.0.1:9/generate".into(),
            api_key: api_key.map(String::from),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn sends_request_as_json() {
        let request = ImageGenRequest {
            prompt: "A highway at night, featuring overhead signs, multiple lanes".into(),
            seed: Some(42),
            ..ImageGenRequest::default()
        };
        let http = backend(None).build_request(&request).unwrap();

        assert_eq!(http.method(), &reqwest::Method::POST);
        assert_eq!(http.url().path(), "/generate");
        assert!(http.headers().get(AUTHORIZATION).is_none());
        assert_eq!(http.headers().get(ACCEPT).unwrap(), "image/*");

        let body = http.body().and_then(|b| b.as_bytes()).unwrap();
        let sent: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(sent["prompt"], request.prompt);
        assert_eq!(sent["seed"], 42);
        assert_eq!(sent["steps"], 30);
        assert_eq!(sent["negative_prompt"], "low quality, blurry, noisy, animated");
    }

    #[test]
    fn sends_bearer_token() {
        let http = backend(Some("hunter2"))
            .build_request(&ImageGenRequest::default())
            .unwrap();
        assert_eq!(
            http.headers().get(AUTHORIZATION).unwrap(),
            "Bearer hunter2"
        );

        let http = backend(Some("")).build_request(&ImageGenRequest::default()).unwrap();
        assert!(http.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn decodes_png_body() {
        let png = ImageGenResponse {
            pixels: vec![10, 20, 30, 40, 50, 60],
            width: 2,
            height: 1,
        }
        .to_png()
        .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 1));
        assert_eq!(decoded.pixels, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn rejects_garbage_body() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(BackendError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error() {
        // Port 9 (discard) is not listening on loopback
        let result = backend(None).generate(&ImageGenRequest::default()).await;
        assert!(result.is_err());
    }
}
