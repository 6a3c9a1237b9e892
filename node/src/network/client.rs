// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::api::{HealthResponse, NonceResponse, TxStatus};
use crate::chain::{ChainClient, ClaimStream, TxStatusStream};
use crate::errors::ChainError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use poe_kernel::{AccountId, Claim, Fingerprint, SignedExtrinsic};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// `ChainClient` over the node's HTTP API. Streams arrive as NDJSON.
#[derive(Debug, Clone)]
pub struct HttpChainClient {
    base_url: String,
    client: Client,
    auth_token: Option<String>,
}

impl HttpChainClient {
    pub fn new(url: String) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Builds a client and checks the node answers before returning it.
    pub async fn connect(url: String, token: Option<String>) -> Result<Self, ChainError> {
        let client = Self::new(url).with_token(token);
        let health = client.health().await?;
        tracing::info!("Connected to {} (best #{}, finalized #{})",
            client.base_url, health.best_number, health.finalized_number);
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthResponse, ChainError> {
        self.get_json("/health").await
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, ChainError> {
        let resp = self.authorized(req).send().await
            .map_err(|e| ChainError::Network(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => Ok(resp),
            StatusCode::UNAUTHORIZED => Err(ChainError::Unauthorized),
            StatusCode::BAD_REQUEST => {
                let body = resp.text().await.unwrap_or_default();
                Err(ChainError::InvalidInput(body))
            }
            s => Err(ChainError::Network(format!("{} request failed: {}", what, s))),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChainError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.send(self.client.get(&url), path).await?;
        resp.json().await.map_err(|e| ChainError::Decode(e.to_string()))
    }
}

/// Splits a streamed body into newline-delimited JSON values.
fn ndjson_stream<T>(resp: Response) -> BoxStream<'static, Result<T, ChainError>>
where
    T: DeserializeOwned + Send + 'static,
{
    let bytes = resp.bytes_stream().boxed();

    stream::unfold((bytes, Vec::<u8>::new(), false), |(mut bytes, mut buf, done)| async move {
        if done {
            return None;
        }
        loop {
            if let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                let line = &line[..line.len() - 1];
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                let item = serde_json::from_slice::<T>(line).map_err(|e| ChainError::Decode(e.to_string()));
                return Some((item, (bytes, buf, false)));
            }
            match bytes.next().await {
                Some(Ok(chunk)) => buf.extend_from_slice(&chunk),
                Some(Err(e)) => return Some((Err(ChainError::Network(e.to_string())), (bytes, buf, true))),
                None => return None,
            }
        }
    })
    .boxed()
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn query_claim(&self, fingerprint: &Fingerprint) -> Result<Option<Claim>, ChainError> {
        self.get_json(&format!("/v1/claims/{}", fingerprint)).await
    }

    async fn subscribe_claim(&self, fingerprint: &Fingerprint) -> Result<ClaimStream, ChainError> {
        let url = format!("{}/v1/claims/{}/watch", self.base_url, fingerprint);
        let resp = self.send(self.client.get(&url), "Watch").await?;
        Ok(ndjson_stream(resp))
    }

    async fn query_account_claims(&self, account: &AccountId) -> Result<Vec<Fingerprint>, ChainError> {
        self.get_json(&format!("/v1/accounts/{}/claims", account)).await
    }

    async fn account_nonce(&self, account: &AccountId) -> Result<u64, ChainError> {
        let resp: NonceResponse = self.get_json(&format!("/v1/accounts/{}/nonce", account)).await?;
        Ok(resp.nonce)
    }

    async fn submit_extrinsic(&self, extrinsic: SignedExtrinsic) -> Result<TxStatusStream, ChainError> {
        let url = format!("{}/v1/extrinsics", self.base_url);
        let resp = self.send(self.client.post(&url).json(&extrinsic), "Submit").await?;
        Ok(ndjson_stream::<TxStatus>(resp))
    }
}
