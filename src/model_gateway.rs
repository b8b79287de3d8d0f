use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::model::{self, Message};

pub struct ModelGatewayRequest {
    pub system_prompt: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelGatewayResponse {
    pub content: String,
}

pub type ModelGatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<ModelGatewayResponse>> + 'a>>;

/// One request in, generated text out.
pub trait ModelGateway {
    fn generate<'a>(&'a self, request: ModelGatewayRequest) -> ModelGatewayFuture<'a>;
}

/// Gateway backed by the provider selected in [`Config`].
pub struct HostModelGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
}

impl<'a> HostModelGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self { client, cfg }
    }
}

impl ModelGateway for HostModelGateway<'_> {
    fn generate<'b>(&'b self, request: ModelGatewayRequest) -> ModelGatewayFuture<'b> {
        Box::pin(async move {
            let content = model::generate(
                self.client,
                self.cfg,
                &request.system_prompt,
                &request.messages,
            )
            .await?;
            Ok(ModelGatewayResponse { content })
        })
    }
}
