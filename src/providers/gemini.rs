use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{Message, MessageRole};
use crate::providers::http_errors::{model_api_request_error, model_api_status_error};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn generate_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

fn gemini_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

fn build_request(system_prompt: &str, messages: &[Message]) -> GenerateContentRequest {
    let system_instruction = (!system_prompt.trim().is_empty()).then(|| SystemInstruction {
        parts: vec![Part {
            text: Some(system_prompt.to_string()),
        }],
    });
    let contents = messages
        .iter()
        .map(|msg| Content {
            role: gemini_role(msg.role),
            parts: vec![Part {
                text: Some(msg.content.clone()),
            }],
        })
        .collect();

    GenerateContentRequest {
        system_instruction,
        contents,
    }
}

fn response_text(response: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no reason given".to_string());
        return Err(anyhow!("Model returned no candidates ({reason})"));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "unknown".to_string());
        return Err(anyhow!(
            "Model returned an empty response (finish reason: {reason})"
        ));
    }

    Ok(text)
}

pub async fn generate(
    client: &Client,
    cfg: &Config,
    system_prompt: &str,
    messages: &[Message],
) -> Result<String> {
    let api_url = generate_url(&cfg.model_base_url, &cfg.model);
    let api_key = cfg
        .api_key
        .as_deref()
        .context("GOOGLE_API_KEY is required for the gemini provider")?;
    let body = build_request(system_prompt, messages);
    debug!(
        api_url = %api_url,
        model = %cfg.model,
        message_count = messages.len(),
        "sending gemini generateContent request"
    );

    let response = client
        .post(&api_url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            warn!(
                api_url = %api_url,
                model = %cfg.model,
                error = %err,
                "gemini request failed"
            );
            model_api_request_error(err, &api_url, cfg.model_timeout_secs)
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        warn!(
            api_url = %api_url,
            model = %cfg.model,
            status = %status,
            response_body_len = response_body.len(),
            "gemini returned non-success status"
        );
        return Err(model_api_status_error(status, &response_body));
    }

    let parsed: GenerateContentResponse = response
        .json()
        .await
        .context("Failed to parse model generateContent response")?;
    let text = response_text(parsed)?;
    debug!(
        model = %cfg.model,
        response_len = text.len(),
        "received gemini response"
    );
    Ok(text)
}
