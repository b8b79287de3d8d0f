use anyhow::{Result, anyhow};
use std::env;

const DEFAULT_MODEL_PROVIDER: &str = "gemini";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:3b";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert network engineer and Python programmer. \
Your task is to generate a complete and well-commented Python script for network automation \
based on the user's request. The script should use standard libraries like `netmiko` or \
`paramiko` and should be ready to run. Provide only the code, no extra text or explanation.";

#[derive(Clone)]
pub struct Config {
    pub model_provider: String,
    pub model: String,
    pub model_base_url: String,
    pub api_key: Option<String>,
    pub system_prompt: String,
    pub model_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("model_provider", &self.model_provider)
            .field("model", &self.model)
            .field("model_base_url", &self.model_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("system_prompt_len", &self.system_prompt.len())
            .field("model_timeout_secs", &self.model_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Result<Self> {
        let model_provider = get_var("MODEL_PROVIDER")
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_PROVIDER.to_string());
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| non_blank(get_var(key)));

        if model_provider == "gemini" && api_key.is_none() {
            return Err(anyhow!(
                "Error configuring the Gemini client: GOOGLE_API_KEY is not set. \
                 Please make sure you have a valid API key set up in a .env file \
                 or as an environment variable."
            ));
        }

        let model_base_url = non_blank(get_var("MODEL_BASE_URL"))
            .unwrap_or_else(|| default_base_url(&model_provider).to_string());

        Ok(Self {
            model: non_blank(get_var("MODEL"))
                .unwrap_or_else(|| default_model(&model_provider).to_string()),
            model_base_url,
            api_key,
            system_prompt: get_var("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            model_timeout_secs: parse_model_timeout_secs(get_var("MODEL_TIMEOUT_SECS").as_deref()),
            model_provider,
        })
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_model(provider: &str) -> &'static str {
    match provider {
        "ollama" => DEFAULT_OLLAMA_MODEL,
        _ => DEFAULT_GEMINI_MODEL,
    }
}

fn default_base_url(provider: &str) -> &'static str {
    match provider {
        "ollama" => DEFAULT_OLLAMA_BASE_URL,
        _ => DEFAULT_GEMINI_BASE_URL,
    }
}

fn parse_model_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS)
}
