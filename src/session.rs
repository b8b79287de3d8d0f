use tracing::{info, warn};

use crate::model::Message;
use crate::model_gateway::{ModelGateway, ModelGatewayRequest};

const TASK_PREFIX: &str = "Generate a network automation script for the following task: ";
const ERROR_PREFIX: &str = "An error occurred while generating the script: ";

/// The outcome of one submitted task, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub is_error: bool,
}

/// Conversation for one run of the program. The history only ever grows.
pub struct ChatSession<G> {
    gateway: G,
    system_prompt: String,
    history: Vec<Message>,
}

impl<G: ModelGateway> ChatSession<G> {
    pub fn new(gateway: G, system_prompt: impl Into<String>) -> Self {
        Self {
            gateway,
            system_prompt: system_prompt.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Records `task`, asks the model for a script and records the answer.
    ///
    /// Only the framed task is sent; earlier turns stay local. A failed
    /// request still produces an assistant message carrying the error text.
    pub async fn submit(&mut self, task: &str) -> Reply {
        self.history.push(Message::user(task));

        let request = ModelGatewayRequest {
            system_prompt: self.system_prompt.clone(),
            messages: vec![Message::user(frame_task(task))],
        };

        let reply = match self.gateway.generate(request).await {
            Ok(response) => {
                info!(
                    task_len = task.len(),
                    response_len = response.content.len(),
                    "generated script"
                );
                Reply {
                    content: response.content,
                    is_error: false,
                }
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "script generation failed");
                Reply {
                    content: format!("{ERROR_PREFIX}{err:#}"),
                    is_error: true,
                }
            }
        };

        self.history.push(Message::assistant(reply.content.clone()));
        reply
    }
}

fn frame_task(task: &str) -> String {
    format!("{TASK_PREFIX}{task}")
}
