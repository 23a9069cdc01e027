//! Invoke Specialist use case
//!
//! Runs one specialist consultation: builds the specialist's full request
//! from its persona, the shared request context, and the planner-framed
//! question, then calls the gateway in blocking mode.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use counsel_domain::{
    ChatMessage, ContextBundle, ConversationTurn, PromptTemplate, SpecialistCall,
    SpecialistRegistry,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// How many recent history turns a specialist sees
const HISTORY_WINDOW: usize = 10;

/// Returned when a completion succeeds but carries no text segment.
///
/// An empty-but-successful completion is not an error; the synthesis call
/// still receives a well-formed tool result.
pub const NO_RESPONSE_SENTINEL: &str = "No response from specialist.";

/// Errors that can occur during a specialist consultation
#[derive(Error, Debug)]
pub enum InvokeSpecialistError {
    /// The call names a specialist absent from the registry. Ids originate
    /// from the engine's own tool declarations, so this indicates a planner
    /// protocol violation.
    #[error("Unknown specialist: {0}")]
    UnknownSpecialist(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Use case for consulting a single specialist
pub struct InvokeSpecialistUseCase<G: LlmGateway> {
    gateway: Arc<G>,
    registry: Arc<SpecialistRegistry>,
}

impl<G: LlmGateway> InvokeSpecialistUseCase<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<SpecialistRegistry>) -> Self {
        Self { gateway, registry }
    }

    /// Execute one consultation and return the specialist's full text answer.
    ///
    /// No state is retained after return; the only side effect is the
    /// outbound gateway call.
    pub async fn invoke(
        &self,
        call: &SpecialistCall,
        bundle: &ContextBundle,
        history: &[ConversationTurn],
    ) -> Result<String, InvokeSpecialistError> {
        let config = self.registry.get(&call.specialist).ok_or_else(|| {
            InvokeSpecialistError::UnknownSpecialist(call.specialist.to_string())
        })?;

        debug!(specialist = %call.specialist, "invoking specialist");

        let system_prompt = PromptTemplate::specialist_system(&config.persona_prompt, bundle);

        let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        let mut messages: Vec<ChatMessage> = recent.iter().map(ChatMessage::from_turn).collect();
        messages.push(ChatMessage::user(PromptTemplate::specialist_request(
            &call.client_context,
            &call.question,
        )));

        let response = self
            .gateway
            .complete(CompletionRequest::plain(system_prompt, messages))
            .await?;

        Ok(response
            .first_text()
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string()))
    }
}
