//! Run Orchestrator use case
//!
//! Drives the full plan → fan-out → synthesize protocol for one request and
//! emits the ordered progress stream:
//!
//! `INIT → PLANNING → {DIRECT_ANSWER | FANOUT} → SYNTHESIZING → DONE`,
//! with `ERROR` reachable from any non-terminal state.
//!
//! Events are pushed onto a caller-supplied bounded channel. A dropped
//! receiver is the cancellation signal: the engine observes it at the next
//! emission, stops emitting, and returns without a composed message.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::invoke_specialist::{InvokeSpecialistError, InvokeSpecialistUseCase};
use counsel_domain::{
    ChatMessage, ComposedMessage, ContentBlock, ContextBundle, ConversationTurn,
    OrchestratorEvent, PromptTemplate, SpecialistCall, SpecialistId, SpecialistRegistry,
    SpecialistResult, StreamEvent, ToolDefinition,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// How many recent history turns the orchestrator sees
const HISTORY_WINDOW: usize = 20;

/// Progress text emitted when planning starts
pub const PLANNING_MESSAGE: &str =
    "Analyzing the tax issue to determine which specialists to consult...";

/// Progress text emitted when synthesis starts
pub const SYNTHESIS_MESSAGE: &str =
    "Synthesizing specialist responses into an integrated analysis...";

/// Errors that abort an orchestration request.
///
/// None of these are recovered locally: any failure in any phase fails the
/// whole request, and the caller must resubmit to retry.
#[derive(Error, Debug)]
pub enum RunOrchestratorError {
    #[error("Planning call failed: {0}")]
    Planning(GatewayError),

    #[error("Planner requested unknown specialist tool: {0}")]
    UnknownSpecialist(String),

    #[error("Specialist {specialist} failed: {source}")]
    SpecialistFailed {
        specialist: SpecialistId,
        source: InvokeSpecialistError,
    },

    #[error("Synthesis call failed: {0}")]
    Synthesis(GatewayError),

    #[error("Synthesis stream ended early: {0}")]
    SynthesisIncomplete(String),

    #[error("Consultation task failed: {0}")]
    TaskFailed(String),

    #[error("Request cancelled by caller")]
    Cancelled,
}

/// One inbound orchestration request
#[derive(Debug, Clone)]
pub struct OrchestratorRequest {
    /// The user's new message
    pub new_user_text: String,
    /// Opaque context assembled by external collaborators
    pub context_bundle: ContextBundle,
    /// Prior conversation, oldest first
    pub history: Vec<ConversationTurn>,
}

/// Use case for running one orchestrated request
pub struct RunOrchestratorUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<SpecialistRegistry>,
    invoker: Arc<InvokeSpecialistUseCase<G>>,
    persona: String,
}

impl<G: LlmGateway + 'static> RunOrchestratorUseCase<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<SpecialistRegistry>) -> Self {
        let invoker = Arc::new(InvokeSpecialistUseCase::new(
            Arc::clone(&gateway),
            Arc::clone(&registry),
        ));
        Self {
            gateway,
            registry,
            invoker,
            persona: PromptTemplate::orchestrator_persona().to_string(),
        }
    }

    /// Override the orchestrator persona (configuration data, not logic)
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Execute the request, pushing progress events onto `events`.
    ///
    /// Returns the composed message if and only if a `done` event was
    /// emitted. On failure exactly one `error` event is emitted (unless the
    /// caller has already disconnected) and the error is returned.
    pub async fn execute(
        &self,
        request: OrchestratorRequest,
        events: mpsc::Sender<OrchestratorEvent>,
    ) -> Result<ComposedMessage, RunOrchestratorError> {
        info!(
            specialists = self.registry.len(),
            history_turns = request.history.len(),
            "starting orchestration"
        );

        // ==================== PLANNING ====================
        self.emit(&events, OrchestratorEvent::thinking(PLANNING_MESSAGE))
            .await?;

        let recent =
            &request.history[request.history.len().saturating_sub(HISTORY_WINDOW)..];
        let mut messages: Vec<ChatMessage> =
            recent.iter().map(ChatMessage::from_turn).collect();
        messages.push(ChatMessage::user(&request.new_user_text));

        let tools: Vec<ToolDefinition> = self
            .registry
            .iter()
            .map(ToolDefinition::for_specialist)
            .collect();

        let planning_request = CompletionRequest::with_tools(
            PromptTemplate::orchestrator_system(&self.persona, &request.context_bundle),
            messages.clone(),
            tools,
        );

        let planning = match self.gateway.complete(planning_request).await {
            Ok(response) => response,
            Err(e) => return self.fail(&events, RunOrchestratorError::Planning(e)).await,
        };

        // ==================== DIRECT ANSWER ====================
        // A planner that answers without consulting anyone is valid input,
        // not an error, even though its instructions discourage it.
        if !planning.has_tool_uses() {
            debug!("planner returned no tool calls, answering directly");
            let text = planning.text_content();
            if !text.is_empty() {
                self.emit(&events, OrchestratorEvent::text(text.clone()))
                    .await?;
            }
            self.emit(&events, OrchestratorEvent::Done).await?;
            return Ok(ComposedMessage::direct(text));
        }

        // ==================== FANOUT ====================
        let calls = match self.plan_calls(&planning) {
            Ok(calls) => calls,
            Err(e) => return self.fail(&events, e).await,
        };

        // The full consultation plan is announced eagerly, in planner order,
        // before any consultation completes.
        for call in &calls {
            let name = self.display_name(&call.specialist);
            self.emit(
                &events,
                OrchestratorEvent::SpecialistCalled {
                    specialist: call.specialist.clone(),
                    name,
                },
            )
            .await?;
        }

        let results = match self
            .fan_out(&calls, &request.context_bundle, &request.history)
            .await
        {
            Ok(results) => results,
            Err(e) => return self.fail(&events, e).await,
        };

        // ==================== SYNTHESIZING ====================
        self.emit(&events, OrchestratorEvent::thinking(SYNTHESIS_MESSAGE))
            .await?;

        let mut follow_up = messages;
        follow_up.push(ChatMessage::assistant_blocks(planning.content.clone()));
        follow_up.push(ChatMessage::tool_results(
            calls
                .iter()
                .zip(&results)
                .map(|(call, result)| ContentBlock::ToolResult {
                    tool_use_id: call.id.clone(),
                    content: result.response.clone(),
                })
                .collect(),
        ));

        let synthesis_request = CompletionRequest::plain(
            PromptTemplate::synthesis_system(&self.persona, &request.context_bundle),
            follow_up,
        );

        let mut handle = match self.gateway.stream(synthesis_request).await {
            Ok(handle) => handle,
            Err(e) => return self.fail(&events, RunOrchestratorError::Synthesis(e)).await,
        };

        let mut synthesis = String::new();
        let mut completed = false;
        while let Some(event) = handle.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    synthesis.push_str(&chunk);
                    self.emit(&events, OrchestratorEvent::text(chunk)).await?;
                }
                StreamEvent::Completed => {
                    completed = true;
                    break;
                }
                StreamEvent::Error(message) => {
                    return self
                        .fail(&events, RunOrchestratorError::SynthesisIncomplete(message))
                        .await;
                }
            }
        }
        if !completed {
            return self
                .fail(
                    &events,
                    RunOrchestratorError::SynthesisIncomplete(
                        "stream closed before completion signal".to_string(),
                    ),
                )
                .await;
        }

        // ==================== DONE ====================
        for result in &results {
            self.emit(
                &events,
                OrchestratorEvent::SpecialistDetail {
                    specialist: result.specialist.clone(),
                    name: result.name.clone(),
                    response: result.response.clone(),
                },
            )
            .await?;
        }
        self.emit(&events, OrchestratorEvent::Done).await?;

        info!(
            consultations = results.len(),
            synthesis_bytes = synthesis.len(),
            "orchestration complete"
        );
        Ok(ComposedMessage::new(synthesis, results))
    }

    /// Map the planner's tool-use requests to specialist calls, in
    /// planner-returned order.
    fn plan_calls(
        &self,
        planning: &counsel_domain::LlmResponse,
    ) -> Result<Vec<SpecialistCall>, RunOrchestratorError> {
        let tool_uses = planning.tool_uses();
        let mut calls = Vec::with_capacity(tool_uses.len());
        for (id, name, input) in tool_uses {
            let specialist = SpecialistId::from_tool_name(name)
                .filter(|s| self.registry.get(s).is_some())
                .ok_or_else(|| RunOrchestratorError::UnknownSpecialist(name.to_string()))?;

            let field = |key: &str| {
                input
                    .get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };

            calls.push(SpecialistCall {
                id: id.to_string(),
                specialist,
                question: field("question"),
                client_context: field("client_context"),
            });
        }
        Ok(calls)
    }

    /// Run every planned consultation concurrently and join on all of them.
    ///
    /// Results land in request-order slots regardless of completion order.
    /// The first failure wins; remaining joins are drained and their results
    /// discarded before the error propagates.
    async fn fan_out(
        &self,
        calls: &[SpecialistCall],
        bundle: &ContextBundle,
        history: &[ConversationTurn],
    ) -> Result<Vec<SpecialistResult>, RunOrchestratorError> {
        info!(consultations = calls.len(), "fan-out phase");

        let mut join_set = JoinSet::new();
        for (index, call) in calls.iter().enumerate() {
            let invoker = Arc::clone(&self.invoker);
            let call = call.clone();
            let bundle = bundle.clone();
            let history = history.to_vec();
            join_set.spawn(async move {
                let result = invoker.invoke(&call, &bundle, &history).await;
                (index, call, result)
            });
        }

        let mut slots: Vec<Option<SpecialistResult>> = vec![None; calls.len()];
        let mut first_failure: Option<RunOrchestratorError> = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, call, Ok(response))) => {
                    debug!(specialist = %call.specialist, "consultation completed");
                    let name = self.display_name(&call.specialist);
                    slots[index] = Some(SpecialistResult::new(call.specialist, name, response));
                }
                Ok((_, call, Err(e))) => {
                    warn!(specialist = %call.specialist, error = %e, "consultation failed");
                    if first_failure.is_none() {
                        first_failure = Some(RunOrchestratorError::SpecialistFailed {
                            specialist: call.specialist,
                            source: e,
                        });
                    }
                }
                Err(e) => {
                    warn!(error = %e, "consultation task join error");
                    if first_failure.is_none() {
                        first_failure = Some(RunOrchestratorError::TaskFailed(e.to_string()));
                    }
                }
            }
        }

        if let Some(failure) = first_failure {
            return Err(failure);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                RunOrchestratorError::TaskFailed("missing consultation result".to_string())
            })
    }

    fn display_name(&self, specialist: &SpecialistId) -> String {
        self.registry
            .get(specialist)
            .map(|c| c.display_name.clone())
            .unwrap_or_else(|| specialist.to_string())
    }

    async fn emit(
        &self,
        events: &mpsc::Sender<OrchestratorEvent>,
        event: OrchestratorEvent,
    ) -> Result<(), RunOrchestratorError> {
        events
            .send(event)
            .await
            .map_err(|_| RunOrchestratorError::Cancelled)
    }

    /// Emit the terminal `error` event and propagate the failure.
    ///
    /// The wire message is always the fixed generic text; the diagnostic
    /// detail stays in the returned error and the log. If the caller has
    /// already disconnected the event is silently dropped.
    async fn fail(
        &self,
        events: &mpsc::Sender<OrchestratorEvent>,
        error: RunOrchestratorError,
    ) -> Result<ComposedMessage, RunOrchestratorError> {
        warn!(error = %error, "orchestration failed");
        let _ = events.send(OrchestratorEvent::error()).await;
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use counsel_domain::{GENERIC_ERROR_MESSAGE, LlmResponse, StopReason};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    /// Scripted gateway: queued blocking responses plus queued stream scripts.
    struct MockGateway {
        completions: Mutex<VecDeque<Result<LlmResponse, GatewayError>>>,
        streams: Mutex<VecDeque<Result<Vec<StreamEvent>, GatewayError>>>,
        /// Per-call artificial delay, keyed by a marker in the last message.
        /// Used to force completion order to differ from request order.
        delays: Mutex<HashMap<String, Duration>>,
        /// Responses keyed by a marker in the last message; checked before
        /// the queue. Used when concurrent calls must map deterministically.
        keyed: Mutex<HashMap<String, LlmResponse>>,
    }

    impl MockGateway {
        fn new(
            completions: Vec<Result<LlmResponse, GatewayError>>,
            streams: Vec<Result<Vec<StreamEvent>, GatewayError>>,
        ) -> Self {
            Self {
                completions: Mutex::new(VecDeque::from(completions)),
                streams: Mutex::new(VecDeque::from(streams)),
                delays: Mutex::new(HashMap::new()),
                keyed: Mutex::new(HashMap::new()),
            }
        }

        fn with_delay(self, marker: &str, delay: Duration) -> Self {
            self.delays
                .lock()
                .unwrap()
                .insert(marker.to_string(), delay);
            self
        }

        fn with_keyed(self, marker: &str, response: LlmResponse) -> Self {
            self.keyed
                .lock()
                .unwrap()
                .insert(marker.to_string(), response);
            self
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<LlmResponse, GatewayError> {
            let last_text = request
                .messages
                .last()
                .and_then(|m| m.content.first())
                .and_then(|b| b.as_text())
                .unwrap_or_default()
                .to_string();

            let delay = {
                let delays = self.delays.lock().unwrap();
                delays
                    .iter()
                    .find(|(marker, _)| last_text.contains(marker.as_str()))
                    .map(|(_, d)| *d)
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let keyed = {
                let keyed = self.keyed.lock().unwrap();
                keyed
                    .iter()
                    .find(|(marker, _)| last_text.contains(marker.as_str()))
                    .map(|(_, r)| r.clone())
            };
            if let Some(response) = keyed {
                return Ok(response);
            }

            self.completions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::RequestFailed("no scripted response".into())))
        }

        async fn stream(
            &self,
            _request: CompletionRequest,
        ) -> Result<crate::ports::llm_gateway::StreamHandle, GatewayError> {
            let script = self
                .streams
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Unavailable("no scripted stream".into())))?;

            let (tx, rx) = mpsc::channel(16);
            tokio::spawn(async move {
                for event in script {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            });
            Ok(crate::ports::llm_gateway::StreamHandle::new(rx))
        }
    }

    // ==================== Test Helpers ====================

    fn tool_use(id: &str, specialist: &str, question: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: format!("consult_{specialist}"),
            input: [
                ("question".to_string(), serde_json::json!(question)),
                (
                    "client_context".to_string(),
                    serde_json::json!("test context"),
                ),
            ]
            .into_iter()
            .collect(),
        }
    }

    fn plan(blocks: Vec<ContentBlock>) -> Result<LlmResponse, GatewayError> {
        Ok(LlmResponse {
            content: blocks,
            stop_reason: Some(StopReason::ToolUse),
        })
    }

    fn stream_of(text_chunks: &[&str]) -> Result<Vec<StreamEvent>, GatewayError> {
        let mut events: Vec<StreamEvent> = text_chunks
            .iter()
            .map(|c| StreamEvent::Delta(c.to_string()))
            .collect();
        events.push(StreamEvent::Completed);
        Ok(events)
    }

    fn request() -> OrchestratorRequest {
        OrchestratorRequest {
            new_user_text: "Classify this entity".to_string(),
            context_bundle: ContextBundle::default(),
            history: Vec::new(),
        }
    }

    async fn run(
        gateway: MockGateway,
    ) -> (
        Result<ComposedMessage, RunOrchestratorError>,
        Vec<OrchestratorEvent>,
    ) {
        let use_case = RunOrchestratorUseCase::new(
            Arc::new(gateway),
            Arc::new(SpecialistRegistry::default_panel()),
        );
        let (tx, mut rx) = mpsc::channel(64);
        let collector = async {
            let mut events = Vec::new();
            while let Some(event) = rx.recv().await {
                events.push(event);
            }
            events
        };
        tokio::join!(use_case.execute(request(), tx), collector)
    }

    fn called_ids(events: &[OrchestratorEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                OrchestratorEvent::SpecialistCalled { specialist, .. } => {
                    Some(specialist.to_string())
                }
                _ => None,
            })
            .collect()
    }

    fn detail_ids(events: &[OrchestratorEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                OrchestratorEvent::SpecialistDetail { specialist, .. } => {
                    Some(specialist.to_string())
                }
                _ => None,
            })
            .collect()
    }

    fn streamed_text(events: &[OrchestratorEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                OrchestratorEvent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn two_specialist_fan_out_emits_full_protocol() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![
                    tool_use("toolu_a", "individual", "Question A"),
                    tool_use("toolu_b", "corporate", "Question B"),
                ]),
                Ok(LlmResponse::from_text("Individual answer.")),
                Ok(LlmResponse::from_text("Corporate answer.")),
            ],
            vec![stream_of(&["Integrated ", "analysis."])],
        );

        let (result, events) = run(gateway).await;
        let composed = result.unwrap();

        // Plan announced eagerly, in planner order.
        assert!(matches!(events[0], OrchestratorEvent::OrchestratorThinking { .. }));
        assert_eq!(called_ids(&events), vec!["individual", "corporate"]);

        // Detail events mirror the called sequence, after synthesis.
        assert_eq!(detail_ids(&events), vec!["individual", "corporate"]);
        assert_eq!(events.last(), Some(&OrchestratorEvent::Done));

        // Streamed text reconstructs the synthesis exactly.
        assert_eq!(streamed_text(&events), "Integrated analysis.");
        assert_eq!(composed.synthesis(), "Integrated analysis.");
        assert_eq!(composed.details().len(), 2);

        // specialist_called strictly precedes the synthesis thinking event.
        let last_called = events
            .iter()
            .rposition(|e| matches!(e, OrchestratorEvent::SpecialistCalled { .. }))
            .unwrap();
        let synthesis_thinking = events
            .iter()
            .rposition(|e| matches!(e, OrchestratorEvent::OrchestratorThinking { .. }))
            .unwrap();
        assert!(last_called < synthesis_thinking);
    }

    #[tokio::test]
    async fn detail_order_is_request_order_not_completion_order() {
        // The first-planned specialist finishes last.
        let gateway = MockGateway::new(
            vec![plan(vec![
                tool_use("toolu_a", "individual", "SLOW question"),
                tool_use("toolu_b", "corporate", "fast question"),
            ])],
            vec![stream_of(&["done"])],
        )
        .with_delay("SLOW", Duration::from_millis(50))
        .with_keyed("SLOW question", LlmResponse::from_text("Slow answer."))
        .with_keyed("fast question", LlmResponse::from_text("Fast answer."));

        let (result, events) = run(gateway).await;
        let composed = result.unwrap();

        assert_eq!(detail_ids(&events), vec!["individual", "corporate"]);
        assert_eq!(composed.details()[0].specialist.as_str(), "individual");
        assert_eq!(composed.details()[0].response, "Slow answer.");
        assert_eq!(composed.details()[1].response, "Fast answer.");
    }

    #[tokio::test]
    async fn direct_answer_path_skips_specialists() {
        let gateway = MockGateway::new(
            vec![Ok(LlmResponse::from_text("You can answer this directly."))],
            vec![],
        );

        let (result, events) = run(gateway).await;
        let composed = result.unwrap();

        assert!(called_ids(&events).is_empty());
        assert!(detail_ids(&events).is_empty());
        assert_eq!(streamed_text(&events), "You can answer this directly.");
        assert_eq!(events.last(), Some(&OrchestratorEvent::Done));
        assert_eq!(composed.render(), "You can answer this directly.");
        assert!(composed.details().is_empty());
    }

    #[tokio::test]
    async fn planning_failure_emits_single_error_event() {
        let gateway = MockGateway::new(
            vec![Err(GatewayError::Unavailable("connection refused".into()))],
            vec![],
        );

        let (result, events) = run(gateway).await;

        assert!(matches!(result, Err(RunOrchestratorError::Planning(_))));
        // Thinking was already emitted; then exactly one terminal error.
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            OrchestratorEvent::Error {
                message: GENERIC_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn specialist_failure_aborts_whole_request() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![
                    tool_use("toolu_a", "individual", "Question A"),
                    tool_use("toolu_b", "corporate", "SLOW question"),
                ]),
                Err(GatewayError::RequestFailed("overloaded".into())),
                Ok(LlmResponse::from_text("Discarded answer.")),
            ],
            vec![stream_of(&["never reached"])],
        )
        .with_delay("SLOW", Duration::from_millis(30));

        let (result, events) = run(gateway).await;

        assert!(matches!(
            result,
            Err(RunOrchestratorError::SpecialistFailed { .. })
        ));
        let errors = events
            .iter()
            .filter(|e| matches!(e, OrchestratorEvent::Error { .. }))
            .count();
        assert_eq!(errors, 1);
        assert!(!events.contains(&OrchestratorEvent::Done));
        assert!(detail_ids(&events).is_empty());
        // No synthesis text was streamed.
        assert_eq!(streamed_text(&events), "");
    }

    #[tokio::test]
    async fn synthesis_stream_error_aborts_after_partial_text() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![tool_use("toolu_a", "individual", "Question")]),
                Ok(LlmResponse::from_text("Answer.")),
            ],
            vec![Ok(vec![
                StreamEvent::Delta("Partial ".to_string()),
                StreamEvent::Error("stream reset".to_string()),
            ])],
        );

        let (result, events) = run(gateway).await;

        assert!(matches!(
            result,
            Err(RunOrchestratorError::SynthesisIncomplete(_))
        ));
        // Already-emitted deltas are not retracted.
        assert_eq!(streamed_text(&events), "Partial ");
        assert!(!events.contains(&OrchestratorEvent::Done));
        assert!(matches!(
            events.last(),
            Some(OrchestratorEvent::Error { .. })
        ));
    }

    #[tokio::test]
    async fn stream_closing_without_completion_is_incomplete() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![tool_use("toolu_a", "individual", "Question")]),
                Ok(LlmResponse::from_text("Answer.")),
            ],
            vec![Ok(vec![StreamEvent::Delta("truncated".to_string())])],
        );

        let (result, events) = run(gateway).await;

        assert!(matches!(
            result,
            Err(RunOrchestratorError::SynthesisIncomplete(_))
        ));
        assert!(!events.contains(&OrchestratorEvent::Done));
    }

    #[tokio::test]
    async fn duplicate_specialist_runs_twice_in_request_order() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![
                    tool_use("toolu_a", "partnership", "First angle"),
                    tool_use("toolu_b", "partnership", "Second angle"),
                ]),
                Ok(LlmResponse::from_text("First answer.")),
                Ok(LlmResponse::from_text("Second answer.")),
            ],
            vec![stream_of(&["done"])],
        );

        let (result, events) = run(gateway).await;
        let composed = result.unwrap();

        assert_eq!(called_ids(&events), vec!["partnership", "partnership"]);
        assert_eq!(detail_ids(&events), vec!["partnership", "partnership"]);
        assert_eq!(composed.details().len(), 2);
    }

    #[tokio::test]
    async fn unknown_tool_name_fails_the_request() {
        let gateway = MockGateway::new(
            vec![plan(vec![ContentBlock::ToolUse {
                id: "toolu_x".to_string(),
                name: "delete_everything".to_string(),
                input: Default::default(),
            }])],
            vec![],
        );

        let (result, events) = run(gateway).await;

        assert!(matches!(
            result,
            Err(RunOrchestratorError::UnknownSpecialist(_))
        ));
        assert!(matches!(
            events.last(),
            Some(OrchestratorEvent::Error { .. })
        ));
    }

    #[tokio::test]
    async fn empty_synthesis_still_completes() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![tool_use("toolu_a", "corporate", "Question")]),
                Ok(LlmResponse::from_text("Answer.")),
            ],
            vec![Ok(vec![StreamEvent::Completed])],
        );

        let (result, events) = run(gateway).await;
        let composed = result.unwrap();

        assert!(events.contains(&OrchestratorEvent::Done));
        assert_eq!(composed.synthesis(), "");
        assert_eq!(composed.details().len(), 1);
    }

    #[tokio::test]
    async fn replay_with_deterministic_gateway_is_identical() {
        let script = || {
            MockGateway::new(
                vec![plan(vec![
                    tool_use("toolu_a", "individual", "Question A"),
                    tool_use("toolu_b", "partnership", "Question B"),
                ])],
                vec![stream_of(&["chunk one ", "chunk two"])],
            )
            .with_keyed("Question A", LlmResponse::from_text("Answer A."))
            .with_keyed("Question B", LlmResponse::from_text("Answer B."))
        };

        let (first_result, first_events) = run(script()).await;
        let (second_result, second_events) = run(script()).await;

        assert_eq!(first_events, second_events);
        assert_eq!(first_result.unwrap(), second_result.unwrap());
    }

    #[tokio::test]
    async fn dropped_receiver_cancels_without_composed_message() {
        let gateway = MockGateway::new(
            vec![plan(vec![tool_use("toolu_a", "individual", "Question")])],
            vec![],
        );
        let use_case = RunOrchestratorUseCase::new(
            Arc::new(gateway),
            Arc::new(SpecialistRegistry::default_panel()),
        );

        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let result = use_case.execute(request(), tx).await;
        assert!(matches!(result, Err(RunOrchestratorError::Cancelled)));
    }

    #[tokio::test]
    async fn called_and_detail_sequences_match() {
        let gateway = MockGateway::new(
            vec![
                plan(vec![
                    tool_use("toolu_a", "corporate", "Q1"),
                    tool_use("toolu_b", "individual", "Q2"),
                    tool_use("toolu_c", "partnership", "Q3"),
                ]),
                Ok(LlmResponse::from_text("A1")),
                Ok(LlmResponse::from_text("A2")),
                Ok(LlmResponse::from_text("A3")),
            ],
            vec![stream_of(&["synthesis"])],
        );

        let (result, events) = run(gateway).await;
        assert!(result.is_ok());
        assert_eq!(called_ids(&events), detail_ids(&events));
        assert_eq!(called_ids(&events).len(), 3);
    }
}
