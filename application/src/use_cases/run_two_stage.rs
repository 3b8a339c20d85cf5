//! Run Two-Stage use case.
//!
//! Answers a query under the triage profile, then lets the caller decide,
//! from the assembled triage text, whether to ask the same query again under
//! the detailed profile.
//!
//! The decision is left to the caller: [`RunTwoStageUseCase::start`]
//! returns a [`TwoStageRun`] whose first-stage stream the caller drains, and a
//! [`SecondStage`] handle exposing the trigger predicate and the deferred
//! second exchange. [`RunTwoStageUseCase::execute`] drives the whole flow for
//! callers that only want the final answers.
//!
//! Each stage opens its own session; nothing is shared between them except
//! the query text and the cancellation token.

use crate::config::TwoStageConfig;
use crate::ports::chat_backend::{ChatBackend, GatewayError, PacketStream};
use crate::ports::exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger};
use crate::ports::progress::StageProgressNotifier;
use casematch_domain::{Answer, ModelSpec, Packet, ProfileId, Query, SessionId, Stage, TriggerMarker};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Input for the [`RunTwoStageUseCase`].
#[derive(Debug, Clone)]
pub struct RunTwoStageInput {
    /// The caller's query, sent verbatim to both stages.
    pub query: Query,
    /// Shared by both stages; cancelling it aborts whichever exchange is live.
    pub cancellation: CancellationToken,
}

impl RunTwoStageInput {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Result of [`RunTwoStageUseCase::start`].
///
/// The two members are independent: the caller may drain `first_stage`,
/// then consult `second_stage` with the assembled text.
pub struct TwoStageRun {
    /// Lazy packet stream of the triage exchange.
    pub first_stage: PacketStream,
    /// Trigger predicate and deferred detailed exchange.
    pub second_stage: SecondStage,
}

impl TwoStageRun {
    pub fn into_parts(self) -> (PacketStream, SecondStage) {
        (self.first_stage, self.second_stage)
    }
}

/// Output of [`RunTwoStageUseCase::execute`].
#[derive(Debug, Clone)]
pub struct TwoStageOutcome {
    pub triage: Answer,
    /// Present only when the triage answer contained the trigger marker.
    pub detailed: Option<Answer>,
}

impl TwoStageOutcome {
    /// The answer to present: the detailed one when it ran, triage otherwise.
    pub fn final_answer(&self) -> &Answer {
        self.detailed.as_ref().unwrap_or(&self.triage)
    }
}

/// Opens one exchange: create session, optional override, send.
#[derive(Clone)]
struct ExchangeOpener {
    backend: Arc<dyn ChatBackend>,
    logger: Arc<dyn ExchangeLogger>,
}

impl ExchangeOpener {
    async fn open(
        &self,
        stage: Stage,
        profile: ProfileId,
        model: Option<&ModelSpec>,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<PacketStream, GatewayError> {
        let session = self.backend.create_session(profile, None, cancel).await?;
        info!("{} session created: {} (profile {})", stage, session, profile);
        self.logger.log(ExchangeEvent::new(
            "session_created",
            serde_json::json!({
                "stage": stage.as_str(),
                "session_id": session.as_str(),
                "profile_id": profile.value(),
            }),
        ));

        if let Some(model) = model {
            self.backend.override_model(&session, model, cancel).await?;
            info!("{} session {} now runs {}", stage, session, model);
            self.logger.log(ExchangeEvent::new(
                "model_override",
                serde_json::json!({
                    "stage": stage.as_str(),
                    "session_id": session.as_str(),
                    "model": model.alternate_model(),
                }),
            ));
        }

        let stream = self
            .backend
            .send_message(&session, query.content(), profile, cancel.clone())
            .await?;
        self.logger.log(ExchangeEvent::new(
            "message_sent",
            serde_json::json!({
                "stage": stage.as_str(),
                "session_id": session.as_str(),
                "bytes": query.content().len(),
            }),
        ));

        Ok(observe(stream, stage, session, Arc::clone(&self.logger)))
    }
}

/// Record the outcome of a stream in the exchange log as it is consumed.
fn observe(
    stream: PacketStream,
    stage: Stage,
    session: SessionId,
    logger: Arc<dyn ExchangeLogger>,
) -> PacketStream {
    let mut fragments: usize = 0;
    let mut bytes: usize = 0;
    PacketStream::new(stream.inspect(move |item| match item {
        Ok(Packet::AnswerFragment(piece)) => {
            fragments += 1;
            bytes += piece.len();
        }
        Ok(Packet::SourceReference(_)) => {}
        Ok(Packet::StreamTermination(info)) => {
            debug!(
                "{} exchange complete ({} fragments, {} bytes)",
                stage, fragments, bytes
            );
            logger.log(ExchangeEvent::new(
                "exchange_complete",
                serde_json::json!({
                    "stage": stage.as_str(),
                    "session_id": session.as_str(),
                    "fragments": fragments,
                    "bytes": bytes,
                    "stop_info": info,
                }),
            ));
        }
        Err(e) if e.is_aborted() => {
            info!("{} exchange aborted", stage);
            logger.log(ExchangeEvent::new(
                "exchange_aborted",
                serde_json::json!({
                    "stage": stage.as_str(),
                    "session_id": session.as_str(),
                    "fragments": fragments,
                }),
            ));
        }
        Err(e) => {
            logger.log(ExchangeEvent::new(
                "exchange_failed",
                serde_json::json!({
                    "stage": stage.as_str(),
                    "session_id": session.as_str(),
                    "error": e.to_string(),
                }),
            ));
        }
    }))
}

/// Trigger predicate and deferred detailed exchange of a two-stage run.
///
/// Closes over the original query and cancellation token. Nothing is sent
/// until [`run`](Self::run) (or a triggered
/// [`continue_if_triggered`](Self::continue_if_triggered)) is called.
#[derive(Clone)]
pub struct SecondStage {
    opener: ExchangeOpener,
    profile: ProfileId,
    marker: TriggerMarker,
    query: Query,
    cancellation: CancellationToken,
}

impl SecondStage {
    /// Case-insensitive test for the trigger marker in `text`.
    pub fn check_trigger(&self, text: &str) -> bool {
        self.marker.matches(text)
    }

    /// Open the detailed exchange in a fresh session.
    ///
    /// The detailed session keeps the backend's own model: no override is sent.
    pub async fn run(&self) -> Result<PacketStream, GatewayError> {
        info!("Starting detailed stage");
        self.opener
            .open(
                Stage::Detailed,
                self.profile,
                None,
                &self.query,
                &self.cancellation,
            )
            .await
    }

    /// Open the detailed exchange only if `triage_text` contains the marker.
    pub async fn continue_if_triggered(
        &self,
        triage_text: &str,
    ) -> Result<Option<PacketStream>, GatewayError> {
        if !self.check_trigger(triage_text) {
            debug!("Trigger marker '{}' not found, skipping detailed stage", self.marker);
            return Ok(None);
        }
        self.run().await.map(Some)
    }
}

/// Use case for a two-stage triage run.
///
/// 1. Create a triage session and override its model
/// 2. Send the query, exposing the lazy stream as the first stage
/// 3. Expose the trigger predicate and the deferred detailed stage
pub struct RunTwoStageUseCase {
    backend: Arc<dyn ChatBackend>,
    config: TwoStageConfig,
    exchange_logger: Arc<dyn ExchangeLogger>,
}

impl Clone for RunTwoStageUseCase {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            config: self.config.clone(),
            exchange_logger: self.exchange_logger.clone(),
        }
    }
}

impl RunTwoStageUseCase {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            config: TwoStageConfig::default(),
            exchange_logger: Arc::new(NoExchangeLogger),
        }
    }

    pub fn with_config(mut self, config: TwoStageConfig) -> Self {
        self.config = config;
        self
    }

    /// Create with an exchange logger.
    pub fn with_exchange_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.exchange_logger = logger;
        self
    }

    fn opener(&self) -> ExchangeOpener {
        ExchangeOpener {
            backend: Arc::clone(&self.backend),
            logger: Arc::clone(&self.exchange_logger),
        }
    }

    /// Open the triage exchange.
    ///
    /// Session creation, model override and handshake failures are returned
    /// here; no stream exists in that case. The detailed profile is never
    /// contacted by this call.
    pub async fn start(&self, input: RunTwoStageInput) -> Result<TwoStageRun, GatewayError> {
        info!("Starting triage stage");
        let opener = self.opener();
        let first_stage = opener
            .open(
                Stage::Triage,
                self.config.triage_profile,
                Some(&self.config.triage_model),
                &input.query,
                &input.cancellation,
            )
            .await?;

        Ok(TwoStageRun {
            first_stage,
            second_stage: SecondStage {
                opener,
                profile: self.config.detailed_profile,
                marker: self.config.marker.clone(),
                query: input.query,
                cancellation: input.cancellation,
            },
        })
    }

    /// Run both stages to completion, reporting progress.
    ///
    /// Drains the triage stream, checks the marker, and drains the detailed
    /// stream when triggered. Errors from either stage propagate unchanged.
    pub async fn execute(
        &self,
        input: RunTwoStageInput,
        progress: &dyn StageProgressNotifier,
    ) -> Result<TwoStageOutcome, GatewayError> {
        progress.on_stage_start(Stage::Triage);
        let (first_stage, second_stage) = self.start(input).await?.into_parts();
        let triage = drain(first_stage, Stage::Triage, progress).await?;

        let triggered = second_stage.check_trigger(triage.text());
        progress.on_trigger_checked(triggered);

        let detailed = if triggered {
            progress.on_stage_start(Stage::Detailed);
            let stream = second_stage.run().await?;
            Some(drain(stream, Stage::Detailed, progress).await?)
        } else {
            None
        };

        Ok(TwoStageOutcome { triage, detailed })
    }
}

async fn drain(
    stream: PacketStream,
    stage: Stage,
    progress: &dyn StageProgressNotifier,
) -> Result<Answer, GatewayError> {
    let answer = stream
        .collect_answer_with(|packet| match packet {
            Packet::AnswerFragment(piece) => progress.on_answer_piece(stage, piece),
            Packet::SourceReference(info) => progress.on_source(stage, info),
            Packet::StreamTermination(_) => {}
        })
        .await?;
    progress.on_stage_complete(stage, &answer);
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use futures::stream;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create { profile: ProfileId, session: String },
        Override { session: String, model: String },
        Send { session: String, profile: ProfileId, message: String },
    }

    #[derive(Default)]
    struct MockBackend {
        calls: Mutex<Vec<Call>>,
        next_id: AtomicUsize,
        answers: HashMap<ProfileId, Vec<Packet>>,
        fail_create: Option<(ProfileId, u16)>,
        fail_override: Option<u16>,
        interrupted: Option<Interruption>,
    }

    /// How the triage stream ends when it does not run to completion.
    #[derive(Clone)]
    enum Interruption {
        /// Blocks after the first fragment until the token fires.
        AwaitCancel,
        /// Fails after the first fragment with a backend error record.
        BackendError(&'static str),
    }

    impl MockBackend {
        fn new() -> Self {
            Self::default()
                .with_answer(ProfileId::TRIAGE, &["Category: ", "CASE_INQUIRY"])
                .with_answer(ProfileId::DETAILED, &["Matching ", "cases ", "found."])
        }

        fn with_answer(mut self, profile: ProfileId, pieces: &[&str]) -> Self {
            let mut packets: Vec<Packet> = pieces
                .iter()
                .map(|p| Packet::AnswerFragment(p.to_string()))
                .collect();
            packets.push(Packet::StreamTermination(json!({"stop_reason": "finished"})));
            self.answers.insert(profile, packets);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn create_session(
            &self,
            profile: ProfileId,
            _description: Option<&str>,
            cancel: &CancellationToken,
        ) -> Result<SessionId, GatewayError> {
            if cancel.is_cancelled() {
                return Err(GatewayError::Aborted);
            }
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let session = format!("session-{}", n);
            self.record(Call::Create {
                profile,
                session: session.clone(),
            });
            if let Some((failing, status)) = self.fail_create
                && failing == profile
            {
                return Err(GatewayError::SessionCreation {
                    status: Some(status),
                    reason: format!("status {}", status),
                });
            }
            Ok(SessionId::new(session).unwrap())
        }

        async fn override_model(
            &self,
            session: &SessionId,
            model: &ModelSpec,
            cancel: &CancellationToken,
        ) -> Result<(), GatewayError> {
            if cancel.is_cancelled() {
                return Err(GatewayError::Aborted);
            }
            self.record(Call::Override {
                session: session.to_string(),
                model: model.alternate_model(),
            });
            match self.fail_override {
                Some(status) => Err(GatewayError::SessionConfig { status }),
                None => Ok(()),
            }
        }

        async fn send_message(
            &self,
            session: &SessionId,
            message: &str,
            profile: ProfileId,
            cancel: CancellationToken,
        ) -> Result<PacketStream, GatewayError> {
            if cancel.is_cancelled() {
                return Err(GatewayError::Aborted);
            }
            self.record(Call::Send {
                session: session.to_string(),
                profile,
                message: message.to_string(),
            });
            let packets = self.answers.get(&profile).cloned().unwrap_or_default();
            match (&self.interrupted, profile) {
                (Some(interruption), ProfileId::TRIAGE) => {
                    let head = stream::iter(packets.into_iter().take(1).map(Ok));
                    let interruption = interruption.clone();
                    let tail = stream::once(async move {
                        match interruption {
                            Interruption::AwaitCancel => {
                                cancel.cancelled().await;
                                Err(GatewayError::Aborted)
                            }
                            Interruption::BackendError(message) => {
                                Err(GatewayError::Backend(message.to_string()))
                            }
                        }
                    });
                    Ok(PacketStream::new(head.chain(tail)))
                }
                _ => Ok(PacketStream::from_packets(packets)),
            }
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ExchangeLogger for RecordingLogger {
        fn log(&self, event: ExchangeEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        pieces: Mutex<Vec<(Stage, String)>>,
        triggered: Mutex<Option<bool>>,
    }

    impl StageProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, _stage: Stage) {}

        fn on_answer_piece(&self, stage: Stage, piece: &str) {
            self.pieces.lock().unwrap().push((stage, piece.to_string()));
        }

        fn on_stage_complete(&self, _stage: Stage, _answer: &Answer) {}

        fn on_trigger_checked(&self, triggered: bool) {
            *self.triggered.lock().unwrap() = Some(triggered);
        }
    }

    const QUERY: &str = "My landlord kept my deposit";

    fn input() -> RunTwoStageInput {
        RunTwoStageInput::new(Query::try_new(QUERY).unwrap())
    }

    fn use_case(backend: &Arc<MockBackend>) -> RunTwoStageUseCase {
        RunTwoStageUseCase::new(backend.clone())
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_start_issues_only_triage_requests() {
        let backend = Arc::new(MockBackend::new());
        let _run = use_case(&backend).start(input()).await.unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                Call::Create {
                    profile: ProfileId::TRIAGE,
                    session: "session-1".to_string()
                },
                Call::Override {
                    session: "session-1".to_string(),
                    model: "Default__openai__gpt-4o".to_string()
                },
                Call::Send {
                    session: "session-1".to_string(),
                    profile: ProfileId::TRIAGE,
                    message: QUERY.to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_first_stage_streams_triage_answer() {
        let backend = Arc::new(MockBackend::new());
        let run = use_case(&backend).start(input()).await.unwrap();

        let answer = run.first_stage.collect_answer().await.unwrap();
        assert_eq!(answer.text(), "Category: CASE_INQUIRY");
        assert!(answer.is_complete());
        assert!(run.second_stage.check_trigger(answer.text()));
    }

    #[tokio::test]
    async fn test_second_stage_uses_fresh_session_without_override() {
        let backend = Arc::new(MockBackend::new());
        let (first, second) = use_case(&backend).start(input()).await.unwrap().into_parts();
        first.collect_answer().await.unwrap();

        let detailed = second.run().await.unwrap().collect_answer().await.unwrap();
        assert_eq!(detailed.text(), "Matching cases found.");

        let calls = backend.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(
            calls[3],
            Call::Create {
                profile: ProfileId::DETAILED,
                session: "session-2".to_string()
            }
        );
        assert_eq!(
            calls[4],
            Call::Send {
                session: "session-2".to_string(),
                profile: ProfileId::DETAILED,
                message: QUERY.to_string()
            }
        );
        let overrides: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::Override { .. }))
            .collect();
        assert_eq!(overrides.len(), 1);
        assert!(matches!(overrides[0], Call::Override { session, .. } if session == "session-1"));
    }

    #[tokio::test]
    async fn test_second_stage_may_start_before_first_is_drained() {
        let backend = Arc::new(MockBackend::new());
        let run = use_case(&backend).start(input()).await.unwrap();

        let detailed = run.second_stage.run().await.unwrap();
        let (triage, detailed) =
            futures::join!(run.first_stage.collect_answer(), detailed.collect_answer());
        assert_eq!(triage.unwrap().text(), "Category: CASE_INQUIRY");
        assert_eq!(detailed.unwrap().text(), "Matching cases found.");
    }

    #[tokio::test]
    async fn test_continue_if_triggered_skips_without_marker() {
        let backend = Arc::new(MockBackend::new());
        let run = use_case(&backend).start(input()).await.unwrap();

        let next = run
            .second_stage
            .continue_if_triggered("general question, no match")
            .await
            .unwrap();
        assert!(next.is_none());
        assert_eq!(backend.calls().len(), 3);

        let next = run
            .second_stage
            .continue_if_triggered("this is a Case_Inquiry")
            .await
            .unwrap();
        assert!(next.is_some());
        assert_eq!(backend.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_check_trigger_is_case_insensitive() {
        let backend = Arc::new(MockBackend::new());
        let run = use_case(&backend).start(input()).await.unwrap();

        assert!(run.second_stage.check_trigger("This is a CASE_INQUIRY."));
        assert!(!run.second_stage.check_trigger("no match"));
    }

    #[tokio::test]
    async fn test_session_creation_failure_propagates_from_start() {
        let backend = Arc::new(MockBackend {
            fail_create: Some((ProfileId::TRIAGE, 500)),
            ..MockBackend::new()
        });

        let err = use_case(&backend).start(input()).await.err().unwrap();
        assert!(matches!(
            err,
            GatewayError::SessionCreation {
                status: Some(500),
                ..
            }
        ));
        assert!(
            !backend
                .calls()
                .iter()
                .any(|c| matches!(c, Call::Send { .. }))
        );
    }

    #[tokio::test]
    async fn test_override_failure_propagates_from_start() {
        let backend = Arc::new(MockBackend {
            fail_override: Some(404),
            ..MockBackend::new()
        });

        let err = use_case(&backend).start(input()).await.err().unwrap();
        assert!(matches!(err, GatewayError::SessionConfig { status: 404 }));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_second_stage_setup_failure_propagates_from_run() {
        let backend = Arc::new(MockBackend {
            fail_create: Some((ProfileId::DETAILED, 503)),
            ..MockBackend::new()
        });

        let run = use_case(&backend).start(input()).await.unwrap();
        let err = run.second_stage.run().await.err().unwrap();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_issues_no_request() {
        let backend = Arc::new(MockBackend::new());
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case(&backend)
            .start(input().with_cancellation(token))
            .await
            .err()
            .unwrap();
        assert!(err.is_aborted());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_token_is_shared_with_second_stage() {
        let backend = Arc::new(MockBackend::new());
        let token = CancellationToken::new();
        let run = use_case(&backend)
            .start(input().with_cancellation(token.clone()))
            .await
            .unwrap();

        token.cancel();
        let err = run.second_stage.run().await.err().unwrap();
        assert!(err.is_aborted());
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_execute_runs_detailed_stage_when_triggered() {
        let backend = Arc::new(MockBackend::new());
        let progress = RecordingProgress::default();

        let outcome = use_case(&backend)
            .execute(input(), &progress)
            .await
            .unwrap();

        assert_eq!(outcome.triage.text(), "Category: CASE_INQUIRY");
        assert_eq!(
            outcome.detailed.as_ref().map(|a| a.text()),
            Some("Matching cases found.")
        );
        assert_eq!(outcome.final_answer().text(), "Matching cases found.");
        assert_eq!(*progress.triggered.lock().unwrap(), Some(true));

        let pieces = progress.pieces.lock().unwrap();
        assert_eq!(pieces.len(), 5);
        assert_eq!(pieces[0], (Stage::Triage, "Category: ".to_string()));
        assert_eq!(pieces[4], (Stage::Detailed, "found.".to_string()));
    }

    #[tokio::test]
    async fn test_execute_stops_after_triage_without_marker() {
        let backend =
            Arc::new(MockBackend::new().with_answer(ProfileId::TRIAGE, &["general_question"]));

        let outcome = use_case(&backend)
            .execute(input(), &NoProgress)
            .await
            .unwrap();

        assert!(outcome.detailed.is_none());
        assert_eq!(outcome.final_answer().text(), "general_question");
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_custom_config_profiles_and_marker() {
        let backend = Arc::new(
            MockBackend::default()
                .with_answer(ProfileId::new(10), &["ESCALATE"])
                .with_answer(ProfileId::new(20), &["details"]),
        );
        let config = TwoStageConfig::default()
            .with_triage_profile(ProfileId::new(10))
            .with_detailed_profile(ProfileId::new(20))
            .with_marker(TriggerMarker::new("escalate").unwrap());

        let outcome = use_case(&backend)
            .with_config(config)
            .execute(input(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.final_answer().text(), "details");
    }

    #[tokio::test]
    async fn test_exchange_logger_records_lifecycle() {
        let backend = Arc::new(MockBackend::new());
        let logger = Arc::new(RecordingLogger::default());

        use_case(&backend)
            .with_exchange_logger(logger.clone())
            .execute(input(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "session_created",
                "model_override",
                "message_sent",
                "exchange_complete",
                "session_created",
                "message_sent",
                "exchange_complete",
            ]
        );
    }

    #[tokio::test]
    async fn test_exchange_logger_records_abort() {
        let backend = Arc::new(MockBackend {
            interrupted: Some(Interruption::AwaitCancel),
            ..MockBackend::new()
        });
        let logger = Arc::new(RecordingLogger::default());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = use_case(&backend)
            .with_exchange_logger(logger.clone())
            .execute(input().with_cancellation(cancel), &NoProgress)
            .await
            .unwrap_err();

        assert!(err.is_aborted());
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "session_created",
                "model_override",
                "message_sent",
                "exchange_aborted",
            ]
        );
        // The detailed profile is never contacted
        assert!(
            !backend
                .calls()
                .iter()
                .any(|c| matches!(c, Call::Create { profile, .. } if *profile == ProfileId::DETAILED))
        );
    }

    #[tokio::test]
    async fn test_exchange_logger_records_backend_failure() {
        let backend = Arc::new(MockBackend {
            interrupted: Some(Interruption::BackendError("model overloaded")),
            ..MockBackend::new()
        });
        let logger = Arc::new(RecordingLogger::default());

        let err = use_case(&backend)
            .with_exchange_logger(logger.clone())
            .execute(input(), &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Backend(ref m) if m == "model overloaded"));
        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "session_created",
                "model_override",
                "message_sent",
                "exchange_failed",
            ]
        );
    }
}
