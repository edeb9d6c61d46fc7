//! # Checkout Orchestrator
//!
//! Drives one attempt end to end:
//!
//! ```text
//! Idle ──submit──► Processing ──► Succeeded
//!   ▲                  │   └────► Failed
//!   │                  │             │
//!   └── (page load)    └─ validate → submit order → resolve provider
//!                         → confirm (settled or pending) → report
//! ```
//!
//! Terminal states accept a new submission. While Processing, further
//! submissions are ignored; the busy submit control is the only guard.

use crate::submission::{HttpOrderSubmitter, OrderSubmitter};
use chrono::{DateTime, Utc};
use checkout_core::widget::WIDGET_CLOSED_MESSAGE;
use checkout_core::{
    CheckoutConfig, CheckoutError, CheckoutResult, Confirmation, FormValidator, OrderForm,
    OrderSubmissionRequest, PaymentOutcome, ProviderKind, ProviderRegistry, StatusKind,
    StatusSurface, StatusView, UiState, ValidationReport, PROCESSING_MESSAGE,
};
use checkout_gateways::shows_card_section;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Summary of one completed attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptReport {
    pub attempt_id: Uuid,
    /// Provider that handled confirmation, if the order was created
    pub provider: Option<ProviderKind>,
    pub outcome: PaymentOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AttemptReport {
    pub fn state(&self) -> UiState {
        if self.outcome.is_success() {
            UiState::Succeeded
        } else {
            UiState::Failed
        }
    }
}

/// What a call to `submit` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// An attempt was already Processing; nothing happened
    Ignored,
    /// Local validation failed; no network call, UI untouched
    Rejected(ValidationReport),
    /// The attempt ran to a terminal state
    Completed(AttemptReport),
}

#[derive(Debug, Default)]
struct Inner {
    state: UiState,
    view: StatusView,
}

/// Checkout orchestrator. Owns `UiState` and its projection.
pub struct CheckoutOrchestrator {
    config: Arc<CheckoutConfig>,
    submitter: Arc<dyn OrderSubmitter>,
    registry: ProviderRegistry,
    surface: Arc<dyn StatusSurface>,
    validator: FormValidator,
    inner: Mutex<Inner>,
}

impl CheckoutOrchestrator {
    pub fn new(
        config: CheckoutConfig,
        submitter: Arc<dyn OrderSubmitter>,
        registry: ProviderRegistry,
        surface: Arc<dyn StatusSurface>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            submitter,
            registry,
            surface,
            validator: FormValidator::new(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Orchestrator posting to the configured endpoint over HTTP
    pub fn with_http(
        config: CheckoutConfig,
        registry: ProviderRegistry,
        surface: Arc<dyn StatusSurface>,
    ) -> CheckoutResult<Self> {
        let submitter = Arc::new(HttpOrderSubmitter::new(&config)?);
        Ok(Self::new(config, submitter, registry, surface))
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Current state
    pub fn state(&self) -> UiState {
        self.lock().state
    }

    /// Payment-method radio changed: project card-section visibility
    pub fn select_payment_method(&self, form: &mut OrderForm, method: &str) {
        form.set_payment_method(method);
        self.refresh_card_section(Some(method));
    }

    /// Project card-section visibility for the checked method. Pages call
    /// this once at load, before any radio changes.
    pub fn refresh_card_section(&self, payment_method: Option<&str>) {
        self.surface
            .show_card_section(shows_card_section(&self.registry, payment_method));
    }

    /// Handle a form submission
    pub async fn submit(&self, form: &OrderForm) -> Attempt {
        if let Err(report) = self.validator.check(form) {
            debug!("Form rejected by validation: {}", report);
            return Attempt::Rejected(report);
        }

        let request = match OrderSubmissionRequest::from_form(form) {
            Ok(request) => request,
            Err(e) => {
                debug!("Form could not be serialized: {}", e);
                return Attempt::Rejected(ValidationReport::default());
            }
        };

        if !self.begin() {
            debug!("Submission ignored: attempt already processing");
            return Attempt::Ignored;
        }

        let attempt_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("attempt", %attempt_id, payment_method = %request.payment_method());

        let (provider, outcome) = self.run(&request).instrument(span.clone()).await;

        span.in_scope(|| match &outcome {
            PaymentOutcome::Success(message) => info!("Attempt succeeded: {}", message),
            PaymentOutcome::Failure(reason) => info!("Attempt failed: {}", reason),
        });
        self.finish(&outcome);

        Attempt::Completed(AttemptReport {
            attempt_id,
            provider,
            outcome,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Submit, then provider confirmation. Every error becomes a Failure.
    async fn run(
        &self,
        request: &OrderSubmissionRequest,
    ) -> (Option<ProviderKind>, PaymentOutcome) {
        let response = match self.submitter.submit(request).await {
            Ok(response) => response,
            Err(e) => return (None, failure_from(e)),
        };

        let strategy = match self.registry.resolve(response.provider.as_deref()) {
            Ok(strategy) => strategy,
            Err(e) => return (None, failure_from(e)),
        };
        let provider = strategy.provider();
        debug!("Dispatching to provider: {}", provider);

        let outcome = match strategy.confirm(&response).await {
            Ok(Confirmation::Settled(outcome)) => outcome,
            Ok(Confirmation::Pending(pending)) => match pending.wait().await {
                Some(outcome) => outcome,
                None => {
                    error!("Provider dropped its callbacks without reporting an outcome");
                    PaymentOutcome::failure(WIDGET_CLOSED_MESSAGE)
                }
            },
            Err(e) => failure_from(e),
        };

        (Some(provider), outcome)
    }

    /// Enter Processing. False if an attempt is already in flight.
    fn begin(&self) -> bool {
        let mut inner = self.lock();
        if !inner.state.accepts_submit() {
            return false;
        }
        inner.state = UiState::Processing;
        inner
            .view
            .apply(self.surface.as_ref(), StatusKind::Info, PROCESSING_MESSAGE, true);
        true
    }

    /// Enter the terminal state for an outcome
    fn finish(&self, outcome: &PaymentOutcome) {
        let mut inner = self.lock();
        debug_assert_eq!(inner.state, UiState::Processing);

        let (state, kind) = match outcome {
            PaymentOutcome::Success(_) => (UiState::Succeeded, StatusKind::Success),
            PaymentOutcome::Failure(_) => (UiState::Failed, StatusKind::Danger),
        };
        inner.state = state;
        inner
            .view
            .apply(self.surface.as_ref(), kind, outcome.message(), false);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn failure_from(err: CheckoutError) -> PaymentOutcome {
    error!(category = err.category(), "Checkout attempt error: {}", err);
    PaymentOutcome::failure(err.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use async_trait::async_trait;
    use checkout_core::error::ORDER_CREATION_FAILED;
    use checkout_core::widget::REDIRECT_SUCCESS_MESSAGE;
    use checkout_core::{
        OrderRef, OrderSubmissionResponse, ProviderCredentials, RedirectWidget, WidgetCallbacks,
        WidgetSession,
    };
    use checkout_gateways::card::{CardGateway, CardPaymentIntent, CARD_SUCCESS_MESSAGE};
    use checkout_gateways::deferred::DEFERRED_SUCCESS_MESSAGE;
    use checkout_gateways::{build_registry, CardElement, CardGatewayStrategy, PageProviders};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, Notify};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Returns a canned response, optionally after being released
    struct FakeSubmitter {
        response: OrderSubmissionResponse,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeSubmitter {
        fn new(response: OrderSubmissionResponse) -> Self {
            Self {
                response,
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OrderSubmitter for FakeSubmitter {
        async fn submit(
            &self,
            _: &OrderSubmissionRequest,
        ) -> CheckoutResult<OrderSubmissionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.response.clone())
        }
    }

    struct ApprovingCardGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CardGateway for ApprovingCardGateway {
        async fn confirm_card_payment(
            &self,
            _client_secret: &str,
            _card: &CardElement,
        ) -> CheckoutResult<CardPaymentIntent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CardPaymentIntent {
                id: "pi_1".into(),
                status: "succeeded".into(),
            })
        }
    }

    /// Hands opened callbacks to the test through a channel
    struct ChannelWidget {
        tx: mpsc::UnboundedSender<WidgetCallbacks>,
    }

    impl RedirectWidget for ChannelWidget {
        fn is_loaded(&self) -> bool {
            true
        }

        fn open(&self, _session: WidgetSession, callbacks: WidgetCallbacks) -> CheckoutResult<()> {
            self.tx
                .send(callbacks)
                .map_err(|_| CheckoutError::Internal("widget channel closed".into()))
        }
    }

    fn form(method: &str) -> OrderForm {
        OrderForm::new()
            .required_field("address_id", "3")
            .number_field("delivery_fee", "0")
            .payment_options(["cod", "stripe", "razorpay"])
            .select_payment_method(method)
    }

    fn config() -> CheckoutConfig {
        CheckoutConfig::new("http://localhost/orders/checkout/")
    }

    fn orchestrator(
        submitter: Arc<dyn OrderSubmitter>,
        registry: ProviderRegistry,
    ) -> (CheckoutOrchestrator, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let orchestrator =
            CheckoutOrchestrator::new(config(), submitter, registry, surface.clone());
        (orchestrator, surface)
    }

    fn default_registry() -> ProviderRegistry {
        build_registry(&config(), PageProviders::new()).unwrap()
    }

    fn completed(attempt: Attempt) -> AttemptReport {
        match attempt {
            Attempt::Completed(report) => report,
            other => panic!("expected completed attempt, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_idle_at_start() {
        let (orchestrator, surface) = orchestrator(
            Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("cod"))),
            default_registry(),
        );
        assert_eq!(orchestrator.state(), UiState::Idle);
        assert!(surface.events().is_empty());
    }

    #[tokio::test]
    async fn test_deferred_settlement_attempt() {
        let (orchestrator, surface) = orchestrator(
            Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("cod"))),
            default_registry(),
        );

        let report = completed(orchestrator.submit(&form("cod")).await);

        assert_eq!(report.state(), UiState::Succeeded);
        assert_eq!(report.provider, Some(ProviderKind::DeferredSettlement));
        assert_eq!(orchestrator.state(), UiState::Succeeded);
        assert_eq!(
            surface.events(),
            vec![
                "info:Processing order...".to_string(),
                "busy:true".to_string(),
                format!("success:{}", DEFERRED_SUCCESS_MESSAGE),
                "busy:false".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_form_leaves_ui_untouched() {
        let submitter = Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("cod")));
        let (orchestrator, surface) = orchestrator(submitter.clone(), default_registry());

        let mut bad = form("cod");
        bad.set_value("address_id", "");

        assert!(matches!(orchestrator.submit(&bad).await, Attempt::Rejected(_)));
        assert_eq!(orchestrator.state(), UiState::Idle);
        assert!(surface.events().is_empty());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_provider_succeeds_as_deferred() {
        let (orchestrator, _surface) = orchestrator(
            Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("paypal"))),
            default_registry(),
        );

        let report = completed(orchestrator.submit(&form("cod")).await);
        assert_eq!(report.outcome, PaymentOutcome::success(DEFERRED_SUCCESS_MESSAGE));
    }

    #[tokio::test]
    async fn test_unknown_provider_fails_in_strict_mode() {
        let registry = build_registry(&config().with_strict_providers(true), PageProviders::new())
            .unwrap();
        let (orchestrator, _surface) = orchestrator(
            Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("paypal"))),
            registry,
        );

        let report = completed(orchestrator.submit(&form("cod")).await);
        assert_eq!(report.state(), UiState::Failed);
        assert_eq!(report.provider, None);
    }

    #[tokio::test]
    async fn test_card_gateway_success() {
        let gateway = Arc::new(ApprovingCardGateway {
            calls: AtomicUsize::new(0),
        });
        let card = CardGatewayStrategy::new(
            Some(gateway.clone()),
            Some(CardElement::mount("pm_card_visa")),
        );
        let registry = default_registry().with_strategy(Arc::new(card));
        let response = OrderSubmissionResponse {
            client_secret: Some("pi_1_secret_x".into()),
            ..OrderSubmissionResponse::for_provider("card-gateway")
        };
        let (orchestrator, surface) =
            orchestrator(Arc::new(FakeSubmitter::new(response)), registry);

        let report = completed(orchestrator.submit(&form("stripe")).await);

        assert_eq!(report.outcome, PaymentOutcome::success(CARD_SUCCESS_MESSAGE));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            surface.last_status(),
            Some(("success".to_string(), CARD_SUCCESS_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn test_card_gateway_without_key_fails_not_ready() {
        let page = PageProviders::new().with_card_element(CardElement::mount("pm_card_visa"));
        let registry = build_registry(&config(), page).unwrap();
        let response = OrderSubmissionResponse {
            client_secret: Some("pi_1_secret_x".into()),
            ..OrderSubmissionResponse::for_provider("stripe")
        };
        let (orchestrator, surface) =
            orchestrator(Arc::new(FakeSubmitter::new(response)), registry);

        let report = completed(orchestrator.submit(&form("stripe")).await);

        assert_eq!(
            report.outcome,
            PaymentOutcome::failure("Stripe is not ready. Check publishable key.")
        );
        assert_eq!(orchestrator.state(), UiState::Failed);
        assert!(!surface.busy());
    }

    #[tokio::test]
    async fn test_redirect_gateway_failure_callback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let creds = ProviderCredentials::new(None, Some("rzp_test_page".into()));
        let config = config().with_credentials(creds);
        let page = PageProviders::new().with_widget(Arc::new(ChannelWidget { tx }));
        let registry = build_registry(&config, page).unwrap();
        let response = OrderSubmissionResponse {
            order_id: Some(OrderRef::Text("order_Nx1".into())),
            amount: Some(49900),
            currency: Some("INR".into()),
            ..OrderSubmissionResponse::for_provider("razorpay")
        };
        let (orchestrator, surface) =
            orchestrator(Arc::new(FakeSubmitter::new(response)), registry);
        let orchestrator = Arc::new(orchestrator);

        let running = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit(&form("razorpay")).await })
        };

        // Widget is open: still Processing, control still busy
        let callbacks = rx.recv().await.unwrap();
        assert_eq!(orchestrator.state(), UiState::Processing);
        assert!(surface.busy());

        callbacks.payment_failed(Some("Card declined"));
        let report = completed(running.await.unwrap());

        assert_eq!(report.outcome, PaymentOutcome::failure("Card declined"));
        assert_eq!(orchestrator.state(), UiState::Failed);
        assert_eq!(
            surface.last_status(),
            Some(("danger".to_string(), "Card declined".to_string()))
        );
        assert!(!surface.busy());
    }

    fn redirect_response(order_id: &str) -> OrderSubmissionResponse {
        OrderSubmissionResponse {
            order_id: Some(OrderRef::Text(order_id.into())),
            amount: Some(49900),
            currency: Some("INR".into()),
            ..OrderSubmissionResponse::for_provider("razorpay")
        }
    }

    #[tokio::test]
    async fn test_redirect_gateway_completion_callback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let creds = ProviderCredentials::new(None, Some("rzp_test_page".into()));
        let page = PageProviders::new().with_widget(Arc::new(ChannelWidget { tx }));
        let registry = build_registry(&config().with_credentials(creds), page).unwrap();
        let (orchestrator, surface) = orchestrator(
            Arc::new(FakeSubmitter::new(redirect_response("order_Nx3"))),
            registry,
        );
        let orchestrator = Arc::new(orchestrator);

        let running = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit(&form("razorpay")).await })
        };

        let callbacks = rx.recv().await.unwrap();
        assert_eq!(orchestrator.state(), UiState::Processing);

        callbacks.complete();
        // A late dismiss after completion changes nothing
        callbacks.dismissed();
        let report = completed(running.await.unwrap());

        assert_eq!(report.provider, Some(ProviderKind::RedirectGateway));
        assert_eq!(report.outcome, PaymentOutcome::success(REDIRECT_SUCCESS_MESSAGE));
        assert_eq!(orchestrator.state(), UiState::Succeeded);
        assert_eq!(
            surface.last_status(),
            Some(("success".to_string(), REDIRECT_SUCCESS_MESSAGE.to_string()))
        );
        assert!(!surface.busy());
    }

    #[tokio::test]
    async fn test_redirect_gateway_script_missing() {
        let creds = ProviderCredentials::new(None, Some("rzp_test_page".into()));
        let registry =
            build_registry(&config().with_credentials(creds), PageProviders::new()).unwrap();
        let (orchestrator, surface) = orchestrator(
            Arc::new(FakeSubmitter::new(redirect_response("order_Nx4"))),
            registry,
        );

        let report = completed(orchestrator.submit(&form("razorpay")).await);

        assert_eq!(report.outcome, PaymentOutcome::failure("Razorpay script missing."));
        assert_eq!(report.provider, Some(ProviderKind::RedirectGateway));
        assert_eq!(orchestrator.state(), UiState::Failed);
        assert_eq!(
            surface.last_status(),
            Some(("danger".to_string(), "Razorpay script missing.".to_string()))
        );
        assert!(!surface.busy());
    }

    #[tokio::test]
    async fn test_refresh_card_section_at_load() {
        let creds = ProviderCredentials::new(Some("pk_test_abc".into()), None);
        let page = PageProviders::new().with_card_element(CardElement::mount_untokenized());
        let registry = build_registry(&config().with_credentials(creds), page).unwrap();
        let (orchestrator, surface) = orchestrator(
            Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("cod"))),
            registry,
        );

        orchestrator.refresh_card_section(Some("stripe"));
        orchestrator.refresh_card_section(None);

        assert_eq!(
            surface.events(),
            vec!["card_section:true".to_string(), "card_section:false".to_string()]
        );
    }

    #[tokio::test]
    async fn test_redirect_widget_dismissed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let creds = ProviderCredentials::new(None, Some("rzp_test_page".into()));
        let page = PageProviders::new().with_widget(Arc::new(ChannelWidget { tx }));
        let registry = build_registry(&config().with_credentials(creds), page).unwrap();
        let response = OrderSubmissionResponse {
            order_id: Some(OrderRef::Text("order_Nx2".into())),
            amount: Some(100),
            currency: Some("INR".into()),
            ..OrderSubmissionResponse::for_provider("razorpay")
        };
        let (orchestrator, _surface) =
            orchestrator(Arc::new(FakeSubmitter::new(response)), registry);
        let orchestrator = Arc::new(orchestrator);

        let running = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit(&form("razorpay")).await })
        };

        drop(rx.recv().await.unwrap());
        let report = completed(running.await.unwrap());
        assert_eq!(report.outcome, PaymentOutcome::failure(WIDGET_CLOSED_MESSAGE));
    }

    #[tokio::test]
    async fn test_second_submit_while_processing_is_ignored() {
        let gate = Arc::new(Notify::new());
        let submitter = Arc::new(FakeSubmitter {
            gate: Some(gate.clone()),
            ..FakeSubmitter::new(OrderSubmissionResponse::for_provider("cod"))
        });
        let (orchestrator, surface) = orchestrator(submitter.clone(), default_registry());
        let orchestrator = Arc::new(orchestrator);

        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit(&form("cod")).await })
        };

        while orchestrator.state() != UiState::Processing {
            tokio::task::yield_now().await;
        }
        assert_eq!(orchestrator.submit(&form("cod")).await, Attempt::Ignored);

        gate.notify_one();
        let report = completed(first.await.unwrap());

        assert_eq!(report.state(), UiState::Succeeded);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            surface.events().iter().filter(|e| *e == "busy:true").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_retry_after_failure_reenters_processing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order_id": 9,
                "total": "80.00",
                "provider": "cod"
            })))
            .mount(&server)
            .await;

        let surface = Arc::new(RecordingSurface::default());
        let orchestrator = CheckoutOrchestrator::with_http(
            CheckoutConfig::new(format!("{}/orders/checkout/", server.uri())),
            default_registry(),
            surface.clone(),
        )
        .unwrap();

        let first = completed(orchestrator.submit(&form("cod")).await);
        assert_eq!(first.outcome, PaymentOutcome::failure(ORDER_CREATION_FAILED));
        assert_eq!(first.provider, None);

        let second = completed(orchestrator.submit(&form("cod")).await);
        assert_eq!(second.state(), UiState::Succeeded);
        assert_ne!(first.attempt_id, second.attempt_id);
        assert_eq!(
            surface.events().iter().filter(|e| *e == "busy:true").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_server_error_never_reaches_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "provider": "stripe",
                "client_secret": "pi_1_secret_x"
            })))
            .mount(&server)
            .await;

        let gateway = Arc::new(ApprovingCardGateway {
            calls: AtomicUsize::new(0),
        });
        let card = CardGatewayStrategy::new(
            Some(gateway.clone()),
            Some(CardElement::mount("pm_card_visa")),
        );
        let registry = default_registry().with_strategy(Arc::new(card));
        let surface = Arc::new(RecordingSurface::default());
        let orchestrator = CheckoutOrchestrator::with_http(
            CheckoutConfig::new(server.uri()),
            registry,
            surface.clone(),
        )
        .unwrap();

        let report = completed(orchestrator.submit(&form("stripe")).await);

        assert_eq!(report.outcome, PaymentOutcome::failure(ORDER_CREATION_FAILED));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            surface.last_status(),
            Some(("danger".to_string(), ORDER_CREATION_FAILED.to_string()))
        );
    }

    #[tokio::test]
    async fn test_select_payment_method_toggles_card_section() {
        let creds = ProviderCredentials::new(Some("pk_test_abc".into()), None);
        let page = PageProviders::new().with_card_element(CardElement::mount("pm_card_visa"));
        let registry = build_registry(&config().with_credentials(creds), page).unwrap();
        let (orchestrator, surface) = orchestrator(
            Arc::new(FakeSubmitter::new(OrderSubmissionResponse::for_provider("cod"))),
            registry,
        );

        let mut form = form("cod");
        orchestrator.select_payment_method(&mut form, "stripe");
        orchestrator.select_payment_method(&mut form, "cod");

        assert_eq!(form.payment_method(), Some("cod"));
        assert_eq!(
            surface.events(),
            vec!["card_section:true".to_string(), "card_section:false".to_string()]
        );
    }
}
