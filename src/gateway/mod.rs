//! The gateway orchestrator.
//!
//! [`SgkGateway`] composes validation, envelope construction, transport and
//! response parsing into one method per service operation. A gateway is
//! owned by one caller: every operation takes `&mut self`, so credentials
//! cannot change while a call is running. Independent sessions use
//! independent gateways.
//!
//! Each call checks, in order: credentials are set, the rate ceiling has
//! room, the input passes local validation. Only then is a request emitted.

mod rate_limit;
mod state;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{PenaltySchedule, compute_period};
use crate::catalog::{CodeClass, ErrorCatalog};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult, ValidationError, ValidationRule};
use crate::models::{
    ConfirmationDocument, Credentials, DocumentKind, EmployerCategory, Environment, HireRecord,
    OperationResult, PeriodSummary, RecordResult, TerminationRecord,
};
use crate::protocol::{Operation, RequestBuilder, ResponseParser};
use crate::transport::{SoapTransport, TransportClient};
use crate::validation::{
    PROTOCOL_MAX_BATCH_SIZE, check_national_id, validate_hire_batch, validate_registry_id,
    validate_termination_batch,
};

pub use rate_limit::{RateLimiter, RateUsage};
pub use state::{GatewayState, StateCell};

use state::InFlightGuard;

/// Source of the current date.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Client for the SGK hire and termination notification service.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sgk_gateway::config::GatewayConfig;
/// use sgk_gateway::gateway::SgkGateway;
/// use sgk_gateway::models::{Credentials, Environment};
/// use sgk_gateway::transport::HttpTransport;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Arc::new(HttpTransport::new()?);
/// let mut gateway = SgkGateway::new(GatewayConfig::default(), transport);
/// gateway.set_credentials(Credentials::new(
///     "12345678901",
///     "workplace-secret",
///     "12345678901234567890123456",
///     Environment::Test,
/// ))?;
///
/// let filings = gateway.query_hire("10000000146").await?;
/// for (index, record) in filings.rejected_records() {
///     println!("record {} rejected: {:?}", index, record.message);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SgkGateway {
    state: StateCell,
    credentials: Option<Credentials>,
    transport: TransportClient,
    catalog: Arc<ErrorCatalog>,
    limiter: RateLimiter,
    max_batch_size: usize,
    penalties: PenaltySchedule,
    clock: Clock,
}

impl SgkGateway {
    /// Creates an unconfigured gateway.
    ///
    /// A `max_batch_size` outside `1..=10` is clamped into that range.
    pub fn new(config: GatewayConfig, transport: Arc<dyn SoapTransport>) -> Self {
        let timeout = config.timeout();
        let max_batch_size = config.max_batch_size.clamp(1, PROTOCOL_MAX_BATCH_SIZE);
        if max_batch_size != config.max_batch_size {
            warn!(
                configured = config.max_batch_size,
                applied = max_batch_size,
                "Batch size outside the protocol range; clamping"
            );
        }
        let limiter = RateLimiter::new(config.rate_limit.max_calls, config.rate_limit.window());
        Self {
            state: StateCell::new(GatewayState::Unconfigured),
            credentials: None,
            transport: TransportClient::new(transport, config.endpoints, timeout),
            catalog: Arc::new(ErrorCatalog::standard()),
            limiter,
            max_batch_size,
            penalties: config.penalties,
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Replaces the result code catalog.
    pub fn with_catalog(mut self, catalog: impl Into<Arc<ErrorCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Replaces the clock used for penalty estimates and date rules.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GatewayState {
        self.state.get()
    }

    /// A handle that observes the state without borrowing the gateway.
    pub fn state_cell(&self) -> StateCell {
        self.state.clone()
    }

    /// The active environment, when credentials are set.
    pub fn environment(&self) -> Option<Environment> {
        self.credentials.as_ref().map(Credentials::environment)
    }

    /// The result code catalog.
    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// The penalty bands used for advisory estimates.
    pub fn penalties(&self) -> &PenaltySchedule {
        &self.penalties
    }

    /// Today's date according to the gateway clock.
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// A handle to the gateway clock.
    pub fn clock(&self) -> Clock {
        Arc::clone(&self.clock)
    }

    /// Request-rate usage at this instant.
    pub fn rate_usage(&self) -> RateUsage {
        self.limiter.usage(Instant::now())
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    /// Sets the per-call timeout for subsequent calls.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.transport.set_timeout(timeout);
    }

    /// Sets credentials and moves the gateway to `Ready`.
    ///
    /// Blank usernames or passwords and registry ids that are not 26 digits
    /// are rejected with [`GatewayError::Configuration`].
    pub fn set_credentials(&mut self, credentials: Credentials) -> GatewayResult<()> {
        if credentials.username().trim().is_empty() {
            return Err(GatewayError::configuration("username must not be empty"));
        }
        if credentials.password().trim().is_empty() {
            return Err(GatewayError::configuration("password must not be empty"));
        }
        if !validate_registry_id(credentials.employer_registry_id()) {
            return Err(GatewayError::configuration(
                "employer registry id must be exactly 26 digits",
            ));
        }

        info!(
            environment = %credentials.environment(),
            "Gateway credentials set"
        );
        self.credentials = Some(credentials);
        self.state.set(GatewayState::Ready);
        Ok(())
    }

    /// Removes credentials and returns to `Unconfigured`.
    pub fn clear_credentials(&mut self) {
        self.credentials = None;
        self.state.set(GatewayState::Unconfigured);
    }

    /// Switches environment for subsequent calls.
    ///
    /// Only allowed once credentials are set. Switching to the active
    /// environment is a no-op.
    pub fn set_environment(&mut self, environment: Environment) -> GatewayResult<()> {
        let credentials = self.credentials.take().ok_or_else(|| {
            GatewayError::configuration("cannot switch environment before credentials are set")
        })?;
        if credentials.environment() != environment {
            info!(
                from = %credentials.environment(),
                to = %environment,
                "Switching gateway environment"
            );
        }
        self.credentials = Some(credentials.with_environment(environment));
        Ok(())
    }

    /// Submits hire notifications for one to `max_batch_size` records.
    ///
    /// Each returned record carries an advisory late-filing estimate.
    pub async fn register_hire(&mut self, records: &[HireRecord]) -> GatewayResult<OperationResult> {
        let operation = Operation::RegisterHire;
        let correlation_id = Uuid::new_v4();
        let credentials = self.begin(correlation_id, operation)?;
        let today = self.today();
        validate_hire_batch(records, self.max_batch_size, today)
            .inspect_err(|e| log_rejection(correlation_id, operation, e))?;

        info!(
            correlation_id = %correlation_id,
            operation = %operation,
            record_count = records.len(),
            environment = %credentials.environment(),
            "Submitting hire notifications"
        );
        let envelope = RequestBuilder::new(&credentials).register_hire(records)?;
        let started = Instant::now();
        let body = self
            .send(correlation_id, operation, credentials.environment(), envelope)
            .await?;
        let mut result = ResponseParser::parse_submission(&body, operation, records.len())
            .inspect_err(|e| log_failure(correlation_id, operation, e))?;

        for (record, outcome) in records.iter().zip(result.records.iter_mut()) {
            outcome.penalty = Some(self.penalties.estimate(record.hire_date, today));
        }
        self.log_outcome(
            correlation_id,
            operation,
            result.top_level_code,
            &[("records", result.records.as_slice())],
            started,
        );
        Ok(result)
    }

    /// Submits termination notifications for one to `max_batch_size` records.
    pub async fn register_termination(
        &mut self,
        records: &[TerminationRecord],
    ) -> GatewayResult<OperationResult> {
        let operation = Operation::RegisterTermination;
        let correlation_id = Uuid::new_v4();
        let credentials = self.begin(correlation_id, operation)?;
        validate_termination_batch(records, self.max_batch_size)
            .inspect_err(|e| log_rejection(correlation_id, operation, e))?;

        info!(
            correlation_id = %correlation_id,
            operation = %operation,
            record_count = records.len(),
            environment = %credentials.environment(),
            "Submitting termination notifications"
        );
        let envelope = RequestBuilder::new(&credentials).register_termination(records)?;
        let started = Instant::now();
        let body = self
            .send(correlation_id, operation, credentials.environment(), envelope)
            .await?;
        let result = ResponseParser::parse_submission(&body, operation, records.len())
            .inspect_err(|e| log_failure(correlation_id, operation, e))?;

        self.log_outcome(
            correlation_id,
            operation,
            result.top_level_code,
            &[("records", result.records.as_slice())],
            started,
        );
        Ok(result)
    }

    /// Queries hire filings for a national id.
    pub async fn query_hire(&mut self, national_id: &str) -> GatewayResult<OperationResult> {
        self.query(Operation::QueryHire, national_id).await
    }

    /// Queries termination filings for a national id.
    pub async fn query_termination(&mut self, national_id: &str) -> GatewayResult<OperationResult> {
        self.query(Operation::QueryTermination, national_id).await
    }

    async fn query(
        &mut self,
        operation: Operation,
        national_id: &str,
    ) -> GatewayResult<OperationResult> {
        let correlation_id = Uuid::new_v4();
        let credentials = self.begin(correlation_id, operation)?;
        let national_id = national_id.trim();
        check_national_id(national_id)
            .inspect_err(|e| log_rejection(correlation_id, operation, e))?;

        info!(
            correlation_id = %correlation_id,
            operation = %operation,
            environment = %credentials.environment(),
            "Querying filings"
        );
        let builder = RequestBuilder::new(&credentials);
        let envelope = match operation {
            Operation::QueryTermination => builder.query_termination(national_id)?,
            _ => builder.query_hire(national_id)?,
        };
        let started = Instant::now();
        let body = self
            .send(correlation_id, operation, credentials.environment(), envelope)
            .await?;
        let result = ResponseParser::parse_operation(&body, operation)
            .inspect_err(|e| log_failure(correlation_id, operation, e))?;

        self.log_outcome(
            correlation_id,
            operation,
            result.top_level_code,
            &[("records", result.records.as_slice())],
            started,
        );
        Ok(result)
    }

    /// Fetches the hire and termination filings of one pay period.
    pub async fn fetch_period_summary(
        &mut self,
        employer_category: EmployerCategory,
        year: i32,
        month: u32,
    ) -> GatewayResult<PeriodSummary> {
        let operation = Operation::PeriodSummary;
        let correlation_id = Uuid::new_v4();
        let credentials = self.begin(correlation_id, operation)?;
        let period = compute_period(employer_category, year, month)
            .inspect_err(|e| log_failure(correlation_id, operation, e))?;

        info!(
            correlation_id = %correlation_id,
            operation = %operation,
            period = %period.period_code,
            employer_category = %employer_category,
            environment = %credentials.environment(),
            "Fetching period summary"
        );
        let envelope = RequestBuilder::new(&credentials).period_summary(&period)?;
        let started = Instant::now();
        let body = self
            .send(correlation_id, operation, credentials.environment(), envelope)
            .await?;
        let (hires, terminations) = ResponseParser::parse_period_summary(&body)
            .inspect_err(|e| log_failure(correlation_id, operation, e))?;

        self.log_outcome(
            correlation_id,
            operation,
            hires.top_level_code,
            &[
                ("hires", hires.records.as_slice()),
                ("terminations", terminations.as_slice()),
            ],
            started,
        );
        Ok(PeriodSummary {
            employer_category,
            period,
            hires,
            terminations,
        })
    }

    /// Fetches the confirmation document for a reference code.
    ///
    /// The document is returned in memory; persisting it is up to the caller.
    pub async fn fetch_confirmation_document(
        &mut self,
        kind: DocumentKind,
        reference_code: &str,
    ) -> GatewayResult<ConfirmationDocument> {
        let operation = match kind {
            DocumentKind::Hire => Operation::HireDocument,
            DocumentKind::Termination => Operation::TerminationDocument,
        };
        let correlation_id = Uuid::new_v4();
        let credentials = self.begin(correlation_id, operation)?;
        let reference_code = reference_code.trim();
        if reference_code.is_empty() {
            let error = ValidationError::new(
                "reference_code",
                ValidationRule::ReferenceCode,
                "a reference code from a successful filing is required",
            );
            log_rejection(correlation_id, operation, &error);
            return Err(error.into());
        }

        info!(
            correlation_id = %correlation_id,
            operation = %operation,
            environment = %credentials.environment(),
            "Fetching confirmation document"
        );
        let envelope = RequestBuilder::new(&credentials).confirmation_document(kind, reference_code)?;
        let started = Instant::now();
        let body = self
            .send(correlation_id, operation, credentials.environment(), envelope)
            .await?;
        let document = ResponseParser::parse_document(&body, kind, reference_code)
            .inspect_err(|e| log_failure(correlation_id, operation, e))?;

        self.log_outcome(
            correlation_id,
            operation,
            document.top_level_code,
            &[],
            started,
        );
        debug!(
            correlation_id = %correlation_id,
            size = document.bytes().map_or(0, <[u8]>::len),
            "Confirmation document decoded"
        );
        Ok(document)
    }

    fn begin(&mut self, correlation_id: Uuid, operation: Operation) -> GatewayResult<Credentials> {
        let credentials = self.credentials.clone().ok_or_else(|| {
            warn!(
                correlation_id = %correlation_id,
                operation = %operation,
                "Operation attempted without credentials"
            );
            GatewayError::configuration("no credentials set; call set_credentials first")
        })?;
        self.limiter.check(Instant::now()).inspect_err(|e| {
            warn!(
                correlation_id = %correlation_id,
                operation = %operation,
                error = %e,
                "Rejecting call locally"
            );
        })?;
        Ok(credentials)
    }

    async fn send(
        &mut self,
        correlation_id: Uuid,
        operation: Operation,
        environment: Environment,
        envelope: String,
    ) -> GatewayResult<String> {
        self.limiter.record(Instant::now());
        let _in_flight = InFlightGuard::enter(&self.state);
        self.transport
            .exchange(environment, operation, envelope)
            .await
            .map_err(|error| {
                warn!(
                    correlation_id = %correlation_id,
                    operation = %operation,
                    environment = %environment,
                    error = %error,
                    "Transport failure"
                );
                GatewayError::from(error)
            })
    }

    fn log_outcome(
        &self,
        correlation_id: Uuid,
        operation: Operation,
        top_level_code: Option<i32>,
        groups: &[(&str, &[RecordResult])],
        started: Instant,
    ) {
        let duration_us = started.elapsed().as_micros() as u64;
        let records = || groups.iter().flat_map(|(_, records)| records.iter());
        match top_level_code.map(|code| self.catalog.classify(code)) {
            Some(CodeClass::Known(entry)) => info!(
                correlation_id = %correlation_id,
                operation = %operation,
                top_level_code = entry.code,
                category = ?entry.category,
                severity = ?entry.severity,
                record_count = records().count(),
                rejected = records().filter(|r| !r.is_accepted()).count(),
                duration_us = duration_us,
                "Operation completed"
            ),
            Some(CodeClass::Unrecognized(code)) => warn!(
                correlation_id = %correlation_id,
                operation = %operation,
                top_level_code = code,
                duration_us = duration_us,
                "Unrecognized top-level result code; escalate for investigation"
            ),
            None => warn!(
                correlation_id = %correlation_id,
                operation = %operation,
                duration_us = duration_us,
                "Response carried no top-level result code"
            ),
        }

        for (group, records) in groups {
            for (index, code) in unrecognized_record_codes(&self.catalog, records) {
                warn!(
                    correlation_id = %correlation_id,
                    operation = %operation,
                    group = %group,
                    record_index = index,
                    result_code = code,
                    "Unrecognized record result code; escalate for investigation"
                );
            }
        }
    }
}

/// Positions and codes of records whose result code the catalog does not know.
fn unrecognized_record_codes(catalog: &ErrorCatalog, records: &[RecordResult]) -> Vec<(usize, i32)> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| record.result_code.map(|code| (index, code)))
        .filter(|&(_, code)| catalog.classify(code).is_unrecognized())
        .collect()
}

fn log_rejection(correlation_id: Uuid, operation: Operation, error: &ValidationError) {
    warn!(
        correlation_id = %correlation_id,
        operation = %operation,
        field = %error.field,
        rule = ?error.rule,
        record_index = ?error.record_index,
        "Local validation failed; nothing was sent"
    );
}

fn log_failure(correlation_id: Uuid, operation: Operation, error: &GatewayError) {
    warn!(
        correlation_id = %correlation_id,
        operation = %operation,
        error = %error,
        "Operation failed"
    );
}

impl fmt::Debug for SgkGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SgkGateway")
            .field("state", &self.state.get())
            .field("credentials", &self.credentials)
            .field("transport", &self.transport)
            .field("max_batch_size", &self.max_batch_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;

    fn create_credentials() -> Credentials {
        Credentials::new(
            "12345678901",
            "workplace-secret",
            "12345678901234567890123456",
            Environment::Test,
        )
    }

    fn create_gateway() -> SgkGateway {
        SgkGateway::new(GatewayConfig::default(), Arc::new(ScriptedTransport::new()))
    }

    #[test]
    fn test_new_gateway_is_unconfigured() {
        let gateway = create_gateway();
        assert_eq!(gateway.state(), GatewayState::Unconfigured);
        assert_eq!(gateway.environment(), None);
    }

    #[test]
    fn test_set_credentials_moves_to_ready() {
        let mut gateway = create_gateway();
        gateway.set_credentials(create_credentials()).unwrap();
        assert_eq!(gateway.state(), GatewayState::Ready);
        assert_eq!(gateway.environment(), Some(Environment::Test));

        gateway.clear_credentials();
        assert_eq!(gateway.state(), GatewayState::Unconfigured);
    }

    #[test]
    fn test_invalid_credentials_are_configuration_errors() {
        let mut gateway = create_gateway();
        let short_registry = Credentials::new("user", "secret", "123", Environment::Test);
        assert!(matches!(
            gateway.set_credentials(short_registry),
            Err(GatewayError::Configuration { .. })
        ));
        let blank_password = Credentials::new(
            "user",
            "  ",
            "12345678901234567890123456",
            Environment::Test,
        );
        assert!(matches!(
            gateway.set_credentials(blank_password),
            Err(GatewayError::Configuration { .. })
        ));
        assert_eq!(gateway.state(), GatewayState::Unconfigured);
    }

    #[test]
    fn test_environment_switch_requires_credentials_and_is_idempotent() {
        let mut gateway = create_gateway();
        assert!(gateway.set_environment(Environment::Production).is_err());

        gateway.set_credentials(create_credentials()).unwrap();
        gateway.set_environment(Environment::Production).unwrap();
        gateway.set_environment(Environment::Production).unwrap();
        assert_eq!(gateway.environment(), Some(Environment::Production));
        assert_eq!(gateway.state(), GatewayState::Ready);
    }

    #[test]
    fn test_clock_injection() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let gateway = create_gateway().with_clock(move || day);
        assert_eq!(gateway.today(), day);
    }

    #[test]
    fn test_rate_usage_starts_empty() {
        let usage = create_gateway().rate_usage();
        assert_eq!(usage.used, 0);
        assert_eq!(usage.limit, GatewayConfig::default().rate_limit.max_calls);
    }

    #[test]
    fn test_oversized_batch_config_is_clamped() {
        let config = GatewayConfig {
            max_batch_size: 20,
            ..GatewayConfig::default()
        };
        let gateway = SgkGateway::new(config, Arc::new(ScriptedTransport::new()));
        assert_eq!(gateway.max_batch_size, PROTOCOL_MAX_BATCH_SIZE);

        let config = GatewayConfig {
            max_batch_size: 0,
            ..GatewayConfig::default()
        };
        let gateway = SgkGateway::new(config, Arc::new(ScriptedTransport::new()));
        assert_eq!(gateway.max_batch_size, 1);
    }

    #[test]
    fn test_unrecognized_record_codes_lists_positions() {
        let record = |code: Option<i32>| RecordResult {
            result_code: code,
            ..RecordResult::missing()
        };
        let records = vec![record(Some(0)), record(Some(-9999)), record(None)];
        let unrecognized = unrecognized_record_codes(&ErrorCatalog::standard(), &records);
        assert_eq!(unrecognized, vec![(1, -9999)]);
    }

    #[test]
    fn test_state_cell_follows_credentials() {
        let mut gateway = create_gateway();
        let observer = gateway.state_cell();
        gateway.set_credentials(create_credentials()).unwrap();
        assert_eq!(observer.get(), GatewayState::Ready);
        gateway.clear_credentials();
        assert_eq!(observer.get(), GatewayState::Unconfigured);
    }
}
