//! # Compliance Engine
//!
//! Wires the components into one host-facing object:
//!
//! - `Arc<ProfileStore>`: shared, read-mostly profile catalogue.
//! - [`RuleEvaluator`]: stateless audits.
//! - [`SharedMonitor`]: the single event monitor, behind a
//!   `parking_lot::Mutex` so a periodic driver and the host serialize
//!   their cycles.
//! - [`ReportEngine`]: pure report builders.
//!
//! The engine also keeps the audit history and the finished sessions that
//! the comparison, trend and summary reports run over.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use dpc_core::{DpEvent, DpcError, SessionId};
use dpc_monitor::{
    drive_periodically, CancellationToken, CycleOutcome, EscalationSink, EventMonitor, EventSource,
    LogEscalationSink, MonitoringSession, QueueEventSource, Scheduler, SharedMonitor,
};
use dpc_report::{ComparisonReport, ExecutiveSummary, ReportData, ReportEngine, TrendAnalysis};
use dpc_rules::{AuditResult, ComplianceProfile, ProfileStore, RuleEvaluator, StateSnapshot};

use crate::config::{ConfigError, EngineConfig};

/// The assembled compliance engine.
pub struct ComplianceEngine {
    config: EngineConfig,
    profiles: Arc<ProfileStore>,
    evaluator: RuleEvaluator,
    monitor: SharedMonitor,
    reports: ReportEngine,
    audits: RwLock<Vec<AuditResult>>,
    sessions: RwLock<Vec<MonitoringSession>>,
}

impl ComplianceEngine {
    /// Assemble an engine around an existing store and event feed.
    ///
    /// The monitor is configured from `config` and logs escalations. If the
    /// default profile is loaded it is attached to the monitor for rule
    /// annotation.
    pub fn new(
        config: EngineConfig,
        profiles: Arc<ProfileStore>,
        source: impl EventSource + 'static,
    ) -> Self {
        let mut monitor = EventMonitor::new(source)
            .with_tolerance_limit(config.tolerance_limit)
            .with_vessel(config.vessel.clone())
            .with_dispatcher(config.workflow.dispatcher())
            .with_journal_capacity(config.journal_capacity)
            .with_sink(LogEscalationSink);
        if let Some(name) = config.default_profile.as_deref() {
            match profiles.get(name) {
                Ok(profile) => monitor.set_profile(Some(profile)),
                Err(e) => tracing::warn!(error = %e, "default profile not loaded, events will not be annotated"),
            }
        }
        Self {
            config,
            profiles,
            evaluator: RuleEvaluator::default(),
            monitor: Arc::new(Mutex::new(monitor)),
            reports: ReportEngine::new(),
            audits: RwLock::new(Vec::new()),
            sessions: RwLock::new(Vec::new()),
        }
    }

    /// Validate `config`, load its profile files, and assemble an engine
    /// with an empty event queue.
    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_source(config, QueueEventSource::new())
    }

    /// Like [`from_config`](Self::from_config), monitoring `source`.
    pub fn from_config_with_source(
        config: EngineConfig,
        source: impl EventSource + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let profiles = Arc::new(ProfileStore::new());
        if !config.profile_paths.is_empty() {
            profiles.load_from_paths(&config.profile_paths)?;
        }
        Ok(Self::new(config, profiles, source))
    }

    /// Builder: replace the rule evaluator.
    pub fn with_evaluator(mut self, evaluator: RuleEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Builder: replace the report engine.
    pub fn with_reports(mut self, reports: ReportEngine) -> Self {
        self.reports = reports;
        self
    }

    /// Register an extra escalation sink on the monitor.
    pub fn add_escalation_sink(&self, sink: impl EscalationSink + 'static) {
        self.monitor.lock().add_sink(sink);
    }

    // -- Audits ---------------------------------------------------------------

    /// Audit the named profile against a snapshot and record the result.
    ///
    /// # Errors
    ///
    /// [`DpcError::ProfileNotFound`] if the store has no such profile.
    pub fn run_audit(
        &self,
        profile_name: &str,
        snapshot: &StateSnapshot,
    ) -> Result<AuditResult, DpcError> {
        let profile = self.profiles.get(profile_name)?;
        let result = self.evaluator.audit(&profile, snapshot);
        self.audits.write().push(result.clone());
        Ok(result)
    }

    /// Audit the configured default profile.
    ///
    /// # Errors
    ///
    /// [`DpcError::NoDefaultProfile`] if no default is configured, or
    /// [`DpcError::ProfileNotFound`] if it is not loaded.
    pub fn run_default_audit(&self, snapshot: &StateSnapshot) -> Result<AuditResult, DpcError> {
        let name = self
            .config
            .default_profile
            .as_deref()
            .ok_or(DpcError::NoDefaultProfile)?;
        self.run_audit(name, snapshot)
    }

    /// Append externally produced audits (e.g. read back from disk).
    pub fn import_audits(&self, audits: impl IntoIterator<Item = AuditResult>) {
        self.audits.write().extend(audits);
    }

    /// Audit history, oldest first.
    pub fn audit_history(&self) -> Vec<AuditResult> {
        self.audits.read().clone()
    }

    // -- Monitoring -----------------------------------------------------------

    /// Open a monitoring session for the named vessel.
    pub fn start_session(&self, vessel_name: &str) -> Option<SessionId> {
        self.monitor.lock().start(vessel_name)
    }

    /// Open a monitoring session for the configured vessel.
    pub fn start_default_session(&self) -> Option<SessionId> {
        self.monitor.lock().start_with_vessel(self.config.vessel.clone())
    }

    /// Attach the named profile to the monitor for rule annotation.
    pub fn set_monitor_profile(&self, profile_name: &str) -> Result<Arc<ComplianceProfile>, DpcError> {
        let profile = self.profiles.get(profile_name)?;
        self.monitor.lock().set_profile(Some(Arc::clone(&profile)));
        Ok(profile)
    }

    /// Pull and process one event from the feed.
    pub fn run_cycle(&self) -> Option<CycleOutcome> {
        self.monitor.lock().run_cycle()
    }

    /// Push one event into the open session.
    pub fn ingest(&self, event: DpEvent) -> Option<CycleOutcome> {
        self.monitor.lock().ingest(event)
    }

    /// Change the tolerance limit. Zero is rejected.
    pub fn set_tolerance_limit(&self, limit: u32) -> bool {
        self.monitor.lock().set_tolerance_limit(limit)
    }

    /// Re-arm a raised escalation.
    pub fn acknowledge_escalation(&self) -> bool {
        self.monitor.lock().acknowledge_escalation()
    }

    /// Close the open session, archive it, and return its report.
    ///
    /// The monitor is reset to idle so a new session can start.
    pub fn stop_session(&self) -> Option<ReportData> {
        let finished = {
            let mut monitor = self.monitor.lock();
            monitor.stop()?;
            monitor.reset()?
        };
        let report = self.reports.session_report(&finished);
        self.sessions.write().push(finished);
        Some(report)
    }

    /// Drive `run_cycle` at the configured interval until the token is
    /// cancelled.
    pub fn start_periodic(&self, scheduler: &dyn Scheduler) -> CancellationToken {
        self.start_periodic_every(scheduler, self.config.cycle_interval())
    }

    /// Drive `run_cycle` at an explicit interval.
    pub fn start_periodic_every(
        &self,
        scheduler: &dyn Scheduler,
        interval: Duration,
    ) -> CancellationToken {
        tracing::info!(interval_ms = interval.as_millis() as u64, "periodic monitoring scheduled");
        drive_periodically(Arc::clone(&self.monitor), scheduler, interval)
    }

    /// Report on the open (or just stopped) session.
    pub fn session_report(&self) -> Option<ReportData> {
        let monitor = self.monitor.lock();
        monitor.session().map(|s| self.reports.session_report(s))
    }

    /// Archived sessions, oldest first.
    pub fn finished_sessions(&self) -> Vec<MonitoringSession> {
        self.sessions.read().clone()
    }

    // -- Reports --------------------------------------------------------------

    /// Compare the recorded audits. `None` for fewer than two.
    pub fn comparison_report(&self) -> Option<ComparisonReport> {
        self.reports.comparison_report(&self.audits.read())
    }

    /// Trend over the recorded audits.
    pub fn trend(&self) -> TrendAnalysis {
        self.reports.trend(&self.audits.read())
    }

    /// Digest over recorded audits, archived sessions and the open session.
    pub fn executive_summary(&self) -> ExecutiveSummary {
        let mut sessions = self.finished_sessions();
        if let Some(current) = self.monitor.lock().session() {
            sessions.push(current.clone());
        }
        self.reports.executive_summary(&self.audits.read(), &sessions)
    }

    // -- Accessors ------------------------------------------------------------

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The profile store.
    pub fn profiles(&self) -> &Arc<ProfileStore> {
        &self.profiles
    }

    /// The shared monitor, for hosts that drive it directly.
    pub fn monitor(&self) -> SharedMonitor {
        Arc::clone(&self.monitor)
    }
}

impl std::fmt::Debug for ComplianceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceEngine")
            .field("profiles", &self.profiles.len())
            .field("audits", &self.audits.read().len())
            .field("sessions", &self.sessions.read().len())
            .field("monitor", &*self.monitor.lock())
            .finish()
    }
}
