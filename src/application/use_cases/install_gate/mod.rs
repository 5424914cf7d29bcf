use crate::application::dto::{GuardOutcome, GuardRequest, ScanSettings};
use crate::application::use_cases::pass_through::{hand_over, pass_through};
use crate::application::use_cases::{
    AnalysisWorkQueue, DependencyGraphFetcher, ScanDeadline, VersionResolver,
};
use crate::install_guard::domain::{
    FlaggedPackage, GateState, MaliciousRegistry, PackageRef, ScanProgress,
    ScanSession,
};
use crate::install_guard::policies::{is_affirmative, RootFailurePolicy};
use crate::ports::outbound::{
    CommandExecutor, ConfirmationPrompt, MalwareAnalysisService, PackageRegistry,
    ProgressReporter,
};
use crate::shared::Result;
use std::sync::Arc;

/// Tracks the gate's current state and logs every transition
struct GateMachine {
    state: GateState,
    history: Vec<GateState>,
}

impl GateMachine {
    fn new() -> Self {
        Self {
            state: GateState::Idle,
            history: vec![GateState::Idle],
        }
    }

    fn advance(&mut self, next: GateState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid gate transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "gate transition");
        self.history.push(next.clone());
        self.state = next;
    }

    /// Builds the outcome from the current state and the path taken to it
    fn finish(
        self,
        sessions: Vec<ScanSession>,
        flagged: Vec<FlaggedPackage>,
        exit_code: Option<i32>,
    ) -> GuardOutcome {
        GuardOutcome::new(self.state, sessions, flagged, exit_code).with_transitions(self.history)
    }
}

/// Collaborators shared by every root of one invocation
struct ScanPipeline<'a, R> {
    resolver: VersionResolver<Arc<R>>,
    fetcher: DependencyGraphFetcher<R>,
    queue: &'a AnalysisWorkQueue,
    malicious: &'a MaliciousRegistry,
    progress: &'a ScanProgress,
}

/// InstallGateUseCase - Decides whether an install command may run
///
/// Scans each requested root in turn (resolve, fetch the dependency graph,
/// analyze root plus dependencies), then asks for confirmation exactly once
/// if anything was flagged across all roots.
///
/// # Type Parameters
/// * `R` - PackageRegistry implementation
/// * `A` - MalwareAnalysisService implementation
/// * `C` - ConfirmationPrompt implementation
/// * `E` - CommandExecutor implementation
/// * `P` - ProgressReporter implementation
pub struct InstallGateUseCase<R, A, C, E, P> {
    registry: Arc<R>,
    analysis_service: Arc<A>,
    confirmation_prompt: C,
    command_executor: E,
    progress_reporter: P,
    settings: ScanSettings,
}

impl<R, A, C, E, P> InstallGateUseCase<R, A, C, E, P>
where
    R: PackageRegistry + 'static,
    A: MalwareAnalysisService + 'static,
    C: ConfirmationPrompt,
    E: CommandExecutor,
    P: ProgressReporter,
{
    /// Creates a new InstallGateUseCase with injected dependencies
    pub fn new(
        registry: Arc<R>,
        analysis_service: Arc<A>,
        confirmation_prompt: C,
        command_executor: E,
        progress_reporter: P,
        settings: ScanSettings,
    ) -> Self {
        Self {
            registry,
            analysis_service,
            confirmation_prompt,
            command_executor,
            progress_reporter,
            settings,
        }
    }

    /// Executes the install gate
    ///
    /// # Returns
    /// The outcome with the final gate state (`Clean` or `Blocked`)
    ///
    /// # Errors
    /// Returns the root failure that moved the gate to `Error`, or an
    /// executor failure when the package manager cannot be started
    pub async fn execute(&self, request: GuardRequest) -> Result<GuardOutcome> {
        let command = &request.command;
        let roots = command.root_packages()?;

        if roots.is_empty() {
            return pass_through(&self.command_executor, &self.progress_reporter, &request).await;
        }

        let mut gate = GateMachine::new();
        let malicious = MaliciousRegistry::new();
        let progress = ScanProgress::new();
        let queue = AnalysisWorkQueue::start(
            Arc::clone(&self.analysis_service),
            self.registry.ecosystem(),
            malicious.clone(),
            progress.clone(),
            self.settings.queue_config(),
        );

        let pipeline = ScanPipeline {
            resolver: VersionResolver::new(Arc::clone(&self.registry)),
            fetcher: DependencyGraphFetcher::new(
                Arc::clone(&self.registry),
                self.settings.max_concurrent_fetches,
                progress.clone(),
            ),
            queue: &queue,
            malicious: &malicious,
            progress: &progress,
        };

        let scanned = self.scan_roots(&mut gate, &pipeline, &roots).await;
        drop(pipeline);
        queue.shutdown().await;

        let sessions = match scanned {
            Ok(sessions) => sessions,
            Err(e) => {
                gate.advance(GateState::Error);
                return Err(e);
            }
        };

        let flagged = malicious.snapshot();
        if flagged.is_empty() {
            gate.advance(GateState::Clean);
            self.progress_reporter.report(&format!(
                "✅ No malicious packages found in {} package(s)",
                progress.analyzed()
            ));
        } else {
            gate.advance(GateState::Flagged);
            if self.confirm(&flagged).await {
                gate.advance(GateState::Clean);
            } else {
                gate.advance(GateState::Blocked);
                self.progress_reporter
                    .report_completion("🛑 Installation cancelled. Nothing was installed.");
                return Ok(gate.finish(sessions, flagged, None));
            }
        }

        let exit_code = hand_over(
            &self.command_executor,
            &self.progress_reporter,
            command,
            request.dry_run,
        )
        .await?;
        Ok(gate.finish(sessions, flagged, exit_code))
    }

    /// Scans every root in order, applying the root failure policy
    async fn scan_roots(
        &self,
        gate: &mut GateMachine,
        pipeline: &ScanPipeline<'_, R>,
        roots: &[PackageRef],
    ) -> Result<Vec<ScanSession>> {
        let mut sessions = Vec::with_capacity(roots.len());

        for root in roots {
            gate.advance(GateState::Scanning {
                root: root.to_string(),
            });
            self.progress_reporter
                .report(&format!("🔍 Scanning {} and its dependencies...", root));

            let scanned = self.scan_root(pipeline, root).await;
            self.progress_reporter.stop_tracking();

            match scanned {
                Ok(session) => {
                    self.progress_reporter.report(&format!(
                        "   - {} package(s) analyzed for {}",
                        session.analyzed_keys.len(),
                        root
                    ));
                    sessions.push(session);
                }
                Err(e) => match self.settings.root_failure_policy {
                    RootFailurePolicy::FailFast => {
                        return Err(e.context(format!("Scan of {} failed", root)));
                    }
                    RootFailurePolicy::SkipRoot => {
                        tracing::warn!(root = %root, error = %e, "skipping root that failed to scan");
                        self.progress_reporter
                            .report_error(&format!("⚠️  Warning: skipping {}: {:#}", root, e));
                        sessions.push(ScanSession::failed(root.clone(), None, format!("{:#}", e)));
                    }
                },
            }

            gate.advance(GateState::Aggregating);
        }

        if sessions.iter().all(ScanSession::is_failed) {
            anyhow::bail!(
                "All {} requested package(s) failed to scan; refusing to install unverified packages",
                roots.len()
            );
        }

        Ok(sessions)
    }

    /// Resolves, fetches and analyzes one root under a single deadline
    async fn scan_root(&self, pipeline: &ScanPipeline<'_, R>, root: &PackageRef) -> Result<ScanSession> {
        let deadline = ScanDeadline::after(self.settings.scan_timeout);

        let resolved = tokio::time::timeout_at(deadline.instant(), pipeline.resolver.resolve(root))
            .await
            .map_err(|_| deadline.cancelled(root.key()))??;

        self.progress_reporter
            .start_tracking(pipeline.progress, &resolved.to_string());

        let graph = pipeline.fetcher.fetch(&resolved, &deadline).await?;
        let root_key = graph.tree.package().key();

        pipeline
            .queue
            .analyze_all(&root_key, graph.flattened.clone(), &deadline)
            .await?;

        let flagged_keys: Vec<String> = graph
            .flattened
            .iter()
            .filter(|key| pipeline.malicious.contains(key))
            .cloned()
            .collect();

        Ok(ScanSession::completed(
            root.clone(),
            graph.tree.package().clone(),
            graph.flattened,
            flagged_keys,
        ))
    }

    /// Shows the flagged packages and asks once whether to install anyway
    async fn confirm(&self, flagged: &[FlaggedPackage]) -> bool {
        match self.confirmation_prompt.read_confirmation(flagged).await {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation; blocking install");
                false
            }
        }
    }
}
