mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use pmguard::adapters::outbound::console::{StderrProgressReporter, StdinConfirmationPrompt};
use pmguard::adapters::outbound::network::{
    CachingPackageRegistry, HttpAnalysisClient, NpmRegistryClient, PyPiRegistryClient,
};
use pmguard::adapters::outbound::process::PackageManagerExecutor;
use pmguard::application::dto::{GuardOutcome, GuardRequest, ScanSettings};
use pmguard::application::use_cases::{InstallGateUseCase, PassThroughUseCase};
use pmguard::config::{discover_config, load_config_from_path, GuardConfig};
use pmguard::install_guard::domain::Ecosystem;
use pmguard::ports::outbound::PackageRegistry;
use pmguard::shared::error::{ExitCode, GuardError};
use pmguard::shared::Result;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments.as_i32()
            } else {
                ExitCode::Success.as_i32()
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing(args.log_level());

    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(exit_code_for(&e).as_i32());
        }
    }
}

/// Logs go to stderr so they never mix with the package manager's output.
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    let invalid_spec = error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<GuardError>(),
            Some(GuardError::InvalidPackageSpec { .. })
        )
    });
    if invalid_spec {
        ExitCode::InvalidArguments
    } else {
        ExitCode::ApplicationError
    }
}

fn run(args: Args) -> Result<i32> {
    let span = tracing::info_span!(
        "invocation",
        id = %Uuid::new_v4(),
        manager = args.manager.program()
    );

    // Load configuration
    let config_file = match &args.config {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(Path::new("."))?,
    };
    let config = GuardConfig::resolve(&args.config_overrides(), config_file, |name| {
        std::env::var(name).ok()
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let request = GuardRequest::builder()
        .command(args.install_command())
        .dry_run(args.dry_run)
        .build()?;

    if request.command.root_packages()?.is_empty() {
        let use_case =
            PassThroughUseCase::new(PackageManagerExecutor::new(), StderrProgressReporter::new());
        let outcome = runtime.block_on(use_case.execute(request).instrument(span))?;
        return Ok(outcome.exit_code());
    }

    // Create adapters (Dependency Injection)
    let analysis = HttpAnalysisClient::new(
        config.require_analysis_url()?,
        config.analysis_api_key.clone(),
    )?;

    let outcome = match request.command.manager().ecosystem() {
        Ecosystem::Npm => run_gate(
            &runtime,
            NpmRegistryClient::with_base_url(&config.npm_registry_url)?,
            analysis,
            request,
            config.scan,
            span,
        )?,
        Ecosystem::PyPi => run_gate(
            &runtime,
            PyPiRegistryClient::with_base_url(&config.pypi_registry_url)?,
            analysis,
            request,
            config.scan,
            span,
        )?,
    };

    Ok(outcome.exit_code())
}

fn run_gate<R>(
    runtime: &Runtime,
    registry: R,
    analysis: HttpAnalysisClient,
    request: GuardRequest,
    settings: ScanSettings,
    span: tracing::Span,
) -> Result<GuardOutcome>
where
    R: PackageRegistry + 'static,
{
    let use_case = InstallGateUseCase::new(
        Arc::new(CachingPackageRegistry::new(registry)),
        Arc::new(analysis),
        StdinConfirmationPrompt::new(),
        PackageManagerExecutor::new(),
        StderrProgressReporter::new(),
        settings,
    );

    runtime.block_on(use_case.execute(request).instrument(span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmguard::install_guard::domain::{InstallCommand, PackageManager};

    #[test]
    fn test_exit_code_for_invalid_spec() {
        let command = InstallCommand::new(
            PackageManager::Npm,
            "install",
            vec!["pkg@1@2".to_string()],
        );
        let err = command.root_packages().unwrap_err();
        assert_eq!(exit_code_for(&err), ExitCode::InvalidArguments);
    }

    #[test]
    fn test_exit_code_for_wrapped_guard_error() {
        let err = anyhow::Error::new(GuardError::Resolution {
            package: "ghost".to_string(),
            details: "not found".to_string(),
        })
        .context("Scan of ghost failed");
        assert_eq!(exit_code_for(&err), ExitCode::ApplicationError);
    }

    #[test]
    fn test_exit_code_for_plain_error() {
        let err = anyhow::anyhow!("All 2 requested package(s) failed to scan");
        assert_eq!(exit_code_for(&err), ExitCode::ApplicationError);
    }
}
