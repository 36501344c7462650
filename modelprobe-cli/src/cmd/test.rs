use std::path::{Path, PathBuf};
use std::sync::Arc;

use modelprobe_core::{
    AttemptResult, CancelReason, ErrorClassifier, Handbook, ProviderConfig, RunConfig,
    TargetSpec,
};
use modelprobe_exec::executor::{
    CompositeEventSink, NoOpEventSink, StdoutEventSink, TracingEventSink,
};
use modelprobe_exec::{
    discover_models, CancellationSignal, DiscoveryError, EventSink, ExecutionError, Executor,
    HttpClient, ReportWriter, ReqwestHttpClient, RunOutcome,
};
use serde::Serialize;

use super::config::{build_run_config, load_provider, open_store};
use super::progress::TerminalStatusRenderer;
use crate::exit_codes;
use crate::output::{print_error, print_result, print_violations, OutputFormat};
use crate::{ConfigArgs, EventsMode, OutputArgs, ReportArgs, RunArgs};

#[derive(Serialize)]
struct TestSummary<'a> {
    run_id: String,
    provider: &'a str,
    total: usize,
    succeeded: usize,
    failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancelled: Option<&'static str>,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<String>,
    results: &'a [AttemptResult],
}

#[allow(clippy::too_many_arguments)]
pub async fn test_cmd(
    provider_name: &str,
    models: &[String],
    fetch: bool,
    events: &[EventsMode],
    run: RunArgs,
    report: ReportArgs,
    output: OutputArgs,
    config: ConfigArgs,
) -> i32 {
    let run_config = match build_run_config(&run, &output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let provider = match load_provider(&store, provider_name, &output).await {
        Ok(p) => p,
        Err(code) => return code,
    };

    let http: Arc<dyn HttpClient> = match ReqwestHttpClient::new() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to create HTTP client: {e}"),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let classifier: Arc<dyn ErrorClassifier> = Arc::new(Handbook);

    let planned = match plan_models(
        &provider,
        models,
        fetch,
        http.as_ref(),
        classifier.as_ref(),
        &run_config,
    )
    .await
    {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return match e {
                DiscoveryError::Config(_) => exit_codes::VALIDATION_FAILED,
                _ => exit_codes::RUNTIME_ERROR,
            };
        }
    };

    let mut targets = Vec::with_capacity(planned.len());
    for (model_id, category) in planned {
        match TargetSpec::for_model(&provider, &model_id, category, &run_config) {
            Ok(t) => targets.push(t),
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                return exit_codes::VALIDATION_FAILED;
            }
        }
    }
    if targets.is_empty() {
        if !output.quiet && output.format == OutputFormat::Text {
            println!("No models to test for {provider_name}.");
        }
        return exit_codes::SUCCESS;
    }

    let event_sink = event_sink(events);
    let mut executor = Executor::new(run_config, http, classifier, event_sink)
        .with_retry_jitter(run.retry_jitter);
    if !run.no_monitor && !output.quiet && output.format == OutputFormat::Text {
        executor = executor.with_renderer(Arc::new(TerminalStatusRenderer::new(provider_name)));
    }

    let signal = Arc::new(CancellationSignal::new());
    let ctrl_c = {
        let signal = signal.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() && signal.cancel(CancelReason::External) {
                tracing::warn!("interrupt received, finishing in-flight requests");
            }
        })
    };
    let outcome = executor.execute_run_with_signal(targets, signal).await;
    ctrl_c.abort();

    let outcome = match outcome {
        Ok(o) => o,
        Err(ExecutionError::InvalidConfig(e)) => {
            print_violations(output.format, output.quiet, &e);
            return exit_codes::VALIDATION_FAILED;
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    if outcome.cancelled == Some(CancelReason::GlobalTimeout) && !output.quiet {
        eprintln!(
            "warning: global timeout of {:.0}s reached; untested models are marked global_timeout",
            executor.config().global_timeout.as_secs_f64()
        );
    }

    let report_path = if report.no_report {
        None
    } else {
        write_report(&report.report_dir, &outcome.results, &output)
    };

    match output.format {
        OutputFormat::Text if !output.quiet => {
            print_summary(provider_name, &outcome, report_path.as_deref())
        }
        _ => {
            let summary = TestSummary {
                run_id: outcome.run_id.to_string(),
                provider: provider_name,
                total: outcome.total,
                succeeded: outcome.successes(),
                failed: outcome.failures(),
                cancelled: outcome.cancelled.map(|r| r.as_str()),
                elapsed_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
                report: report_path.as_ref().map(|p| p.display().to_string()),
                results: &outcome.results,
            };
            print_result(output.format, output.quiet, &summary);
        }
    }

    if outcome.all_succeeded() {
        exit_codes::SUCCESS
    } else {
        exit_codes::RUN_FAILED
    }
}

/// Models to probe with their report category: explicit names first, then
/// configured models, then whatever the provider lists.
async fn plan_models(
    provider: &ProviderConfig,
    models: &[String],
    fetch: bool,
    http: &dyn HttpClient,
    classifier: &dyn ErrorClassifier,
    run_config: &RunConfig,
) -> Result<Vec<(String, Option<String>)>, DiscoveryError> {
    if !models.is_empty() {
        return Ok(models
            .iter()
            .map(|m| {
                let id = provider.resolve_model(m).to_string();
                let category = (id != *m).then(|| m.clone());
                (id, category)
            })
            .collect());
    }
    if !fetch && !provider.supported_models.is_empty() {
        return Ok(provider
            .supported_models
            .iter()
            .map(|id| (id.clone(), provider.friendly_name_for(id).map(String::from)))
            .collect());
    }
    let found = discover_models(http, classifier, provider, run_config.request_timeout).await?;
    Ok(found.into_iter().map(|m| (m.id, m.owned_by)).collect())
}

fn write_report(dir: &Path, results: &[AttemptResult], output: &OutputArgs) -> Option<PathBuf> {
    match ReportWriter::new(dir).write(results) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "failed to write report");
            print_error(output.format, output.quiet, &format!("report not written: {e}"));
            None
        }
    }
}

fn result_icon(result: &AttemptResult) -> &'static str {
    if result.status.is_success() {
        "✅"
    } else if result.status.is_cancelled() {
        "⏹"
    } else {
        "❌"
    }
}

fn print_summary(provider: &str, outcome: &RunOutcome, report: Option<&Path>) {
    println!("\nResults for {provider}:");
    for r in &outcome.results {
        println!(
            "{} {:<40} {:<32} {:>6}ms  retries: {}",
            result_icon(r),
            r.target_id,
            r.status.to_string(),
            r.latency_ms,
            r.retries_used
        );
        if !r.status.is_success() && !r.error_category.is_empty() {
            println!("     {}: {}", r.error_category, r.remedy);
        }
    }
    println!(
        "\nSucceeded: {}  Failed: {}  Total: {}  ({:.1}s)",
        outcome.successes(),
        outcome.failures(),
        outcome.total,
        outcome.elapsed.as_secs_f64()
    );
    if let Some(path) = report {
        println!("Report: {}", path.display());
    }
}

/// One sink per distinct mode; `none` alone or no flag at all disables events.
fn selected_sinks(modes: &[EventsMode]) -> Vec<Arc<dyn EventSink>> {
    let mut seen = Vec::new();
    let mut sinks: Vec<Arc<dyn EventSink>> = Vec::new();
    for mode in modes {
        if seen.contains(mode) {
            continue;
        }
        seen.push(*mode);
        match mode {
            EventsMode::None => {}
            EventsMode::Stdout => sinks.push(Arc::new(StdoutEventSink)),
            EventsMode::Log => sinks.push(Arc::new(TracingEventSink)),
        }
    }
    sinks
}

fn event_sink(modes: &[EventsMode]) -> Arc<dyn EventSink> {
    let mut sinks = selected_sinks(modes);
    match sinks.len() {
        0 => Arc::new(NoOpEventSink),
        1 => sinks.remove(0),
        _ => Arc::new(CompositeEventSink::new(sinks)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_modes_select_distinct_sinks() {
        assert!(selected_sinks(&[]).is_empty());
        assert!(selected_sinks(&[EventsMode::None]).is_empty());
        assert_eq!(selected_sinks(&[EventsMode::Log]).len(), 1);
        assert_eq!(
            selected_sinks(&[EventsMode::Log, EventsMode::Stdout, EventsMode::Log]).len(),
            2
        );
    }
}
