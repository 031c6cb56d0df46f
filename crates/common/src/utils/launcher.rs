//! Process wrapper shared by the service binaries: panic logging, a tokio
//! runtime sized from config, and Ctrl+C handling.

use std::future::Future;
use std::process::ExitCode;

use tracing::{error, info};
use uuid::Uuid;

/// Run `service` to completion on a fresh multi-threaded runtime.
pub fn launch<F>(name: &'static str, worker_threads: Option<usize>, service: F) -> ExitCode
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service = name, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = name, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = name,
        event = "start",
        %service_id,
        pid,
        threads = worker_threads.unwrap_or_default(),
        "service starting"
    );

    rt.block_on(async move {
        let task = tokio::spawn(service);
        tokio::select! {
            res = task => match res {
                Ok(Ok(())) => {
                    info!(service = name, event = "stop", %service_id, pid, "service stopped");
                    ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(service = name, event = "run_failed", error = %format!("{e:#}"), "service returned error");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(service = name, event = "task_join_error", error = %e, "service task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = name, event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
