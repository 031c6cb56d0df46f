use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "auth-server", event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let threads = cfg.auth_server.worker_threads;
    common::utils::launcher::launch("auth-server", threads, async move { auth_server::run(&cfg).await })
}
