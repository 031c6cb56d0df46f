use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "business-service", event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let threads = cfg.business_server.worker_threads;
    common::utils::launcher::launch("business-service", threads, async move { business::run(&cfg).await })
}
