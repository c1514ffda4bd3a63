use integration_tests::{DISPLAY_NAME, SERVICE_NAME, START_MESSAGE};
use service_runner::run_as_service;
use tracing::info;

pub fn main() {
    run_as_service(
        SERVICE_NAME,
        DISPLAY_NAME,
        "Integration test worker",
        || {
            println!("{START_MESSAGE}");
            info!("{START_MESSAGE}");
        },
        || info!("worker stopping"),
    );
}
