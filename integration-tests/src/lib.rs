pub const SERVICE_NAME: &str = "service_runner_test";
pub const DISPLAY_NAME: &str = "Service Runner Test";
pub const START_MESSAGE: &str = "worker started";
