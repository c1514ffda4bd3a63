use std::fmt;
use std::sync::Arc;

type Action = Arc<dyn Fn() + Send + Sync + 'static>;

/// The caller's start and stop actions. Opaque to the adapter: they are invoked, never
/// inspected.
#[derive(Clone)]
pub struct Workload {
    on_start: Action,
    on_stop: Action,
}

impl Workload {
    pub fn new<S, T>(on_start: S, on_stop: T) -> Self
    where
        S: Fn() + Send + Sync + 'static,
        T: Fn() + Send + Sync + 'static,
    {
        Self {
            on_start: Arc::new(on_start),
            on_stop: Arc::new(on_stop),
        }
    }

    pub fn start(&self) {
        (self.on_start)()
    }

    pub fn stop(&self) {
        (self.on_stop)()
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload").finish_non_exhaustive()
    }
}
