//! Platform shims for the timers and background tasks behind deferred
//! transitions. Native builds run on tokio; WASM builds use the browser
//! event loop through `wasm-bindgen-futures` and `gloo-timers`.

pub use std::time::Duration;
use std::future::Future;

/// Spawn a background task. Tasks are never joined; they observe the
/// transition token to find out whether they still apply.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(future);
}

#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

/// Create an interval that ticks every `period`. The first tick completes
/// immediately on both platforms.
#[cfg(not(target_arch = "wasm32"))]
pub fn interval(period: Duration) -> tokio::time::Interval {
    tokio::time::interval(period)
}

#[cfg(target_arch = "wasm32")]
pub struct Interval {
    period: Duration,
    started: bool,
}

#[cfg(target_arch = "wasm32")]
impl Interval {
    pub async fn tick(&mut self) {
        if !self.started {
            self.started = true;
            return;
        }
        gloo_timers::future::sleep(self.period).await;
    }
}

#[cfg(target_arch = "wasm32")]
pub fn interval(period: Duration) -> Interval {
    Interval {
        period,
        started: false,
    }
}
