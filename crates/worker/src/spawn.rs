use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime that spell scans and debounce timers are spawned on.
///
/// Editor hosts deliver document events from their own threads, so
/// `SpellEngine::on_change` and friends may run outside any tokio context.
/// Those calls land on a small shared runtime instead of panicking; inside a
/// runtime (the CLI, tests, `SpellEngine::run`) the current one is used.
fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("ortho-worker-global")
			.build()
			.expect("failed to build ortho-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task tagged with its worker class.
///
/// Falls back to a lazily built shared runtime when called outside of one.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}
