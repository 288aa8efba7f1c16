use {
    crate::sync::{BoxFuture, Send, Sync},
    std::fmt::{self, Debug, Display},
};

/// Executor refused to spawn a task.
#[derive(Clone, Copy, Debug)]
pub struct SpawnError;

impl Display for SpawnError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("Failed to spawn task")
    }
}

impl std::error::Error for SpawnError {}

/// Executor that drives callback delivery.
///
/// Without `sync` feature spawned futures are not `Send`
/// and are expected to run on the same event loop.
pub trait Spawn: Debug + Send + Sync {
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError>;
}

#[cfg(all(feature = "futures-spawn", not(feature = "sync")))]
impl<S> Spawn for S
where
    S: futures_task::LocalSpawn + Debug,
{
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError> {
        futures_util::task::LocalSpawnExt::spawn_local(self, future).map_err(|_| SpawnError)
    }
}

#[cfg(all(feature = "futures-spawn", feature = "sync"))]
impl<S> Spawn for S
where
    S: futures_task::Spawn + Debug + Send + Sync,
{
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError> {
        futures_util::task::SpawnExt::spawn(self, future).map_err(|_| SpawnError)
    }
}

/// Spawns on tokio runtime.
///
/// Without `sync` feature tasks are spawned with `tokio::task::spawn_local`
/// and must be driven within `tokio::task::LocalSet`.
///
/// # Panics
///
/// Without `sync` feature [`Spawn::spawn`] panics
/// when called outside of `tokio::task::LocalSet` context.
#[cfg(all(feature = "tokio-spawn", not(target_arch = "wasm32")))]
#[derive(Clone, Debug)]
pub struct Tokio(pub tokio::runtime::Handle);

#[cfg(all(feature = "tokio-spawn", not(target_arch = "wasm32")))]
impl Tokio {
    pub fn current() -> Self {
        Tokio(tokio::runtime::Handle::current())
    }
}

#[cfg(all(feature = "tokio-spawn", not(target_arch = "wasm32")))]
impl Spawn for Tokio {
    #[cfg(feature = "sync")]
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError> {
        self.0.spawn(future);
        Ok(())
    }

    #[cfg(not(feature = "sync"))]
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError> {
        tokio::task::spawn_local(future);
        Ok(())
    }
}

/// Spawns on browser event loop.
#[cfg(all(feature = "wasm-bindgen-spawn", target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct WasmBindgen;

#[cfg(all(feature = "wasm-bindgen-spawn", target_arch = "wasm32", not(feature = "sync")))]
impl Spawn for WasmBindgen {
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

#[cfg(all(test, feature = "tokio-spawn", not(feature = "sync")))]
mod tests {
    use {
        super::*,
        std::{cell::Cell, rc::Rc},
    };

    #[tokio::test]
    async fn tokio_spawn_local() {
        let spawn = Tokio::current();
        let local = tokio::task::LocalSet::new();
        let hit = Rc::new(Cell::new(false));
        local
            .run_until({
                let hit = hit.clone();
                async move {
                    spawn
                        .spawn(Box::pin(async move { hit.set(true) }))
                        .unwrap();
                    tokio::task::yield_now().await;
                }
            })
            .await;
        local.await;
        assert!(hit.get());
    }

    #[tokio::test]
    #[should_panic]
    async fn tokio_spawn_outside_local_set() {
        let _ = Tokio::current().spawn(Box::pin(async {}));
    }
}
