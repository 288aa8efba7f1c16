use {
    crate::{
        spawn::{Spawn, SpawnError},
        sync::BoxFuture,
    },
    futures_executor::{LocalPool, LocalSpawner},
    futures_task::LocalSpawn,
};

#[derive(Debug)]
pub(crate) struct PoolSpawn(LocalSpawner);

impl Spawn for PoolSpawn {
    fn spawn(&self, future: BoxFuture<'static, ()>) -> Result<(), SpawnError> {
        self.0.spawn_local_obj(future.into()).map_err(|_| SpawnError)
    }
}

/// Single-threaded executor standing for the browser event loop.
pub(crate) fn pool() -> (LocalPool, PoolSpawn) {
    #[cfg(feature = "trace")]
    let _ = tracing_subscriber::fmt::try_init();

    let pool = LocalPool::new();
    let spawn = PoolSpawn(pool.spawner());
    (pool, spawn)
}
