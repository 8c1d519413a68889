//! # Pool Fijo de Workers
//! src/workers/pool.rs
//!
//! `worker_count` threads de vida larga drenan una [`BoundedQueue`]
//! compartida. El listener es el único productor: si la cola se llena,
//! `enqueue` lo bloquea y el backlog TCP del sistema operativo absorbe
//! las conexiones nuevas. Ese es el único control de admisión.
//!
//! Los workers nunca terminan. El pool no atrapa errores: el handler es
//! responsable de contener los fallos de cada elemento.

use super::BoundedQueue;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Pool de workers alimentado por una cola acotada
pub struct WorkerPool<T> {
    queue: Arc<BoundedQueue<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Crea la cola y lanza los workers inmediatamente
    ///
    /// Cada worker ejecuta `handler` sobre un elemento a la vez, en el
    /// orden en que fueron encolados.
    ///
    /// # Panics
    ///
    /// Si `queue_capacity` es 0.
    pub fn new<F>(worker_count: usize, queue_capacity: usize, handler: F) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let queue = Arc::new(BoundedQueue::new(queue_capacity));
        let handler = Arc::new(handler);
        let mut workers = Vec::with_capacity(worker_count);

        for i in 0..worker_count {
            let queue = Arc::clone(&queue);
            let handler = Arc::clone(&handler);
            let name = format!("worker-{}", i);

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::worker_loop(name, queue, handler))?;
            workers.push(handle);
        }

        info!(workers = worker_count, queue_capacity, "worker pool started");

        Ok(Self { queue, workers })
    }

    /// Encola un elemento, bloqueando mientras la cola esté llena
    pub fn enqueue(&self, item: T) {
        self.queue.push(item);
    }

    /// Elementos esperando un worker
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn worker_loop<F>(name: String, queue: Arc<BoundedQueue<T>>, handler: Arc<F>)
    where
        F: Fn(T),
    {
        debug!(worker = %name, "worker started");

        loop {
            let item = queue.pop();
            handler(item);
        }
    }
}
