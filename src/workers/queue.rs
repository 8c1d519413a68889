//! # Cola FIFO Acotada
//! src/workers/queue.rs
//!
//! Buffer productor/consumidor clásico: un `Mutex` y dos `Condvar`.
//!
//! - `push` bloquea mientras la cola está llena (`not_full`)
//! - `pop` bloquea mientras la cola está vacía (`not_empty`)
//!
//! El tamaño siempre está en `[0, capacity]`.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Cola FIFO thread-safe con capacidad fija
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,

    /// Se notifica al sacar un elemento
    not_full: Condvar,

    /// Se notifica al agregar un elemento
    not_empty: Condvar,

    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola vacía
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0: ningún productor podría avanzar nunca.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be >= 1");

        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Agrega al final, esperando mientras la cola esté llena
    pub fn push(&self, item: T) {
        let mut items = self.lock();

        while items.len() >= self.capacity {
            items = self.not_full.wait(items).unwrap_or_else(PoisonError::into_inner);
        }

        items.push_back(item);
        drop(items);

        // Despertar a un worker esperando
        self.not_empty.notify_one();
    }

    /// Saca el primero, esperando mientras la cola esté vacía
    pub fn pop(&self) -> T {
        let mut items = self.lock();

        loop {
            if let Some(item) = items.pop_front() {
                drop(items);

                // Despertar al productor si estaba bloqueado
                self.not_full.notify_one();
                return item;
            }

            items = self.not_empty.wait(items).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cantidad de elementos esperando
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Un panic con el lock tomado no deja la cola en un estado inválido
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = BoundedQueue::new(10);
        for i in 0..10 {
            queue.push(i);
        }

        let out: Vec<i32> = (0..10).map(|_| queue.pop()).collect();
        assert_eq!(out, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_len_and_capacity() {
        let queue = BoundedQueue::new(2);
        assert_eq!(queue.len(), 0);

        queue.push("a");
        assert_eq!(queue.len(), 1);

        queue.push("b");
        assert_eq!(queue.len(), queue.capacity());
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "queue capacity")]
    fn test_zero_capacity_panics() {
        let _ = BoundedQueue::<u8>::new(0);
    }

    #[test]
    fn test_push_blocks_when_full() {
        let queue = Arc::new(BoundedQueue::new(2));
        queue.push(1);
        queue.push(2);

        let pushed = Arc::new(AtomicBool::new(false));
        let producer = thread::spawn({
            let queue = Arc::clone(&queue);
            let pushed = Arc::clone(&pushed);
            move || {
                queue.push(3);
                pushed.store(true, Ordering::SeqCst);
            }
        });

        // El tercer push sigue bloqueado
        thread::sleep(Duration::from_millis(200));
        assert!(!pushed.load(Ordering::SeqCst));
        assert_eq!(queue.len(), 2);

        // Liberar un lugar lo desbloquea
        assert_eq!(queue.pop(), 1);
        producer.join().unwrap();
        assert!(pushed.load(Ordering::SeqCst));

        assert_eq!(queue.pop(), 2);
        assert_eq!(queue.pop(), 3);
    }

    #[test]
    fn test_pop_blocks_when_empty() {
        let queue = Arc::new(BoundedQueue::new(1));

        let consumer = thread::spawn({
            let queue = Arc::clone(&queue);
            move || queue.pop()
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!consumer.is_finished());

        queue.push(42);
        assert_eq!(consumer.join().unwrap(), 42);
    }

    #[test]
    fn test_many_producers_and_consumers() {
        let queue = Arc::new(BoundedQueue::new(3));
        let per_producer = 200;

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..per_producer {
                        queue.push(p * per_producer + i);
                        assert!(queue.len() <= 3);
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    (0..2 * per_producer).map(|_| queue.pop()).collect::<Vec<_>>()
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }

        let mut all: Vec<usize> = consumers
            .into_iter()
            .flat_map(|c| c.join().unwrap())
            .collect();
        all.sort_unstable();

        assert_eq!(all, (0..4 * per_producer).collect::<Vec<_>>());
        assert_eq!(queue.len(), 0);
    }
}
