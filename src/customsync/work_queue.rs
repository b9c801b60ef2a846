use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use log::debug;

use super::semaphore::CountingSemaphore;
use crate::error::ShopError;

#[derive(Debug)]
enum Entry<T> {
    Work(T),
    // el coordinador deja uno por cada consumidor al cerrar
    Closed,
}

/// Cola FIFO protegida por un mutex con un semáforo "listo" que se señaliza
/// una vez por cada elemento encolado. Cada pedido lo saca exactamente un
/// consumidor, en orden de llegada.
#[derive(Debug)]
pub struct WorkQueue<T> {
    name: &'static str,
    entries: Mutex<VecDeque<Entry<T>>>,
    ready: CountingSemaphore,
}

impl<T> WorkQueue<T> {
    pub fn new(name: &'static str) -> Self {
        WorkQueue {
            name,
            entries: Mutex::new(VecDeque::new()),
            ready: CountingSemaphore::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Entry<T>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn enqueue(&self, item: T) {
        let mut entries = self.lock();
        entries.push_back(Entry::Work(item));
        // señalizo con el lock tomado: ningún otro encolado se intercala
        self.ready.release();
    }

    /// Espera a que haya algo y lo saca. `None` indica que la cola se cerró.
    pub fn dequeue(&self) -> Result<Option<T>, ShopError> {
        self.ready.acquire();
        match self.lock().pop_front() {
            Some(Entry::Work(item)) => Ok(Some(item)),
            Some(Entry::Closed) => Ok(None),
            None => Err(ShopError::QueueUnderflow { queue: self.name }),
        }
    }

    /// Deja un aviso de cierre por consumidor, detrás del trabajo pendiente.
    pub fn close(&self, consumers: usize) {
        let mut entries = self.lock();
        debug!("cerrando cola {} para {} consumidores", self.name, consumers);
        for _ in 0..consumers {
            entries.push_back(Entry::Closed);
            self.ready.release();
        }
    }

    pub fn len(&self) -> usize {
        self.lock()
            .iter()
            .filter(|entry| matches!(entry, Entry::Work(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::WorkQueue;
    use crate::error::ShopError;

    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fifo_single_consumer() {
        let queue = WorkQueue::new("cortes");
        for i in 0..5 {
            queue.enqueue(i);
        }
        assert_eq!(queue.len(), 5);
        let taken: Vec<i32> = (0..5).map(|_| queue.dequeue().unwrap().unwrap()).collect();
        assert_eq!(taken, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_each_item_delivered_exactly_once() {
        const ITEMS: usize = 200;
        const CONSUMERS: usize = 4;
        let queue = Arc::new(WorkQueue::new("pagos"));

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut got = Vec::new();
                    while let Some(item) = queue.dequeue().unwrap() {
                        got.push(item);
                    }
                    got
                })
            })
            .collect();

        let producers: Vec<_> = (0..2)
            .map(|p| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..ITEMS / 2 {
                        queue.enqueue(p * ITEMS + i);
                    }
                })
            })
            .collect();
        producers.into_iter().for_each(|h| h.join().unwrap());
        queue.close(CONSUMERS);

        let mut seen = HashSet::new();
        let mut total = 0;
        for consumer in consumers {
            for item in consumer.join().unwrap() {
                assert!(seen.insert(item), "item {} delivered twice", item);
                total += 1;
            }
        }
        assert_eq!(total, ITEMS);
    }

    #[test]
    fn test_close_comes_after_pending_work() {
        let queue = WorkQueue::new("cortes");
        queue.enqueue("a");
        queue.close(1);
        assert_eq!(queue.dequeue().unwrap(), Some("a"));
        assert_eq!(queue.dequeue().unwrap(), None);
    }

    #[test]
    fn test_ready_without_item_is_underflow() {
        let queue: WorkQueue<u32> = WorkQueue::new("cortes");
        queue.ready.release();
        match queue.dequeue() {
            Err(ShopError::QueueUnderflow { queue }) => assert_eq!(queue, "cortes"),
            other => panic!("expected underflow, got {:?}", other),
        }
    }
}
