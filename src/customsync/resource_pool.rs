use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

use super::semaphore::CountingSemaphore;

/// Recurso físico con capacidad fija (sala, sillón, sillas de barbero...).
///
/// Es un semáforo inicializado en la capacidad; además lleva la cuenta de las
/// unidades ocupadas y del máximo observado para poder verificar que nunca se
/// supera la capacidad.
#[derive(Debug)]
pub struct BoundedResourcePool {
    name: &'static str,
    capacity: usize,
    sem: CountingSemaphore,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl BoundedResourcePool {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        BoundedResourcePool {
            name,
            capacity,
            sem: CountingSemaphore::new(capacity as isize),
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Bloquea hasta que haya una unidad libre.
    pub fn enter(&self) {
        self.sem.acquire();
        let now = self.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        debug!("[{}] ocupado {}/{}", self.name, now, self.capacity);
    }

    /// Devuelve una unidad. Puede llamarlo un hilo distinto al que entró
    /// (el barbero libera la silla que ocupó el cliente).
    pub fn leave(&self) {
        self.in_use.fetch_sub(1, Ordering::SeqCst);
        self.sem.release();
    }

    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedResourcePool;

    use rand::{thread_rng, Rng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_storm_never_exceeds_capacity() {
        const CAPACITY: usize = 3;
        let pool = Arc::new(BoundedResourcePool::new("sofa", CAPACITY));
        let violations = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let (pool, violations) = (pool.clone(), violations.clone());
                thread::spawn(move || {
                    for _ in 0..40 {
                        pool.enter();
                        if pool.in_use() > CAPACITY {
                            violations.fetch_add(1, Ordering::SeqCst);
                        }
                        thread::sleep(Duration::from_micros(thread_rng().gen_range(0..100)));
                        pool.leave();
                    }
                })
            })
            .collect();

        handles.into_iter().for_each(|h| h.join().unwrap());
        assert_eq!(violations.load(Ordering::SeqCst), 0);
        assert!(pool.peak() <= CAPACITY);
        assert!(pool.peak() >= 1);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_leave_from_another_thread_unblocks_entry() {
        let pool = Arc::new(BoundedResourcePool::new("sillas", 1));
        pool.enter();

        let pool2 = pool.clone();
        let waiting = thread::spawn(move || {
            pool2.enter();
            pool2.leave();
        });

        let pool3 = pool.clone();
        thread::spawn(move || pool3.leave()).join().unwrap();
        waiting.join().unwrap();

        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.peak(), 1);
    }
}
