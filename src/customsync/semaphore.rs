use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, Thread};

use log::trace;

/// Hilo estacionado esperando un permiso.
#[derive(Debug)]
struct Waiter {
    thread: Thread,
    woken: AtomicBool,
}

#[derive(Debug)]
struct SemState {
    // puede ser negativo: en ese caso |count| == waiters.len()
    count: isize,
    waiters: VecDeque<Arc<Waiter>>,
}

/// Semáforo contador con cola FIFO de hilos estacionados.
///
/// Tanto `acquire` como `release` hacen el read-modify-write del contador y de
/// la cola bajo el mismo lock, así que un `release` que compite con un
/// `acquire` nunca se pierde. Los hilos se despiertan en el orden en que
/// llegaron.
#[derive(Debug)]
pub struct CountingSemaphore {
    state: Mutex<SemState>,
}

impl CountingSemaphore {
    pub fn new(initial: isize) -> Self {
        CountingSemaphore {
            state: Mutex::new(SemState {
                count: initial,
                waiters: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SemState> {
        // nadie entra en pánico con el lock tomado, el estado sigue siendo válido
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn acquire(&self) {
        let waiter = {
            let mut state = self.lock();
            state.count -= 1;
            if state.count >= 0 {
                return;
            }
            let waiter = Arc::new(Waiter {
                thread: thread::current(),
                woken: AtomicBool::new(false),
            });
            state.waiters.push_back(waiter.clone());
            trace!("acquire: me encolo, hay {} esperando", state.waiters.len());
            waiter
        };

        // park puede volver sin que nadie nos haya despertado
        while !waiter.woken.load(Ordering::Acquire) {
            thread::park();
        }
    }

    pub fn release(&self) {
        let mut state = self.lock();
        state.count += 1;
        if state.count > 0 {
            return;
        }
        // despierto al más antiguo; si ya estaba despierto elijo al siguiente
        while let Some(waiter) = state.waiters.pop_front() {
            if !waiter.woken.swap(true, Ordering::Release) {
                waiter.thread.unpark();
                return;
            }
        }
    }

    /// Valor actual del contador (negativo = hilos esperando).
    pub fn count(&self) -> isize {
        self.lock().count
    }

    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }
}
