use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct ShopState {
    open: bool,
    remaining_reservations: usize,
    elapsed_ticks: u64,
}

/// Estado global de la barbería, con su propio lock.
///
/// `open` pasa de true a false una sola vez; `remaining_reservations` sólo
/// baja, una vez por corte terminado.
#[derive(Debug)]
pub struct ShopStatus {
    state: Mutex<ShopState>,
}

impl ShopStatus {
    pub fn new(reservations: usize) -> Self {
        ShopStatus {
            state: Mutex::new(ShopState {
                open: false,
                remaining_reservations: reservations,
                elapsed_ticks: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn open(&self) {
        self.lock().open = true;
    }

    /// Devuelve false si ya estaba cerrada.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        let was_open = state.open;
        state.open = false;
        was_open
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn haircut_done(&self) -> usize {
        let mut state = self.lock();
        state.remaining_reservations = state.remaining_reservations.saturating_sub(1);
        state.remaining_reservations
    }

    pub fn remaining_reservations(&self) -> usize {
        self.lock().remaining_reservations
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.lock().elapsed_ticks
    }

    /// Cuerpo del hilo reloj: suma un tick por cada `tick` de tiempo real
    /// mientras la barbería esté abierta. Duerme sin el lock tomado, así que
    /// nunca frena a los actores aunque el tick sea minúsculo.
    pub fn run_clock(&self, tick: Duration) -> u64 {
        loop {
            thread::sleep(tick);
            let mut state = self.lock();
            if !state.open {
                return state.elapsed_ticks;
            }
            state.elapsed_ticks += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ShopStatus;

    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_close_happens_once() {
        let status = ShopStatus::new(2);
        status.open();
        assert!(status.is_open());
        assert!(status.close());
        assert!(!status.close());
        assert!(!status.is_open());
    }

    #[test]
    fn test_reservations_only_decrease() {
        let status = ShopStatus::new(2);
        assert_eq!(status.haircut_done(), 1);
        assert_eq!(status.haircut_done(), 0);
        assert_eq!(status.haircut_done(), 0);
        assert_eq!(status.remaining_reservations(), 0);
    }

    #[test]
    fn test_clock_ticks_while_open_and_stops_on_close() {
        let status = Arc::new(ShopStatus::new(0));
        status.open();
        let clock = {
            let status = status.clone();
            thread::spawn(move || status.run_clock(Duration::from_millis(1)))
        };
        while status.elapsed_ticks() < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        status.close();
        let final_ticks = clock.join().unwrap();
        assert!(final_ticks >= 3);
        assert_eq!(final_ticks, status.elapsed_ticks());
    }

    #[test]
    fn test_tiny_tick_does_not_starve_the_shop() {
        let status = Arc::new(ShopStatus::new(50));
        status.open();
        let clock = {
            let status = status.clone();
            thread::spawn(move || status.run_clock(Duration::from_nanos(1)))
        };

        // con el reloj corriendo a toda velocidad el resto sigue tomando el lock
        for _ in 0..50 {
            status.haircut_done();
            status.elapsed_ticks();
        }
        assert_eq!(status.remaining_reservations(), 0);
        assert!(status.close());
        clock.join().unwrap();
    }
}
