use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::semaphore::CountingSemaphore;
use crate::error::ShopError;
use crate::CustomerId;

/// Las tres citas entre un cliente y quien lo atiende. Todas arrancan en 0.
#[derive(Debug)]
pub struct CustomerSignals {
    /// barbero -> cliente: terminé de cortarte
    pub finished: CountingSemaphore,
    /// cliente -> barbero: ya me levanté de la silla
    pub leave_chair: CountingSemaphore,
    /// cajero -> cliente: acá está tu recibo
    pub receipt: CountingSemaphore,
}

impl CustomerSignals {
    fn new() -> Self {
        CustomerSignals {
            finished: CountingSemaphore::new(0),
            leave_chair: CountingSemaphore::new(0),
            receipt: CountingSemaphore::new(0),
        }
    }
}

/// Tablero de señales por cliente, dimensionado dinámicamente.
///
/// Se registra una entrada al lanzar cada cliente y se retira cuando el
/// cliente se va; barberos y cajeros la buscan por id mientras lo atienden.
#[derive(Debug, Default)]
pub struct SignalBoard {
    slots: Mutex<HashMap<CustomerId, Arc<CustomerSignals>>>,
}

impl SignalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CustomerId, Arc<CustomerSignals>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Crea las señales de un cliente. Un id nunca se reutiliza, si ya existía
    /// se reemplaza por un juego nuevo.
    pub fn register(&self, id: CustomerId) -> Arc<CustomerSignals> {
        let signals = Arc::new(CustomerSignals::new());
        self.lock().insert(id, signals.clone());
        signals
    }

    pub fn get(&self, id: CustomerId) -> Result<Arc<CustomerSignals>, ShopError> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or(ShopError::UnknownCustomer(id))
    }

    pub fn retire(&self, id: CustomerId) {
        self.lock().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::SignalBoard;
    use crate::error::ShopError;

    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_register_get_retire() {
        let board = SignalBoard::new();
        let mine = board.register(7);
        let seen_by_barber = board.get(7).unwrap();
        assert!(Arc::ptr_eq(&mine, &seen_by_barber));
        assert_eq!(board.len(), 1);

        board.retire(7);
        assert!(board.is_empty());
        assert!(matches!(board.get(7), Err(ShopError::UnknownCustomer(7))));
    }

    #[test]
    fn test_server_keeps_signals_alive_after_retire() {
        let board = Arc::new(SignalBoard::new());
        let customer = board.register(1);
        let server = board.get(1).unwrap();
        board.retire(1);

        let t = thread::spawn(move || server.receipt.release());
        customer.receipt.acquire();
        t.join().unwrap();
    }
}
