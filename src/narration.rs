use std::fmt;
use std::sync::Arc;

use futures_channel::mpsc::UnboundedSender;
use log::info;

use crate::shop::state::ShopStatus;
use crate::CustomerId;

/// Cada transición observable de los actores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    Arrived { id: CustomerId, name: String },
    Entered { id: CustomerId, name: String },
    SatOnSofa { id: CustomerId, name: String },
    SatInChair { id: CustomerId, name: String },
    CutStarted { barber: usize, id: CustomerId, name: String, duration: u64 },
    CutFinished { barber: usize, id: CustomerId, name: String },
    ChairVacated { id: CustomerId, name: String },
    PaymentRequested { id: CustomerId, name: String },
    PaymentAccepted { cashier: usize, id: CustomerId, name: String },
    ReceiptIssued { cashier: usize, id: CustomerId, name: String },
    Left { id: CustomerId, name: String },
    BarberOff { barber: usize, cuts: usize },
    CashierOff { cashier: usize, payments: usize },
    ShopClosed,
}

impl ShopEvent {
    /// Cliente involucrado, si lo hay.
    pub fn customer(&self) -> Option<CustomerId> {
        match self {
            ShopEvent::Arrived { id, .. }
            | ShopEvent::Entered { id, .. }
            | ShopEvent::SatOnSofa { id, .. }
            | ShopEvent::SatInChair { id, .. }
            | ShopEvent::CutStarted { id, .. }
            | ShopEvent::CutFinished { id, .. }
            | ShopEvent::ChairVacated { id, .. }
            | ShopEvent::PaymentRequested { id, .. }
            | ShopEvent::PaymentAccepted { id, .. }
            | ShopEvent::ReceiptIssued { id, .. }
            | ShopEvent::Left { id, .. } => Some(*id),
            ShopEvent::BarberOff { .. } | ShopEvent::CashierOff { .. } | ShopEvent::ShopClosed => {
                None
            }
        }
    }
}

impl fmt::Display for ShopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopEvent::Arrived { name, .. } => write!(f, "[{}] Llegué a la barbería", name),
            ShopEvent::Entered { name, .. } => write!(f, "[{}] Entré a la barbería", name),
            ShopEvent::SatOnSofa { name, .. } => write!(f, "[{}] Me senté en el sillón", name),
            ShopEvent::SatInChair { name, .. } => {
                write!(f, "[{}] Me senté en la silla del barbero", name)
            }
            ShopEvent::CutStarted {
                barber,
                name,
                duration,
                ..
            } => write!(
                f,
                "  [Barbero {}] Cortando el pelo de {} ({} ticks)",
                barber, name, duration
            ),
            ShopEvent::CutFinished { barber, name, .. } => {
                write!(f, "  [Barbero {}] Terminé con {}", barber, name)
            }
            ShopEvent::ChairVacated { name, .. } => {
                write!(f, "[{}] Dejé la silla, voy a pagarle al cajero", name)
            }
            ShopEvent::PaymentRequested { name, .. } => write!(f, "[{}] Esperando al cajero", name),
            ShopEvent::PaymentAccepted { cashier, name, .. } => {
                write!(f, "  [Cajero {}] Cobrando a {}", cashier, name)
            }
            ShopEvent::ReceiptIssued { cashier, name, .. } => {
                write!(f, "  [Cajero {}] Recibo entregado a {}", cashier, name)
            }
            ShopEvent::Left { name, .. } => write!(f, "[{}] Me fui de la barbería", name),
            ShopEvent::BarberOff { barber, cuts } => {
                write!(f, "  [Barbero {}] Me voy a casa después de {} cortes", barber, cuts)
            }
            ShopEvent::CashierOff { cashier, payments } => {
                write!(f, "  [Cajero {}] Cierro la caja con {} cobros", cashier, payments)
            }
            ShopEvent::ShopClosed => write!(f, "[Barbería] No van a llegar más clientes, cerramos"),
        }
    }
}

/// Línea de narración con el tick en que ocurrió.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub tick: u64,
    pub event: ShopEvent,
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>5}] {}", self.tick, self.event)
    }
}

/// Adónde van las líneas de narración.
#[derive(Debug, Clone, Default)]
pub enum NarrationSink {
    /// por el logger, a nivel info
    #[default]
    Log,
    /// por un canal, para quien quiera consumirlo como stream
    Channel(UnboundedSender<Narration>),
}

/// Narrador compartido por todos los actores. Estampa cada evento con el tick
/// actual del reloj de la barbería.
#[derive(Debug, Clone)]
pub struct Narrator {
    status: Arc<ShopStatus>,
    sink: NarrationSink,
}

impl Narrator {
    pub fn new(status: Arc<ShopStatus>, sink: NarrationSink) -> Self {
        Narrator { status, sink }
    }

    pub fn narrate(&self, event: ShopEvent) {
        let narration = Narration {
            tick: self.status.elapsed_ticks(),
            event,
        };
        match &self.sink {
            NarrationSink::Log => info!("{}", narration),
            NarrationSink::Channel(tx) => {
                // si del otro lado ya no escuchan, la simulación sigue igual
                let _ = tx.unbounded_send(narration);
            }
        }
    }
}
