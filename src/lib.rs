//! Barbería justa de Hilzer: clientes, barberos y cajeros coordinados sólo
//! con semáforos contadores propios y colas protegidas por mutex.

pub mod config;
pub mod customsync;
pub mod error;
pub mod names;
pub mod narration;
pub mod schedule;
pub mod shop;

pub type CustomerId = u32;

pub use config::{CoordinationMode, ShopConfig};
pub use error::{ScheduleMismatch, ShopError};
pub use narration::{Narration, NarrationSink, ShopEvent};
pub use schedule::{Reservation, Schedule};
pub use shop::{run, run_with_sink, Peaks, ShopResult};
