use std::sync::Arc;
use std::thread;

use crate::customsync::CustomerSignals;
use crate::narration::ShopEvent;
use crate::schedule::Reservation;
use crate::shop::{CutRequest, PaymentRequest, ShopResources};
use crate::CustomerId;

pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub reservation: Reservation,
    pub signals: Arc<CustomerSignals>,
}

/// Recorre una sola vez todo el protocolo de la barbería.
pub fn customer(me: Customer, resources: ShopResources) -> CustomerId {
    let Customer {
        id,
        name,
        reservation,
        signals,
    } = me;
    let narrator = &resources.narrator;

    thread::sleep(resources.ticks(reservation.arrival));
    narrator.narrate(ShopEvent::Arrived { id, name: name.clone() });

    // si la barbería está llena espero afuera
    resources.waiting_room.enter();
    narrator.narrate(ShopEvent::Entered { id, name: name.clone() });

    resources.sofa.enter();
    narrator.narrate(ShopEvent::SatOnSofa { id, name: name.clone() });

    // recién con la silla asegurada dejo el sillón
    resources.chairs.enter();
    resources.sofa.leave();
    narrator.narrate(ShopEvent::SatInChair { id, name: name.clone() });

    resources.cuts.enqueue(CutRequest {
        customer_id: id,
        display_name: name.clone(),
        cut_duration: reservation.cut_duration,
    });

    signals.finished.acquire();
    // le aviso al barbero que ya puede devolver la silla
    signals.leave_chair.release();
    narrator.narrate(ShopEvent::ChairVacated { id, name: name.clone() });

    narrator.narrate(ShopEvent::PaymentRequested { id, name: name.clone() });
    resources.payments.enqueue(PaymentRequest {
        customer_id: id,
        display_name: name.clone(),
    });

    signals.receipt.acquire();
    narrator.narrate(ShopEvent::Left { id, name });
    resources.waiting_room.leave();
    resources.board.retire(id);
    id
}
