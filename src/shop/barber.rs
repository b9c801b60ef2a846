use std::thread;

use log::debug;

use crate::error::ShopError;
use crate::narration::ShopEvent;
use crate::shop::ShopResources;

/// Atiende pedidos de corte hasta que el coordinador cierra la cola.
/// Devuelve la cantidad de cortes hechos.
pub fn barber(barber_id: usize, resources: ShopResources) -> Result<usize, ShopError> {
    let narrator = &resources.narrator;
    let mut cuts = 0;

    while let Some(request) = resources.cuts.dequeue()? {
        let signals = resources.board.get(request.customer_id)?;

        resources.barber_slot.enter();
        narrator.narrate(ShopEvent::CutStarted {
            barber: barber_id,
            id: request.customer_id,
            name: request.display_name.clone(),
            duration: request.cut_duration,
        });
        thread::sleep(resources.ticks(request.cut_duration));
        let remaining = resources.status.haircut_done();
        debug!("[Barbero {}] quedan {} turnos", barber_id, remaining);
        narrator.narrate(ShopEvent::CutFinished {
            barber: barber_id,
            id: request.customer_id,
            name: request.display_name,
        });
        resources.barber_slot.leave();

        signals.finished.release();
        // la silla vuelve al pool recién cuando el cliente se levantó
        signals.leave_chair.acquire();
        resources.chairs.leave();
        cuts += 1;
    }

    narrator.narrate(ShopEvent::BarberOff {
        barber: barber_id,
        cuts,
    });
    Ok(cuts)
}
