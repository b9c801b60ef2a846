use crate::error::ShopError;
use crate::narration::ShopEvent;
use crate::shop::ShopResources;

/// Cobra pedidos de pago hasta que se cierra la cola. Sin demora simulada.
pub fn cashier(cashier_id: usize, resources: ShopResources) -> Result<usize, ShopError> {
    let narrator = &resources.narrator;
    let mut payments = 0;

    while let Some(request) = resources.payments.dequeue()? {
        let signals = resources.board.get(request.customer_id)?;

        resources.cashier_slot.enter();
        narrator.narrate(ShopEvent::PaymentAccepted {
            cashier: cashier_id,
            id: request.customer_id,
            name: request.display_name.clone(),
        });
        resources.cashier_slot.leave();

        narrator.narrate(ShopEvent::ReceiptIssued {
            cashier: cashier_id,
            id: request.customer_id,
            name: request.display_name,
        });
        signals.receipt.release();
        payments += 1;
    }

    narrator.narrate(ShopEvent::CashierOff {
        cashier: cashier_id,
        payments,
    });
    Ok(payments)
}
