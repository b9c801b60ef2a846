mod cli;
mod logger;

use barberia_justa::narration::{Narration, NarrationSink, ShopEvent};
use barberia_justa::schedule::Schedule;
use barberia_justa::shop;
use futures::StreamExt;
use futures_channel::mpsc::{self, UnboundedReceiver};

/// La simulación corre en hilos bloqueantes (un hilo por actor); mientras
/// tanto una tarea de tokio va consumiendo la narración como stream y la imprime.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = cli::parse()?;
    logger::init(options.verbosity)?;

    let schedule = options.input.as_ref().map(Schedule::load).transpose()?;

    let (narration_tx, narration_rx) = mpsc::unbounded();
    let printer = tokio::spawn(print_narration(narration_rx, options.quiet));

    let config = options.config;
    let result = tokio::task::spawn_blocking(move || {
        shop::run_with_sink(config, schedule, NarrationSink::Channel(narration_tx))
    })
    .await??;

    // el canal se cierra solo cuando terminan todos los actores
    printer.await?;

    println!(
        "\nAtendidos {} clientes ({} cortes, {} cobros) en {} ticks. Máximos: sala {}, sillón {}, sillas {}",
        result.customers_served,
        result.haircuts,
        result.payments,
        result.elapsed_ticks,
        result.peaks.waiting_room,
        result.peaks.sofa,
        result.peaks.barber_chairs
    );
    Ok(())
}

async fn print_narration(mut lines: UnboundedReceiver<Narration>, quiet: bool) {
    while let Some(line) = lines.next().await {
        if !quiet {
            println!("{}{}\x1b[0m", color(&line.event), line);
        }
    }
}

fn color(event: &ShopEvent) -> &'static str {
    match event {
        ShopEvent::CutStarted { .. } | ShopEvent::CutFinished { .. } | ShopEvent::BarberOff { .. } => {
            "\x1b[0;33m"
        }
        ShopEvent::PaymentAccepted { .. }
        | ShopEvent::ReceiptIssued { .. }
        | ShopEvent::CashierOff { .. } => "\x1b[0;32m",
        ShopEvent::ShopClosed => "\x1b[1;35m",
        _ => "\x1b[0;36m",
    }
}
