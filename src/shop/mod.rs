pub mod barber;
pub mod cashier;
pub mod customer;
pub mod state;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{CoordinationMode, ShopConfig, SOFA_CAPACITY};
use crate::customsync::{BoundedResourcePool, SignalBoard, WorkQueue};
use crate::error::ShopError;
use crate::names::display_name;
use crate::narration::{NarrationSink, Narrator, ShopEvent};
use crate::schedule::Schedule;
use crate::CustomerId;

use self::customer::Customer;
use self::state::ShopStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutRequest {
    pub customer_id: CustomerId,
    pub display_name: String,
    pub cut_duration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub customer_id: CustomerId,
    pub display_name: String,
}

/// Todo lo compartido entre los actores; cada hilo se lleva su copia de los Arc.
#[derive(Clone)]
pub struct ShopResources {
    pub waiting_room: Arc<BoundedResourcePool>,
    pub sofa: Arc<BoundedResourcePool>,
    pub chairs: Arc<BoundedResourcePool>,
    // en modo compartido los dos apuntan al mismo pool
    pub barber_slot: Arc<BoundedResourcePool>,
    pub cashier_slot: Arc<BoundedResourcePool>,
    pub cuts: Arc<WorkQueue<CutRequest>>,
    pub payments: Arc<WorkQueue<PaymentRequest>>,
    pub board: Arc<SignalBoard>,
    pub status: Arc<ShopStatus>,
    pub narrator: Narrator,
    pub tick: Duration,
}

impl ShopResources {
    fn new(config: &ShopConfig, status: Arc<ShopStatus>, sink: NarrationSink) -> Self {
        let (barber_slots, cashier_slots) = config.coordination_slots();
        let barber_slot = Arc::new(BoundedResourcePool::new("coordinación barberos", barber_slots));
        let cashier_slot = match config.coordination {
            CoordinationMode::Shared => barber_slot.clone(),
            CoordinationMode::Split => {
                Arc::new(BoundedResourcePool::new("coordinación cajeros", cashier_slots))
            }
        };

        ShopResources {
            waiting_room: Arc::new(BoundedResourcePool::new("sala de espera", config.waiting)),
            sofa: Arc::new(BoundedResourcePool::new("sillón", SOFA_CAPACITY)),
            chairs: Arc::new(BoundedResourcePool::new("sillas de barbero", config.chairs)),
            barber_slot,
            cashier_slot,
            cuts: Arc::new(WorkQueue::new("cortes")),
            payments: Arc::new(WorkQueue::new("pagos")),
            board: Arc::new(SignalBoard::new()),
            narrator: Narrator::new(status.clone(), sink),
            status,
            tick: config.tick,
        }
    }

    /// Tiempo real equivalente a `n` ticks simulados.
    pub fn ticks(&self, n: u64) -> Duration {
        self.tick.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
    }
}

/// Ocupación máxima observada de cada recurso físico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Peaks {
    pub waiting_room: usize,
    pub sofa: usize,
    pub barber_chairs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopResult {
    pub customers_served: usize,
    pub haircuts: usize,
    pub payments: usize,
    pub remaining_reservations: usize,
    pub elapsed_ticks: u64,
    pub peaks: Peaks,
}

/// Corre una jornada completa narrando por el logger.
pub fn run(config: ShopConfig, schedule: Option<Schedule>) -> Result<ShopResult, ShopError> {
    run_with_sink(config, schedule, NarrationSink::Log)
}

/// Corre una jornada completa: lanza un hilo por cliente, barbero y cajero,
/// espera a todos los clientes, cierra y espera a barberos y cajeros.
///
/// Si un actor falla o entra en pánico la jornada se abandona: se cierra la
/// barbería, se despierta a barberos y cajeros y se devuelve el error. Los
/// clientes que quedaron esperando no se vuelven a juntar.
pub fn run_with_sink(
    config: ShopConfig,
    schedule: Option<Schedule>,
    sink: NarrationSink,
) -> Result<ShopResult, ShopError> {
    // con la configuración inválida no se lanza ni un hilo
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let schedule = match schedule {
        Some(schedule) => schedule,
        None => Schedule::random(config.default_customers, &mut rng),
    };
    info!(
        "abrimos con {} barberos, {} sillas, sala para {}, {} cajas y {} clientes ({:?})",
        config.barbers,
        config.chairs,
        config.waiting,
        config.registers,
        schedule.len(),
        config.coordination
    );

    let status = Arc::new(ShopStatus::new(schedule.len()));
    let resources = ShopResources::new(&config, status.clone(), sink);

    let customers: Vec<Customer> = schedule
        .reservations()
        .iter()
        .zip(1..)
        .map(|(reservation, id)| Customer {
            id,
            name: display_name(id, &mut rng),
            reservation: *reservation,
            signals: resources.board.register(id),
        })
        .collect();
    let expected = customers.len();

    status.open();
    let (outcomes_tx, outcomes) = mpsc::channel();
    let actors = match launch(&config, &resources, customers, &outcomes_tx) {
        Ok(actors) => actors,
        Err(err) => return Err(abandon(&config, &resources, err)),
    };
    // sólo los actores quedan con un Sender: si todos mueren, recv se entera
    drop(outcomes_tx);

    let customers_served = match wait_for_customers(&outcomes, expected) {
        Ok(served) => served,
        Err(err) => return Err(abandon(&config, &resources, err)),
    };
    for handle in actors.customers {
        join(handle)?;
    }

    // ya no queda nadie adentro: cerramos y avisamos a cada barbero y cajero
    status.close();
    resources.narrator.narrate(ShopEvent::ShopClosed);
    resources.cuts.close(config.barbers);
    resources.payments.close(config.registers);

    let mut haircuts = 0;
    for handle in actors.barbers {
        haircuts += join(handle)?;
    }
    let mut payments = 0;
    for handle in actors.cashiers {
        payments += join(handle)?;
    }
    let elapsed_ticks = join(actors.clock)?;

    // un barbero o cajero que falló después del último cliente
    for outcome in outcomes.try_iter() {
        if let Outcome::Failed(err) = outcome {
            return Err(err);
        }
    }

    let result = ShopResult {
        customers_served,
        haircuts,
        payments,
        remaining_reservations: status.remaining_reservations(),
        elapsed_ticks,
        peaks: Peaks {
            waiting_room: resources.waiting_room.peak(),
            sofa: resources.sofa.peak(),
            barber_chairs: resources.chairs.peak(),
        },
    };
    info!("jornada terminada: {:?}", result);
    Ok(result)
}

/// Lo que cada actor le informa al coordinador.
#[derive(Debug)]
enum Outcome {
    Served(CustomerId),
    Failed(ShopError),
}

struct Actors {
    clock: JoinHandle<u64>,
    customers: Vec<JoinHandle<()>>,
    barbers: Vec<JoinHandle<usize>>,
    cashiers: Vec<JoinHandle<usize>>,
}

fn launch(
    config: &ShopConfig,
    resources: &ShopResources,
    customers: Vec<Customer>,
    outcomes: &Sender<Outcome>,
) -> Result<Actors, ShopError> {
    let clock = {
        let status = resources.status.clone();
        let tick = config.tick;
        spawn("reloj".to_owned(), outcomes, move |_| status.run_clock(tick))?
    };

    let customers = customers
        .into_iter()
        .map(|me| {
            let local = resources.clone();
            spawn(format!("cliente-{}", me.id), outcomes, move |outcomes| {
                let id = customer::customer(me, local);
                let _ = outcomes.send(Outcome::Served(id));
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let barbers = (1..=config.barbers)
        .map(|id| {
            let local = resources.clone();
            spawn(format!("barbero-{}", id), outcomes, move |outcomes| {
                report(barber::barber(id, local), outcomes)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cashiers = (1..=config.registers)
        .map(|id| {
            let local = resources.clone();
            spawn(format!("cajero-{}", id), outcomes, move |outcomes| {
                report(cashier::cashier(id, local), outcomes)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Actors {
        clock,
        customers,
        barbers,
        cashiers,
    })
}

/// Pasa el error de un barbero o cajero al coordinador y cuenta cero trabajos.
fn report(result: Result<usize, ShopError>, outcomes: &Sender<Outcome>) -> usize {
    match result {
        Ok(done) => done,
        Err(err) => {
            error!("{}", err);
            let _ = outcomes.send(Outcome::Failed(err));
            0
        }
    }
}

/// Bloquea hasta que `expected` clientes se fueron o algún actor falló.
fn wait_for_customers(outcomes: &Receiver<Outcome>, expected: usize) -> Result<usize, ShopError> {
    let mut served = 0;
    while served < expected {
        match outcomes.recv() {
            Ok(Outcome::Served(id)) => {
                served += 1;
                debug!("se fue el cliente {} ({}/{})", id, served, expected);
            }
            Ok(Outcome::Failed(err)) => return Err(err),
            Err(_) => return Err(ShopError::ActorPanicked("todos los actores".to_owned())),
        }
    }
    Ok(served)
}

/// Cierra todo para que los barberos y cajeros vivos terminen solos.
fn abandon(config: &ShopConfig, resources: &ShopResources, err: ShopError) -> ShopError {
    error!("se abandona la jornada: {}", err);
    resources.status.close();
    resources.cuts.close(config.barbers);
    resources.payments.close(config.registers);
    err
}

/// Avisa al coordinador si el hilo que lo lleva se cae en pánico.
struct PanicGuard {
    outcomes: Sender<Outcome>,
    name: String,
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            let failure = ShopError::ActorPanicked(self.name.clone());
            let _ = self.outcomes.send(Outcome::Failed(failure));
        }
    }
}

fn spawn<T, F>(name: String, outcomes: &Sender<Outcome>, f: F) -> Result<JoinHandle<T>, ShopError>
where
    F: FnOnce(&Sender<Outcome>) -> T + Send + 'static,
    T: Send + 'static,
{
    let guard = PanicGuard {
        outcomes: outcomes.clone(),
        name: name.clone(),
    };
    thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let guard = guard;
            f(&guard.outcomes)
        })
        .map_err(|source| ShopError::Spawn { name, source })
}

fn join<T>(handle: JoinHandle<T>) -> Result<T, ShopError> {
    let name = handle.thread().name().unwrap_or("sin nombre").to_owned();
    handle.join().map_err(|_| ShopError::ActorPanicked(name))
}
