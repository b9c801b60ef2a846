use std::time::Duration;

use crate::error::ShopError;

pub const DEFAULT_BARBERS: usize = 3;
pub const DEFAULT_CHAIRS: usize = 7;
pub const DEFAULT_WAITING: usize = 15;
pub const DEFAULT_REGISTERS: usize = 1;
pub const DEFAULT_CUSTOMERS: usize = 20;
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);
pub const SOFA_CAPACITY: usize = 4;

/// Cómo se limitan las acciones de barberos y cajeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinationMode {
    /// un cupo para barberos (tamaño = barberos) y otro para cajeros (tamaño = cajas)
    #[default]
    Split,
    /// un único cupo del tamaño de la cantidad de barberos compartido por ambos
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    pub barbers: usize,
    pub chairs: usize,
    pub waiting: usize,
    pub registers: usize,
    pub coordination: CoordinationMode,
    /// duración real de una unidad de tiempo simulada
    pub tick: Duration,
    /// clientes a generar si no hay agenda
    pub default_customers: usize,
    pub seed: Option<u64>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            barbers: DEFAULT_BARBERS,
            chairs: DEFAULT_CHAIRS,
            waiting: DEFAULT_WAITING,
            registers: DEFAULT_REGISTERS,
            coordination: CoordinationMode::default(),
            tick: DEFAULT_TICK,
            default_customers: DEFAULT_CUSTOMERS,
            seed: None,
        }
    }
}

impl ShopConfig {
    /// Arma la configuración desde valores con signo (como llegan de la línea
    /// de comandos) para poder reportar negativos como error de configuración.
    pub fn from_counts(
        barbers: i64,
        chairs: i64,
        waiting: i64,
        registers: i64,
    ) -> Result<Self, ShopError> {
        Ok(ShopConfig {
            barbers: positive("barbers", barbers)?,
            chairs: positive("chairs", chairs)?,
            waiting: positive("waiting", waiting)?,
            registers: positive("registers", registers)?,
            ..ShopConfig::default()
        })
    }

    pub fn validate(&self) -> Result<(), ShopError> {
        let fields = [
            ("barbers", self.barbers),
            ("chairs", self.chairs),
            ("waiting", self.waiting),
            ("registers", self.registers),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ShopError::Configuration { field, value: 0 });
            }
        }
        if self.tick.is_zero() {
            return Err(ShopError::Configuration {
                field: "tick",
                value: 0,
            });
        }
        Ok(())
    }

    /// Tamaños de los cupos de coordinación (barberos, cajeros).
    pub fn coordination_slots(&self) -> (usize, usize) {
        match self.coordination {
            CoordinationMode::Split => (self.barbers, self.registers),
            CoordinationMode::Shared => (self.barbers, self.barbers),
        }
    }
}

fn positive(field: &'static str, value: i64) -> Result<usize, ShopError> {
    match usize::try_from(value) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShopError::Configuration { field, value }),
    }
}
