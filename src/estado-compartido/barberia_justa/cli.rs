use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use barberia_justa::config::{
    CoordinationMode, ShopConfig, DEFAULT_BARBERS, DEFAULT_CHAIRS, DEFAULT_CUSTOMERS,
    DEFAULT_REGISTERS, DEFAULT_WAITING,
};
use clap::{App, Arg, ArgMatches};
use log::LevelFilter;

pub struct Options {
    pub config: ShopConfig,
    pub input: Option<PathBuf>,
    pub quiet: bool,
    pub verbosity: LevelFilter,
}

fn counter<'a, 'b>(name: &'a str, short: &'a str, help: &'a str, default: &'a str) -> Arg<'a, 'b>
where
    'a: 'b,
{
    Arg::with_name(name)
        .short(short)
        .long(name)
        .value_name("N")
        .takes_value(true)
        // para que `-b -1` llegue a la validación en vez de fallar acá
        .allow_hyphen_values(true)
        .default_value(default)
        .help(help)
}

pub fn app<'a, 'b>(defaults: &'a [String; 5]) -> App<'a, 'b>
where
    'a: 'b,
{
    App::new("barberia-justa")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulación de la barbería justa de Hilzer con semáforos")
        .arg(counter("barbers", "b", "Cantidad de barberos", &defaults[0]))
        .arg(counter("chairs", "c", "Cantidad de sillas de barbero", &defaults[1]))
        .arg(counter("waiting", "w", "Capacidad de la barbería", &defaults[2]))
        .arg(counter("registers", "r", "Cantidad de cajas", &defaults[3]))
        .arg(counter(
            "customers",
            "n",
            "Clientes a generar si no hay agenda",
            &defaults[4],
        ))
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("FILE")
                .takes_value(true)
                .help("Agenda de clientes: N y luego `llegada duración` por línea"),
        )
        .arg(
            Arg::with_name("tick-ms")
                .short("t")
                .long("tick-ms")
                .value_name("MS")
                .takes_value(true)
                .default_value("100")
                .help("Milisegundos reales por tick simulado"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .takes_value(true)
                .help("Semilla para la agenda y los nombres aleatorios"),
        )
        .arg(
            Arg::with_name("shared-coordination")
                .long("shared-coordination")
                .help("Barberos y cajeros comparten un único cupo de coordinación"),
        )
        .arg(Arg::with_name("quiet").short("q").long("quiet").help("Sólo avisos y errores"))
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Muestra también la actividad de semáforos y colas"),
        )
}

pub fn defaults() -> [String; 5] {
    [
        DEFAULT_BARBERS.to_string(),
        DEFAULT_CHAIRS.to_string(),
        DEFAULT_WAITING.to_string(),
        DEFAULT_REGISTERS.to_string(),
        DEFAULT_CUSTOMERS.to_string(),
    ]
}

pub fn parse() -> anyhow::Result<Options> {
    let defaults = defaults();
    from_matches(&app(&defaults).get_matches())
}

fn number<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("--{} espera un número, recibió {:?}", name, raw))
        })
        .transpose()
}

pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Options> {
    let count = |name: &str| -> anyhow::Result<i64> {
        number::<i64>(matches, name)?.with_context(|| format!("falta --{}", name))
    };

    let mut config = ShopConfig::from_counts(
        count("barbers")?,
        count("chairs")?,
        count("waiting")?,
        count("registers")?,
    )?;
    if let Some(customers) = number::<usize>(matches, "customers")? {
        config.default_customers = customers;
    }
    if let Some(ms) = number::<u64>(matches, "tick-ms")? {
        config.tick = Duration::from_millis(ms);
    }
    config.seed = number::<u64>(matches, "seed")?;
    if matches.is_present("shared-coordination") {
        config.coordination = CoordinationMode::Shared;
    }
    config.validate()?;

    // quiet gana sobre verbose
    let quiet = matches.is_present("quiet");
    let verbosity = if quiet {
        LevelFilter::Warn
    } else if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Ok(Options {
        config,
        input: matches.value_of("input").map(PathBuf::from),
        quiet,
        verbosity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberia_justa::ShopError;

    fn options(args: &[&str]) -> anyhow::Result<Options> {
        let defaults = defaults();
        let matches = app(&defaults)
            .get_matches_from_safe(std::iter::once("barberia-justa").chain(args.iter().copied()))
            .expect("argumentos válidos para clap");
        from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let options = options(&[]).unwrap();
        assert_eq!(options.config, ShopConfig::default());
        assert_eq!(options.verbosity, LevelFilter::Info);
        assert!(options.input.is_none());
    }

    #[test]
    fn test_flags_and_counts() {
        let options = options(&[
            "-b", "2", "-c", "3", "-w", "5", "-r", "2", "-i", "agenda.txt", "--tick-ms", "1",
            "--shared-coordination", "-v",
        ])
        .unwrap();
        assert_eq!(options.config.barbers, 2);
        assert_eq!(options.config.registers, 2);
        assert_eq!(options.config.tick, Duration::from_millis(1));
        assert_eq!(options.config.coordination, CoordinationMode::Shared);
        assert_eq!(options.input, Some(PathBuf::from("agenda.txt")));
        assert_eq!(options.verbosity, LevelFilter::Debug);
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let options = options(&["-q", "-v"]).unwrap();
        assert!(options.quiet);
        assert_eq!(options.verbosity, LevelFilter::Warn);
    }

    #[test]
    fn test_negative_count_is_configuration_error() {
        let err = options(&["-b", "-1"]).err().expect("debería fallar");
        match err.downcast_ref::<ShopError>() {
            Some(ShopError::Configuration { field, value }) => {
                assert_eq!(*field, "barbers");
                assert_eq!(*value, -1);
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_tick_is_configuration_error() {
        let err = options(&["-t", "0"]).err().expect("debería fallar");
        assert!(matches!(
            err.downcast_ref::<ShopError>(),
            Some(ShopError::Configuration { field: "tick", .. })
        ));
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        assert!(options(&["-w", "muchos"]).is_err());
    }
}
