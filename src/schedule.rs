use std::fs;
use std::path::Path;

use log::warn;
use rand::Rng;

use crate::error::{ScheduleMismatch, ShopError};

/// Un turno: cuándo llega el cliente y cuánto dura su corte, en ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub arrival: u64,
    pub cut_duration: u64,
}

/// Agenda de clientes.
///
/// Formato de archivo: primera línea la cantidad N, luego una línea por
/// cliente con `llegada duración`. Si las líneas no coinciden con N se usan
/// las que haya y se guarda el aviso en `mismatch`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    reservations: Vec<Reservation>,
    mismatch: Option<ScheduleMismatch>,
}

impl Schedule {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Schedule {
            reservations,
            mismatch: None,
        }
    }

    pub fn uniform(count: usize, arrival: u64, cut_duration: u64) -> Self {
        Schedule::new(vec![Reservation { arrival, cut_duration }; count])
    }

    pub fn random<R: Rng>(count: usize, rng: &mut R) -> Self {
        Schedule::new(
            (0..count)
                .map(|_| Reservation {
                    arrival: rng.gen_range(0..10),
                    cut_duration: rng.gen_range(1..5),
                })
                .collect(),
        )
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShopError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShopError::ScheduleIo {
            path: path.to_path_buf(),
            source,
        })?;
        Schedule::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ShopError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (first, header) = lines.next().ok_or_else(|| ShopError::ScheduleFormat {
            line: 1,
            reason: "empty schedule, expected the customer count".to_owned(),
        })?;
        let declared = usize::try_from(parse_number(header, first, "customer count")?)
            .map_err(|_| ShopError::ScheduleFormat {
                line: first,
                reason: format!("customer count {} does not fit in memory", header),
            })?;

        let reservations = lines
            .map(|(number, line)| parse_reservation(line, number))
            .collect::<Result<Vec<_>, _>>()?;

        let mismatch = (declared != reservations.len()).then(|| ScheduleMismatch {
            declared,
            actual: reservations.len(),
        });
        if let Some(mismatch) = mismatch {
            warn!("{}", mismatch);
        }

        Ok(Schedule {
            reservations,
            mismatch,
        })
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    pub fn mismatch(&self) -> Option<ScheduleMismatch> {
        self.mismatch
    }
}

fn parse_reservation(line: &str, number: usize) -> Result<Reservation, ShopError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [arrival, cut] => Ok(Reservation {
            arrival: parse_number(arrival, number, "arrival time")?,
            cut_duration: parse_number(cut, number, "cut duration")?,
        }),
        _ => Err(ShopError::ScheduleFormat {
            line: number,
            reason: format!("expected `arrival_time cut_duration`, found {:?}", line),
        }),
    }
}

fn parse_number(field: &str, line: usize, what: &str) -> Result<u64, ShopError> {
    field.parse().map_err(|_| ShopError::ScheduleFormat {
        line,
        reason: format!("{} {:?} is not a non-negative integer", what, field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_well_formed() {
        let schedule = Schedule::parse("3\n0 2\n1 4\n5 0\n").unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.mismatch(), None);
        assert_eq!(
            schedule.reservations()[1],
            Reservation {
                arrival: 1,
                cut_duration: 4
            }
        );
    }

    #[test]
    fn test_declared_count_larger_than_lines() {
        let schedule = Schedule::parse("5\n0 1\n0 1\n2 3\n").unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(
            schedule.mismatch(),
            Some(ScheduleMismatch {
                declared: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let schedule = Schedule::parse("\n2\n\n0 1\n   \n3   2\n").unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.mismatch(), None);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        match Schedule::parse("2\n0 1\n3\n") {
            Err(ShopError::ScheduleFormat { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected format error, got {:?}", other),
        }
        match Schedule::parse("2\n0 -1\n") {
            Err(ShopError::ScheduleFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected format error, got {:?}", other),
        }
        assert!(Schedule::parse("").is_err());
        assert!(Schedule::parse("muchos\n0 1\n").is_err());
    }

    #[test]
    fn test_huge_customer_count() {
        match Schedule::parse("18446744073709551616\n0 1\n") {
            Err(ShopError::ScheduleFormat { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected format error, got {:?}", other),
        }

        // entra en usize: sólo es una diferencia con lo listado, no truncada
        #[cfg(target_pointer_width = "64")]
        {
            let schedule = Schedule::parse("18446744073709551615\n0 1\n").unwrap();
            assert_eq!(
                schedule.mismatch(),
                Some(ScheduleMismatch {
                    declared: usize::MAX,
                    actual: 1
                })
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = Schedule::load("/definitivamente/no/existe.txt");
        assert!(matches!(result, Err(ShopError::ScheduleIo { .. })));
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let a = Schedule::random(10, &mut StdRng::seed_from_u64(42));
        let b = Schedule::random(10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a
            .reservations()
            .iter()
            .all(|r| r.arrival < 10 && (1..5).contains(&r.cut_duration)));
    }
}
