use rand::seq::SliceRandom;
use rand::Rng;

use crate::CustomerId;

const NAMES: [&str; 16] = [
    "Andrea", "Bruno", "Camila", "Diego", "Elena", "Facundo", "Gabriela", "Hernán", "Inés",
    "Joaquín", "Lucía", "Martín", "Natalia", "Omar", "Paula", "Rodrigo",
];

/// Nombre para mostrar. Sólo de color: el id es lo que identifica al cliente.
pub fn display_name<R: Rng>(id: CustomerId, rng: &mut R) -> String {
    let name = NAMES.choose(rng).copied().unwrap_or("Cliente");
    format!("{} #{}", name, id)
}
