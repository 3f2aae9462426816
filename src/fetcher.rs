//! Simulated Pokemon lookup
//!
//! Producer used by the demo binary and tests: resolves names from a small
//! built-in catalogue after a configurable latency.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::models::pokemon::{Attack, Pokemon};

/// Failure of a Pokemon lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("NotFound: no pokemon with the name \"{0}\"")]
    NotFound(String),
}

// name, number, (attack, type, damage)
const CATALOGUE: &[(&str, u32, &[(&str, &str, u32)])] = &[
    ("bulbasaur", 1, &[("Solar Beam", "Grass", 120), ("Vine Whip", "Grass", 45)]),
    ("charizard", 6, &[("Flamethrower", "Fire", 90), ("Fire Spin", "Fire", 35)]),
    ("pikachu", 25, &[("Thunderbolt", "Electric", 90), ("Quick Attack", "Normal", 40)]),
    ("ditto", 132, &[("Transform", "Normal", 0)]),
    ("mew", 151, &[("Psychic", "Psychic", 90), ("Ancient Power", "Rock", 60)]),
];

/// Looks `name` up in the catalogue, ignoring case.
pub fn find_pokemon(name: &str) -> Option<Pokemon> {
    let (name, number, attacks) = CATALOGUE
        .iter()
        .find(|(candidate, _, _)| candidate.eq_ignore_ascii_case(name))?;

    Some(Pokemon {
        name: name.to_string(),
        number: *number,
        image: format!("/img/pokemon/{}.jpg", name),
        attacks: attacks
            .iter()
            .map(|(attack, kind, damage)| Attack {
                name: attack.to_string(),
                kind: kind.to_string(),
                damage: *damage,
            })
            .collect(),
    })
}

/// Fetches `name` after waiting `latency`.
pub async fn fetch_pokemon(name: String, latency: Duration) -> Result<Pokemon, FetchError> {
    debug!(name = %name, latency_ms = latency.as_millis() as u64, "Fetching pokemon");
    tokio::time::sleep(latency).await;

    find_pokemon(&name).ok_or(FetchError::NotFound(name))
}
