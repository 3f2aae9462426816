//! Pokemon record returned by the demo fetcher

use serde::{Deserialize, Serialize};

/// A fetched Pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    pub number: u32,
    pub image: String,
    pub attacks: Vec<Attack>,
}

/// One special attack of a Pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub damage: u32,
}

impl Pokemon {
    /// One-line text rendering used by the demo's render passes.
    pub fn summary(&self) -> String {
        let attacks: Vec<String> = self
            .attacks
            .iter()
            .map(|a| format!("{} ({}, {})", a.name, a.kind, a.damage))
            .collect();
        format!("{} #{:03} [{}]", self.name, self.number, attacks.join(", "))
    }
}
