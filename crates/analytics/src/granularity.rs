use core::str::FromStr;

use serde::{Deserialize, Serialize};

use bizlens_core::DomainError;

/// Display period selector for the charts.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Diario,
    #[default]
    Mensal,
    Trimestral,
    Anual,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Diario,
        Granularity::Mensal,
        Granularity::Trimestral,
        Granularity::Anual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Diario => "diario",
            Granularity::Mensal => "mensal",
            Granularity::Trimestral => "trimestral",
            Granularity::Anual => "anual",
        }
    }
}

impl core::fmt::Display for Granularity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diario" | "daily" => Ok(Granularity::Diario),
            "mensal" | "monthly" => Ok(Granularity::Mensal),
            "trimestral" | "quarterly" => Ok(Granularity::Trimestral),
            "anual" | "annual" => Ok(Granularity::Anual),
            other => Err(DomainError::validation(format!(
                "unknown period '{other}'; expected one of: diario, mensal, trimestral, anual"
            ))),
        }
    }
}
