use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual interest rates expressed as percentages (18.99 = 18.99% APR).
/// This follows the client data model rather than decimal fractions.
pub type AprPercent = Decimal;

/// A single outstanding balance, as supplied by the persistence layer.
///
/// The engine only ever reads a snapshot of these; it never mutates the
/// caller's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub name: String,
    pub principal: Money,
    pub rate: AprPercent,
    #[serde(alias = "minPayment")]
    pub min_payment: Money,
}

impl Debt {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        principal: Money,
        rate: AprPercent,
        min_payment: Money,
    ) -> Self {
        Debt {
            id: id.into(),
            name: name.into(),
            principal,
            rate,
            min_payment,
        }
    }
}

/// A debt as entered by the user; the minimum payment and id are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub principal: Money,
    #[serde(default)]
    pub rate: AprPercent,
    #[serde(default, alias = "minPayment")]
    pub min_payment: Option<Money>,
}

impl DebtEntry {
    /// Resolve defaults: a positional id and a 2%-of-balance minimum.
    pub fn into_debt(self, position: usize) -> Debt {
        let min_payment = self
            .min_payment
            .unwrap_or_else(|| crate::payoff::budget::default_min_payment(self.principal));
        Debt {
            id: self.id.unwrap_or_else(|| format!("debt-{}", position + 1)),
            name: self.name,
            principal: self.principal,
            rate: self.rate,
            min_payment,
        }
    }

    pub fn resolve_all(entries: &[DebtEntry]) -> Vec<Debt> {
        entries
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, e)| e.into_debt(i))
            .collect()
    }
}

impl From<Debt> for DebtEntry {
    fn from(d: Debt) -> Self {
        DebtEntry {
            id: Some(d.id),
            name: d.name,
            principal: d.principal,
            rate: d.rate,
            min_payment: Some(d.min_payment),
        }
    }
}

/// Order in which discretionary money is directed at outstanding debts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest interest rate first.
    #[default]
    Avalanche,
    /// Lowest remaining balance first.
    Snowball,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Avalanche => "Avalanche",
            Strategy::Snowball => "Snowball",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Strategy {
    type Err = crate::PayoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(Strategy::Avalanche),
            "snowball" => Ok(Strategy::Snowball),
            other => Err(crate::PayoffError::InvalidInput {
                field: "strategy".into(),
                reason: format!("unknown strategy '{other}' (expected avalanche or snowball)"),
            }),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
