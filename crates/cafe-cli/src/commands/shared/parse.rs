use serde::de::DeserializeOwned;

use cafe_core::entities::{CharacteristicDomain, Narrowing};

use crate::cli::subcommands::RangeArgs;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// A characteristic definition from `--min/--max` or `--values`.
pub fn domain(range: &RangeArgs, values: &[String]) -> anyhow::Result<CharacteristicDomain> {
    match (range.min, range.max, values.is_empty()) {
        (Some(min_value), Some(max_value), true) => Ok(CharacteristicDomain::Numeric {
            min_value,
            max_value,
        }),
        (None, None, false) => Ok(CharacteristicDomain::Categorical {
            values: values.to_vec(),
        }),
        _ => anyhow::bail!("pass either --min and --max or --values"),
    }
}

/// A binding narrowing from `--min/--max` or `--values`.
pub fn narrowing(range: &RangeArgs, values: &[String]) -> anyhow::Result<Narrowing> {
    Ok(match domain(range, values)? {
        CharacteristicDomain::Numeric {
            min_value,
            max_value,
        } => Narrowing::numeric(min_value, max_value),
        CharacteristicDomain::Categorical { values } => Narrowing::Categorical { values },
    })
}
