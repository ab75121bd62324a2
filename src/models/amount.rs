use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors produced when reading a monetary value typed by a user or sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("Amount is empty")]
    Empty,

    #[error("'{0}' is not a valid monetary value")]
    Invalid(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),
}

/// Monetary value of an entry.
///
/// On the wire an amount is a string with exactly two fractional digits and a
/// comma as decimal separator (`"70,80"`). Parsing also accepts a dot and fewer
/// fractional digits, which is what users tend to type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let well_formed = trimmed
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || c == ',' || c == '.' || (i == 0 && c == '-'));
        let separators = trimmed.chars().filter(|c| *c == ',' || *c == '.').count();
        if !well_formed || separators > 1 {
            return Err(AmountParseError::Invalid(trimmed.to_string()));
        }

        let value = Decimal::from_str(&trimmed.replace(',', "."))
            .map_err(|_| AmountParseError::Invalid(trimmed.to_string()))?;
        if value.scale() > 2 {
            return Err(AmountParseError::TooPrecise(trimmed.to_string()));
        }

        Ok(Self(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = format!("{:.2}", self.0.round_dp(2));
        f.write_str(&fixed.replace('.', ","))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a monetary value such as \"70,80\"")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        let decimal = Decimal::try_from(value)
            .map_err(|_| E::custom(AmountParseError::Invalid(value.to_string())))?
            .normalize();
        if decimal.scale() > 2 {
            return Err(E::custom(AmountParseError::TooPrecise(value.to_string())));
        }
        Ok(Amount(decimal))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: &str) -> Amount {
        raw.parse().unwrap()
    }

    #[test]
    fn test_parse_comma_separated_amount() {
        assert_eq!(amount("70,80").value(), Decimal::from_str("70.80").unwrap());
    }

    #[test]
    fn test_display_pads_two_fraction_digits() {
        assert_eq!(amount("70.8").to_string(), "70,80");
        assert_eq!(amount("1000").to_string(), "1000,00");
        assert_eq!(amount("0,5").to_string(), "0,50");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!("".parse::<Amount>(), Err(AmountParseError::Empty));
        assert!(matches!("abc".parse::<Amount>(), Err(AmountParseError::Invalid(_))));
        assert!(matches!("1,2,3".parse::<Amount>(), Err(AmountParseError::Invalid(_))));
        assert!(matches!("1.000,50".parse::<Amount>(), Err(AmountParseError::Invalid(_))));
        assert!(matches!("7,001".parse::<Amount>(), Err(AmountParseError::TooPrecise(_))));
    }

    #[test]
    fn test_negative_amount_parses_but_is_not_positive() {
        let value = amount("-10,00");
        assert!(!value.is_positive());
        assert_eq!(value.to_string(), "-10,00");
    }

    #[test]
    fn test_serializes_as_wire_string() {
        assert_eq!(serde_json::to_string(&amount("70,8")).unwrap(), "\"70,80\"");
    }

    #[test]
    fn test_deserializes_string_and_integer() {
        let from_string: Amount = serde_json::from_str("\"70,80\"").unwrap();
        let from_number: Amount = serde_json::from_str("70").unwrap();

        assert_eq!(from_string, amount("70.80"));
        assert_eq!(from_number.to_string(), "70,00");
        assert!(serde_json::from_str::<Amount>("\"seventy\"").is_err());
    }

    #[test]
    fn test_deserializes_json_float() {
        let value: Amount = serde_json::from_str("70.8").unwrap();
        assert_eq!(value, amount("70,80"));
        assert_eq!(value.to_string(), "70,80");

        assert!(serde_json::from_str::<Amount>("70.805").is_err());
    }
}
