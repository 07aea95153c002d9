use std::str::FromStr;

/// A price as typed by the user. The original token is kept verbatim so it can be echoed
/// back with whichever decimal separator was used, while `value` holds the canonical
/// dot-decimal number.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    value: f64,
    text: String,
}

impl Price {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let value = token
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| PriceError(token.into()))?;

        Ok(Self {
            value,
            text: token.into(),
        })
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("price \"{0}\" is not a decimal number")]
pub struct PriceError(pub String);
