use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::FinderError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Builds a position from two textual coordinates, e.g. command-line arguments.
    ///
    /// Extra values after the first two are ignored.
    pub fn from_args<I, S>(args: I) -> Result<Self, FinderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let x = parse_coordinate("x", args.next())?;
        let y = parse_coordinate("y", args.next())?;
        Ok(Position { x, y })
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn parse_coordinate<S: AsRef<str>>(axis: &str, value: Option<S>) -> Result<f64, FinderError> {
    let value = value.ok_or_else(|| FinderError::Input(format!("missing {} coordinate", axis)))?;
    let value = value.as_ref().trim();

    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FinderError::Input(format!(
            "{} coordinate '{}' is not a number",
            axis, value
        ))),
    }
}

/// Bearer token handed out by the token endpoint. Lives for a single run.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Token(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: Token,
}

/// A shop exactly as listed by the API; coordinates arrive as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRecord {
    pub name: String,
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedShop {
    pub name: String,
    pub distance: f64,
}

#[derive(Tabled)]
pub struct RankedShopTableRow {
    pub name: String,
    pub distance: String,
}

impl From<&RankedShop> for RankedShopTableRow {
    fn from(shop: &RankedShop) -> Self {
        RankedShopTableRow {
            name: shop.name.clone(),
            distance: format!("{:.4}", shop.distance),
        }
    }
}
