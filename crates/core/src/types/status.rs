//! Enumerations shared by the cart, checkout, and catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Points;

/// Flat fee charged for home delivery.
pub const DELIVERY_FEE: Points = Points::new(50);

/// Error returned when parsing one of the enums in this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// How a redemption reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Collected at a drop-off point. No fee.
    #[default]
    Pickup,
    /// Shipped to the user for [`DELIVERY_FEE`].
    Delivery,
}

impl DeliveryMethod {
    /// Fee this method adds to the order total.
    #[must_use]
    pub const fn fee(self) -> Points {
        match self {
            Self::Pickup => Points::ZERO,
            Self::Delivery => DELIVERY_FEE,
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(ParseEnumError::new("delivery method", s)),
        }
    }
}

/// Catalog listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Featured products first, otherwise catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    Low,
    /// Most expensive first.
    High,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Featured => write!(f, "featured"),
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError::new("sort order", s)),
        }
    }
}

/// Points price bands offered as catalog filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    /// Below 300 points.
    #[serde(rename = "under300")]
    Under300,
    /// 300 to 500 points inclusive.
    #[serde(rename = "300to500")]
    From300To500,
    /// Above 500 up to 1000 points inclusive.
    #[serde(rename = "500to1000")]
    From500To1000,
    /// Above 1000 points.
    #[serde(rename = "over1000")]
    Over1000,
}

impl PriceBand {
    /// All bands in display order.
    pub const ALL: [Self; 4] = [
        Self::Under300,
        Self::From300To500,
        Self::From500To1000,
        Self::Over1000,
    ];

    /// Whether a unit price falls in this band.
    #[must_use]
    pub const fn contains(self, points: Points) -> bool {
        let p = points.get();
        match self {
            Self::Under300 => p < 300,
            Self::From300To500 => p >= 300 && p <= 500,
            Self::From500To1000 => p > 500 && p <= 1000,
            Self::Over1000 => p > 1000,
        }
    }

    /// Human label for the band.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under300 => "Under 300 points",
            Self::From300To500 => "300-500 points",
            Self::From500To1000 => "500-1000 points",
            Self::Over1000 => "Over 1000 points",
        }
    }
}

impl std::fmt::Display for PriceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Under300 => write!(f, "under300"),
            Self::From300To500 => write!(f, "300to500"),
            Self::From500To1000 => write!(f, "500to1000"),
            Self::Over1000 => write!(f, "over1000"),
        }
    }
}

impl std::str::FromStr for PriceBand {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under300" => Ok(Self::Under300),
            "300to500" => Ok(Self::From300To500),
            "500to1000" => Ok(Self::From500To1000),
            "over1000" => Ok(Self::Over1000),
            _ => Err(ParseEnumError::new("price band", s)),
        }
    }
}
