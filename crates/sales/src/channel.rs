use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockbook_core::DomainError;

/// Sales route through which a transaction occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    Whatsapp,
    Instagram,
    Showroom,
    Shopify,
    PointOfSale,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Whatsapp,
        Channel::Instagram,
        Channel::Showroom,
        Channel::Shopify,
        Channel::PointOfSale,
    ];

    /// Canonical name, as written to the ledger table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "Whatsapp",
            Channel::Instagram => "Instagram",
            Channel::Showroom => "Showroom",
            Channel::Shopify => "Shopify",
            Channel::PointOfSale => "PointOfSale",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    /// Case-insensitive. Also accepts the legacy point-of-sale label
    /// ("Puntos de Venta") found in older ledgers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "whatsapp" => Ok(Channel::Whatsapp),
            "instagram" => Ok(Channel::Instagram),
            "showroom" => Ok(Channel::Showroom),
            "shopify" => Ok(Channel::Shopify),
            "pointofsale" | "puntosdeventa" | "pos" => Ok(Channel::PointOfSale),
            _ => Err(DomainError::invalid_channel(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_parse_back() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
        }
    }

    #[test]
    fn parsing_is_lenient_about_case_and_legacy_labels() {
        assert_eq!("shopify".parse::<Channel>().unwrap(), Channel::Shopify);
        assert_eq!(
            "Puntos de Venta".parse::<Channel>().unwrap(),
            Channel::PointOfSale
        );
        assert_eq!(
            "point of sale".parse::<Channel>().unwrap(),
            Channel::PointOfSale
        );
    }

    #[test]
    fn unknown_channel_is_rejected() {
        let err = "Telegram".parse::<Channel>().unwrap_err();
        assert_eq!(err, DomainError::InvalidChannel("Telegram".to_string()));
    }
}
