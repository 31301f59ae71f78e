use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{RefreshResult, TradeDirection};

pub const UNIT: &str = "₽";
pub const ICON: &str = "mdi:currency-rub";
pub const STATE_CLASS: &str = "measurement";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorAttributes {
    pub available: Option<Decimal>,
    pub min_limit: Option<Decimal>,
    pub max_limit: Option<Decimal>,
}

/// One numeric reading per (direction, target payment method).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub entity_id: String,
    pub name: String,
    pub unit: &'static str,
    pub icon: &'static str,
    pub state_class: &'static str,
    pub value: Option<Decimal>,
    pub attributes: SensorAttributes,
}

pub fn entity_id(direction: TradeDirection, method: &str) -> String {
    format!("htx_api_{}_{}", direction.as_str(), method.to_lowercase())
}

pub fn readings(result: &RefreshResult, targets: &[String]) -> Vec<SensorReading> {
    let mut out = Vec::with_capacity(targets.len() * TradeDirection::ALL.len());
    for direction in TradeDirection::ALL {
        for method in targets {
            let offer = result.offer(direction, method);
            out.push(SensorReading {
                entity_id: entity_id(direction, method),
                name: format!("HTX {} {}", direction.title(), method),
                unit: UNIT,
                icon: ICON,
                state_class: STATE_CLASS,
                value: offer.map(|o| o.price),
                attributes: SensorAttributes {
                    available: offer.map(|o| o.available),
                    min_limit: offer.map(|o| o.min_limit),
                    max_limit: offer.map(|o| o.max_limit),
                },
            });
        }
    }
    out
}
