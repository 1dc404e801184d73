//! Reference table of purchasable equipment.
//!
//! The catalogue is injected into the sizing and pricing engines rather than
//! read from global state. Administrators edit it through the configuration
//! file; it never changes within a calculation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{BatteryChoice, InverterChoice, InverterKind};
use crate::EPSILON;
use crate::error::{Error, Result};

/// Solar panel used for every array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelModel {
    pub model: String,
    /// Nameplate power (W).
    pub watt_peak: f64,
    /// Roof area taken by one panel including spacing (m²).
    pub footprint_m2: f64,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InverterModel {
    pub model: String,
    pub kind: InverterKind,
    /// AC rating (kW).
    pub rated_kw: f64,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryModel {
    pub model: String,
    /// Usable capacity (kWh).
    pub capacity_kwh: f64,
    pub unit_cost: f64,
}

/// Equipment catalogue with unit costs (₪).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalogue {
    pub panel: PanelModel,
    pub inverters: Vec<InverterModel>,
    pub batteries: Vec<BatteryModel>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalogue {
    /// Built-in reference catalogue.
    pub fn standard() -> Self {
        let inverter = |model: &str, kind, rated_kw, unit_cost| InverterModel {
            model: model.to_string(),
            kind,
            rated_kw,
            unit_cost,
        };
        let battery = |model: &str, capacity_kwh, unit_cost| BatteryModel {
            model: model.to_string(),
            capacity_kwh,
            unit_cost,
        };

        Self {
            panel: PanelModel {
                model: "PV-600".to_string(),
                watt_peak: 600.0,
                footprint_m2: 2.7,
                unit_cost: 650.0,
            },
            inverters: vec![
                inverter("GT-3K", InverterKind::GridTied, 3.0, 2800.0),
                inverter("GT-5K", InverterKind::GridTied, 5.0, 3900.0),
                inverter("GT-8K", InverterKind::GridTied, 8.0, 5200.0),
                inverter("GT-10K", InverterKind::GridTied, 10.0, 6300.0),
                inverter("GT-15K", InverterKind::GridTied, 15.0, 8500.0),
                inverter("HY-5K", InverterKind::Hybrid, 5.0, 6500.0),
                inverter("HY-8K", InverterKind::Hybrid, 8.0, 8200.0),
                inverter("HY-10K", InverterKind::Hybrid, 10.0, 9800.0),
                inverter("HY-15K", InverterKind::Hybrid, 15.0, 13500.0),
            ],
            batteries: vec![
                battery("BAT-5", 5.0, 9000.0),
                battery("BAT-10", 10.0, 16500.0),
            ],
        }
    }

    /// Checks that the catalogue can size every scenario.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalogue`] naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        let p = &self.panel;
        if !(p.watt_peak.is_finite() && p.watt_peak > 0.0) {
            return Err(Error::Catalogue(format!(
                "panel `{}`: watt_peak must be > 0",
                p.model
            )));
        }
        if !(p.footprint_m2.is_finite() && p.footprint_m2 > 0.0) {
            return Err(Error::Catalogue(format!(
                "panel `{}`: footprint_m2 must be > 0",
                p.model
            )));
        }

        for kind in [InverterKind::GridTied, InverterKind::Hybrid] {
            if !self.inverters.iter().any(|inv| inv.kind == kind) {
                return Err(Error::Catalogue(format!("no {kind:?} inverter available")));
            }
        }
        if let Some(inv) = self
            .inverters
            .iter()
            .find(|inv| !(inv.rated_kw.is_finite() && inv.rated_kw > 0.0))
        {
            return Err(Error::Catalogue(format!(
                "inverter `{}`: rated_kw must be > 0",
                inv.model
            )));
        }

        if self.batteries.is_empty() {
            return Err(Error::Catalogue("no battery available".to_string()));
        }
        if let Some(bat) = self
            .batteries
            .iter()
            .find(|bat| !(bat.capacity_kwh.is_finite() && bat.capacity_kwh > 0.0))
        {
            return Err(Error::Catalogue(format!(
                "battery `{}`: capacity_kwh must be > 0",
                bat.model
            )));
        }

        let mut seen = HashSet::new();
        for (model, cost) in self.entries() {
            if !seen.insert(model) {
                return Err(Error::Catalogue(format!("duplicate model `{model}`")));
            }
            if !(cost.is_finite() && cost >= 0.0) {
                return Err(Error::Catalogue(format!(
                    "`{model}`: unit_cost must be >= 0"
                )));
            }
        }

        Ok(())
    }

    /// Picks the inverter for an array of `kwc` kilowatt-peak.
    ///
    /// The smallest model of `kind` whose rating covers the array wins. When
    /// no single unit is large enough, several units of the largest model are
    /// used. An empty array needs no inverter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalogue`] if no inverter of `kind` exists or the
    /// unit count would not fit a `u32`.
    pub fn select_inverter(&self, kind: InverterKind, kwc: f64) -> Result<Option<InverterChoice>> {
        if kwc <= EPSILON {
            return Ok(None);
        }

        let candidates = || self.inverters.iter().filter(|inv| inv.kind == kind);

        let single = candidates()
            .filter(|inv| inv.rated_kw + EPSILON >= kwc)
            .min_by(|a, b| a.rated_kw.total_cmp(&b.rated_kw));
        if let Some(inv) = single {
            return Ok(Some(InverterChoice {
                model: inv.model.clone(),
                kind,
                rated_kw: inv.rated_kw,
                quantity: 1,
            }));
        }

        let largest = candidates()
            .max_by(|a, b| a.rated_kw.total_cmp(&b.rated_kw))
            .ok_or_else(|| Error::Catalogue(format!("no {kind:?} inverter available")))?;
        Ok(Some(InverterChoice {
            model: largest.model.clone(),
            kind,
            rated_kw: largest.rated_kw,
            quantity: units_needed(kwc, largest.rated_kw)?,
        }))
    }

    /// Picks the storage for `required_kwh` of usable capacity.
    ///
    /// Each model is rounded up to whole units; the smallest installed
    /// capacity wins, then the fewest units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalogue`] if the catalogue has no battery or the
    /// unit count would not fit a `u32`.
    pub fn select_battery(&self, required_kwh: f64) -> Result<Option<BatteryChoice>> {
        if required_kwh <= EPSILON {
            return Ok(None);
        }

        let options = self
            .batteries
            .iter()
            .map(|bat| units_needed(required_kwh, bat.capacity_kwh).map(|q| (bat, q)))
            .collect::<Result<Vec<_>>>()?;
        options
            .into_iter()
            .min_by(|(a, qa), (b, qb)| {
                let installed_a = a.capacity_kwh * f64::from(*qa);
                let installed_b = b.capacity_kwh * f64::from(*qb);
                installed_a.total_cmp(&installed_b).then(qa.cmp(qb))
            })
            .map(|(bat, quantity)| {
                Some(BatteryChoice {
                    model: bat.model.clone(),
                    unit_kwh: bat.capacity_kwh,
                    quantity,
                })
            })
            .ok_or_else(|| Error::Catalogue("no battery available".to_string()))
    }

    /// Unit cost of any catalogue model, looked up by name.
    pub fn unit_cost(&self, model: &str) -> Option<f64> {
        self.entries()
            .find(|(name, _)| *name == model)
            .map(|(_, cost)| cost)
    }

    fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        std::iter::once((self.panel.model.as_str(), self.panel.unit_cost))
            .chain(
                self.inverters
                    .iter()
                    .map(|inv| (inv.model.as_str(), inv.unit_cost)),
            )
            .chain(
                self.batteries
                    .iter()
                    .map(|bat| (bat.model.as_str(), bat.unit_cost)),
            )
    }
}

/// Whole units of size `unit` needed to reach `required`.
fn units_needed(required: f64, unit: f64) -> Result<u32> {
    let units = ((required / unit) - EPSILON).ceil().max(1.0);
    if units > f64::from(u32::MAX) {
        return Err(Error::Catalogue(format!(
            "{required} needs {units:.0} units of {unit}, more than can be counted"
        )));
    }
    Ok(units as u32)
}
