//! Run outcome and its plain-text rendering.

use std::fmt;

use super::aggregate::FloorEnergy;

/// Energy estimate for a product on the floor that can make it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub product: String,
    /// Template the matched floor belongs to.
    pub template: String,
    pub floor: String,
    /// Required machines in step order.
    pub sequence: Vec<String>,
    pub energy: FloorEnergy,
}

/// Outcome of one estimation run.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    Matched(EnergyReport),
    /// No floor in any searched template can make the product.
    NoCapableFloor {
        product: String,
        /// Templates that were loaded and searched, in search order.
        searched: Vec<String>,
    },
}

impl Estimate {
    /// The report of a matched run.
    pub fn report(&self) -> Option<&EnergyReport> {
        match self {
            Self::Matched(report) => Some(report),
            Self::NoCapableFloor { .. } => None,
        }
    }
}

impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Report ---")?;
        writeln!(f, "Product:               {}", self.product)?;
        writeln!(f, "Factory template:      {}", self.template)?;
        writeln!(f, "Floor:                 {}", self.floor)?;
        writeln!(f, "Machine sequence:      {}", self.sequence.join("--> "))?;
        for section in &self.energy.sections {
            writeln!(f, "  {:<20} {:.1} kWh", section.name, section.energy_kwh)?;
        }
        writeln!(
            f,
            "Total energy:          {:.1} kWh",
            self.energy.total_energy_kwh
        )?;
        writeln!(f, "Total time units:      {}", self.energy.total_time_units)?;
        write!(f, "Skipped steps:         {}", self.energy.skipped.len())
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(report) => fmt::Display::fmt(report, f),
            Self::NoCapableFloor { product, searched } => write!(
                f,
                "No capable floor for \"{product}\" (searched: {})",
                if searched.is_empty() {
                    "none".to_string()
                } else {
                    searched.join(", ")
                }
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::aggregate::SectionEnergy;

    fn report() -> EnergyReport {
        EnergyReport {
            product: "widget".to_string(),
            template: "small".to_string(),
            floor: "ground".to_string(),
            sequence: vec!["M1".to_string(), "M2".to_string()],
            energy: FloorEnergy {
                sections: vec![
                    SectionEnergy {
                        name: "cutting".to_string(),
                        energy_kwh: 42.0,
                    },
                    SectionEnergy {
                        name: "assembly".to_string(),
                        energy_kwh: 0.1 + 0.2,
                    },
                ],
                total_energy_kwh: 42.0 + 0.1 + 0.2,
                total_time_units: 7.0,
                ..FloorEnergy::default()
            },
        }
    }

    #[test]
    fn report_lists_sections_and_totals() {
        let text = report().to_string();
        assert!(text.contains("Machine sequence:      M1--> M2"));
        assert!(text.contains("cutting"));
        assert!(text.contains("42.0 kWh"));
        // Accumulation drift is hidden at one decimal.
        assert!(text.contains("0.3 kWh"));
        assert!(text.contains("Total energy:          42.3 kWh"));
        assert!(text.contains("Total time units:      7"));
    }

    #[test]
    fn no_match_names_searched_templates() {
        let estimate = Estimate::NoCapableFloor {
            product: "widget".to_string(),
            searched: vec!["small".to_string(), "large".to_string()],
        };
        assert!(estimate.report().is_none());
        assert_eq!(
            estimate.to_string(),
            "No capable floor for \"widget\" (searched: small, large)"
        );
    }
}
