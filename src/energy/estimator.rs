//! One estimation run: decompose, match, aggregate.

use thiserror::Error;
use tracing::{info, warn};

use super::aggregate::aggregate;
use super::decompose::{machine_sequence, sequence_trace};
use super::matcher::capable_floor;
use super::report::{EnergyReport, Estimate};
use crate::catalog::{Catalog, CatalogError};

/// Conditions that abort a run.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("product \"{0}\" does not exist")]
    MissingProduct(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Estimates product energy against a catalog.
///
/// Templates are searched in `search_order` and the first capable floor is
/// used, so reordering the list can change which floor is chosen.
#[derive(Debug)]
pub struct Estimator<'a, C: Catalog> {
    catalog: &'a C,
    search_order: &'a [String],
}

impl<'a, C: Catalog> Estimator<'a, C> {
    pub fn new(catalog: &'a C, search_order: &'a [String]) -> Self {
        Self {
            catalog,
            search_order,
        }
    }

    /// Runs one estimation for `product_id`.
    ///
    /// Templates that fail to load are logged and skipped.
    ///
    /// # Errors
    ///
    /// `MissingProduct` when the product does not exist, `Catalog` when its
    /// record exists but cannot be read or parsed. Steps with bad durations
    /// or unusable machines are skipped, not fatal.
    pub fn estimate(&self, product_id: &str) -> Result<Estimate, EstimateError> {
        let product = match self.catalog.product(product_id) {
            Ok(product) => product,
            Err(e) if e.is_not_found() => {
                return Err(EstimateError::MissingProduct(product_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let sequence = machine_sequence(&product);
        info!(
            product = product_id,
            sequence = %sequence_trace(&sequence),
            "machine sequence"
        );

        let mut searched = Vec::with_capacity(self.search_order.len());
        for template_id in self.search_order {
            let template = match self.catalog.factory_template(template_id) {
                Ok(template) => template,
                Err(e) => {
                    warn!(template = %template_id, error = %e, "skipping factory template");
                    continue;
                }
            };
            searched.push(template_id.clone());

            let Some(floor) = capable_floor(template_id, &template, product_id, &sequence) else {
                continue;
            };
            info!(
                product = product_id,
                template = %template_id,
                floor = %floor.name,
                "found capable floor"
            );

            let energy = aggregate(floor, &product, self.catalog);
            for section in &energy.sections {
                info!(
                    section = %section.name,
                    floor = %floor.name,
                    energy_kwh = section.energy_kwh,
                    "section energy"
                );
            }
            info!(
                template = %template_id,
                energy_kwh = energy.total_energy_kwh,
                time_units = energy.total_time_units,
                skipped_steps = energy.skipped.len(),
                "total energy to produce the product"
            );

            return Ok(Estimate::Matched(EnergyReport {
                product: product_id.to_string(),
                template: template_id.clone(),
                floor: floor.name.clone(),
                sequence: sequence.iter().map(|m| (*m).to_string()).collect(),
                energy,
            }));
        }

        warn!(product = product_id, ?searched, "no capable floor found");
        Ok(Estimate::NoCapableFloor {
            product: product_id.to_string(),
            searched,
        })
    }
}
