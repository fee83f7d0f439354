//! Catalog records and the loaders that supply them.

pub mod directory;
pub mod memory;
pub mod records;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub use directory::DirectoryCatalog;
pub use memory::MemoryCatalog;
pub use records::{
    ElectricSpec, FactoryTemplate, Floor, Machine, ProcessingStep, Product, RenewableCapability,
    Section, SubAssembly,
};

/// The three kinds of record a catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Product,
    FactoryTemplate,
    Machine,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Product => "product",
            Self::FactoryTemplate => "factory template",
            Self::Machine => "machine",
        })
    }
}

/// Failure to produce a catalog record.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} \"{id}\" does not exist")]
    NotFound { kind: RecordKind, id: String },

    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse \"{}\": {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{kind} \"{id}\" is invalid: {message}")]
    Invalid {
        kind: RecordKind,
        id: String,
        message: String,
    },
}

impl CatalogError {
    /// Returns `true` for a record that simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Read-only source of catalog records.
///
/// Every lookup returns an owned snapshot; nothing a caller does with a
/// record is visible to later lookups.
pub trait Catalog {
    /// Loads a product by identifier.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such product exists, or a read/parse error.
    fn product(&self, id: &str) -> Result<Product, CatalogError>;

    /// Loads a factory template by size class.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such template exists, or a read/parse error.
    fn factory_template(&self, id: &str) -> Result<FactoryTemplate, CatalogError>;

    /// Loads a machine by identifier.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such machine exists, or a read/parse/validation error.
    fn machine(&self, id: &str) -> Result<Machine, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn product(&self, id: &str) -> Result<Product, CatalogError> {
        (**self).product(id)
    }

    fn factory_template(&self, id: &str) -> Result<FactoryTemplate, CatalogError> {
        (**self).factory_template(id)
    }

    fn machine(&self, id: &str) -> Result<Machine, CatalogError> {
        (**self).machine(id)
    }
}

/// Fills in defaults that depend on the lookup identifier.
///
/// Step durations are checked per step during aggregation, not here.
pub(crate) fn finish_product(id: &str, mut product: Product) -> Product {
    if product.name.is_none() {
        product.name = Some(id.to_string());
    }
    product
}

/// Fills in defaults that depend on the lookup identifier and validates.
pub(crate) fn finish_machine(id: &str, mut machine: Machine) -> Result<Machine, CatalogError> {
    if machine.id.is_none() {
        machine.id = Some(id.to_string());
    }
    machine.validate().map_err(|message| CatalogError::Invalid {
        kind: RecordKind::Machine,
        id: id.to_string(),
        message,
    })?;
    Ok(machine)
}
