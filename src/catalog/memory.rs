//! In-memory catalog for callers that already hold their records.

use std::collections::HashMap;

use super::{Catalog, CatalogError, FactoryTemplate, Machine, Product, RecordKind};

/// HashMap-backed catalog.
///
/// Records go through the same identifier defaults and validation as the
/// directory catalog when they are looked up.
///
/// ```
/// use factory_energy::catalog::{Catalog, Machine, MemoryCatalog};
///
/// let catalog = MemoryCatalog::new().with_machine("press", Machine::new("press", 10.0, 2.0, 0.8));
/// assert!(catalog.machine("press").is_ok());
/// assert!(catalog.machine("lathe").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: HashMap<String, Product>,
    templates: HashMap<String, FactoryTemplate>,
    machines: HashMap<String, Machine>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, id: &str, product: Product) -> Self {
        self.products.insert(id.to_string(), product);
        self
    }

    pub fn with_factory_template(mut self, id: &str, template: FactoryTemplate) -> Self {
        self.templates.insert(id.to_string(), template);
        self
    }

    pub fn with_machine(mut self, id: &str, machine: Machine) -> Self {
        self.machines.insert(id.to_string(), machine);
        self
    }
}

fn not_found(kind: RecordKind, id: &str) -> CatalogError {
    CatalogError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl Catalog for MemoryCatalog {
    fn product(&self, id: &str) -> Result<Product, CatalogError> {
        let product = self
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Product, id))?;
        Ok(super::finish_product(id, product))
    }

    fn factory_template(&self, id: &str) -> Result<FactoryTemplate, CatalogError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::FactoryTemplate, id))
    }

    fn machine(&self, id: &str) -> Result<Machine, CatalogError> {
        let machine = self
            .machines
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Machine, id))?;
        super::finish_machine(id, machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_records_are_not_found() {
        let catalog = MemoryCatalog::new();
        assert!(catalog.product("widget").unwrap_err().is_not_found());
        assert!(catalog.factory_template("small").unwrap_err().is_not_found());
        assert!(catalog.machine("m1").unwrap_err().is_not_found());
    }

    #[test]
    fn lookups_return_independent_snapshots() {
        let catalog = MemoryCatalog::new().with_machine("m1", Machine::new("m1", 10.0, 2.0, 0.8));
        let mut first = catalog.machine("m1").expect("machine exists");
        first.electric_spec.peak_power = 99.0;
        let second = catalog.machine("m1").expect("machine exists");
        assert_eq!(second.electric_spec.peak_power, 10.0);
    }

    #[test]
    fn invalid_machine_is_rejected_on_lookup() {
        let catalog = MemoryCatalog::new().with_machine("m1", Machine::new("m1", 10.0, 2.0, -0.1));
        assert!(matches!(
            catalog.machine("m1"),
            Err(CatalogError::Invalid { .. })
        ));
    }
}
