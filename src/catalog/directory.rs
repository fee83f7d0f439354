//! Catalog backed by a directory tree of YAML files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Catalog, CatalogError, FactoryTemplate, Machine, Product, RecordKind};

/// Reads records from `<root>/products`, `<root>/factories/Templates` and
/// `<root>/machines`, one YAML file per record.
///
/// Product files are named after the lowercased product identifier; template
/// and machine files use the identifier verbatim.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that would hold the given record.
    pub fn record_path(&self, kind: RecordKind, id: &str) -> PathBuf {
        match kind {
            RecordKind::Product => self
                .root
                .join("products")
                .join(format!("{}.yaml", id.to_lowercase())),
            RecordKind::FactoryTemplate => self
                .root
                .join("factories")
                .join("Templates")
                .join(format!("{id}.yaml")),
            RecordKind::Machine => self.root.join("machines").join(format!("{id}.yaml")),
        }
    }

    fn load<T: DeserializeOwned>(&self, kind: RecordKind, id: &str) -> Result<T, CatalogError> {
        let path = self.record_path(kind, id);
        debug!(%kind, id, path = %path.display(), "loading catalog record");

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound {
                    kind,
                    id: id.to_string(),
                });
            }
            Err(source) => return Err(CatalogError::Io { path, source }),
        };

        // An empty file is an empty record, not a parse failure.
        if raw.trim().is_empty() {
            return serde_yaml::from_str("{}").map_err(|e| CatalogError::Parse {
                path,
                message: e.to_string(),
            });
        }

        serde_yaml::from_str(&raw).map_err(|e| CatalogError::Parse {
            path,
            message: e.to_string(),
        })
    }
}

impl Catalog for DirectoryCatalog {
    fn product(&self, id: &str) -> Result<Product, CatalogError> {
        let product = self.load(RecordKind::Product, id)?;
        Ok(super::finish_product(id, product))
    }

    fn factory_template(&self, id: &str) -> Result<FactoryTemplate, CatalogError> {
        self.load(RecordKind::FactoryTemplate, id)
    }

    fn machine(&self, id: &str) -> Result<Machine, CatalogError> {
        let machine = self.load(RecordKind::Machine, id)?;
        super::finish_machine(id, machine)
    }
}
