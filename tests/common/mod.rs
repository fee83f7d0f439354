//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use factory_energy::catalog::{
    DirectoryCatalog, FactoryTemplate, Floor, Machine, MemoryCatalog, Product,
    RenewableCapability, Section, SubAssembly,
};

/// Root of the on-disk YAML catalog under `tests/fixtures/catalog`.
pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("catalog")
}

/// Directory catalog over the fixture tree.
pub fn fixture_catalog() -> DirectoryCatalog {
    factory_energy::logging::init_test();
    DirectoryCatalog::new(fixture_root())
}

/// Search order used by the fixture config (`large` has no file).
pub fn search_order() -> Vec<String> {
    ["small", "medium", "large"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// In-memory catalog for the worked example: "widget" needs M1 then M2 and
/// the "small" template's floor has {M1, M2, M3}.
///
/// M1 has peak=10, idle=2, duty=0.8 with the given renewable capability.
pub fn widget_catalog(m1_renewable: RenewableCapability) -> MemoryCatalog {
    factory_energy::logging::init_test();
    MemoryCatalog::new()
        .with_product(
            "widget",
            Product::new("widget").with_sub_assembly(
                SubAssembly::new("body")
                    .with_step("M1", 5.0)
                    .with_step("M2", 0.0),
            ),
        )
        .with_factory_template("small", small_template())
        .with_machine(
            "M1",
            Machine::new("M1", 10.0, 2.0, 0.8).with_renewable(m1_renewable),
        )
        .with_machine("M2", Machine::new("M2", 6.0, 1.0, 0.5))
        .with_machine("M3", Machine::new("M3", 1.0, 1.0, 1.0))
}

/// Template with a single floor "small" holding M1, M2 and M3.
pub fn small_template() -> FactoryTemplate {
    FactoryTemplate::default().with_floor(
        Floor::new("small")
            .with_section(Section::new("press", &["M1", "M3"]))
            .with_section(Section::new("pack", &["M2"]))
            .with_product("widget"),
    )
}
