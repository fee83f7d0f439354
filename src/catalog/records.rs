//! Typed catalog records: products, machines and factory templates.
//!
//! Optional fields carry their defaults here, at the schema, so the engine
//! never has to guess at a missing value.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A product decomposed into sub-assemblies and processing steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Product {
    /// Display name; loaders fill it with the identifier when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Sub-assemblies in manufacturing order.
    #[serde(default, rename = "sub_products")]
    pub sub_assemblies: Vec<SubAssembly>,
}

/// An intermediate grouping of processing steps within a product.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubAssembly {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub processing_steps: Vec<ProcessingStep>,
}

/// One unit of work: a machine and how long it is needed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProcessingStep {
    /// Required machine. Steps without one are ignored.
    #[serde(default)]
    pub machine_name: Option<String>,
    /// Duration in abstract time units.
    #[serde(default)]
    pub time_units: f64,
}

impl Product {
    /// Creates an empty product with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            sub_assemblies: Vec::new(),
        }
    }

    /// Appends a sub-assembly.
    pub fn with_sub_assembly(mut self, sub_assembly: SubAssembly) -> Self {
        self.sub_assemblies.push(sub_assembly);
        self
    }
}

impl SubAssembly {
    /// Creates an empty sub-assembly.
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            processing_steps: Vec::new(),
        }
    }

    /// Appends a processing step on `machine` lasting `time_units`.
    pub fn with_step(mut self, machine: &str, time_units: f64) -> Self {
        self.processing_steps.push(ProcessingStep {
            machine_name: Some(machine.to_string()),
            time_units,
        });
        self
    }
}

/// Renewable-energy capability of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenewableCapability {
    Yes,
    Partial,
    #[default]
    No,
}

impl RenewableCapability {
    /// Parses a catalog tag, ignoring case. Unrecognized tags mean `No`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "yes" => Self::Yes,
            "partial" => Self::Partial,
            _ => Self::No,
        }
    }

    /// Multiplier applied to a step's energy.
    pub fn discount_factor(self) -> f64 {
        match self {
            Self::Yes => 0.5,
            Self::Partial => 0.7,
            Self::No => 1.0,
        }
    }
}

impl fmt::Display for RenewableCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yes => "yes",
            Self::Partial => "partial",
            Self::No => "no",
        })
    }
}

impl<'de> Deserialize<'de> for RenewableCapability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Tag {
            Flag(bool),
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match Tag::deserialize(deserializer)? {
            Tag::Flag(true) => Self::Yes,
            Tag::Text(text) => Self::from_tag(&text),
            Tag::Flag(false) | Tag::Other(_) => Self::No,
        })
    }
}

/// Electrical characteristics of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ElectricSpec {
    /// Power drawn while operating.
    pub peak_power: f64,
    /// Power drawn while idle.
    pub idle_power: f64,
    /// Fraction of a step spent at peak power, in `[0, 1]`.
    pub duty_cycle: f64,
}

impl Default for ElectricSpec {
    fn default() -> Self {
        Self {
            peak_power: 0.0,
            idle_power: 0.0,
            duty_cycle: 1.0,
        }
    }
}

/// Machine reference data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Machine {
    /// Catalog id; loaders fill it with the identifier when absent.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub electric_spec: ElectricSpec,
    #[serde(default, rename = "renewable_capable")]
    pub renewable: RenewableCapability,
}

impl Machine {
    /// Creates a machine with the given spec and no renewable capability.
    pub fn new(id: &str, peak_power: f64, idle_power: f64, duty_cycle: f64) -> Self {
        Self {
            id: Some(id.to_string()),
            electric_spec: ElectricSpec {
                peak_power,
                idle_power,
                duty_cycle,
            },
            renewable: RenewableCapability::No,
        }
    }

    /// Sets the renewable capability.
    pub fn with_renewable(mut self, renewable: RenewableCapability) -> Self {
        self.renewable = renewable;
        self
    }

    /// Checks the electrical spec.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let spec = &self.electric_spec;
        for (field, value) in [
            ("electric_spec.peak_power", spec.peak_power),
            ("electric_spec.idle_power", spec.idle_power),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{field} must be a finite number >= 0, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&spec.duty_cycle) {
            return Err(format!(
                "electric_spec.duty_cycle must be in [0.0, 1.0], got {}",
                spec.duty_cycle
            ));
        }
        Ok(())
    }
}

/// Blueprint of floors for one factory size class.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FactoryTemplate {
    /// Floors in declaration order.
    #[serde(default, rename = "factory_floor", deserialize_with = "floors_in_order")]
    pub floors: Vec<Floor>,
}

impl FactoryTemplate {
    /// Appends a floor.
    pub fn with_floor(mut self, floor: Floor) -> Self {
        self.floors.push(floor);
        self
    }
}

/// A factory floor: sections of machines plus the products it may make.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Floor {
    pub name: String,
    pub sections: Vec<Section>,
    /// Products this floor is declared able to produce.
    pub products: Vec<String>,
}

impl Floor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_product(mut self, product: &str) -> Self {
        self.products.push(product.to_string());
        self
    }

    /// Union of the machines installed in every section.
    pub fn machine_inventory(&self) -> BTreeSet<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.machines.iter().map(String::as_str))
            .collect()
    }

    /// Returns `true` when the floor is declared able to produce `product`.
    pub fn declares_product(&self, product: &str) -> bool {
        self.products.iter().any(|p| p == product)
    }

    /// Index of the first section housing `machine`.
    pub fn section_of(&self, machine: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.contains(machine))
    }
}

/// A named group of machines on a floor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub machines: Vec<String>,
}

impl Section {
    pub fn new(name: &str, machines: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            machines: machines.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    pub fn contains(&self, machine: &str) -> bool {
        self.machines.iter().any(|m| m == machine)
    }
}

#[derive(Deserialize)]
struct FloorBody {
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    products: Vec<String>,
}

/// Reads the `factory_floor` mapping while keeping its key order.
fn floors_in_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Floor>, D::Error> {
    struct FloorsVisitor;

    impl<'de> Visitor<'de> for FloorsVisitor {
        type Value = Vec<Floor>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of floor names to floors")
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut floors = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, body)) = map.next_entry::<String, FloorBody>()? {
                floors.push(Floor {
                    name,
                    sections: body.sections,
                    products: body.products,
                });
            }
            Ok(floors)
        }
    }

    deserializer.deserialize_any(FloorsVisitor)
}
