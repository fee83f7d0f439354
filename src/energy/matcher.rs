//! Floor capability matching.
//!
//! A floor can produce a product when it declares the product AND its machine
//! inventory covers every required machine. The two gates are independent:
//! a floor with every machine but without the declaration does not match.

use tracing::{debug, info};

use crate::catalog::{FactoryTemplate, Floor};

/// The first floor found capable of producing a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorMatch<'a> {
    /// Identifier of the template the floor belongs to.
    pub template: &'a str,
    pub floor: &'a Floor,
}

/// Required machines absent from the floor, in requirement order, without
/// duplicates.
pub fn missing_machines<'r>(floor: &Floor, required: &[&'r str]) -> Vec<&'r str> {
    let inventory = floor.machine_inventory();
    let mut missing: Vec<&'r str> = Vec::new();
    for &machine in required {
        if !inventory.contains(machine) && !missing.contains(&machine) {
            missing.push(machine);
        }
    }
    missing
}

/// Returns `true` when `floor` passes both the declaration and machine gates.
pub fn is_capable(floor: &Floor, product: &str, required: &[&str]) -> bool {
    floor.declares_product(product) && missing_machines(floor, required).is_empty()
}

/// First capable floor of a single template, in floor declaration order.
pub fn capable_floor<'t>(
    template_id: &str,
    template: &'t FactoryTemplate,
    product: &str,
    required: &[&str],
) -> Option<&'t Floor> {
    for floor in &template.floors {
        if !floor.declares_product(product) {
            debug!(template = template_id, floor = %floor.name, product, "floor does not declare product");
            continue;
        }
        let missing = missing_machines(floor, required);
        if missing.is_empty() {
            return Some(floor);
        }
        info!(
            template = template_id,
            floor = %floor.name,
            ?missing,
            "floor declares product but lacks machines; add them to make it capable"
        );
    }
    None
}

/// First capable floor across templates, searched in the given order.
///
/// The search stops at the first match; there is no fallback to a partially
/// capable floor.
pub fn find_capable_floor<'a>(
    product: &str,
    required: &[&str],
    templates: &'a [(String, FactoryTemplate)],
) -> Option<FloorMatch<'a>> {
    templates.iter().find_map(|(id, template)| {
        capable_floor(id, template, product, required).map(|floor| FloorMatch {
            template: id.as_str(),
            floor,
        })
    })
}
