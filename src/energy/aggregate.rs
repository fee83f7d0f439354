//! Energy aggregation over a matched floor.
//!
//! Rounding points, in order: idle time to 2 decimals, step energy to 2
//! decimals, discounted step energy to 1 decimal before it is added to the
//! section and floor totals. Totals are summed section by section in floor
//! declaration order and, within a section, in product step order.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::decompose::processing_steps;
use super::rounding::round_to;
use crate::catalog::{Catalog, Floor, Machine, Product};

/// Energy of a single processing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCost {
    /// Time at peak power (`T × D`), unrounded.
    pub operational_time: f64,
    /// Time at idle power (`T × (1 − D)`), rounded to 2 decimals.
    pub idle_time: f64,
    /// Energy before the renewable discount, rounded to 2 decimals.
    pub energy_kwh: f64,
    /// Renewable discount multiplier.
    pub renewable_factor: f64,
    /// Discounted energy rounded to 1 decimal; the amount added to totals.
    pub accumulated_kwh: f64,
}

/// Computes the energy of running `machine` for `time_units`.
pub fn step_cost(time_units: f64, machine: &Machine) -> StepCost {
    let spec = &machine.electric_spec;
    let operational_time = time_units * spec.duty_cycle;
    let idle_time = round_to(time_units * (1.0 - spec.duty_cycle), 2);
    let energy_kwh = round_to(
        operational_time * spec.peak_power + idle_time * spec.idle_power,
        2,
    );
    let renewable_factor = machine.renewable.discount_factor();
    StepCost {
        operational_time,
        idle_time,
        energy_kwh,
        renewable_factor,
        accumulated_kwh: round_to(energy_kwh * renewable_factor, 1),
    }
}

/// A processed step with its placement on the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEnergy {
    pub sub_assembly: usize,
    pub machine: String,
    /// Id from the machine record.
    pub machine_id: String,
    pub section: String,
    pub time_units: f64,
    pub cost: StepCost,
}

/// Why a step contributed nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The step duration is negative or not finite.
    InvalidDuration(f64),
    /// The machine is installed in no section of the matched floor.
    MachineNotOnFloor,
    /// The machine record could not be loaded.
    MachineUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration(time_units) => {
                write!(f, "time_units must be a finite number >= 0, got {time_units}")
            }
            Self::MachineNotOnFloor => f.write_str("machine is not installed on the floor"),
            Self::MachineUnavailable(reason) => write!(f, "machine unavailable: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStep {
    pub sub_assembly: usize,
    pub machine: String,
    pub reason: SkipReason,
}

/// Accumulated energy of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEnergy {
    pub name: String,
    pub energy_kwh: f64,
}

/// Energy totals for one product run on one floor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloorEnergy {
    /// Every section of the floor in declaration order, zero when unused.
    pub sections: Vec<SectionEnergy>,
    pub total_energy_kwh: f64,
    /// Sum of the raw step durations that contributed energy.
    pub total_time_units: f64,
    /// Processed steps in product order.
    pub steps: Vec<StepEnergy>,
    pub skipped: Vec<SkippedStep>,
}

impl FloorEnergy {
    /// Energy of the named section, if the floor has it.
    pub fn section(&self, name: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.energy_kwh)
    }
}

/// Runs the product's steps on `floor` and accumulates their energy.
///
/// Machine records are fetched from `catalog`. A step with an invalid
/// duration, whose machine is on no section, or whose machine record cannot
/// be loaded is logged and skipped; the rest of the run is unaffected.
/// Skipped steps add neither energy nor time.
pub fn aggregate<C: Catalog>(floor: &Floor, product: &Product, catalog: &C) -> FloorEnergy {
    let mut machines: HashMap<&str, Result<Machine, String>> = HashMap::new();
    let mut steps = Vec::new();
    let mut placement = Vec::new();
    let mut skipped = Vec::new();

    for step in processing_steps(product) {
        if !step.has_valid_duration() {
            warn!(
                machine = step.machine,
                time_units = step.time_units,
                "invalid step duration; step contributes no energy"
            );
            skipped.push(SkippedStep {
                sub_assembly: step.sub_assembly,
                machine: step.machine.to_string(),
                reason: SkipReason::InvalidDuration(step.time_units),
            });
            continue;
        }

        let Some(section_index) = floor.section_of(step.machine) else {
            warn!(
                machine = step.machine,
                floor = %floor.name,
                "machine is on no section of the floor; step contributes no energy"
            );
            skipped.push(SkippedStep {
                sub_assembly: step.sub_assembly,
                machine: step.machine.to_string(),
                reason: SkipReason::MachineNotOnFloor,
            });
            continue;
        };

        let record = machines
            .entry(step.machine)
            .or_insert_with(|| catalog.machine(step.machine).map_err(|e| e.to_string()));
        let machine = match record {
            Ok(machine) => machine,
            Err(reason) => {
                warn!(machine = step.machine, %reason, "machine unavailable; step contributes no energy");
                skipped.push(SkippedStep {
                    sub_assembly: step.sub_assembly,
                    machine: step.machine.to_string(),
                    reason: SkipReason::MachineUnavailable(reason.clone()),
                });
                continue;
            }
        };

        let cost = step_cost(step.time_units, machine);
        let machine_id = machine.id.clone().unwrap_or_else(|| step.machine.to_string());
        debug!(
            machine_id = %machine_id,
            operational_time = cost.operational_time,
            idle_time = cost.idle_time,
            total_time = cost.operational_time + cost.idle_time,
            energy_kwh = cost.energy_kwh,
            "processed step"
        );

        steps.push(StepEnergy {
            sub_assembly: step.sub_assembly,
            machine: step.machine.to_string(),
            machine_id,
            section: floor.sections[section_index].name.clone(),
            time_units: step.time_units,
            cost,
        });
        placement.push(section_index);
    }

    let mut sections: Vec<SectionEnergy> = floor
        .sections
        .iter()
        .map(|s| SectionEnergy {
            name: s.name.clone(),
            energy_kwh: 0.0,
        })
        .collect();
    let mut total_energy_kwh = 0.0;
    let mut total_time_units = 0.0;

    for (index, section) in sections.iter_mut().enumerate() {
        for (step, _) in steps
            .iter()
            .zip(&placement)
            .filter(|&(_, &placed)| placed == index)
        {
            section.energy_kwh += step.cost.accumulated_kwh;
            total_energy_kwh += step.cost.accumulated_kwh;
            total_time_units += step.time_units;
        }
    }

    FloorEnergy {
        sections,
        total_energy_kwh,
        total_time_units,
        steps,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::{MemoryCatalog, RenewableCapability, Section, SubAssembly};

    fn m1() -> Machine {
        Machine::new("M1", 10.0, 2.0, 0.8)
    }

    fn floor() -> Floor {
        Floor::new("small")
            .with_section(Section::new("cutting", &["M1", "M3"]))
            .with_section(Section::new("assembly", &["M2"]))
            .with_product("widget")
    }

    #[test]
    fn step_cost_matches_worked_example() {
        let cost = step_cost(5.0, &m1());
        assert_eq!(cost.operational_time, 4.0);
        assert_eq!(cost.idle_time, 1.0);
        assert_eq!(cost.energy_kwh, 42.0);
        assert_eq!(cost.accumulated_kwh, 42.0);
    }

    #[test]
    fn partial_renewable_discounts_by_seventy_percent() {
        let machine = m1().with_renewable(RenewableCapability::Partial);
        let cost = step_cost(5.0, &machine);
        assert_eq!(cost.energy_kwh, 42.0);
        assert_eq!(cost.accumulated_kwh, 29.4);
    }

    #[test]
    fn full_renewable_halves_energy() {
        let machine = m1().with_renewable(RenewableCapability::Yes);
        assert_eq!(step_cost(5.0, &machine).accumulated_kwh, 21.0);
    }

    #[test]
    fn idle_time_rounds_before_energy() {
        // T=1, D=0.333: idle 0.667 -> 0.67; energy 0.333*9 + 0.67*3 = 5.007 -> 5.01.
        let machine = Machine::new("m", 9.0, 3.0, 0.333);
        let cost = step_cost(1.0, &machine);
        assert_eq!(cost.idle_time, 0.67);
        assert_eq!(cost.energy_kwh, 5.01);
        assert_eq!(cost.accumulated_kwh, 5.0);
    }

    #[test]
    fn sections_and_totals_accumulate() {
        let catalog = MemoryCatalog::new()
            .with_machine("M1", m1())
            .with_machine("M2", Machine::new("M2", 4.0, 1.0, 0.5));
        let product = Product::new("widget").with_sub_assembly(
            SubAssembly::new("body")
                .with_step("M1", 5.0)
                .with_step("M2", 2.0)
                .with_step("M1", 1.0),
        );

        let energy = aggregate(&floor(), &product, &catalog);
        // M1@5 = 42.0, M2@2 = 1*4 + 1*1 = 5.0, M1@1 = 0.8*10 + 0.2*2 = 8.4
        assert_relative_eq!(energy.section("cutting").unwrap_or_default(), 50.4);
        assert_relative_eq!(energy.section("assembly").unwrap_or_default(), 5.0);
        assert_relative_eq!(energy.total_energy_kwh, 55.4);
        assert_relative_eq!(energy.total_time_units, 8.0);
        assert_eq!(energy.steps.len(), 3);
        assert_eq!(energy.steps[1].section, "assembly");
        assert!(energy.skipped.is_empty());
    }

    #[test]
    fn unused_sections_report_zero() {
        let catalog = MemoryCatalog::new().with_machine("M2", Machine::new("M2", 4.0, 1.0, 0.5));
        let product =
            Product::new("widget").with_sub_assembly(SubAssembly::new("body").with_step("M2", 2.0));
        let energy = aggregate(&floor(), &product, &catalog);
        assert_eq!(energy.sections.len(), 2);
        assert_eq!(energy.section("cutting"), Some(0.0));
    }

    #[test]
    fn missing_machine_record_contributes_nothing() {
        let catalog = MemoryCatalog::new().with_machine("M1", m1());
        let product = Product::new("widget").with_sub_assembly(
            SubAssembly::new("body")
                .with_step("M2", 3.0)
                .with_step("M1", 5.0),
        );
        let energy = aggregate(&floor(), &product, &catalog);
        assert_relative_eq!(energy.total_energy_kwh, 42.0);
        assert_relative_eq!(energy.total_time_units, 5.0);
        assert_eq!(energy.skipped.len(), 1);
        assert!(matches!(
            energy.skipped[0].reason,
            SkipReason::MachineUnavailable(_)
        ));
    }

    #[test]
    fn machine_off_floor_contributes_nothing() {
        let catalog = MemoryCatalog::new()
            .with_machine("M1", m1())
            .with_machine("M7", m1());
        let product = Product::new("widget").with_sub_assembly(
            SubAssembly::new("body")
                .with_step("M7", 3.0)
                .with_step("M1", 5.0),
        );
        let energy = aggregate(&floor(), &product, &catalog);
        assert_relative_eq!(energy.total_energy_kwh, 42.0);
        assert_eq!(energy.skipped[0].reason, SkipReason::MachineNotOnFloor);
        assert_eq!(energy.skipped[0].machine, "M7");
    }

    #[test]
    fn invalid_duration_contributes_nothing() {
        let catalog = MemoryCatalog::new().with_machine("M1", m1());
        let product = Product::new("widget").with_sub_assembly(
            SubAssembly::new("body")
                .with_step("M1", -2.0)
                .with_step("M1", f64::INFINITY)
                .with_step("M1", 5.0),
        );
        let energy = aggregate(&floor(), &product, &catalog);
        assert_relative_eq!(energy.total_energy_kwh, 42.0);
        assert_relative_eq!(energy.total_time_units, 5.0);
        assert_eq!(energy.steps.len(), 1);
        assert_eq!(energy.skipped.len(), 2);
        assert_eq!(energy.skipped[0].reason, SkipReason::InvalidDuration(-2.0));
        assert!(energy.skipped[0].reason.to_string().contains("-2"));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let catalog = MemoryCatalog::new().with_machine("M1", m1());
        let product = Product::new("widget")
            .with_sub_assembly(SubAssembly::new("body").with_step("M1", 5.0).with_step("M1", 0.7));
        let first = aggregate(&floor(), &product, &catalog);
        let second = aggregate(&floor(), &product, &catalog);
        assert_eq!(first, second);
    }
}
