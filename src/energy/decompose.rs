//! Product decomposition into its ordered machine requirements.

use crate::catalog::Product;

/// A processing step that names a machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedStep<'a> {
    /// Index of the owning sub-assembly.
    pub sub_assembly: usize,
    pub machine: &'a str,
    pub time_units: f64,
}

impl PlannedStep<'_> {
    /// Returns `true` when the duration is a finite number `>= 0`.
    pub fn has_valid_duration(&self) -> bool {
        self.time_units.is_finite() && self.time_units >= 0.0
    }
}

/// Iterates the product's steps in sub-assembly then step order.
///
/// Steps without a machine name are skipped.
pub fn processing_steps(product: &Product) -> impl Iterator<Item = PlannedStep<'_>> {
    product
        .sub_assemblies
        .iter()
        .enumerate()
        .flat_map(|(index, sub)| {
            sub.processing_steps.iter().filter_map(move |step| {
                step.machine_name.as_deref().map(|machine| PlannedStep {
                    sub_assembly: index,
                    machine,
                    time_units: step.time_units,
                })
            })
        })
}

/// Machines required by the product, one per step, duplicates kept.
pub fn machine_sequence(product: &Product) -> Vec<&str> {
    processing_steps(product).map(|s| s.machine).collect()
}

/// Human-readable path through the machines, e.g. `saw--> drill`.
pub fn sequence_trace(sequence: &[&str]) -> String {
    sequence.join("--> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProcessingStep, SubAssembly};

    fn widget() -> Product {
        Product::new("widget")
            .with_sub_assembly(
                SubAssembly::new("frame")
                    .with_step("saw", 2.0)
                    .with_step("drill", 1.0),
            )
            .with_sub_assembly(
                SubAssembly::new("finish")
                    .with_step("paint", 3.0)
                    .with_step("saw", 1.5),
            )
    }

    #[test]
    fn sequence_preserves_order_and_duplicates() {
        let product = widget();
        assert_eq!(machine_sequence(&product), ["saw", "drill", "paint", "saw"]);
    }

    #[test]
    fn steps_carry_sub_assembly_and_duration() {
        let product = widget();
        let steps: Vec<PlannedStep<'_>> = processing_steps(&product).collect();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[2].sub_assembly, 1);
        assert_eq!(steps[2].machine, "paint");
        assert_eq!(steps[3].time_units, 1.5);
    }

    #[test]
    fn steps_without_machine_are_skipped() {
        let mut product = widget();
        product.sub_assemblies[0]
            .processing_steps
            .insert(0, ProcessingStep::default());
        assert_eq!(machine_sequence(&product).len(), 4);
    }

    #[test]
    fn durations_must_be_finite_and_non_negative() {
        let product = Product::new("widget").with_sub_assembly(
            SubAssembly::new("body")
                .with_step("saw", -1.0)
                .with_step("saw", f64::NAN)
                .with_step("saw", 0.0)
                .with_step("saw", 2.5),
        );
        let valid: Vec<bool> = processing_steps(&product)
            .map(|s| s.has_valid_duration())
            .collect();
        assert_eq!(valid, [false, false, true, true]);
        // Invalid durations still count as machine requirements.
        assert_eq!(machine_sequence(&product).len(), 4);
    }

    #[test]
    fn empty_product_has_no_requirements() {
        assert!(machine_sequence(&Product::new("nothing")).is_empty());
    }

    #[test]
    fn trace_joins_with_arrows() {
        assert_eq!(sequence_trace(&["saw", "drill", "paint"]), "saw--> drill--> paint");
        assert_eq!(sequence_trace(&[]), "");
    }
}
