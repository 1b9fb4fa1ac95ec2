//! Drive and load cell specifications.

use ipxact_core::abstraction::CellSpecification;

use crate::finding::{Category, Finding};
use crate::Validator;

const CELL_FUNCTIONS: [&str; 8] = ["nand2", "buf", "inv", "mux21", "dff", "latch", "xor2", "other"];
const CELL_CLASSES: [&str; 2] = ["combinational", "sequential"];
const CELL_STRENGTHS: [&str; 4] = ["", "low", "median", "high"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CellSpecificationValidator;

impl CellSpecificationValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator<CellSpecification> for CellSpecificationValidator {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, cell: &CellSpecification, context: &str) {
        let has_function = !cell.cell_function.is_empty();
        let has_class = !cell.cell_class.is_empty();

        if has_function == has_class {
            errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Cell specification in {context} must define either a cell function or a cell class."),
            ));
        }

        if has_function {
            if !CELL_FUNCTIONS.contains(&cell.cell_function.as_str()) {
                errors.push(Finding::new(
                    Category::InvalidExpression,
                    format!("Invalid cell function '{}' in {context}.", cell.cell_function),
                ));
            } else if cell.cell_function == "other" && cell.other_function.trim().is_empty() {
                errors.push(Finding::new(
                    Category::MissingElement,
                    format!("Cell function 'other' in {context} requires a function name."),
                ));
            }
        }

        if has_class && !CELL_CLASSES.contains(&cell.cell_class.as_str()) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid cell class '{}' in {context}.", cell.cell_class),
            ));
        }

        if !CELL_STRENGTHS.contains(&cell.cell_strength.as_str()) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid cell strength '{}' in {context}.", cell.cell_strength),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> CellSpecification {
        CellSpecification {
            cell_function: name.into(),
            ..CellSpecification::default()
        }
    }

    #[test]
    fn function_xor_class() {
        let v = CellSpecificationValidator::new();
        assert!(v.validate(&function("buf")));
        assert!(v.validate(&CellSpecification {
            cell_class: "sequential".into(),
            ..CellSpecification::default()
        }));
        assert!(!v.validate(&CellSpecification::default()));
        assert!(!v.validate(&CellSpecification {
            cell_class: "combinational".into(),
            ..function("inv")
        }));
    }

    #[test]
    fn other_function_needs_text() {
        let v = CellSpecificationValidator::new();
        assert!(!v.validate(&function("other")));
        assert!(v.validate(&CellSpecification {
            other_function: "and4".into(),
            ..function("other")
        }));
        assert!(!v.validate(&function("nor3")));
    }

    #[test]
    fn strength_enumeration() {
        let v = CellSpecificationValidator::new();
        assert!(v.validate(&CellSpecification {
            cell_strength: "median".into(),
            ..function("dff")
        }));
        assert!(!v.validate(&CellSpecification {
            cell_strength: "strong".into(),
            ..function("dff")
        }));
    }
}
