//! Address block validation: block expressions, usage, and the layout of its register data.

use ipxact_core::memory::{AddressBlock, Register, RegisterData, RegisterFile};
use ipxact_core::parameter::Choice;
use ipxact_core::types::{AccessType, Usage};
use ipxact_core::Revision;
use ipxact_expr::ExpressionParser;

use crate::common::{has_valid_is_present, has_valid_name, is_present};
use crate::finding::{Category, Finding};
use crate::memory_reserve::{span_fits, MemoryReserve};
use crate::parameter::ParameterValidator;
use crate::register::RegisterValidator;
use crate::Validator;

fn access_name(access: Option<AccessType>) -> &'static str {
    access.map(AccessType::as_str).unwrap_or("")
}

/// Validates address blocks of one memory map.
///
/// Register containment in address units is only checked when the memory
/// map's `addressUnitBits` is known and non-zero; see
/// [`AddressBlockValidator::with_address_unit_bits`].
pub struct AddressBlockValidator<'a> {
    parser: &'a dyn ExpressionParser,
    registers: RegisterValidator<'a>,
    parameters: ParameterValidator<'a>,
    revision: Revision,
    address_unit_bits: String,
}

impl<'a> AddressBlockValidator<'a> {
    pub fn new(
        parser: &'a dyn ExpressionParser,
        choices: &'a [Choice],
        revision: Revision,
    ) -> Self {
        Self {
            parser,
            registers: RegisterValidator::new(parser, choices, revision),
            parameters: ParameterValidator::new(parser, choices, revision),
            revision,
            address_unit_bits: String::new(),
        }
    }

    /// Bits per address unit of the containing memory map.
    pub fn with_address_unit_bits(mut self, address_unit_bits: impl Into<String>) -> Self {
        self.address_unit_bits = address_unit_bits.into();
        self
    }

    pub fn has_valid_base_address(&self, block: &AddressBlock) -> bool {
        self.parser.unsigned_value(&block.base_address).is_some()
    }

    pub fn has_valid_range(&self, block: &AddressBlock) -> bool {
        self.parser.unsigned_value(&block.range).is_some_and(|r| r > 0)
    }

    /// Zero width is legal.
    pub fn has_valid_width(&self, block: &AddressBlock) -> bool {
        self.parser.unsigned_value(&block.width).is_some()
    }

    /// Register access must be allowed by the block access.
    pub fn has_valid_access_with_register(
        &self,
        block: &AddressBlock,
        register: &Register,
    ) -> bool {
        AccessType::permits(block.access, register.access)
    }

    pub fn has_valid_volatile_for_register(
        &self,
        block: &AddressBlock,
        register: &Register,
    ) -> bool {
        block.volatile != Some(false) || !register.has_volatile_content()
    }

    /// Under 1685-2022 with misalignment disallowed, every register must satisfy
    /// `offset % width + size <= width`.
    pub fn has_valid_register_alignment(&self, block: &AddressBlock) -> bool {
        if self.revision != Revision::Std22 || block.misalignment_allowed != "false" {
            return true;
        }
        let Some(width) = self.parser.integer_value(&block.width).filter(|w| *w != 0) else {
            return true;
        };
        block.registers().all(|register| {
            let offset = self.parser.integer_value(&register.address_offset);
            let size = self.parser.integer_value(&register.size);
            match (offset, size) {
                (Some(offset), Some(size)) => offset
                    .checked_rem(width)
                    .and_then(|rem| rem.checked_add(size))
                    .is_some_and(|end| end <= width),
                _ => true,
            }
        })
    }

    /// Register size in bits compared against block width in bits.
    fn register_size_exceeds_width(&self, block: &AddressBlock, register: &Register) -> bool {
        match (
            self.parser.integer_value(&register.size),
            self.parser.integer_value(&block.width),
        ) {
            (Some(size), Some(width)) => size > width,
            _ => false,
        }
    }

    fn registers_have_similar_definitions(&self, first: &Register, second: &Register) -> bool {
        self.parser.integer_value(&first.size) == self.parser.integer_value(&second.size)
            && first.volatile == second.volatile
            && first.access == second.access
    }

    /// Number of address units a register occupies.
    fn register_size_in_lau(&self, register: &Register, address_unit_bits: i128) -> i128 {
        let size = self.parser.integer_value(&register.size).unwrap_or(0);
        if size <= 0 {
            return 0;
        }
        size / address_unit_bits + i128::from(size % address_unit_bits != 0)
    }

    fn find_errors_in_usage(&self, errors: &mut Vec<Finding>, block: &AddressBlock, context: &str) {
        match block.usage {
            Some(Usage::Reserved) if !block.register_data.is_empty() => {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Registers cannot be contained in address block {} with usage {} within {context}",
                        block.name,
                        Usage::Reserved
                    ),
                ));
            }
            Some(Usage::Memory) => {
                for register in block.registers() {
                    if register.volatile.is_some() || register.access.is_some() {
                        errors.push(Finding::new(
                            Category::Inconsistency,
                            format!(
                                "Access and volatile values must be empty for register {} in address block {} with usage {} within {context}",
                                register.name,
                                block.name,
                                Usage::Memory
                            ),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    fn find_errors_in_register(
        &self,
        errors: &mut Vec<Finding>,
        block: &AddressBlock,
        register: &Register,
        block_context: &str,
        context: &str,
    ) {
        self.registers.find_errors_in(errors, register, block_context);

        if self.register_size_exceeds_width(block, register) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Register {} size must not be greater than the containing addressBlock {} width within {context}",
                    register.name, block.name
                ),
            ));
        }

        if !self.has_valid_volatile_for_register(block, register) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Volatile value cannot be set to false for addressBlock {} containing a register or register field with volatile true within {context}",
                    block.name
                ),
            ));
        }

        if self.revision == Revision::Std14
            && !self.has_valid_access_with_register(block, register)
        {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Access cannot be set to {} in register {}, where containing address block {} has access {}",
                    access_name(register.access),
                    register.name,
                    block.name,
                    access_name(block.access)
                ),
            ));
        }
    }

    fn find_errors_in_register_data(
        &self,
        errors: &mut Vec<Finding>,
        block: &AddressBlock,
        context: &str,
        outer_context: &str,
    ) {
        if block.register_data.is_empty() {
            return;
        }

        let address_unit_bits = self
            .parser
            .integer_value(&self.address_unit_bits)
            .filter(|aub| *aub > 0);
        let block_range = self.parser.integer_value(&block.range).unwrap_or(0);

        let mut register_names: Vec<&str> = Vec::new();
        let mut duplicate_registers: Vec<&str> = Vec::new();
        let mut file_names: Vec<&str> = Vec::new();
        let mut duplicate_files: Vec<&str> = Vec::new();
        let mut typed: Vec<&Register> = Vec::new();
        let mut reserve = MemoryReserve::new();

        for data in &block.register_data {
            match data {
                RegisterData::Register(register) => {
                    let name = register.name.as_str();
                    if register_names.contains(&name) {
                        if !duplicate_registers.contains(&name) {
                            errors.push(Finding::new(
                                Category::Inconsistency,
                                format!(
                                    "Name {name} of registers in addressBlock {} is not unique.",
                                    block.name
                                ),
                            ));
                            duplicate_registers.push(name);
                        }
                    } else {
                        register_names.push(name);
                    }

                    self.find_errors_in_register(errors, block, register, context, outer_context);

                    if !register.type_identifier.is_empty() {
                        match typed.iter().find(|r| r.type_identifier == register.type_identifier) {
                            Some(first)
                                if !self.registers_have_similar_definitions(first, register) =>
                            {
                                errors.push(Finding::new(
                                    Category::Inconsistency,
                                    format!(
                                        "Registers containing the same type identifiers must contain similar register definitions within {context}"
                                    ),
                                ));
                            }
                            Some(_) => {}
                            None => typed.push(register),
                        }
                    }

                    if let Some(aub) = address_unit_bits {
                        let size = self.register_size_in_lau(register, aub);
                        let begin = self
                            .parser
                            .integer_value(&register.address_offset)
                            .unwrap_or(0);
                        if size > 0 && is_present(self.parser, &register.is_present) {
                            reserve.add_span(register.name.clone(), begin, size);
                        }
                        if !span_fits(begin, size, block_range) {
                            errors.push(Finding::new(
                                Category::Inconsistency,
                                format!("Register {name} is not contained within {context}"),
                            ));
                        }
                    }
                }
                RegisterData::RegisterFile(file) => {
                    let name = file.name.as_str();
                    if file_names.contains(&name) {
                        if !duplicate_files.contains(&name) {
                            errors.push(Finding::new(
                                Category::Inconsistency,
                                format!(
                                    "Name {name} of register files in addressBlock {} is not unique.",
                                    block.name
                                ),
                            ));
                            duplicate_files.push(name);
                        }
                    } else {
                        file_names.push(name);
                    }

                    self.find_errors_in_register_file(
                        errors,
                        file,
                        block_range,
                        &mut reserve,
                        context,
                    );
                }
            }
        }

        reserve.find_errors_in_overlap(errors, "Register data", context);
    }

    fn find_errors_in_register_file(
        &self,
        errors: &mut Vec<Finding>,
        file: &RegisterFile,
        block_range: i128,
        reserve: &mut MemoryReserve,
        context: &str,
    ) {
        let begin = self.parser.integer_value(&file.address_offset).unwrap_or(0);
        let range = self.parser.integer_value(&file.range).unwrap_or(0);

        if range > 0 && is_present(self.parser, &file.is_present) {
            reserve.add_span(file.name.clone(), begin, range);
        }

        if !span_fits(begin, range, block_range) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!("Register file {} is not contained within {context}", file.name),
            ));
        }
    }
}

impl Validator<AddressBlock> for AddressBlockValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, block: &AddressBlock, context: &str) {
        let name = &block.name;
        let block_context = format!("address block {name}");

        // 1. Block expressions.
        if !has_valid_name(name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid name specified for address block {name} within {context}"),
            ));
        }
        if !self.has_valid_base_address(block) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid base address set for address block {name} within {context}"),
            ));
        }
        if !has_valid_is_present(self.parser, &block.is_present) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid isPresent set for address block {name} within {context}"),
            ));
        }
        if !self.has_valid_range(block) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid range set for address block {name} within {context}"),
            ));
        }
        if !self.has_valid_width(block) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid width set for address block {name} within {context}"),
            ));
        }

        // 2. Usage against register data.
        self.find_errors_in_usage(errors, block, context);

        // 3. Parameters.
        self.parameters
            .find_errors_in_list(errors, &block.parameters, &block_context, context);

        // 4. Register data.
        self.find_errors_in_register_data(errors, block, &block_context, context);

        // 5. Register alignment.
        if !self.has_valid_register_alignment(block) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Register misalignment set to false for address block {name} within {context}, where one or more registers are fully or partly offset outside of the address block width."
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_expr::SystemVerilogParser;

    fn block_with(registers: Vec<Register>) -> AddressBlock {
        let mut block = AddressBlock::new("regs", "0x1000", "16", "32");
        block.usage = Some(Usage::Register);
        block.register_data = registers.into_iter().map(RegisterData::Register).collect();
        block
    }

    #[test]
    fn block_expressions() {
        let parser = SystemVerilogParser::new();
        let validator = AddressBlockValidator::new(&parser, &[], Revision::Std14);
        assert!(validator.validate(&block_with(Vec::new())));

        let mut block = block_with(Vec::new());
        block.base_address = "-4".into();
        block.width = "".into();
        block.is_present = "3".into();
        assert_eq!(validator.findings(&block, "memory map map").len(), 3);
    }

    #[test]
    fn width_in_bits() {
        let parser = SystemVerilogParser::new();
        let validator = AddressBlockValidator::new(&parser, &[], Revision::Std14);
        let block = block_with(vec![Register::new("wide", "0", "64")]);
        let errors = validator.findings(&block, "memory map map");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Register wide size must not be greater than the containing addressBlock regs width \
             within memory map map"
        );
    }

    #[test]
    fn duplicate_register_reported_once() {
        let parser = SystemVerilogParser::new();
        let validator = AddressBlockValidator::new(&parser, &[], Revision::Std14);
        let block = block_with(vec![
            Register::new("r", "0", "32"),
            Register::new("r", "4", "32"),
            Register::new("r", "8", "32"),
        ]);
        let errors = validator.findings(&block, "memory map map");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn volatile_block() {
        let parser = SystemVerilogParser::new();
        let validator = AddressBlockValidator::new(&parser, &[], Revision::Std14);
        let mut register = Register::new("status", "0", "32");
        register.volatile = Some(true);
        let mut block = block_with(vec![register]);
        block.volatile = Some(false);
        assert!(!validator.validate(&block));
        block.volatile = None;
        assert!(validator.validate(&block));
    }

    #[test]
    fn type_identifiers_must_agree() {
        let parser = SystemVerilogParser::new();
        let validator = AddressBlockValidator::new(&parser, &[], Revision::Std14);
        let mut a = Register::new("a", "0", "32");
        a.type_identifier = "word".into();
        let mut b = Register::new("b", "4", "16");
        b.type_identifier = "word".into();
        assert!(!validator.validate(&block_with(vec![a, b])));
    }

    #[test]
    fn address_unit_containment() {
        let parser = SystemVerilogParser::new();
        let validator =
            AddressBlockValidator::new(&parser, &[], Revision::Std14).with_address_unit_bits("8");

        // 32-bit registers take four bytes each.
        let fits = block_with(vec![
            Register::new("a", "0", "32"),
            Register::new("b", "12", "32"),
        ]);
        assert!(validator.validate(&fits));

        let outside = block_with(vec![Register::new("a", "14", "32")]);
        let errors = validator.findings(&outside, "memory map map");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Register a is not contained within address block regs");

        let overlap = block_with(vec![
            Register::new("a", "0", "32"),
            Register::new("b", "2", "32"),
        ]);
        let errors = validator.findings(&overlap, "memory map map");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Register data a and b overlap within address block regs"
        );
    }

    #[test]
    fn offsets_near_integer_limit() {
        let parser = SystemVerilogParser::new();
        let validator =
            AddressBlockValidator::new(&parser, &[], Revision::Std14).with_address_unit_bits("8");
        let max = i128::MAX.to_string();

        let block = block_with(vec![Register::new("far", &max, "32")]);
        let errors = validator.findings(&block, "memory map map");
        assert!(errors
            .iter()
            .any(|e| e.message == "Register far is not contained within address block regs"));

        let huge = Register::new("huge", "0", &max);
        let block = block_with(vec![huge, Register::new("low", "4", "32")]);
        assert!(!validator.validate(&block));
    }

    #[test]
    fn register_alignment_under_2022() {
        let parser = SystemVerilogParser::new();
        let std22 = AddressBlockValidator::new(&parser, &[], Revision::Std22);
        let std14 = AddressBlockValidator::new(&parser, &[], Revision::Std14);

        let mut block = block_with(vec![
            Register::new("a", "0", "32"),
            Register::new("b", "40", "16"),
        ]);
        block.misalignment_allowed = "false".into();
        assert!(std22.has_valid_register_alignment(&block));
        assert!(std22.validate(&block));

        // 40 % 32 + 32 exceeds the 32-bit width.
        block.register_data = vec![RegisterData::Register(Register::new("b", "40", "32"))];
        assert!(!std22.has_valid_register_alignment(&block));
        let errors = std22.findings(&block, "memory map map");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with(
            "Register misalignment set to false for address block regs within memory map map"
        ));

        assert!(std14.has_valid_register_alignment(&block));
        block.misalignment_allowed = String::new();
        assert!(std22.has_valid_register_alignment(&block));

        block.misalignment_allowed = "false".into();
        block.width = "0".into();
        assert!(std22.has_valid_register_alignment(&block));
    }

    #[test]
    fn register_files() {
        let parser = SystemVerilogParser::new();
        let validator =
            AddressBlockValidator::new(&parser, &[], Revision::Std14).with_address_unit_bits("8");
        let mut block = block_with(vec![Register::new("a", "0", "32")]);
        block.register_data.push(RegisterData::RegisterFile(RegisterFile {
            name: "file".into(),
            address_offset: "4".into(),
            range: "8".into(),
            ..RegisterFile::default()
        }));
        assert!(validator.validate(&block));

        block.register_data.push(RegisterData::RegisterFile(RegisterFile {
            name: "file".into(),
            address_offset: "10".into(),
            range: "8".into(),
            ..RegisterFile::default()
        }));
        let errors = validator.findings(&block, "memory map map");
        assert!(errors
            .iter()
            .any(|e| e.message.contains("register files in addressBlock regs")));
        assert!(errors
            .iter()
            .any(|e| e.message == "Register file file is not contained within address block regs"));
    }
}
