//! Port map validation: one logical port (or part of it) bound to a physical port or tie off.

use ipxact_core::abstraction::{AbstractionDefinition, ModePort, PortAbstraction};
use ipxact_core::component::{BitRange, LogicalPortRef, PhysicalPortRef, Port, PortMap, PortSignal};
use ipxact_core::types::{Direction, Initiative, InterfaceMode};
use ipxact_expr::ExpressionParser;

use crate::common::has_valid_is_present;
use crate::finding::{Category, Finding};
use crate::Validator;

/// Size of the inclusive range between two bounds, `None` on overflow.
fn range_size(left: i128, right: i128) -> Option<i128> {
    left.checked_sub(right)?.checked_abs()?.checked_add(1)
}

/// Validates port maps of one abstraction type of a bus interface.
///
/// Logical ports are looked up in `definition` using the interface `mode` and
/// `system_group`; physical ports come from the component's `ports`.
pub struct PortMapValidator<'a> {
    parser: &'a dyn ExpressionParser,
    definition: Option<&'a AbstractionDefinition>,
    mode: InterfaceMode,
    system_group: &'a str,
    ports: &'a [Port],
}

impl<'a> PortMapValidator<'a> {
    pub fn new(
        parser: &'a dyn ExpressionParser,
        definition: Option<&'a AbstractionDefinition>,
        mode: InterfaceMode,
        system_group: &'a str,
        ports: &'a [Port],
    ) -> Self {
        Self {
            parser,
            definition,
            mode,
            system_group,
            ports,
        }
    }

    pub fn logical_port(&self, name: &str) -> Option<&'a PortAbstraction> {
        self.definition?.logical_port(name)
    }

    pub fn physical_port(&self, name: &str) -> Option<&'a Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    fn bound(&self, expression: &str) -> Option<i128> {
        self.parser.unsigned_value(expression).map(i128::from)
    }

    /// Both bounds of a range when each evaluates to an unsigned integer.
    pub fn evaluated_range(&self, range: &BitRange) -> Option<(i128, i128)> {
        Some((self.bound(&range.left)?, self.bound(&range.right)?))
    }

    /// Logical width in the interface mode, `None` when unset or not evaluating.
    fn logical_width(&self, port: &PortAbstraction) -> Option<i128> {
        let mode_port = port.port_for_mode(self.mode, self.system_group)?;
        self.parser.integer_value(mode_port.width())
    }

    /// Width of a physical port: wire bounds, or transactional bus width.
    fn physical_width(&self, port: &Port) -> Option<i128> {
        match &port.signal {
            PortSignal::Wire(wire) => {
                let left = self.bound_or_zero(&wire.left)?;
                let right = self.bound_or_zero(&wire.right)?;
                range_size(left, right)
            }
            PortSignal::Transactional(t) => self.parser.integer_value(&t.bus_width),
        }
    }

    /// Unset bounds of a scalar port are zero.
    fn bound_or_zero(&self, expression: &str) -> Option<i128> {
        if expression.trim().is_empty() {
            Some(0)
        } else {
            self.bound(expression)
        }
    }

    fn range_is_within_width(left: i128, right: i128, width: i128) -> bool {
        (0..width).contains(&left) && (0..width).contains(&right)
    }

    fn range_is_valid_in_port(&self, left: i128, right: i128, port: &Port) -> bool {
        match &port.signal {
            PortSignal::Wire(wire) => {
                let (Some(a), Some(b)) = (
                    self.bound_or_zero(&wire.left),
                    self.bound_or_zero(&wire.right),
                ) else {
                    return false;
                };
                let (low, high) = if a > b { (b, a) } else { (a, b) };
                (low..=high).contains(&left) && (low..=high).contains(&right)
            }
            PortSignal::Transactional(t) => self
                .parser
                .integer_value(&t.bus_width)
                .is_some_and(|width| Self::range_is_within_width(left, right, width)),
        }
    }

    /// Logical direction seen by a physical port of the interface.
    fn logical_direction(&self, port: &PortAbstraction) -> Option<Direction> {
        let ModePort::Wire(wire) = port.port_for_mode(self.mode, self.system_group)? else {
            return None;
        };
        let direction = wire.direction?;
        Some(if self.mode.is_mirrored() {
            direction.mirrored()
        } else {
            direction
        })
    }

    fn logical_initiative(&self, port: &PortAbstraction) -> Option<Initiative> {
        let ModePort::Transactional(t) = port.port_for_mode(self.mode, self.system_group)? else {
            return None;
        };
        let initiative = Initiative::parse(&t.initiative)?;
        Some(if self.mode.is_mirrored() {
            initiative.mirrored()
        } else {
            initiative
        })
    }

    pub fn has_valid_directions(&self, logical: &PortAbstraction, physical: &Port) -> bool {
        let Some(wire) = physical.as_wire() else {
            return true;
        };
        if logical.wire.is_none() || wire.all_logical_directions_allowed {
            return true;
        }
        let Some(direction) = self.logical_direction(logical) else {
            return true;
        };
        !matches!(
            (direction, wire.direction),
            (Direction::In, Direction::Out)
                | (Direction::Out, Direction::In)
                | (Direction::Inout, Direction::In | Direction::Out)
        )
    }

    pub fn has_valid_initiatives(&self, logical: &PortAbstraction, physical: &Port) -> bool {
        let Some(transactional) = physical.as_transactional() else {
            return true;
        };
        if logical.transactional.is_none() || transactional.all_logical_initiatives_allowed {
            return true;
        }
        let Some(physical_initiative) = Initiative::parse(&transactional.initiative) else {
            return false;
        };
        let Some(initiative) = self.logical_initiative(logical) else {
            return true;
        };
        !matches!(
            (initiative, physical_initiative),
            (Initiative::Requires, Initiative::Provides)
                | (Initiative::Provides, Initiative::Requires)
                | (Initiative::Both, Initiative::Requires | Initiative::Provides)
        )
    }

    /// Connected bit counts agree; a side without an explicit range counts its full width.
    pub fn has_same_range_size(
        &self,
        logical: &LogicalPortRef,
        logical_port: &PortAbstraction,
        physical: &PhysicalPortRef,
        physical_port: &Port,
    ) -> bool {
        let logical_size = match &logical.range {
            Some(range) => self.evaluated_range(range).and_then(|(l, r)| range_size(l, r)),
            None => self.logical_width(logical_port),
        };
        let physical_size = match &physical.part_select {
            Some(range) => self.evaluated_range(range).and_then(|(l, r)| range_size(l, r)),
            None => self.physical_width(physical_port),
        };
        match (logical_size, physical_size) {
            (Some(l), Some(p)) => l == p,
            _ => true,
        }
    }

    fn find_errors_in_logical_port(
        &self,
        errors: &mut Vec<Finding>,
        logical: Option<&LogicalPortRef>,
        context: &str,
    ) -> Option<&'a PortAbstraction> {
        let Some(logical) = logical.filter(|l| !l.name.is_empty()) else {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Port map does not contain a logical port within {context}"),
            ));
            return None;
        };
        let name = &logical.name;

        let Some(referenced) = self.logical_port(name) else {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!("Could not locate logical port {name} mapped within {context}"),
            ));
            return None;
        };

        if let Some(range) = &logical.range {
            self.find_errors_in_range(errors, range, "logical", name, context, |left, right| {
                self.logical_width(referenced)
                    .map_or(true, |width| Self::range_is_within_width(left, right, width))
            });
        }

        Some(referenced)
    }

    fn find_errors_in_physical_port(
        &self,
        errors: &mut Vec<Finding>,
        physical: &PhysicalPortRef,
        context: &str,
    ) -> Option<&'a Port> {
        let name = &physical.name;
        let Some(referenced) = self.physical_port(name) else {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!("Could not locate physical port {name} mapped within {context}"),
            ));
            return None;
        };

        if let Some(range) = &physical.part_select {
            self.find_errors_in_range(errors, range, "physical", name, context, |left, right| {
                self.range_is_valid_in_port(left, right, referenced)
            });
        }

        Some(referenced)
    }

    /// Shared checks of a logical range or physical part select.
    fn find_errors_in_range(
        &self,
        errors: &mut Vec<Finding>,
        range: &BitRange,
        side: &str,
        name: &str,
        context: &str,
        within: impl Fn(i128, i128) -> bool,
    ) {
        let left_empty = range.left.trim().is_empty();
        let right_empty = range.right.trim().is_empty();
        if left_empty || right_empty {
            if left_empty {
                errors.push(Finding::new(
                    Category::MissingElement,
                    format!("Empty left value in {side} port {name} mapped within {context}"),
                ));
            }
            if right_empty {
                errors.push(Finding::new(
                    Category::MissingElement,
                    format!("Empty right value in {side} port {name} mapped within {context}"),
                ));
            }
            return;
        }

        let left = self.bound(&range.left);
        let right = self.bound(&range.right);
        if left.is_none() {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid value given for {side} left in {side} port {name} mapped within {context}"),
            ));
        }
        if right.is_none() {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid value given for {side} right in {side} port {name} mapped within {context}"),
            ));
        }
        if let (Some(left), Some(right)) = (left, right) {
            if !within(left, right) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!("Range is not within the referenced port width in mapped {side} port {name} in {context}"),
                ));
            }
        }
    }

    fn find_errors_in_connection(
        &self,
        errors: &mut Vec<Finding>,
        port_map: &PortMap,
        logical: &PortAbstraction,
        physical: &Port,
        context: &str,
    ) {
        let logical_name = &logical.logical_name;
        let physical_name = &physical.name;

        let same_type = (logical.wire.is_some() && physical.as_wire().is_some())
            || (logical.transactional.is_some() && physical.as_transactional().is_some());
        if !same_type {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Connected logical port {logical_name} and physical port {physical_name} do not have the same port type within {context}"
                ),
            ));
            return;
        }

        if !self.has_valid_directions(logical, physical) {
            let logical_direction = self
                .logical_direction(logical)
                .map(Direction::as_str)
                .unwrap_or("");
            let physical_direction = physical.as_wire().map(|w| w.direction.as_str()).unwrap_or("");
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Invalid connection made between logical port '{logical_name}' with direction '{logical_direction}' and physical port '{physical_name}' with direction '{physical_direction}' within {context}"
                ),
            ));
        }

        if !self.has_valid_initiatives(logical, physical) {
            let logical_initiative = self
                .logical_initiative(logical)
                .map(Initiative::as_str)
                .unwrap_or("");
            let physical_initiative = physical
                .as_transactional()
                .map(|t| t.initiative.as_str())
                .unwrap_or("");
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Invalid connection made between logical port '{logical_name}' with initiative '{logical_initiative}' and physical port '{physical_name}' with initiative '{physical_initiative}' within {context}"
                ),
            ));
        }

        if let (Some(logical_ref), Some(physical_ref)) =
            (&port_map.logical_port, &port_map.physical_port)
        {
            if !self.has_same_range_size(logical_ref, logical, physical_ref, physical) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Connected logical port {logical_name} and physical port {physical_name} do not have the same range size within {context}"
                    ),
                ));
            }
        }
    }
}

impl Validator<PortMap> for PortMapValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, port_map: &PortMap, context: &str) {
        // 1. Presence.
        if !has_valid_is_present(self.parser, &port_map.is_present) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid isPresent set for port map within {context}"),
            ));
        }

        // 2. Logical side.
        let logical =
            self.find_errors_in_logical_port(errors, port_map.logical_port.as_ref(), context);

        // 3. Physical port XOR tie off.
        let tie_off = port_map.logical_tie_off.trim();
        match &port_map.physical_port {
            Some(_) if !tie_off.is_empty() => errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Invalid port map: contains both a physical port and a tie off value within {context}"),
            )),
            _ if !tie_off.is_empty() => {
                if self.parser.unsigned_value(tie_off).is_none() {
                    errors.push(Finding::new(
                        Category::InvalidExpression,
                        format!("Invalid port map logical tie off set within {context}"),
                    ));
                }
            }
            Some(physical) if !physical.name.is_empty() => {
                let referenced = self.find_errors_in_physical_port(errors, physical, context);
                // 4. Connection between the two.
                if let (Some(logical), Some(physical)) = (logical, referenced) {
                    self.find_errors_in_connection(errors, port_map, logical, physical, context);
                }
            }
            _ => errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Port map does not contain a physical port or a logical tie off within {context}"),
            )),
        }
    }
}
