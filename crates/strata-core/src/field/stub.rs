//! Deterministic field generators for tests and controlled runs.

use std::cell::{Cell, RefCell};

use super::{Field, FieldSimulator, FieldSpec, SimulationError};

/// Returns a field with every cell set to `value`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstantFieldSimulator {
    pub value: f64,
}

impl ConstantFieldSimulator {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl FieldSimulator for ConstantFieldSimulator {
    fn simulate(&self, spec: &FieldSpec) -> Result<Field, SimulationError> {
        spec.validate()?;
        Ok(Field::filled(spec.width, spec.height, self.value, spec.label.clone()))
    }
}

/// Replays fixed lateral profiles, one per call, and records every request.
///
/// Each profile becomes every row of the returned field. Fails once the
/// profiles run out.
#[derive(Debug, Default)]
pub struct ProfileFieldSimulator {
    profiles: Vec<Vec<f64>>,
    next: Cell<usize>,
    requests: RefCell<Vec<FieldSpec>>,
}

impl ProfileFieldSimulator {
    pub fn new(profiles: Vec<Vec<f64>>) -> Self {
        Self { profiles, next: Cell::new(0), requests: RefCell::new(Vec::new()) }
    }

    /// Number of realizations requested so far.
    pub fn calls(&self) -> usize {
        self.next.get()
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<FieldSpec> {
        self.requests.borrow().clone()
    }
}

impl FieldSimulator for ProfileFieldSimulator {
    fn simulate(&self, spec: &FieldSpec) -> Result<Field, SimulationError> {
        let call = self.next.get();
        self.next.set(call + 1);
        self.requests.borrow_mut().push(spec.clone());

        let profile = self.profiles.get(call).ok_or(SimulationError::Exhausted(call))?;
        if profile.len() != spec.width {
            return Err(SimulationError::ShapeMismatch {
                expected_width: spec.width,
                expected_height: spec.height,
                width: profile.len(),
                height: spec.height,
            });
        }
        let values = profile.iter().copied().cycle().take(spec.width * spec.height).collect();
        Ok(Field { width: spec.width, height: spec.height, values, label: spec.label.clone() })
    }
}
