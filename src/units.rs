//! Unit conversion between the application's native units (millimetres,
//! newtons) and the output unit systems. Conversions are fixed multiplicative
//! factors; any finite value is valid input.

/// Native length unit (mm) to feet.
pub const MM_TO_FT: f64 = 0.00328084;

/// Native force unit (N) to kip.
pub const N_TO_KIP: f64 = 0.00022480894387096;

/// Native length unit (mm) to inches, used for nodal deflections.
pub const MM_TO_IN: f64 = 0.0393701;

/// Multiplicative converter for the three physical kinds the extraction
/// emits. The moment factor is always the product of the other two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    length_factor: f64,
    force_factor: f64,
}

impl UnitConverter {
    pub fn new(length_factor: f64, force_factor: f64) -> Self {
        Self {
            length_factor,
            force_factor,
        }
    }

    /// Identity converter: values pass through in native units. The workbook
    /// target writes raw solver values.
    pub fn native() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Kip/feet system used by the member-forces CSV target.
    pub fn kip_feet() -> Self {
        Self::new(MM_TO_FT, N_TO_KIP)
    }

    pub fn length(&self, value: f64) -> f64 {
        value * self.length_factor
    }

    pub fn force(&self, value: f64) -> f64 {
        value * self.force_factor
    }

    pub fn moment(&self, value: f64) -> f64 {
        value * self.force_factor * self.length_factor
    }

    pub fn length_factor(&self) -> f64 {
        self.length_factor
    }

    pub fn force_factor(&self) -> f64 {
        self.force_factor
    }
}
