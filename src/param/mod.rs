mod store;

pub use store::*;

/// The inclusive range of values a `Param` can take. The host always talks in normalized values
/// between 0.0 and 1.0; a `ParamRange` maps those onto the values the plugin works with.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const UNIT: ParamRange = ParamRange { min: 0.0, max: 1.0 };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }

    pub fn normalize(&self, value: f32) -> f32 {
        let width = self.max - self.min;
        if width == 0.0 {
            0.0
        } else {
            ((value - self.min) / width).max(0.0).min(1.0)
        }
    }
}

/// How the host should present a parameter. Only sliders are needed for now.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ParamType {
    Standard,
}

/// A single named parameter that the host exposes to the user.
#[derive(Clone, PartialEq, Debug)]
pub struct Param {
    name: String,
    param_type: ParamType,
    range: ParamRange,
    default: f32,
    normalized: f32,
}

impl Param {
    /// Creates a slider parameter. The *default* is expressed in the units of *range*, not as a
    /// normalized value.
    pub fn range(name: &str, default: f32, range: ParamRange) -> Self {
        let normalized = range.normalize(default);
        Self {
            name: name.to_string(),
            param_type: ParamType::Standard,
            range,
            default: normalized,
            normalized,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> ParamType {
        self.param_type
    }

    pub fn get_range(&self) -> ParamRange {
        self.range
    }

    pub fn default_normalized(&self) -> f32 {
        self.default
    }

    pub fn default_value(&self) -> f32 {
        self.range.denormalize(self.default)
    }

    pub fn normalized(&self) -> f32 {
        self.normalized
    }

    pub fn value(&self) -> f32 {
        self.range.denormalize(self.normalized)
    }

    /// Stores a new normalized value, clamped to [0.0, 1.0]. Non-finite values are rejected and
    /// leave the parameter untouched.
    pub fn set_normalized(&mut self, normalized: f32) -> bool {
        if !normalized.is_finite() {
            return false;
        }
        self.normalized = normalized.max(0.0).min(1.0);
        true
    }
}
