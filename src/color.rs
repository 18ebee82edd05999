use crate::*;

/// An RGBA color with normalized float components. This is the value that gets uploaded to the
/// `Color` uniform of the fragment shader.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
}

impl Color {
    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    pub fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Reads the current color from the given `ParameterStore`, using the slots described by
    /// `ColorParam`. Missing slots fall back to the default value of that slot.
    pub fn from_parameters(parameters: &ParameterStore) -> Self {
        let read = |slot: ColorParam| parameters.value(slot.index()).unwrap_or(slot.default_value());
        Self::rgba(
            read(ColorParam::Red),
            read(ColorParam::Green),
            read(ColorParam::Blue),
            read(ColorParam::Alpha),
        )
    }

    pub fn get_red(&self) -> f32 {
        self.red
    }

    pub fn get_green(&self) -> f32 {
        self.green
    }

    pub fn get_blue(&self) -> f32 {
        self.blue
    }

    pub fn get_alpha(&self) -> f32 {
        self.alpha
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

/// The four parameter slots of the solid color effect, in the order the host addresses them.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ColorParam {
    Red,
    Green,
    Blue,
    Alpha,
}

impl ColorParam {
    pub const ALL: [ColorParam; 4] = [
        ColorParam::Red,
        ColorParam::Green,
        ColorParam::Blue,
        ColorParam::Alpha,
    ];

    pub fn index(self) -> u32 {
        match self {
            ColorParam::Red => 0,
            ColorParam::Green => 1,
            ColorParam::Blue => 2,
            ColorParam::Alpha => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorParam::Red => "Red",
            ColorParam::Green => "Green",
            ColorParam::Blue => "Blue",
            ColorParam::Alpha => "Alpha",
        }
    }

    /// The slot defaults together form opaque red.
    pub fn default_value(self) -> f32 {
        match self {
            ColorParam::Red => 1.0,
            ColorParam::Green => 0.0,
            ColorParam::Blue => 0.0,
            ColorParam::Alpha => 1.0,
        }
    }

    pub fn to_param(self) -> Param {
        Param::range(self.name(), self.default_value(), ParamRange::UNIT)
    }
}
