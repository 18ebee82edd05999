use crate::*;

/// The ordered collection of parameters a plugin declares. The host addresses parameters by their
/// index, which is the order in which they were added.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ParameterStore {
    params: Vec<Param>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Appends *param* and returns its index.
    pub fn add(&mut self, param: Param) -> u32 {
        self.params.push(param);
        self.params.len() as u32 - 1
    }

    pub fn len(&self) -> u32 {
        self.params.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Param> {
        self.params.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        self.get(index).map(Param::get_name)
    }

    pub fn default_normalized(&self, index: u32) -> Option<f32> {
        self.get(index).map(Param::default_normalized)
    }

    pub fn default_value(&self, index: u32) -> Option<f32> {
        self.get(index).map(Param::default_value)
    }

    pub fn normalized(&self, index: u32) -> Option<f32> {
        self.get(index).map(Param::normalized)
    }

    /// Gets the current value of the parameter at *index*, mapped into its range.
    pub fn value(&self, index: u32) -> Option<f32> {
        self.get(index).map(Param::value)
    }

    /// Stores a normalized value coming from the host. Returns false if there is no parameter at
    /// *index* or the value is not a finite number.
    pub fn set_normalized(&mut self, index: u32, normalized: f32) -> bool {
        match self.params.get_mut(index as usize) {
            Some(param) => param.set_normalized(normalized),
            None => false,
        }
    }

    /// The text the host shows next to the slider of the parameter at *index*.
    pub fn display(&self, index: u32) -> Option<String> {
        self.value(index).map(|value| format!("{:.2}", value))
    }
}
