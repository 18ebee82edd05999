use crate::*;
use log::{debug, trace, warn};

mod shaders;
mod source;

pub use shaders::*;
pub use source::*;

pub const SOLID_COLOR_INFO: PluginInfo = PluginInfo {
    unique_id: *b"SLDC",
    name: "Solid Color",
    api_major_version: 2,
    api_minor_version: 1,
    plugin_major_version: 1,
    plugin_minor_version: 0,
    kind: PluginKind::Source,
    description: "Generates a solid color",
    about: "Solid Color generator",
};

/// A generator that fills the entire render target with a single color. The color is controlled
/// by the four parameters "Red", "Green", "Blue" and "Alpha" (see `ColorParam`), which default to
/// opaque red.
///
/// ## GPU resources
/// `init_gl` compiles the shader program, looks up its `Color` uniform and creates the quad. When
/// any of this fails, everything that was created so far is released again, so the effect is
/// either fully initialized or holds nothing at all. `deinit_gl` releases everything and can be
/// called at any moment, any number of times.
///
/// ## Rendering
/// Every `process_gl` call reads the current parameter values, binds the program for the duration
/// of the call, uploads the color and draws the quad once. The program that was bound before the
/// call is bound again afterwards.
pub struct SolidColorEffect<G: GpuBackend> {
    base: SourceBase<G>,
    shader: Shader<G>,
    // Only Some while `shader` holds a linked program
    color_location: Option<G::UniformLocation>,
    color: Color,
    parameters: ParameterStore,
}

impl<G: GpuBackend> SolidColorEffect<G> {
    pub fn new() -> Self {
        let mut parameters = ParameterStore::new();
        for slot in ColorParam::ALL.iter() {
            parameters.add(slot.to_param());
        }
        Self {
            base: SourceBase::new(),
            shader: Shader::new(),
            color_location: None,
            color: Color::from_parameters(&parameters),
            parameters,
        }
    }

    /// The color that was used during the last `process_gl` call (or the default color if
    /// `process_gl` hasn't been called yet).
    pub fn get_color(&self) -> Color {
        self.color
    }

    pub fn is_initialized(&self) -> bool {
        self.color_location.is_some()
    }

    pub fn get_base(&self) -> &SourceBase<G> {
        &self.base
    }

    fn try_init_gl(&mut self, gpu: &G, viewport: &Viewport) -> Result<(), EffectError> {
        self.color_location = None;
        self.shader.compile(gpu, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let location = self
            .shader
            .find_uniform(gpu, COLOR_UNIFORM)
            .ok_or_else(|| EffectError::UniformNotFound(COLOR_UNIFORM.to_string()))?;
        self.color_location = Some(location);
        self.base.init_gl(gpu, viewport)
    }
}

impl<G: GpuBackend> Default for SolidColorEffect<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GpuBackend> HostPlugin<G> for SolidColorEffect<G> {
    const INFO: PluginInfo = SOLID_COLOR_INFO;

    fn create() -> Self {
        Self::new()
    }

    fn min_inputs(&self) -> u32 {
        self.base.min_inputs()
    }

    fn max_inputs(&self) -> u32 {
        self.base.max_inputs()
    }

    fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    fn init_gl(&mut self, gpu: &G, viewport: &Viewport) -> Result<(), EffectError> {
        match self.try_init_gl(gpu, viewport) {
            Ok(()) => {
                debug!("Initialized the solid color effect for {:?}", viewport);
                Ok(())
            }
            Err(error) => {
                warn!("Failed to initialize the solid color effect: {}", error);
                self.deinit_gl(gpu);
                Err(error)
            }
        }
    }

    fn process_gl(&mut self, gpu: &G, _frame: &FrameContext) -> Result<(), EffectError> {
        self.color = Color::from_parameters(&self.parameters);

        let (program, location) = match (self.shader.program(), &self.color_location) {
            (Some(program), Some(location)) => (program, location),
            _ => return Err(EffectError::NotInitialized),
        };

        let _binding = ScopedShaderBinding::new(gpu, program);
        gpu.set_uniform_vec4(location, self.color.to_array());
        trace!("Drawing solid color {:?}", self.color);
        self.base.draw_quad(gpu)
    }

    fn deinit_gl(&mut self, gpu: &G) {
        self.shader.free_gl_resources(gpu);
        self.color_location = None;
        self.base.deinit_gl(gpu);
    }

    fn set_time(&mut self, time: f64) {
        self.base.set_time(time);
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.base.resize(viewport);
    }
}

impl<G: GpuBackend> Drop for SolidColorEffect<G> {
    fn drop(&mut self) {
        // Releasing requires the GPU context, which isn't available here
        if self.shader.is_compiled() || self.base.is_initialized() {
            warn!("A solid color effect was dropped without calling deinit_gl; its GPU resources leak");
        }
    }
}
