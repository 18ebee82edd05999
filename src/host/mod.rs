use crate::*;

mod abi;
mod dispatch;
mod entry;

pub use abi::*;
pub use dispatch::*;
pub use entry::*;

/// The area of the render target the host wants a plug-in to draw on, in pixels.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn with_size(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A texture the host passes to a plug-in as one of its inputs.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct InputTexture {
    pub width: u32,
    pub height: u32,
    pub hardware_width: u32,
    pub hardware_height: u32,
    pub handle: u32,
}

/// Everything the host tells a plug-in about the frame it should render. The framebuffer object
/// the host bound for the plug-in is `host_fbo`; plug-ins that bind their own framebuffers must
/// bind this one again before they return.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct FrameContext {
    pub input_textures: Vec<InputTexture>,
    pub host_fbo: u32,
}

/// The role a plug-in plays in the host's processing chain.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PluginKind {
    /// Transforms a single input
    Effect,
    /// Generates frames without any inputs
    Source,
    /// Combines multiple inputs
    Mixer,
}

impl PluginKind {
    pub fn code(self) -> u32 {
        match self {
            PluginKind::Effect => FF_EFFECT,
            PluginKind::Source => FF_SOURCE,
            PluginKind::Mixer => FF_MIXER,
        }
    }
}

/// The descriptor block through which a host identifies a plug-in before it creates any instance
/// of it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PluginInfo {
    /// Must be unique among all plug-ins a host could load
    pub unique_id: [u8; 4],
    pub name: &'static str,
    pub api_major_version: u32,
    pub api_minor_version: u32,
    pub plugin_major_version: u32,
    pub plugin_minor_version: u32,
    pub kind: PluginKind,
    pub description: &'static str,
    pub about: &'static str,
}

/// The lifecycle a host drives a plug-in through:
///
/// `create` → `init_gl` → `process_gl`* → `deinit_gl` → drop
///
/// The host makes all calls sequentially, from the thread on which its GPU context is current.
/// `init_gl` may fail; the host may then call `deinit_gl` anyway, and it may also call `deinit_gl`
/// more than once. `process_gl` is only called between a successful `init_gl` and the next
/// `deinit_gl`.
///
/// Implementations shouldn't touch the GPU in `create`, because the host might not have a GPU
/// context at that point.
pub trait HostPlugin<G: GpuBackend> {
    const INFO: PluginInfo;

    fn create() -> Self
    where
        Self: Sized;

    fn min_inputs(&self) -> u32;

    fn max_inputs(&self) -> u32;

    fn parameters(&self) -> &ParameterStore;

    fn parameters_mut(&mut self) -> &mut ParameterStore;

    fn init_gl(&mut self, gpu: &G, viewport: &Viewport) -> Result<(), EffectError>;

    fn process_gl(&mut self, gpu: &G, frame: &FrameContext) -> Result<(), EffectError>;

    /// Releases all GPU resources of this plug-in. This must be safe to call at any moment.
    fn deinit_gl(&mut self, gpu: &G);

    /// Tells the plug-in the host time, in seconds.
    fn set_time(&mut self, _time: f64) {}

    fn resize(&mut self, _viewport: &Viewport) {}
}
