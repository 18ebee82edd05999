use crate::*;
use log::{debug, warn};
use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::ptr;

/// Creates the `GpuBackend` of each plug-in instance. The host only guarantees a current GPU
/// context once it asks for an instance, so backends can't be created any earlier.
pub trait BackendFactory {
    type Backend: GpuBackend;

    fn create_backend(&self) -> Result<Self::Backend, EffectError>;
}

/// Answers the host's questions about plug-in type `P` and creates instances of it. This is the
/// safe core of the binary entry point: it only deals with Rust values and leaves the raw structs
/// to `plug_main`.
///
/// The answers about parameters that don't need an instance (names, defaults and types) come from
/// a template instance that is created once, without touching the GPU.
pub struct PluginHost<P, F> {
    factory: F,
    info: PluginInfoStruct,
    extended_info: ExtendedInfo,
    parameters: ParameterStore,
    parameter_names: Vec<CString>,
    min_inputs: u32,
    max_inputs: u32,
    plugin: PhantomData<fn() -> P>,
}

impl<P, F> PluginHost<P, F>
where
    F: BackendFactory,
    P: HostPlugin<F::Backend>,
{
    pub fn new(factory: F) -> Self {
        let template = P::create();
        let parameters = template.parameters().clone();
        let parameter_names = parameters
            .iter()
            .map(|param| c_string_lossy(param.get_name()))
            .collect();
        Self {
            factory,
            info: PluginInfoStruct::new(&P::INFO),
            extended_info: ExtendedInfo::new(&P::INFO),
            parameters,
            parameter_names,
            min_inputs: template.min_inputs(),
            max_inputs: template.max_inputs(),
            plugin: PhantomData,
        }
    }

    pub fn info(&self) -> &PluginInfoStruct {
        &self.info
    }

    pub fn extended_info(&self) -> &PluginExtendedInfoStruct {
        &self.extended_info.raw
    }

    pub fn num_parameters(&self) -> u32 {
        self.parameters.len()
    }

    pub fn parameter_name(&self, index: u32) -> Option<&CStr> {
        self.parameter_names
            .get(index as usize)
            .map(|name| name.as_c_str())
    }

    /// The normalized default value of the parameter at *index*
    pub fn parameter_default(&self, index: u32) -> Option<f32> {
        self.parameters.default_normalized(index)
    }

    pub fn parameter_type(&self, index: u32) -> Option<u32> {
        self.parameters.get(index).map(|param| param.get_type().code())
    }

    pub fn plugin_caps(&self, capability: u32) -> u32 {
        match capability {
            FF_CAP_PROCESS_OPENGL | FF_CAP_SET_TIME => FF_SUPPORTED,
            FF_CAP_MINIMUM_INPUT_FRAMES => self.min_inputs,
            FF_CAP_MAXIMUM_INPUT_FRAMES => self.max_inputs,
            _ => FF_UNSUPPORTED,
        }
    }

    /// Creates a new instance and initializes it for the GPU context that is current. If the
    /// initialization fails, the instance is torn down again and dropped.
    pub fn instantiate_gl(
        &self,
        viewport: &Viewport,
    ) -> Result<Box<PluginInstance<P, F::Backend>>, EffectError> {
        let backend = self.factory.create_backend()?;
        let mut plugin = P::create();
        if let Err(error) = plugin.init_gl(&backend, viewport) {
            warn!("Couldn't initialize a {} instance: {}", P::INFO.name, error);
            plugin.deinit_gl(&backend);
            return Err(error);
        }
        debug!("Created a {} instance for {:?}", P::INFO.name, viewport);
        Ok(Box::new(PluginInstance {
            backend,
            plugin,
            display: CString::default(),
        }))
    }
}

/// A plug-in together with the backend it renders with.
pub struct PluginInstance<P, G> {
    backend: G,
    plugin: P,

    // The host reads the display text after the call returns, so it has to live somewhere
    display: CString,
}

impl<P, G> PluginInstance<P, G>
where
    G: GpuBackend,
    P: HostPlugin<G>,
{
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    pub fn backend(&self) -> &G {
        &self.backend
    }

    pub fn process_gl(&mut self, frame: &FrameContext) -> Result<(), EffectError> {
        self.plugin.process_gl(&self.backend, frame)
    }

    /// The normalized value of the parameter at *index*
    pub fn parameter(&self, index: u32) -> Option<f32> {
        self.plugin.parameters().normalized(index)
    }

    pub fn set_parameter(&mut self, index: u32, value: f32) -> bool {
        self.plugin.parameters_mut().set_normalized(index, value)
    }

    pub fn parameter_display(&mut self, index: u32) -> Option<&CStr> {
        let text = self.plugin.parameters().display(index)?;
        self.display = c_string_lossy(&text);
        Some(self.display.as_c_str())
    }

    /// Whether the input at *index* is in use, or `None` if the plug-in has no such input
    pub fn input_status(&self, index: u32) -> Option<u32> {
        if index < self.plugin.max_inputs() {
            Some(FF_INPUT_IN_USE)
        } else {
            None
        }
    }

    pub fn set_time(&mut self, time: f64) {
        self.plugin.set_time(time);
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        self.plugin.resize(viewport);
    }

    /// Releases the GPU resources of the plug-in and drops it.
    pub fn deinstantiate_gl(mut self: Box<Self>) {
        self.plugin.deinit_gl(&self.backend);
        debug!("Destroyed a {} instance", P::INFO.name);
    }
}

/// The extended info block, together with the strings it points to.
struct ExtendedInfo {
    raw: PluginExtendedInfoStruct,
    _description: CString,
    _about: CString,
}

impl ExtendedInfo {
    fn new(info: &PluginInfo) -> Self {
        let description = c_string_lossy(info.description);
        let about = c_string_lossy(info.about);
        Self {
            raw: PluginExtendedInfoStruct {
                plugin_major_version: info.plugin_major_version,
                plugin_minor_version: info.plugin_minor_version,
                // The heap buffers of the strings don't move when `Self` is moved
                description: description.as_ptr(),
                about: about.as_ptr(),
                extended_data_size: 0,
                extended_data_block: ptr::null(),
            },
            _description: description,
            _about: about,
        }
    }
}

// SAFETY: the raw pointers only point into the immutable strings owned by the same struct
unsafe impl Send for ExtendedInfo {}
unsafe impl Sync for ExtendedInfo {}

/// Converts *text* to a `CString`, dropping interior nul bytes instead of failing.
fn c_string_lossy(text: &str) -> CString {
    let bytes: Vec<u8> = text.bytes().filter(|byte| *byte != 0).collect();
    CString::new(bytes).unwrap_or_default()
}
