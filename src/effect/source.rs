use crate::*;

/// The behavior all generator plug-ins share: they take no inputs, and they draw with a full-screen
/// quad whose lifetime follows the GPU lifecycle of the plug-in. Plug-ins embed a `SourceBase` and
/// call its `init_gl` and `deinit_gl` from their own.
#[derive(Debug)]
pub struct SourceBase<G: GpuBackend> {
    quad: Option<G::Quad>,
    viewport: Option<Viewport>,
    host_time: f64,
}

impl<G: GpuBackend> SourceBase<G> {
    pub fn new() -> Self {
        Self {
            quad: None,
            viewport: None,
            host_time: 0.0,
        }
    }

    pub fn min_inputs(&self) -> u32 {
        0
    }

    pub fn max_inputs(&self) -> u32 {
        0
    }

    /// Creates the quad geometry. A quad from an earlier call is released first.
    pub fn init_gl(&mut self, gpu: &G, viewport: &Viewport) -> Result<(), EffectError> {
        self.deinit_gl(gpu);
        self.quad = Some(gpu.create_quad()?);
        self.viewport = Some(*viewport);
        Ok(())
    }

    /// Releases the quad geometry, if there is any.
    pub fn deinit_gl(&mut self, gpu: &G) {
        if let Some(quad) = self.quad.take() {
            gpu.delete_quad(quad);
        }
        self.viewport = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.quad.is_some()
    }

    /// Draws the quad with whatever program is currently bound.
    pub fn draw_quad(&self, gpu: &G) -> Result<(), EffectError> {
        match &self.quad {
            Some(quad) => {
                gpu.draw_quad(quad);
                Ok(())
            }
            None => Err(EffectError::NotInitialized),
        }
    }

    pub fn get_viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Remembers the new viewport. Nothing happens if the GPU resources aren't initialized.
    pub fn resize(&mut self, viewport: &Viewport) {
        if self.viewport.is_some() {
            self.viewport = Some(*viewport);
        }
    }

    pub fn get_host_time(&self) -> f64 {
        self.host_time
    }

    pub fn set_time(&mut self, time: f64) {
        self.host_time = time;
    }
}

impl<G: GpuBackend> Default for SourceBase<G> {
    fn default() -> Self {
        Self::new()
    }
}
