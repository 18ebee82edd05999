use crate::*;
use std::fmt::{Debug, Display, Formatter};

mod shader;
#[cfg(feature = "gl_rendering")]
mod glow_backend;
#[cfg(feature = "gl_rendering")]
mod loader;
#[cfg(test)]
mod recording;

pub use shader::*;
#[cfg(feature = "gl_rendering")]
pub use glow_backend::*;
#[cfg(feature = "gl_rendering")]
pub use loader::*;
#[cfg(test)]
pub(crate) use recording::*;

/// The GPU operations an effect needs from its environment: compiling shader programs, looking up
/// their uniforms, managing the shader binding, and drawing the full-screen quad.
///
/// All methods expect the GPU context of the host to be current on the calling thread. The host
/// drives every plug-in call from that thread, so none of these methods need to be thread-safe.
///
/// With the `gl_rendering` feature, `GlowBackend` implements this trait on top of OpenGL.
pub trait GpuBackend {
    /// An opaque handle to a linked shader program.
    type Program: Copy + Eq + Debug;
    /// Where a uniform lives within a linked program.
    type UniformLocation: Clone + Debug;
    /// The vertex state of a full-screen quad.
    type Quad: Debug;

    /// Compiles both stages and links them into a single program. Nothing is retained when this
    /// fails.
    fn compile_program(&self, vertex: &str, fragment: &str) -> Result<Self::Program, EffectError>;

    /// Looks up the location of the uniform with the given *name*, or `None` if the linked
    /// program doesn't have such a uniform.
    fn find_uniform(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;

    fn delete_program(&self, program: Self::Program);

    /// The program that is currently bound, if any. It doesn't need to be created by this
    /// backend: the host and sibling plug-ins share the binding state.
    fn bound_program(&self) -> Option<Self::Program>;

    fn bind_program(&self, program: Option<Self::Program>);

    /// Uploads a vec4 to the given location of the currently bound program.
    fn set_uniform_vec4(&self, location: &Self::UniformLocation, value: [f32; 4]);

    /// Creates a quad that covers the entire render target. Vertices carry a vec4 position at
    /// attribute location 0 and a vec2 UV at attribute location 1.
    fn create_quad(&self) -> Result<Self::Quad, EffectError>;

    /// Draws the quad with the currently bound program.
    fn draw_quad(&self, quad: &Self::Quad);

    fn delete_quad(&self, quad: Self::Quad);
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl Display for ShaderStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(formatter, "vertex"),
            ShaderStage::Fragment => write!(formatter, "fragment"),
        }
    }
}
