use crate::*;
use glow::HasContext;
use log::debug;
use std::ffi::c_void;
use std::num::NonZeroU32;

/// Interleaved vertex data of the full-screen quad: a vec4 position followed by a vec2 UV
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 24] = [
    -1.0, -1.0, 0.0, 1.0,    0.0, 0.0,
     1.0, -1.0, 0.0, 1.0,    1.0, 0.0,
     1.0,  1.0, 0.0, 1.0,    1.0, 1.0,
    -1.0,  1.0, 0.0, 1.0,    0.0, 1.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;
const VERTEX_STRIDE: i32 = 6 * FLOAT_SIZE;

const POSITION_LOCATION: u32 = 0;
const UV_LOCATION: u32 = 1;

/// A `GpuBackend` that talks to OpenGL through `glow`. It expects the GL context of the host to
/// be current whenever one of its methods is called.
pub struct GlowBackend {
    gl: glow::Context,

    // The function pointers of `gl` point into this library
    _library: Option<GlLibrary>,
}

impl GlowBackend {
    /// Opens the system OpenGL library and resolves all functions from it. This is what a plug-in
    /// instance uses, since the host owns the context.
    pub fn load() -> Result<Self, EffectError> {
        let library = GlLibrary::open().map_err(|error| EffectError::ResourceAllocation {
            resource: "OpenGL function table",
            reason: error.to_string(),
        })?;
        // SAFETY: the returned pointers are OpenGL functions of the library that is kept alive
        // together with the context.
        let gl = unsafe {
            glow::Context::from_loader_function(|name| library.get_proc_address(name))
        };
        Ok(Self {
            gl,
            _library: Some(library),
        })
    }

    /// Creates a `GlowBackend` that resolves its functions with the given loader, for instance
    /// the `get_proc_address` of a windowing library that created the context itself.
    ///
    /// # Safety
    /// The loader must return valid OpenGL function pointers (or null) for the context that will
    /// be current while this backend is used.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        Self {
            gl: glow::Context::from_loader_function(loader),
            _library: None,
        }
    }

    /// Gets the underlying `glow` context, for work that this backend doesn't cover (like setting
    /// the viewport in the preview provider).
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<glow::NativeShader, EffectError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.gl.create_shader(shader_type).map_err(|reason| {
                EffectError::ResourceAllocation {
                    resource: "shader object",
                    reason,
                }
            })?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                Err(EffectError::ShaderCompilation { stage, log })
            }
        }
    }

    fn create_buffer(&self, target: u32, data: &[u8]) -> Result<glow::NativeBuffer, EffectError> {
        unsafe {
            let buffer = self.gl.create_buffer().map_err(|reason| {
                EffectError::ResourceAllocation {
                    resource: "quad buffer",
                    reason,
                }
            })?;
            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            Ok(buffer)
        }
    }
}

impl GpuBackend for GlowBackend {
    type Program = glow::NativeProgram;
    type UniformLocation = glow::NativeUniformLocation;
    type Quad = GlowQuad;

    fn compile_program(&self, vertex: &str, fragment: &str) -> Result<Self::Program, EffectError> {
        let vertex_shader = self.compile_stage(ShaderStage::Vertex, vertex)?;
        let fragment_shader = match self.compile_stage(ShaderStage::Fragment, fragment) {
            Ok(shader) => shader,
            Err(error) => {
                unsafe { self.gl.delete_shader(vertex_shader) };
                return Err(error);
            }
        };

        unsafe {
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(reason) => {
                    self.gl.delete_shader(vertex_shader);
                    self.gl.delete_shader(fragment_shader);
                    return Err(EffectError::ResourceAllocation {
                        resource: "shader program",
                        reason,
                    });
                }
            };

            self.gl.attach_shader(program, vertex_shader);
            self.gl.attach_shader(program, fragment_shader);
            self.gl.link_program(program);

            // The stages are no longer needed once the program is linked (or failed to link)
            self.gl.detach_shader(program, vertex_shader);
            self.gl.detach_shader(program, fragment_shader);
            self.gl.delete_shader(vertex_shader);
            self.gl.delete_shader(fragment_shader);

            if self.gl.get_program_link_status(program) {
                debug!("Linked shader program {:?}", program);
                Ok(program)
            } else {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                Err(EffectError::ProgramLinking(log))
            }
        }
    }

    fn find_uniform(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) };
    }

    fn bound_program(&self) -> Option<Self::Program> {
        let id = unsafe { self.gl.get_parameter_i32(glow::CURRENT_PROGRAM) };
        NonZeroU32::new(id as u32).map(glow::NativeProgram)
    }

    fn bind_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) };
    }

    fn set_uniform_vec4(&self, location: &Self::UniformLocation, value: [f32; 4]) {
        let [x, y, z, w] = value;
        unsafe { self.gl.uniform_4_f32(Some(location), x, y, z, w) };
    }

    fn create_quad(&self) -> Result<Self::Quad, EffectError> {
        unsafe {
            let vertex_array = self.gl.create_vertex_array().map_err(|reason| {
                EffectError::ResourceAllocation {
                    resource: "quad vertex array",
                    reason,
                }
            })?;
            self.gl.bind_vertex_array(Some(vertex_array));

            let vertices = match self.create_buffer(glow::ARRAY_BUFFER, bytemuck::cast_slice(&QUAD_VERTICES)) {
                Ok(buffer) => buffer,
                Err(error) => {
                    self.gl.bind_vertex_array(None);
                    self.gl.delete_vertex_array(vertex_array);
                    return Err(error);
                }
            };
            self.gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 4, glow::FLOAT, false, VERTEX_STRIDE, 0);
            self.gl.enable_vertex_attrib_array(POSITION_LOCATION);
            self.gl.vertex_attrib_pointer_f32(UV_LOCATION, 2, glow::FLOAT, false, VERTEX_STRIDE, 4 * FLOAT_SIZE);
            self.gl.enable_vertex_attrib_array(UV_LOCATION);

            // The element buffer binding is part of the vertex array state
            let indices = match self.create_buffer(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(&QUAD_INDICES)) {
                Ok(buffer) => buffer,
                Err(error) => {
                    self.gl.bind_vertex_array(None);
                    self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
                    self.gl.delete_buffer(vertices);
                    self.gl.delete_vertex_array(vertex_array);
                    return Err(error);
                }
            };

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(GlowQuad {
                vertex_array,
                vertices,
                indices,
            })
        }
    }

    fn draw_quad(&self, quad: &Self::Quad) {
        unsafe {
            self.gl.bind_vertex_array(Some(quad.vertex_array));
            self.gl.draw_elements(glow::TRIANGLES, QUAD_INDICES.len() as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    fn delete_quad(&self, quad: Self::Quad) {
        unsafe {
            self.gl.delete_vertex_array(quad.vertex_array);
            self.gl.delete_buffer(quad.vertices);
            self.gl.delete_buffer(quad.indices);
        }
    }
}

/// The OpenGL objects of the full-screen quad: 4 vertices and the indices [0, 1, 2, 2, 3, 0].
#[derive(Debug)]
pub struct GlowQuad {
    vertex_array: glow::NativeVertexArray,
    vertices: glow::NativeBuffer,
    indices: glow::NativeBuffer,
}

/// Creates a `GlowBackend` for every plug-in instance the host creates.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlowFactory;

impl BackendFactory for GlowFactory {
    type Backend = GlowBackend;

    fn create_backend(&self) -> Result<GlowBackend, EffectError> {
        GlowBackend::load()
    }
}
