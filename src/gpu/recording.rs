use crate::*;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A `GpuBackend` that doesn't touch a GPU, but records everything that is asked of it. Clones
/// share their recording, so a test can keep a clone around to inspect a backend that was moved
/// into a plug-in instance.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingBackend {
    state: Rc<RefCell<RecordingState>>,
    failure: Failure,
}

/// What a `RecordingBackend` should refuse to do.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Failure {
    Nothing,
    VertexCompile,
    FragmentCompile,
    Link,
    MissingUniforms,
    QuadAllocation,
}

impl Default for Failure {
    fn default() -> Self {
        Failure::Nothing
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingState {
    next_id: u32,
    fragment_sources: HashMap<u32, String>,
    uniform_values: HashMap<(u32, i32), [f32; 4]>,

    pub(crate) live_programs: Vec<u32>,
    pub(crate) live_quads: Vec<u32>,
    pub(crate) bound: Option<u32>,
    pub(crate) bind_history: Vec<Option<u32>>,
    pub(crate) uploads: Vec<UniformUpload>,
    pub(crate) draws: Vec<DrawCall>,
    pub(crate) double_frees: u32,
}

#[derive(Clone, PartialEq, Debug)]
pub(crate) struct UniformUpload {
    pub(crate) program: Option<u32>,
    pub(crate) location: i32,
    pub(crate) value: [f32; 4],
}

#[derive(Clone, PartialEq, Debug)]
pub(crate) struct DrawCall {
    pub(crate) quad: u32,
    pub(crate) program: Option<u32>,
    /// The value of uniform location 0 of the bound program at the time of the draw
    pub(crate) color: Option<[f32; 4]>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(failure: Failure) -> Self {
        Self {
            state: Rc::default(),
            failure,
        }
    }

    pub(crate) fn state(&self) -> Ref<'_, RecordingState> {
        self.state.borrow()
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

impl GpuBackend for RecordingBackend {
    type Program = u32;
    type UniformLocation = i32;
    type Quad = u32;

    fn compile_program(&self, _vertex: &str, fragment: &str) -> Result<u32, EffectError> {
        match self.failure {
            Failure::VertexCompile => {
                return Err(EffectError::ShaderCompilation {
                    stage: ShaderStage::Vertex,
                    log: "recorded vertex failure".to_string(),
                })
            }
            Failure::FragmentCompile => {
                return Err(EffectError::ShaderCompilation {
                    stage: ShaderStage::Fragment,
                    log: "recorded fragment failure".to_string(),
                })
            }
            Failure::Link => {
                return Err(EffectError::ProgramLinking("recorded link failure".to_string()))
            }
            _ => {}
        }

        let program = self.next_id();
        let mut state = self.state.borrow_mut();
        state.live_programs.push(program);
        state.fragment_sources.insert(program, fragment.to_string());
        Ok(program)
    }

    fn find_uniform(&self, program: u32, name: &str) -> Option<i32> {
        if self.failure == Failure::MissingUniforms {
            return None;
        }
        let state = self.state.borrow();
        let source = state.fragment_sources.get(&program)?;
        let declaration = format!("uniform vec4 {};", name);

        // Every test shader declares at most one uniform, so it can always live at location 0
        if source.contains(&declaration) {
            Some(0)
        } else {
            None
        }
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let old_length = state.live_programs.len();
        state.live_programs.retain(|live| *live != program);
        if state.live_programs.len() == old_length {
            state.double_frees += 1;
        }
        state.fragment_sources.remove(&program);
    }

    fn bound_program(&self) -> Option<u32> {
        self.state.borrow().bound
    }

    fn bind_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.bound = program;
        state.bind_history.push(program);
    }

    fn set_uniform_vec4(&self, location: &i32, value: [f32; 4]) {
        let mut state = self.state.borrow_mut();
        let program = state.bound;
        if let Some(program) = program {
            state.uniform_values.insert((program, *location), value);
        }
        state.uploads.push(UniformUpload {
            program,
            location: *location,
            value,
        });
    }

    fn create_quad(&self) -> Result<u32, EffectError> {
        if self.failure == Failure::QuadAllocation {
            return Err(EffectError::ResourceAllocation {
                resource: "quad vertex array",
                reason: "recorded allocation failure".to_string(),
            });
        }
        let quad = self.next_id();
        self.state.borrow_mut().live_quads.push(quad);
        Ok(quad)
    }

    fn draw_quad(&self, quad: &u32) {
        let mut state = self.state.borrow_mut();
        let program = state.bound;
        let color = program.and_then(|program| state.uniform_values.get(&(program, 0)).copied());
        state.draws.push(DrawCall {
            quad: *quad,
            program,
            color,
        });
    }

    fn delete_quad(&self, quad: u32) {
        let mut state = self.state.borrow_mut();
        let old_length = state.live_quads.len();
        state.live_quads.retain(|live| *live != quad);
        if state.live_quads.len() == old_length {
            state.double_frees += 1;
        }
    }
}

/// Hands out clones of one `RecordingBackend`, so tests can inspect what the plug-in instances
/// did with it.
pub(crate) struct RecordingFactory {
    pub(crate) backend: RecordingBackend,
}

impl RecordingFactory {
    pub(crate) fn new() -> Self {
        Self {
            backend: RecordingBackend::new(),
        }
    }

    pub(crate) fn failing(failure: Failure) -> Self {
        Self {
            backend: RecordingBackend::failing(failure),
        }
    }
}

impl BackendFactory for RecordingFactory {
    type Backend = RecordingBackend;

    fn create_backend(&self) -> Result<RecordingBackend, EffectError> {
        Ok(self.backend.clone())
    }
}
