use crate::*;

/// Owns (at most) one linked shader program of a `GpuBackend`.
///
/// The program is not released automatically when the `Shader` is dropped, because that requires
/// the GPU context to be current. Call `free_gl_resources` during teardown instead; it is safe to
/// call any number of times.
#[derive(Debug)]
pub struct Shader<G: GpuBackend> {
    program: Option<G::Program>,
}

impl<G: GpuBackend> Shader<G> {
    pub fn new() -> Self {
        Self { program: None }
    }

    /// Compiles and links a new program from the given sources. A program this `Shader` already
    /// owned is released first, so compiling twice doesn't leak the first program. If compilation
    /// fails, this `Shader` owns no program afterwards.
    pub fn compile(&mut self, gpu: &G, vertex: &str, fragment: &str) -> Result<(), EffectError> {
        self.free_gl_resources(gpu);
        let program = gpu.compile_program(vertex, fragment)?;
        self.program = Some(program);
        Ok(())
    }

    pub fn find_uniform(&self, gpu: &G, name: &str) -> Option<G::UniformLocation> {
        self.program.and_then(|program| gpu.find_uniform(program, name))
    }

    pub fn program(&self) -> Option<G::Program> {
        self.program
    }

    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    pub fn free_gl_resources(&mut self, gpu: &G) {
        if let Some(program) = self.program.take() {
            gpu.delete_program(program);
        }
    }
}

impl<G: GpuBackend> Default for Shader<G> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binds a program for as long as this guard lives. The program that was bound when the guard was
/// created gets bound again when the guard is dropped, no matter how the scope is left.
pub struct ScopedShaderBinding<'a, G: GpuBackend> {
    gpu: &'a G,
    previous: Option<G::Program>,
}

impl<'a, G: GpuBackend> ScopedShaderBinding<'a, G> {
    pub fn new(gpu: &'a G, program: G::Program) -> Self {
        let previous = gpu.bound_program();
        gpu.bind_program(Some(program));
        Self { gpu, previous }
    }
}

impl<'a, G: GpuBackend> Drop for ScopedShaderBinding<'a, G> {
    fn drop(&mut self) {
        self.gpu.bind_program(self.previous);
    }
}

#[cfg(test)]
mod tests {

    use crate::*;

    const VERTEX: &str = "void main() {}";
    const FRAGMENT: &str = "uniform vec4 Tint; void main() {}";

    #[test]
    fn test_compile_and_free() {
        let gpu = RecordingBackend::new();
        let mut shader = Shader::new();
        assert!(!shader.is_compiled());
        assert!(shader.find_uniform(&gpu, "Tint").is_none());

        shader.compile(&gpu, VERTEX, FRAGMENT).unwrap();
        assert!(shader.is_compiled());
        assert!(shader.find_uniform(&gpu, "Tint").is_some());
        assert!(shader.find_uniform(&gpu, "Color").is_none());
        assert_eq!(1, gpu.state().live_programs.len());

        shader.free_gl_resources(&gpu);
        shader.free_gl_resources(&gpu);
        assert!(!shader.is_compiled());
        assert!(gpu.state().live_programs.is_empty());
        assert_eq!(0, gpu.state().double_frees);
    }

    #[test]
    fn test_compile_twice_releases_first_program() {
        let gpu = RecordingBackend::new();
        let mut shader = Shader::new();
        shader.compile(&gpu, VERTEX, FRAGMENT).unwrap();
        let first = shader.program().unwrap();
        shader.compile(&gpu, VERTEX, FRAGMENT).unwrap();

        assert_ne!(Some(first), shader.program());
        assert_eq!(vec![shader.program().unwrap()], gpu.state().live_programs);
    }

    #[test]
    fn test_failed_compile_owns_nothing() {
        let gpu = RecordingBackend::failing(Failure::FragmentCompile);
        let mut shader: Shader<RecordingBackend> = Shader::default();
        let error = shader.compile(&gpu, VERTEX, FRAGMENT).unwrap_err();
        assert!(error.is_compilation_failure());
        assert!(!shader.is_compiled());
        assert!(gpu.state().live_programs.is_empty());
    }

    #[test]
    fn test_scoped_binding_restores_previous() {
        let gpu = RecordingBackend::new();
        let mut shader = Shader::new();
        shader.compile(&gpu, VERTEX, FRAGMENT).unwrap();
        let program = shader.program().unwrap();

        gpu.bind_program(Some(77));
        {
            let _binding = ScopedShaderBinding::new(&gpu, program);
            assert_eq!(Some(program), gpu.bound_program());
        }
        assert_eq!(Some(77), gpu.bound_program());

        gpu.bind_program(None);
        {
            let _binding = ScopedShaderBinding::new(&gpu, program);
            assert_eq!(Some(program), gpu.bound_program());
        }
        assert_eq!(None, gpu.bound_program());
    }

    #[test]
    fn test_scoped_binding_restores_on_early_return() {
        let gpu = RecordingBackend::new();
        gpu.bind_program(Some(5));

        fn use_and_maybe_fail(gpu: &RecordingBackend, fail: bool) -> Result<(), EffectError> {
            let _binding = ScopedShaderBinding::new(gpu, 9);
            if fail {
                return Err(EffectError::NotInitialized);
            }
            Ok(())
        }

        assert!(use_and_maybe_fail(&gpu, true).is_err());
        assert_eq!(Some(5), gpu.bound_program());
        assert_eq!(vec![Some(5), Some(9), Some(5)], gpu.state().bind_history);
    }
}
