use crate::*;
use thiserror::Error;

/// Everything that can go wrong while an effect acquires or uses its GPU resources.
///
/// Only initialization is expected to fail: compiling or linking the shader program
/// (`ShaderCompilation` and `ProgramLinking`), locating a uniform (`UniformNotFound`), or
/// allocating the quad geometry (`ResourceAllocation`). None of these are retried; the host
/// decides whether to initialize again.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompilation { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLinking(String),

    #[error("uniform `{0}` was not found in the linked program")]
    UniformNotFound(String),

    #[error("failed to allocate {resource}: {reason}")]
    ResourceAllocation {
        resource: &'static str,
        reason: String,
    },

    #[error("the effect has no linked shader program to render with")]
    NotInitialized,
}

impl EffectError {
    /// True for errors caused by the shader sources themselves (compiling or linking).
    pub fn is_compilation_failure(&self) -> bool {
        matches!(
            self,
            EffectError::ShaderCompilation { .. } | EffectError::ProgramLinking(_)
        )
    }
}

#[cfg(test)]
mod tests {

    use crate::*;

    #[test]
    fn test_compilation_failure_kind() {
        let compile = EffectError::ShaderCompilation {
            stage: ShaderStage::Fragment,
            log: "0:3: syntax error".to_string(),
        };
        assert!(compile.is_compilation_failure());
        assert!(EffectError::ProgramLinking("bad".to_string()).is_compilation_failure());
        assert!(!EffectError::UniformNotFound("Color".to_string()).is_compilation_failure());
        assert!(!EffectError::NotInitialized.is_compilation_failure());
    }

    #[test]
    fn test_messages() {
        let compile = EffectError::ShaderCompilation {
            stage: ShaderStage::Vertex,
            log: "oops".to_string(),
        };
        assert_eq!("vertex shader failed to compile: oops", compile.to_string());
        assert_eq!(
            "uniform `Color` was not found in the linked program",
            EffectError::UniformNotFound("Color".to_string()).to_string()
        );
    }
}
