/// Passes the position through unchanged and forwards the UV to the fragment stage.
pub const VERTEX_SHADER: &str = r#"#version 410 core
layout( location = 0 ) in vec4 vPosition;
layout( location = 1 ) in vec2 vUV;
out vec2 uv;
void main()
{
    gl_Position = vPosition;
    uv = vUV;
}
"#;

/// Writes the `Color` uniform to every pixel. The UV is received but not used.
pub const FRAGMENT_SHADER: &str = r#"#version 410 core
uniform vec4 Color;
out vec4 fragColor;
in vec2 uv;
void main()
{
    fragColor = Color;
}
"#;

pub const COLOR_UNIFORM: &str = "Color";
