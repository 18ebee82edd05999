//! The binary interface between the host and the plug-in module: function codes, return codes and
//! the `#[repr(C)]` structs the host passes around. Nothing outside the `host` module should need
//! these; everything else works with `Viewport`, `FrameContext` and friends.

use crate::*;
use std::ffi::{c_char, c_void};
use std::ptr;

// Function codes
pub const FF_GET_INFO: u32 = 0;
pub const FF_INITIALISE: u32 = 1;
pub const FF_DEINITIALISE: u32 = 2;
pub const FF_GET_NUM_PARAMETERS: u32 = 4;
pub const FF_GET_PARAMETER_NAME: u32 = 5;
pub const FF_GET_PARAMETER_DEFAULT: u32 = 6;
pub const FF_GET_PARAMETER_DISPLAY: u32 = 7;
pub const FF_SET_PARAMETER: u32 = 8;
pub const FF_GET_PARAMETER: u32 = 9;
pub const FF_GET_PLUGIN_CAPS: u32 = 10;
pub const FF_GET_EXTENDED_INFO: u32 = 13;
pub const FF_GET_PARAMETER_TYPE: u32 = 15;
pub const FF_GET_INPUT_STATUS: u32 = 16;
pub const FF_PROCESS_OPENGL: u32 = 17;
pub const FF_INSTANTIATE_GL: u32 = 18;
pub const FF_DEINSTANTIATE_GL: u32 = 19;
pub const FF_SET_TIME: u32 = 20;
pub const FF_CONNECT: u32 = 21;
pub const FF_DISCONNECT: u32 = 22;
pub const FF_RESIZE: u32 = 23;
pub const FF_INITIALISE_V2: u32 = 24;

// Return codes
pub const FF_SUCCESS: u32 = 0;
pub const FF_FAIL: u32 = 0xFFFF_FFFF;
pub const FF_TRUE: u32 = 1;
pub const FF_FALSE: u32 = 0;
pub const FF_SUPPORTED: u32 = 1;
pub const FF_UNSUPPORTED: u32 = 0;
pub const FF_INPUT_NOT_IN_USE: u32 = 0;
pub const FF_INPUT_IN_USE: u32 = 1;

// Plug-in kinds
pub const FF_EFFECT: u32 = 0;
pub const FF_SOURCE: u32 = 1;
pub const FF_MIXER: u32 = 2;

// Capabilities
pub const FF_CAP_PROCESS_OPENGL: u32 = 4;
pub const FF_CAP_SET_TIME: u32 = 5;
pub const FF_CAP_MINIMUM_INPUT_FRAMES: u32 = 10;
pub const FF_CAP_MAXIMUM_INPUT_FRAMES: u32 = 11;

// Parameter types
pub const FF_TYPE_STANDARD: u32 = 10;

impl ParamType {
    pub fn code(self) -> u32 {
        match self {
            ParamType::Standard => FF_TYPE_STANDARD,
        }
    }
}

/// The value that goes in and out of `plugMain`: either a number or a pointer, depending on the
/// function code.
#[repr(C)]
#[derive(Copy, Clone)]
pub union FfMixed {
    pub uint_value: u32,
    pub pointer_value: *mut c_void,
}

impl FfMixed {
    pub fn from_u32(value: u32) -> Self {
        // Start from a null pointer so that the bytes the u32 doesn't cover are zero
        let mut mixed = Self {
            pointer_value: ptr::null_mut(),
        };
        mixed.uint_value = value;
        mixed
    }

    pub fn from_f32(value: f32) -> Self {
        Self::from_u32(value.to_bits())
    }

    pub fn from_ptr<T>(pointer: *const T) -> Self {
        Self {
            pointer_value: pointer as *mut c_void,
        }
    }

    pub fn as_u32(&self) -> u32 {
        // SAFETY: both fields are plain data and at least 4 bytes are always initialized
        unsafe { self.uint_value }
    }

    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.as_u32())
    }

    pub fn as_ptr<T>(&self) -> *mut T {
        // SAFETY: constructors always initialize the full pointer width
        unsafe { self.pointer_value as *mut T }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct PluginInfoStruct {
    pub api_major_version: u32,
    pub api_minor_version: u32,
    pub plugin_unique_id: [u8; 4],
    pub plugin_name: [u8; 16],
    pub plugin_type: u32,
}

impl PluginInfoStruct {
    /// Converts a `PluginInfo` to the host layout. Names longer than 16 bytes are truncated; the
    /// name field is not nul-terminated when the name uses all 16 bytes.
    pub fn new(info: &PluginInfo) -> Self {
        let mut plugin_name = [0u8; 16];
        let name = info.name.as_bytes();
        let length = name.len().min(plugin_name.len());
        plugin_name[..length].copy_from_slice(&name[..length]);
        Self {
            api_major_version: info.api_major_version,
            api_minor_version: info.api_minor_version,
            plugin_unique_id: info.unique_id,
            plugin_name,
            plugin_type: info.kind.code(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct PluginExtendedInfoStruct {
    pub plugin_major_version: u32,
    pub plugin_minor_version: u32,
    pub description: *const c_char,
    pub about: *const c_char,
    pub extended_data_size: u32,
    pub extended_data_block: *const c_void,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct ViewportStruct {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<ViewportStruct> for Viewport {
    fn from(raw: ViewportStruct) -> Self {
        Viewport::with_size(raw.x, raw.y, raw.width, raw.height)
    }
}

impl From<Viewport> for ViewportStruct {
    fn from(viewport: Viewport) -> Self {
        Self {
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct TextureStruct {
    pub width: u32,
    pub height: u32,
    pub hardware_width: u32,
    pub hardware_height: u32,
    pub handle: u32,
}

impl From<TextureStruct> for InputTexture {
    fn from(raw: TextureStruct) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            hardware_width: raw.hardware_width,
            hardware_height: raw.hardware_height,
            handle: raw.handle,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct ProcessOpenGLStruct {
    pub num_input_textures: u32,
    pub input_textures: *mut *mut TextureStruct,
    pub host_fbo: u32,
}

impl ProcessOpenGLStruct {
    /// Copies the information of this struct into a `FrameContext`. Null texture pointers are
    /// skipped.
    ///
    /// # Safety
    /// `input_textures` must be null or point to `num_input_textures` pointers, each of which is
    /// null or points to a valid `TextureStruct`.
    pub unsafe fn to_frame_context(&self) -> FrameContext {
        let mut input_textures = Vec::new();
        if !self.input_textures.is_null() {
            for index in 0..self.num_input_textures as usize {
                let texture = *self.input_textures.add(index);
                if let Some(texture) = texture.as_ref() {
                    input_textures.push(InputTexture::from(*texture));
                }
            }
        }
        FrameContext {
            input_textures,
            host_fbo: self.host_fbo,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct SetParameterStruct {
    pub parameter_number: u32,
    pub new_parameter_value: FfMixed,
}
