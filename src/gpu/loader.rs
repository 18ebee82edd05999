//! Resolves OpenGL function pointers for the context the host made current.
//!
//! A plug-in doesn't create its own context, so there is no windowing library to ask for function
//! pointers. Instead, the system OpenGL library is opened with `libloading` and asked directly,
//! through the platform's `GetProcAddress` function when it has one.

use std::ffi::{c_char, c_void, CString};
use std::ptr;

use libloading::Library;
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open any of the OpenGL libraries {candidates:?}: {reason}")]
    LibraryNotFound {
        candidates: &'static [&'static str],
        reason: String,
    },
}

type GetProcAddress = unsafe extern "system" fn(*const c_char) -> *const c_void;

#[cfg(target_os = "windows")]
const LIBRARY_NAMES: &[&str] = &["opengl32.dll"];
#[cfg(target_os = "windows")]
const GET_PROC_ADDRESS: Option<&[u8]> = Some(b"wglGetProcAddress\0");

#[cfg(target_os = "macos")]
const LIBRARY_NAMES: &[&str] = &["/System/Library/Frameworks/OpenGL.framework/OpenGL"];
#[cfg(target_os = "macos")]
const GET_PROC_ADDRESS: Option<&[u8]> = None;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LIBRARY_NAMES: &[&str] = &["libGL.so.1", "libGL.so"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const GET_PROC_ADDRESS: Option<&[u8]> = Some(b"glXGetProcAddressARB\0");

/// The opened system OpenGL library. Function pointers obtained from it are only valid while it
/// is alive, so whoever holds on to those pointers should also hold on to this.
pub struct GlLibrary {
    library: Library,
    get_proc_address: Option<GetProcAddress>,
}

impl GlLibrary {
    pub fn open() -> Result<Self, LoadError> {
        let mut reason = String::new();
        for name in LIBRARY_NAMES {
            // SAFETY: this is the OpenGL library of the system, which the host already loaded to
            // create its own context. Opening it again only increases its reference count.
            match unsafe { Library::new(name) } {
                Ok(library) => {
                    debug!("Opened OpenGL library {}", name);
                    return Ok(Self::with_library(library));
                }
                Err(error) => {
                    warn!("Couldn't open OpenGL library {}: {}", name, error);
                    reason = error.to_string();
                }
            }
        }
        Err(LoadError::LibraryNotFound {
            candidates: LIBRARY_NAMES,
            reason,
        })
    }

    fn with_library(library: Library) -> Self {
        // SAFETY: the signature matches the platform headers of wglGetProcAddress and
        // glXGetProcAddressARB. The function pointer is copied out of the symbol, but it never
        // outlives `library` because both are stored in the same struct.
        let get_proc_address = GET_PROC_ADDRESS.and_then(|symbol| unsafe {
            library.get::<GetProcAddress>(symbol).ok().map(|function| *function)
        });
        Self {
            library,
            get_proc_address,
        }
    }

    /// Looks up the OpenGL function with the given *name*, returning a null pointer if it can't
    /// be found.
    pub fn get_proc_address(&self, name: &str) -> *const c_void {
        let symbol = match CString::new(name) {
            Ok(symbol) => symbol,
            Err(_) => return ptr::null(),
        };

        // Extension and post-1.1 functions are only available through the GetProcAddress function
        if let Some(get_proc_address) = self.get_proc_address {
            // SAFETY: `symbol` is a nul-terminated string that outlives the call
            let address = unsafe { get_proc_address(symbol.as_ptr()) };
            if is_valid_address(address) {
                return address;
            }
        }

        // SAFETY: the symbol is only used as an address; glow casts it to the right signature
        unsafe { self.library.get::<*const c_void>(symbol.as_bytes_with_nul()) }
            .map(|address| *address)
            .unwrap_or(ptr::null())
    }
}

/// wglGetProcAddress reports failure with some small values and -1 instead of only null.
fn is_valid_address(address: *const c_void) -> bool {
    !matches!(address as isize, -1 | 0 | 1 | 2 | 3)
}
