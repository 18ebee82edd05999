use crate::*;
use log::{trace, warn};
use std::ffi::c_void;

/// Handles one call of the host through the binary entry point: decodes the raw input, forwards
/// it to *host* or to the instance behind *instance_id*, and encodes the answer.
///
/// Unknown function codes, null pointers where a struct was expected, and calls that need an
/// instance without getting one are all answered with `FF_FAIL`.
///
/// # Safety
/// *input* and *instance_id* must be what the host passes for *function_code*: pointers must be
/// null or point to the struct that belongs to the function code, and *instance_id* must be null
/// or a value returned by an earlier `FF_INSTANTIATE_GL` call with the same *host* that has not
/// been passed to `FF_DEINSTANTIATE_GL` yet.
pub unsafe fn plug_main<P, F>(
    host: &PluginHost<P, F>,
    function_code: u32,
    input: FfMixed,
    instance_id: *mut c_void,
) -> FfMixed
where
    F: BackendFactory,
    P: HostPlugin<F::Backend>,
{
    let instance = (instance_id as *mut PluginInstance<P, F::Backend>).as_mut();
    let fail = FfMixed::from_u32(FF_FAIL);
    let success = FfMixed::from_u32(FF_SUCCESS);

    match function_code {
        FF_GET_INFO => FfMixed::from_ptr(host.info()),
        FF_INITIALISE | FF_INITIALISE_V2 => {
            init_logging();
            success
        }
        FF_DEINITIALISE => success,
        FF_GET_NUM_PARAMETERS => FfMixed::from_u32(host.num_parameters()),
        FF_GET_PARAMETER_NAME => match host.parameter_name(input.as_u32()) {
            Some(name) => FfMixed::from_ptr(name.as_ptr()),
            None => fail,
        },
        FF_GET_PARAMETER_DEFAULT => match host.parameter_default(input.as_u32()) {
            Some(value) => FfMixed::from_f32(value),
            None => fail,
        },
        FF_GET_PARAMETER_TYPE => match host.parameter_type(input.as_u32()) {
            Some(code) => FfMixed::from_u32(code),
            None => fail,
        },
        FF_GET_PLUGIN_CAPS => FfMixed::from_u32(host.plugin_caps(input.as_u32())),
        FF_GET_EXTENDED_INFO => FfMixed::from_ptr(host.extended_info()),
        FF_INSTANTIATE_GL => {
            let viewport = match input.as_ptr::<ViewportStruct>().as_ref() {
                Some(raw) => Viewport::from(*raw),
                None => return fail,
            };
            match host.instantiate_gl(&viewport) {
                Ok(instance) => FfMixed::from_ptr(Box::into_raw(instance)),
                Err(_) => fail,
            }
        }
        FF_DEINSTANTIATE_GL => {
            if instance_id.is_null() {
                return fail;
            }
            let instance = Box::from_raw(instance_id as *mut PluginInstance<P, F::Backend>);
            instance.deinstantiate_gl();
            success
        }
        FF_PROCESS_OPENGL => {
            let (instance, raw) = match (instance, input.as_ptr::<ProcessOpenGLStruct>().as_ref()) {
                (Some(instance), Some(raw)) => (instance, raw),
                _ => return fail,
            };
            match instance.process_gl(&raw.to_frame_context()) {
                Ok(()) => success,
                Err(error) => {
                    warn!("Failed to process a frame: {}", error);
                    fail
                }
            }
        }
        FF_GET_PARAMETER => match instance.and_then(|instance| instance.parameter(input.as_u32())) {
            Some(value) => FfMixed::from_f32(value),
            None => fail,
        },
        FF_SET_PARAMETER => {
            let (instance, raw) = match (instance, input.as_ptr::<SetParameterStruct>().as_ref()) {
                (Some(instance), Some(raw)) => (instance, raw),
                _ => return fail,
            };
            let value = raw.new_parameter_value.as_f32();
            if instance.set_parameter(raw.parameter_number, value) {
                success
            } else {
                fail
            }
        }
        FF_GET_PARAMETER_DISPLAY => {
            match instance.and_then(|instance| instance.parameter_display(input.as_u32())) {
                Some(text) => FfMixed::from_ptr(text.as_ptr()),
                None => fail,
            }
        }
        FF_GET_INPUT_STATUS => match instance.and_then(|instance| instance.input_status(input.as_u32())) {
            Some(status) => FfMixed::from_u32(status),
            None => fail,
        },
        FF_SET_TIME => match (instance, input.as_ptr::<f64>().as_ref()) {
            (Some(instance), Some(time)) => {
                instance.set_time(*time);
                success
            }
            _ => fail,
        },
        FF_RESIZE => match (instance, input.as_ptr::<ViewportStruct>().as_ref()) {
            (Some(instance), Some(raw)) => {
                instance.resize(&Viewport::from(*raw));
                success
            }
            _ => fail,
        },
        _ => {
            trace!("Unsupported function code {}", function_code);
            fail
        }
    }
}

/// Installs `env_logger`, filtered by the `SOLID_COLOR_LOG` environment variable (`warn` when it
/// is not set). Calling this more than once, or after the host installed its own logger, has no
/// effect.
#[cfg(feature = "gl_rendering")]
pub fn init_logging() {
    let environment = env_logger::Env::new().filter_or("SOLID_COLOR_LOG", "warn");
    let _ = env_logger::Builder::from_env(environment).try_init();
}

#[cfg(not(feature = "gl_rendering"))]
pub fn init_logging() {
    // There is no logger implementation without the plug-in entry point
}

#[cfg(feature = "gl_rendering")]
fn solid_color_host() -> &'static PluginHost<SolidColorEffect<GlowBackend>, GlowFactory> {
    static HOST: std::sync::OnceLock<PluginHost<SolidColorEffect<GlowBackend>, GlowFactory>> =
        std::sync::OnceLock::new();
    HOST.get_or_init(|| PluginHost::new(GlowFactory))
}

/// The symbol the host looks up after loading this module.
///
/// # Safety
/// The host must follow its own calling conventions; see `plug_main`.
#[cfg(feature = "gl_rendering")]
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn plugMain(
    function_code: u32,
    input_value: FfMixed,
    instance_id: *mut c_void,
) -> FfMixed {
    // Unwinding into the host is undefined behavior
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        plug_main(solid_color_host(), function_code, input_value, instance_id)
    }));
    result.unwrap_or_else(|_| {
        log::error!("Panicked while handling function code {}", function_code);
        FfMixed::from_u32(FF_FAIL)
    })
}

#[cfg(test)]
mod tests {

    use crate::*;
    use std::ffi::{c_void, CStr};
    use std::ptr;

    type TestHost = PluginHost<SolidColorEffect<RecordingBackend>, RecordingFactory>;

    unsafe fn call(host: &TestHost, code: u32, input: FfMixed, instance: *mut c_void) -> FfMixed {
        plug_main(host, code, input, instance)
    }

    unsafe fn call_u32(host: &TestHost, code: u32, input: u32, instance: *mut c_void) -> FfMixed {
        call(host, code, FfMixed::from_u32(input), instance)
    }

    #[test]
    fn test_descriptor_queries() {
        let host = TestHost::new(RecordingFactory::new());
        unsafe {
            assert_eq!(FF_SUCCESS, call_u32(&host, FF_INITIALISE, 0, ptr::null_mut()).as_u32());

            let info = &*call_u32(&host, FF_GET_INFO, 0, ptr::null_mut()).as_ptr::<PluginInfoStruct>();
            assert_eq!(*b"SLDC", info.plugin_unique_id);
            assert_eq!(FF_SOURCE, info.plugin_type);

            assert_eq!(4, call_u32(&host, FF_GET_NUM_PARAMETERS, 0, ptr::null_mut()).as_u32());
            let name = call_u32(&host, FF_GET_PARAMETER_NAME, 2, ptr::null_mut()).as_ptr::<std::ffi::c_char>();
            assert_eq!("Blue", CStr::from_ptr(name).to_str().unwrap());
            assert_eq!(FF_FAIL, call_u32(&host, FF_GET_PARAMETER_NAME, 4, ptr::null_mut()).as_u32());

            assert_eq!(1.0, call_u32(&host, FF_GET_PARAMETER_DEFAULT, 3, ptr::null_mut()).as_f32());
            assert_eq!(FF_TYPE_STANDARD, call_u32(&host, FF_GET_PARAMETER_TYPE, 0, ptr::null_mut()).as_u32());
            assert_eq!(
                FF_SUPPORTED,
                call_u32(&host, FF_GET_PLUGIN_CAPS, FF_CAP_PROCESS_OPENGL, ptr::null_mut()).as_u32()
            );
            assert_eq!(FF_FAIL, call_u32(&host, 1234, 0, ptr::null_mut()).as_u32());
            assert_eq!(FF_FAIL, call_u32(&host, FF_CONNECT, 0, ptr::null_mut()).as_u32());
            assert_eq!(FF_SUCCESS, call_u32(&host, FF_DEINITIALISE, 0, ptr::null_mut()).as_u32());
        }
    }

    #[test]
    fn test_full_lifecycle_through_entry_point() {
        let factory = RecordingFactory::new();
        let backend = factory.backend.clone();
        let host = TestHost::new(factory);

        unsafe {
            let viewport = ViewportStruct {
                x: 0,
                y: 0,
                width: 800,
                height: 600,
            };
            let instance = call(&host, FF_INSTANTIATE_GL, FfMixed::from_ptr(&viewport as *const ViewportStruct), ptr::null_mut())
                .as_ptr::<c_void>();
            assert!(!instance.is_null());

            let values = [0.0, 1.0, 0.0, 0.5];
            for (index, value) in values.iter().enumerate() {
                let set = SetParameterStruct {
                    parameter_number: index as u32,
                    new_parameter_value: FfMixed::from_f32(*value),
                };
                let result = call(&host, FF_SET_PARAMETER, FfMixed::from_ptr(&set as *const SetParameterStruct), instance);
                assert_eq!(FF_SUCCESS, result.as_u32());
            }
            assert_eq!(0.5, call_u32(&host, FF_GET_PARAMETER, 3, instance).as_f32());
            assert_eq!(FF_FAIL, call_u32(&host, FF_GET_PARAMETER, 3, ptr::null_mut()).as_u32());

            let display = call_u32(&host, FF_GET_PARAMETER_DISPLAY, 3, instance).as_ptr::<std::ffi::c_char>();
            assert_eq!("0.50", CStr::from_ptr(display).to_str().unwrap());

            let time = 12.5f64;
            assert_eq!(FF_SUCCESS, call(&host, FF_SET_TIME, FfMixed::from_ptr(&time as *const f64), instance).as_u32());

            let resized = ViewportStruct {
                x: 0,
                y: 0,
                width: 1024,
                height: 768,
            };
            assert_eq!(FF_SUCCESS, call(&host, FF_RESIZE, FfMixed::from_ptr(&resized as *const ViewportStruct), instance).as_u32());
            assert_eq!(FF_FAIL, call_u32(&host, FF_GET_INPUT_STATUS, 0, instance).as_u32());

            let frame = ProcessOpenGLStruct {
                num_input_textures: 0,
                input_textures: ptr::null_mut(),
                host_fbo: 0,
            };
            let result = call(&host, FF_PROCESS_OPENGL, FfMixed::from_ptr(&frame as *const ProcessOpenGLStruct), instance);
            assert_eq!(FF_SUCCESS, result.as_u32());
            assert_eq!(1, backend.state().draws.len());
            assert_eq!(Some([0.0, 1.0, 0.0, 0.5]), backend.state().draws[0].color);

            assert_eq!(FF_SUCCESS, call_u32(&host, FF_DEINSTANTIATE_GL, 0, instance).as_u32());
        }

        assert!(backend.state().live_programs.is_empty());
        assert!(backend.state().live_quads.is_empty());
        assert_eq!(0, backend.state().double_frees);
    }

    #[test]
    fn test_failed_instantiation_returns_fail() {
        let factory = RecordingFactory::failing(Failure::MissingUniforms);
        let backend = factory.backend.clone();
        let host = TestHost::new(factory);
        let viewport = ViewportStruct {
            x: 0,
            y: 0,
            width: 8,
            height: 8,
        };
        unsafe {
            let result = call(&host, FF_INSTANTIATE_GL, FfMixed::from_ptr(&viewport as *const ViewportStruct), ptr::null_mut());
            assert_eq!(FF_FAIL, result.as_u32());
        }
        assert!(backend.state().live_programs.is_empty());
    }

    #[test]
    fn test_missing_pointers_fail() {
        let host = TestHost::new(RecordingFactory::new());
        unsafe {
            assert_eq!(FF_FAIL, call(&host, FF_INSTANTIATE_GL, FfMixed::from_ptr::<ViewportStruct>(ptr::null()), ptr::null_mut()).as_u32());
            assert_eq!(FF_FAIL, call_u32(&host, FF_DEINSTANTIATE_GL, 0, ptr::null_mut()).as_u32());
            assert_eq!(FF_FAIL, call(&host, FF_PROCESS_OPENGL, FfMixed::from_ptr::<ProcessOpenGLStruct>(ptr::null()), ptr::null_mut()).as_u32());
            assert_eq!(FF_FAIL, call(&host, FF_SET_PARAMETER, FfMixed::from_ptr::<SetParameterStruct>(ptr::null()), ptr::null_mut()).as_u32());
            assert_eq!(FF_FAIL, call(&host, FF_SET_TIME, FfMixed::from_ptr::<f64>(ptr::null()), ptr::null_mut()).as_u32());
        }
    }
}
