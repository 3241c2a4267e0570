//! CNDEV library implementation
//!
//! Loads `libcndev.so` at runtime and implements [`NativeLibrary`] over
//! the raw C ABI.

use crate::cndev::ffi::{self, cndevRet_t, CNDEV_CARD_INFO_VERSION, CNDEV_VERSION};
use crate::cndev::traits::{NativeLibrary, RawMemoryUsage, RawProcessSlot};
use crate::domain::{CardModel, PROCESS_SLOTS};
use crate::error::CndevError;

use libloading::{Library, Symbol};
use std::ffi::CStr;
use std::os::raw::{c_int, c_uint};

/// Library names tried when no explicit path is configured
pub const DEFAULT_LIBRARY_PATHS: &[&str] =
    &["libcndev.so", "/usr/local/neuware/lib64/libcndev.so"];

/// Resolved entry points; valid as long as the owning [`Library`] lives
struct Api {
    init: ffi::cndevInitFn,
    release: ffi::cndevReleaseFn,
    error_string: ffi::cndevGetErrorStringFn,
    device_count: ffi::cndevGetDeviceCountFn,
    card_name: ffi::cndevGetCardNameFn,
    card_sn: ffi::cndevGetCardSNFn,
    health_state: ffi::cndevGetCardHealthStateFn,
    memory_usage: ffi::cndevGetMemoryUsageFn,
    utilization: ffi::cndevGetDeviceUtilizationInfoFn,
    process_info: ffi::cndevGetProcessInfoFn,
}

/// Dynamically loaded CNDEV library
pub struct CndevLibrary {
    api: Api,
    path: String,
    // Must outlive every function pointer in `api`.
    _lib: Library,
}

impl CndevLibrary {
    /// Load CNDEV from the default locations
    pub fn open_default() -> Result<Self, CndevError> {
        Self::open(DEFAULT_LIBRARY_PATHS)
    }

    /// Load CNDEV from the first candidate path that opens
    pub fn open<S: AsRef<str>>(candidates: &[S]) -> Result<Self, CndevError> {
        let mut last_error = String::from("no library path configured");

        for candidate in candidates {
            let path = candidate.as_ref();
            // SAFETY: loading the vendor library runs its initializers,
            // which is the documented way to use CNDEV.
            match unsafe { Library::new(path) } {
                Ok(lib) => {
                    let api = unsafe { Self::bind(&lib) }?;
                    log::info!("Loaded CNDEV library from {}", path);
                    return Ok(Self {
                        api,
                        path: path.to_string(),
                        _lib: lib,
                    });
                }
                Err(e) => {
                    log::debug!("Failed to load CNDEV from {}: {}", path, e);
                    last_error = format!("{}: {}", path, e);
                }
            }
        }

        Err(CndevError::LibraryNotFound(last_error))
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolve every symbol this crate uses
    ///
    /// # Safety
    /// The signatures in [`ffi`] must match the loaded library.
    unsafe fn bind(lib: &Library) -> Result<Api, CndevError> {
        unsafe fn sym<T: Copy>(lib: &Library, name: &[u8]) -> Result<T, CndevError> {
            let symbol: Symbol<T> = lib.get(name).map_err(|e| {
                CndevError::LibraryNotFound(format!(
                    "missing symbol {}: {}",
                    String::from_utf8_lossy(&name[..name.len() - 1]),
                    e
                ))
            })?;
            Ok(*symbol)
        }

        Ok(Api {
            init: sym(lib, b"cndevInit\0")?,
            release: sym(lib, b"cndevRelease\0")?,
            error_string: sym(lib, b"cndevGetErrorString\0")?,
            device_count: sym(lib, b"cndevGetDeviceCount\0")?,
            card_name: sym(lib, b"cndevGetCardName\0")?,
            card_sn: sym(lib, b"cndevGetCardSN\0")?,
            health_state: sym(lib, b"cndevGetCardHealthState\0")?,
            memory_usage: sym(lib, b"cndevGetMemoryUsage\0")?,
            utilization: sym(lib, b"cndevGetDeviceUtilizationInfo\0")?,
            process_info: sym(lib, b"cndevGetProcessInfo\0")?,
        })
    }

    /// Translate a native status into a typed outcome
    fn check(&self, ret: cndevRet_t) -> Result<(), CndevError> {
        self.check_status(ret, false)
    }

    fn check_status(&self, ret: cndevRet_t, during_init: bool) -> Result<(), CndevError> {
        if ret == ffi::CNDEV_SUCCESS {
            return Ok(());
        }
        // SAFETY: cndevGetErrorString returns a static string or NULL.
        let ptr = unsafe { (self.api.error_string)(ret) };
        let message = if ptr.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(ptr) })
        };
        status_error(ret, message, during_init)
    }
}

/// Map a native status and its diagnostic string to a typed outcome
///
/// A missing driver reported by `cndevInit` is a load failure; every other
/// non-success status is a native error.
fn status_error(
    ret: cndevRet_t,
    message: Option<&CStr>,
    during_init: bool,
) -> Result<(), CndevError> {
    if ret == ffi::CNDEV_SUCCESS {
        return Ok(());
    }

    let message = match message {
        Some(msg) => msg.to_string_lossy().into_owned(),
        None => format!("error code {}", ret),
    };

    let load_failure =
        ret == ffi::CNDEV_ERROR_NO_DRIVER || ret == ffi::CNDEV_ERROR_UNINITIALIZED;
    if during_init && load_failure {
        return Err(CndevError::LibraryNotFound(message));
    }
    Err(CndevError::native(ret, message))
}

fn dev_id(index: u32) -> Result<c_int, CndevError> {
    c_int::try_from(index).map_err(|_| CndevError::InvalidReading {
        index,
        detail: "device index out of range".to_string(),
    })
}

impl NativeLibrary for CndevLibrary {
    fn init(&self) -> Result<(), CndevError> {
        let ret = unsafe { (self.api.init)(0) };
        self.check_status(ret, true)
    }

    fn release(&self) -> Result<(), CndevError> {
        let ret = unsafe { (self.api.release)() };
        self.check(ret)
    }

    fn device_count(&self) -> Result<u32, CndevError> {
        let mut info = ffi::cndevCardInfo_t {
            version: CNDEV_CARD_INFO_VERSION,
            ..Default::default()
        };
        let ret = unsafe { (self.api.device_count)(&mut info) };
        self.check(ret)?;
        Ok(info.Number)
    }

    fn card_model(&self, index: u32) -> Result<CardModel, CndevError> {
        let mut name = ffi::cndevCardName_t {
            version: CNDEV_VERSION,
            ..Default::default()
        };
        let ret = unsafe { (self.api.card_name)(&mut name, dev_id(index)?) };
        self.check(ret)?;
        Ok(CardModel::from_raw(name.id))
    }

    fn card_serial(&self, index: u32) -> Result<i64, CndevError> {
        let mut sn = ffi::cndevCardSN_t {
            version: CNDEV_VERSION,
            ..Default::default()
        };
        let ret = unsafe { (self.api.card_sn)(&mut sn, dev_id(index)?) };
        self.check(ret)?;
        Ok(sn.sn)
    }

    fn health_code(&self, index: u32) -> Result<i32, CndevError> {
        let mut state = ffi::cndevCardHealthState_t {
            version: CNDEV_VERSION,
            ..Default::default()
        };
        let ret = unsafe { (self.api.health_state)(&mut state, dev_id(index)?) };
        self.check(ret)?;
        Ok(state.health)
    }

    fn memory_usage(&self, index: u32) -> Result<RawMemoryUsage, CndevError> {
        let mut info = ffi::cndevMemoryInfo_t {
            version: CNDEV_VERSION,
            ..Default::default()
        };
        let ret = unsafe { (self.api.memory_usage)(&mut info, dev_id(index)?) };
        self.check(ret)?;
        Ok(RawMemoryUsage {
            total: info.PhysicalMemoryTotal,
            used: info.PhysicalMemoryUsed,
        })
    }

    fn utilization(&self, index: u32) -> Result<i32, CndevError> {
        let mut info = ffi::cndevUtilizationInfo_t {
            version: CNDEV_VERSION,
            ..Default::default()
        };
        let ret = unsafe { (self.api.utilization)(&mut info, dev_id(index)?) };
        self.check(ret)?;
        Ok(info.BoardUtilization)
    }

    fn process_list(&self, index: u32) -> Result<[RawProcessSlot; PROCESS_SLOTS], CndevError> {
        let mut infos = [ffi::cndevProcessInfo_t {
            version: CNDEV_VERSION,
            ..Default::default()
        }; ffi::PROCESS_INFO_CAPACITY];
        let mut count = ffi::PROCESS_INFO_CAPACITY as c_uint;

        let ret = unsafe { (self.api.process_info)(&mut count, infos.as_mut_ptr(), dev_id(index)?) };
        self.check(ret)?;

        // The whole array is reported back; slots past `count` stay zeroed.
        let mut slots = [(0, 0); PROCESS_SLOTS];
        for (slot, info) in slots.iter_mut().zip(infos.iter()) {
            *slot = (info.pid, u64::from(info.PhysicalMemoryUsed));
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_library() {
        let result = CndevLibrary::open(&["/nonexistent/libcndev.so"]);
        assert!(matches!(result, Err(CndevError::LibraryNotFound(_))));
    }

    #[test]
    fn test_open_no_candidates() {
        let result = CndevLibrary::open::<&str>(&[]);
        match result {
            Err(CndevError::LibraryNotFound(msg)) => assert!(msg.contains("no library path")),
            _ => panic!("expected LibraryNotFound"),
        }
    }

    #[test]
    fn test_status_success() {
        assert!(status_error(ffi::CNDEV_SUCCESS, None, false).is_ok());
        assert!(status_error(ffi::CNDEV_SUCCESS, None, true).is_ok());
    }

    #[test]
    fn test_status_native_error_carries_diagnostic() {
        let msg = CStr::from_bytes_with_nul(b"low driver version\0").unwrap();
        let err = status_error(2, Some(msg), false).unwrap_err();
        assert_eq!(err, CndevError::native(2, "low driver version"));
        assert_eq!(err.to_string(), "cndev: low driver version");
    }

    #[test]
    fn test_status_null_diagnostic_uses_code() {
        let err = status_error(7, None, false).unwrap_err();
        assert_eq!(err, CndevError::native(7, "error code 7"));
    }

    #[test]
    fn test_status_missing_driver_at_init_is_load_error() {
        let msg = CStr::from_bytes_with_nul(b"no driver\0").unwrap();
        for code in [ffi::CNDEV_ERROR_NO_DRIVER, ffi::CNDEV_ERROR_UNINITIALIZED] {
            let err = status_error(code, Some(msg), true).unwrap_err();
            assert!(err.is_load_error());
            assert_eq!(err, CndevError::LibraryNotFound("no driver".to_string()));
        }
    }

    #[test]
    fn test_status_missing_driver_after_init_is_native() {
        let err = status_error(ffi::CNDEV_ERROR_UNINITIALIZED, None, false).unwrap_err();
        assert!(!err.is_load_error());
        assert_eq!(err, CndevError::native(4, "error code 4"));
    }

    #[test]
    fn test_status_other_code_at_init_is_native() {
        let err = status_error(2, None, true).unwrap_err();
        assert!(!err.is_load_error());
    }

    // Needs a Cambricon driver installation.
    #[test]
    #[ignore = "Requires Cambricon MLU driver"]
    fn test_init_and_count() {
        let lib = CndevLibrary::open_default().unwrap();
        lib.init().unwrap();
        assert!(lib.device_count().is_ok());
        lib.release().unwrap();
    }
}
