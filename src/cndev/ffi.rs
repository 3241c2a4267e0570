//! Raw CNDEV C ABI
//!
//! Struct layouts and function signatures for the subset of `libcndev.so`
//! this crate binds. Every request struct starts with a `version` field
//! that must hold the protocol version the caller was built against.

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_int, c_uint, c_ulong};

/// Protocol version stamped on request structs
pub const CNDEV_VERSION: c_int = 3;

/// The device-count struct has always been stamped with version 1
pub const CNDEV_CARD_INFO_VERSION: c_int = 1;

pub type cndevRet_t = c_int;

pub const CNDEV_SUCCESS: cndevRet_t = 0;
pub const CNDEV_ERROR_NO_DRIVER: cndevRet_t = 1;
pub const CNDEV_ERROR_UNINITIALIZED: cndevRet_t = 4;

/// Capacity of the process array passed to `cndevGetProcessInfo`
pub const PROCESS_INFO_CAPACITY: usize = crate::domain::PROCESS_SLOTS;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cndevCardInfo_t {
    pub version: c_int,
    pub Number: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cndevCardName_t {
    pub version: c_int,
    pub id: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cndevCardSN_t {
    pub version: c_int,
    pub sn: i64,
    pub motherBoardSn: i64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cndevCardHealthState_t {
    pub version: c_int,
    pub health: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cndevMemoryInfo_t {
    pub version: c_int,
    pub PhysicalMemoryTotal: i64,
    pub PhysicalMemoryUsed: i64,
    pub VirtualMemoryTotal: i64,
    pub VirtualMemoryUsed: i64,
    pub ChannelNumber: i64,
    pub ChannelMemoryUsed: [i64; 20],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cndevUtilizationInfo_t {
    pub version: c_int,
    pub BoardUtilization: c_int,
    pub CoreUtilization: [c_int; 80],
}

impl Default for cndevUtilizationInfo_t {
    fn default() -> Self {
        Self {
            version: 0,
            BoardUtilization: 0,
            CoreUtilization: [0; 80],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cndevProcessInfo_t {
    pub version: c_int,
    pub pid: c_uint,
    pub PhysicalMemoryUsed: c_ulong,
    pub VirtualMemoryUsed: c_ulong,
}

pub type cndevInitFn = unsafe extern "C" fn(reserved: c_int) -> cndevRet_t;
pub type cndevReleaseFn = unsafe extern "C" fn() -> cndevRet_t;
pub type cndevGetErrorStringFn = unsafe extern "C" fn(errorId: cndevRet_t) -> *const c_char;
pub type cndevGetDeviceCountFn = unsafe extern "C" fn(cardNum: *mut cndevCardInfo_t) -> cndevRet_t;
pub type cndevGetCardNameFn =
    unsafe extern "C" fn(cardName: *mut cndevCardName_t, devId: c_int) -> cndevRet_t;
pub type cndevGetCardSNFn =
    unsafe extern "C" fn(cardSN: *mut cndevCardSN_t, devId: c_int) -> cndevRet_t;
pub type cndevGetCardHealthStateFn =
    unsafe extern "C" fn(cardHealthState: *mut cndevCardHealthState_t, devId: c_int) -> cndevRet_t;
pub type cndevGetMemoryUsageFn =
    unsafe extern "C" fn(memInfo: *mut cndevMemoryInfo_t, devId: c_int) -> cndevRet_t;
pub type cndevGetDeviceUtilizationInfoFn =
    unsafe extern "C" fn(utilInfo: *mut cndevUtilizationInfo_t, devId: c_int) -> cndevRet_t;
pub type cndevGetProcessInfoFn = unsafe extern "C" fn(
    infoCount: *mut c_uint,
    procInfo: *mut cndevProcessInfo_t,
    devId: c_int,
) -> cndevRet_t;
