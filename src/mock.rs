//! Mock implementations for testing
//!
//! Provides an in-memory CNDEV library and process table so the query
//! protocol can be exercised without MLU hardware or a real `/proc`.

use crate::cndev::{NativeLibrary, RawMemoryUsage, RawProcessSlot};
use crate::domain::{CardModel, PROCESS_SLOTS};
use crate::error::CndevError;
use crate::process::ProcessTable;

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

/// Native status the mock reports for an out-of-range index
pub const MOCK_INVALID_DEVICE: i32 = 6;

/// Native calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Init,
    Release,
    DeviceCount,
    CardModel,
    CardSerial,
    Health,
    Memory,
    Utilization,
    ProcessList,
}

/// One simulated MLU card
#[derive(Debug, Clone)]
pub struct MockCard {
    pub serial: i64,
    pub model: CardModel,
    pub health: i32,
    pub memory: RawMemoryUsage,
    pub utilization: i32,
    /// Active processes as `(pid, KiB)`; remaining slots are empty
    pub processes: Vec<RawProcessSlot>,
}

impl MockCard {
    /// Create a healthy MLU270 card with the given serial
    pub fn new(serial: i64) -> Self {
        Self {
            serial,
            model: CardModel::Mlu270,
            health: 1,
            memory: RawMemoryUsage {
                total: 16 * 1024 * 1024 * 1024,
                used: 0,
            },
            utilization: 0,
            processes: Vec::new(),
        }
    }

    /// Builder: set model
    pub fn with_model(mut self, model: CardModel) -> Self {
        self.model = model;
        self
    }

    /// Builder: set health code
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Builder: set memory reading
    pub fn with_memory(mut self, total: i64, used: i64) -> Self {
        self.memory = RawMemoryUsage { total, used };
        self
    }

    /// Builder: set utilization
    pub fn with_utilization(mut self, utilization: i32) -> Self {
        self.utilization = utilization;
        self
    }

    /// Builder: add a process using `kib` of device memory
    pub fn with_process(mut self, pid: u32, kib: u64) -> Self {
        self.processes.push((pid, kib));
        self
    }
}

/// Mock CNDEV library for testing
#[derive(Debug, Default)]
pub struct MockLibrary {
    cards: RwLock<Vec<MockCard>>,
    failures: Mutex<HashMap<MockCall, CndevError>>,
    init_calls: AtomicUsize,
    release_calls: AtomicUsize,
    serial_calls: AtomicUsize,
}

impl MockLibrary {
    /// Create a mock library with the given cards
    pub fn new(cards: Vec<MockCard>) -> Self {
        Self {
            cards: RwLock::new(cards),
            ..Default::default()
        }
    }

    /// Create a mock library with `count` MLU270 cards, serials 1..=count
    pub fn with_cards(count: u32) -> Self {
        Self::new((1..=count as i64).map(MockCard::new).collect())
    }

    /// Make every later call of `call` fail with `error`
    pub fn fail(&self, call: MockCall, error: CndevError) {
        self.failures.lock().unwrap().insert(call, error);
    }

    /// Stop failing `call`
    pub fn recover(&self, call: MockCall) {
        self.failures.lock().unwrap().remove(&call);
    }

    /// Change the serial a card reports from now on
    pub fn set_serial(&self, index: u32, serial: i64) {
        self.cards.write().unwrap()[index as usize].serial = serial;
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub fn serial_calls(&self) -> usize {
        self.serial_calls.load(Ordering::SeqCst)
    }

    fn check(&self, call: MockCall) -> Result<(), CndevError> {
        match self.failures.lock().unwrap().get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn card(&self, call: MockCall, index: u32) -> Result<MockCard, CndevError> {
        self.check(call)?;
        self.cards
            .read()
            .unwrap()
            .get(index as usize)
            .cloned()
            .ok_or_else(|| CndevError::native(MOCK_INVALID_DEVICE, "invalid device id"))
    }
}

impl NativeLibrary for MockLibrary {
    fn init(&self) -> Result<(), CndevError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.check(MockCall::Init)
    }

    fn release(&self) -> Result<(), CndevError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.check(MockCall::Release)
    }

    fn device_count(&self) -> Result<u32, CndevError> {
        self.check(MockCall::DeviceCount)?;
        Ok(self.cards.read().unwrap().len() as u32)
    }

    fn card_model(&self, index: u32) -> Result<CardModel, CndevError> {
        Ok(self.card(MockCall::CardModel, index)?.model)
    }

    fn card_serial(&self, index: u32) -> Result<i64, CndevError> {
        self.serial_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.card(MockCall::CardSerial, index)?.serial)
    }

    fn health_code(&self, index: u32) -> Result<i32, CndevError> {
        Ok(self.card(MockCall::Health, index)?.health)
    }

    fn memory_usage(&self, index: u32) -> Result<RawMemoryUsage, CndevError> {
        Ok(self.card(MockCall::Memory, index)?.memory)
    }

    fn utilization(&self, index: u32) -> Result<i32, CndevError> {
        Ok(self.card(MockCall::Utilization, index)?.utilization)
    }

    fn process_list(&self, index: u32) -> Result<[RawProcessSlot; PROCESS_SLOTS], CndevError> {
        let card = self.card(MockCall::ProcessList, index)?;
        let mut slots = [(0, 0); PROCESS_SLOTS];
        for (slot, process) in slots.iter_mut().zip(card.processes) {
            *slot = process;
        }
        Ok(slots)
    }
}

/// In-memory process table
#[derive(Debug, Default)]
pub struct MockProcessTable {
    records: HashMap<u32, io::Result<String>>,
}

impl MockProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a process record (raw, including trailing newline)
    pub fn with_process(mut self, pid: u32, record: impl Into<String>) -> Self {
        self.records.insert(pid, Ok(record.into()));
        self
    }

    /// Builder: make lookups for `pid` fail with `kind`
    pub fn with_failure(mut self, pid: u32, kind: io::ErrorKind) -> Self {
        self.records.insert(pid, Err(io::Error::from(kind)));
        self
    }
}

impl ProcessTable for MockProcessTable {
    fn read_name(&self, pid: u32) -> io::Result<String> {
        match self.records.get(&pid) {
            Some(Ok(record)) => Ok(record.clone()),
            Some(Err(e)) => Err(io::Error::from(e.kind())),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_library_cards() {
        let lib = MockLibrary::with_cards(2);
        assert_eq!(lib.device_count().unwrap(), 2);
        assert_eq!(lib.card_serial(0).unwrap(), 1);
        assert_eq!(lib.card_serial(1).unwrap(), 2);
        assert_eq!(lib.serial_calls(), 2);
    }

    #[test]
    fn test_mock_library_invalid_index() {
        let lib = MockLibrary::with_cards(1);
        let err = lib.card_model(5).unwrap_err();
        assert!(matches!(err, CndevError::Native { code: MOCK_INVALID_DEVICE, .. }));
    }

    #[test]
    fn test_mock_library_failure_injection() {
        let lib = MockLibrary::with_cards(1);
        lib.fail(MockCall::Memory, CndevError::native(7, "unknown error"));
        assert!(lib.memory_usage(0).is_err());

        lib.recover(MockCall::Memory);
        assert!(lib.memory_usage(0).is_ok());
    }

    #[test]
    fn test_mock_process_slots() {
        let lib = MockLibrary::new(vec![MockCard::new(1).with_process(10, 2048)]);
        let slots = lib.process_list(0).unwrap();
        assert_eq!(slots[0], (10, 2048));
        assert_eq!(slots[1], (0, 0));
    }

    #[test]
    fn test_mock_process_table() {
        let table = MockProcessTable::new()
            .with_process(1, "init\n")
            .with_failure(2, io::ErrorKind::PermissionDenied);

        assert_eq!(table.read_name(1).unwrap(), "init\n");
        assert_eq!(
            table.read_name(2).unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        assert_eq!(table.read_name(3).unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
