#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wayfare_core::driver::DriverResult;
use wayfare_core::store::StoreResult;
use wayfare_core::{DriverError, DriverFactory, Locator, Record, Store, StoreError, UiDriver};

/// Every side effect the fake driver was asked to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Navigate(String),
    Click(Locator),
    Select(Locator, String),
    Type(Locator, String),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FakeHandle {
    Element(Locator),
    Row(usize),
    Cell(String),
}

#[derive(Debug, Default)]
pub struct PageState {
    pub elements: HashMap<Locator, String>,
    /// Locators whose lookup fails with a driver error instead of a timeout
    pub broken: HashSet<Locator>,
    pub rows: Vec<Vec<String>>,
    pub source: String,
    pub calls: Vec<Call>,
    pub lookups: Vec<(Locator, Duration)>,
    /// Number of upcoming `navigate` calls that fail
    pub navigate_failures: usize,
}

/// Scripted page shared between a factory and the drivers it hands out
#[derive(Clone, Default)]
pub struct FakeSite {
    pub state: Arc<Mutex<PageState>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, locator: Locator, text: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .elements
            .insert(locator, text.to_string());
        self
    }

    pub fn with_rows(self, rows: &[&[&str]]) -> Self {
        self.state.lock().unwrap().rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self
    }

    pub fn with_broken_lookup(self, locator: Locator) -> Self {
        self.state.lock().unwrap().broken.insert(locator);
        self
    }

    pub fn with_source(self, source: &str) -> Self {
        self.state.lock().unwrap().source = source.to_string();
        self
    }

    pub fn failing_navigations(self, count: usize) -> Self {
        self.state.lock().unwrap().navigate_failures = count;
        self
    }

    pub fn driver(&self) -> FakeDriver {
        FakeDriver {
            state: self.state.clone(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn lookups(&self) -> Vec<(Locator, Duration)> {
        self.state.lock().unwrap().lookups.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

pub struct FakeDriver {
    state: Arc<Mutex<PageState>>,
}

impl FakeDriver {
    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl UiDriver for FakeDriver {
    type Handle = FakeHandle;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Navigate(url.to_string()));
        if state.navigate_failures > 0 {
            state.navigate_failures -= 1;
            return Err(DriverError::Command("session disconnected".to_string()));
        }
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> DriverResult<FakeHandle> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push((locator.clone(), timeout));
        if state.broken.contains(locator) {
            return Err(DriverError::Command("stale element reference".to_string()));
        }
        if *locator == Locator::css("table tr") && !state.rows.is_empty() {
            return Ok(FakeHandle::Row(0));
        }
        if state.elements.contains_key(locator) {
            Ok(FakeHandle::Element(locator.clone()))
        } else {
            Err(DriverError::Timeout {
                locator: locator.to_string(),
                timeout,
            })
        }
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<FakeHandle>> {
        let state = self.state.lock().unwrap();
        if *locator == Locator::css("table tr") {
            return Ok((0..state.rows.len()).map(FakeHandle::Row).collect());
        }
        Ok(state
            .elements
            .keys()
            .filter(|l| *l == locator)
            .map(|l| FakeHandle::Element(l.clone()))
            .collect())
    }

    async fn find_within(
        &self,
        parent: &FakeHandle,
        _locator: &Locator,
    ) -> DriverResult<Vec<FakeHandle>> {
        let state = self.state.lock().unwrap();
        match parent {
            FakeHandle::Row(i) => Ok(state.rows[*i]
                .iter()
                .map(|c| FakeHandle::Cell(c.clone()))
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn read_text(&self, handle: &FakeHandle) -> DriverResult<String> {
        let state = self.state.lock().unwrap();
        match handle {
            FakeHandle::Element(locator) => Ok(state.elements[locator].clone()),
            FakeHandle::Cell(text) => Ok(text.clone()),
            FakeHandle::Row(_) => Err(DriverError::Command("row has no text".to_string())),
        }
    }

    async fn click(&self, handle: &FakeHandle) -> DriverResult<()> {
        if let FakeHandle::Element(locator) = handle {
            self.record(Call::Click(locator.clone()));
        }
        Ok(())
    }

    async fn select_by_visible_text(&self, handle: &FakeHandle, text: &str) -> DriverResult<()> {
        if let FakeHandle::Element(locator) = handle {
            self.record(Call::Select(locator.clone(), text.to_string()));
        }
        Ok(())
    }

    async fn clear_and_type(&self, handle: &FakeHandle, text: &str) -> DriverResult<()> {
        if let FakeHandle::Element(locator) = handle {
            self.record(Call::Type(locator.clone(), text.to_string()));
        }
        Ok(())
    }

    async fn page_source(&self) -> DriverResult<String> {
        Ok(self.state.lock().unwrap().source.clone())
    }

    async fn quit(self) -> DriverResult<()> {
        self.record(Call::Quit);
        Ok(())
    }
}

#[async_trait]
impl DriverFactory for FakeSite {
    type Driver = FakeDriver;

    async fn connect(&self) -> DriverResult<FakeDriver> {
        Ok(self.driver())
    }
}

/// Store that keeps committed records in memory
#[derive(Default)]
pub struct RecordingStore {
    pub pending: Mutex<Vec<Record>>,
    pub committed: Mutex<Vec<Record>>,
    pub commits: Mutex<usize>,
    pub fail_commit: bool,
}

impl RecordingStore {
    pub fn committed(&self) -> Vec<Record> {
        self.committed.lock().unwrap().clone()
    }

    pub fn commit_count(&self) -> usize {
        *self.commits.lock().unwrap()
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn init_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn add(&self, record: Record) -> StoreResult<()> {
        self.pending.lock().unwrap().push(record);
        Ok(())
    }

    async fn commit(&self) -> StoreResult<usize> {
        if self.fail_commit {
            return Err(StoreError::Query("disk full".to_string()));
        }
        let mut pending = self.pending.lock().unwrap();
        let count = pending.len();
        self.committed.lock().unwrap().append(&mut pending);
        *self.commits.lock().unwrap() += 1;
        Ok(count)
    }
}

/// Captured log output for the current thread
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
