//! Test doubles for the device ports.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::string::String;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use embedded_storage::nor_flash::{ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash};

use power_stand::color::Rgb;
use power_stand::domain::dto::InboundMessage;
use power_stand::domain::entity::DeviceState;
use power_stand::domain::error::{NetworkError, OutputError, StorageError};
use power_stand::domain::ports::{
    BrokerClient, ConfigStore, DisplaySink, LedSink, NetworkLink, Point, RandomSource, Rect,
    TextSize,
};
use power_stand::infrastructure::context::{DeviceContext, DeviceIdentity};

pub const MAC: [u8; 6] = [0x24, 0x6f, 0x28, 0xaa, 0xbb, 0xcc];
pub const BASE_TOPIC: &str = "homeassistant/light/powerstand_246f28aabbcc";

pub fn topic(suffix: &str) -> String {
    format!("{}{}", BASE_TOPIC, suffix)
}

pub fn context_with(state: DeviceState) -> DeviceContext {
    let identity = DeviceIdentity::new("Power Stand", "light", MAC).unwrap();
    DeviceContext::new(identity, state)
}

pub fn context() -> DeviceContext {
    context_with(DeviceState::new())
}

// -----------------------------------------------------------------------------
// LED strip
// -----------------------------------------------------------------------------

/// Strip that records every flushed frame
pub struct RecordingStrip {
    pixels: Vec<Rgb>,
    pub flushes: Vec<Vec<Rgb>>,
}

impl RecordingStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::default(); len],
            flushes: Vec::new(),
        }
    }

    pub fn last_flush(&self) -> Option<&[Rgb]> {
        self.flushes.last().map(Vec::as_slice)
    }
}

impl LedSink for RecordingStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn write(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.flushes.push(self.pixels.clone());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Delay
// -----------------------------------------------------------------------------

/// Delay that returns immediately and records the requested waits.
///
/// An optional hook runs once, right after the `n`-th wait.
pub struct MockDelay<'a> {
    pub waits_ms: Vec<u32>,
    hook: Option<(usize, Box<dyn FnOnce() + 'a>)>,
}

impl<'a> MockDelay<'a> {
    pub fn new() -> Self {
        Self {
            waits_ms: Vec::new(),
            hook: None,
        }
    }

    pub fn with_hook(after_waits: usize, hook: impl FnOnce() + 'a) -> Self {
        Self {
            waits_ms: Vec::new(),
            hook: Some((after_waits, Box::new(hook))),
        }
    }

    fn record(&mut self, ms: u32) {
        self.waits_ms.push(ms);
        let due = matches!(&self.hook, Some((n, _)) if *n == self.waits_ms.len());
        if due {
            if let Some((_, hook)) = self.hook.take() {
                hook();
            }
        }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms);
    }
}

// -----------------------------------------------------------------------------
// Random source
// -----------------------------------------------------------------------------

/// Deterministic counter
pub struct CounterRng(pub u32);

impl RandomSource for CounterRng {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(0x0100_0000);
        self.0
    }
}

// -----------------------------------------------------------------------------
// Network
// -----------------------------------------------------------------------------

pub struct MockLink {
    pub connected: Cell<bool>,
    pub address: Cell<Option<Ipv4Addr>>,
    pub time: Cell<Option<u64>>,
    pub clock_syncs: Cell<usize>,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            connected: Cell::new(false),
            address: Cell::new(None),
            time: Cell::new(Some(1_700_000_000)),
            clock_syncs: Cell::new(0),
        }
    }

    pub fn connect(&self, address: Ipv4Addr) {
        self.connected.set(true);
        self.address.set(Some(address));
    }

    pub fn disconnect(&self) {
        self.connected.set(false);
        self.address.set(None);
    }
}

impl NetworkLink for &MockLink {
    fn is_connected(&mut self) -> bool {
        self.connected.get()
    }

    fn current_address(&mut self) -> Option<Ipv4Addr> {
        self.address.get()
    }

    async fn sync_clock(&mut self) -> Result<u64, NetworkError> {
        self.clock_syncs.set(self.clock_syncs.get() + 1);
        self.time.get().ok_or(NetworkError::ClockUnavailable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub retain: bool,
}

/// In-memory broker session
#[derive(Default)]
pub struct MockBroker {
    pub connects: usize,
    pub subscriptions: Vec<String>,
    pub published: Vec<Published>,
    pub inbound: VecDeque<InboundMessage>,
    pub fail_connect: bool,
    pub fail_publish: bool,
    pub fail_poll: bool,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&mut self, topic: &str, payload: &str) {
        let message = InboundMessage::new(topic, payload.as_bytes()).unwrap();
        self.inbound.push_back(message);
    }

    pub fn published_on(&self, topic: &str) -> Vec<&Published> {
        self.published.iter().filter(|p| p.topic == topic).collect()
    }
}

impl BrokerClient for MockBroker {
    async fn connect(&mut self) -> Result<(), NetworkError> {
        if self.fail_connect {
            return Err(NetworkError::Transport);
        }
        self.connects += 1;
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), NetworkError> {
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        retain: bool,
    ) -> Result<(), NetworkError> {
        if self.fail_publish {
            return Err(NetworkError::Transport);
        }
        self.published.push(Published {
            topic: topic.to_string(),
            payload: String::from_utf8(payload.to_vec()).unwrap(),
            retain,
        });
        Ok(())
    }

    async fn poll(&mut self) -> Result<Option<InboundMessage>, NetworkError> {
        if self.fail_poll {
            return Err(NetworkError::Protocol);
        }
        Ok(self.inbound.pop_front())
    }
}

// -----------------------------------------------------------------------------
// Storage
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    pub data: RefCell<Option<Vec<u8>>>,
    pub writes: Cell<usize>,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: &[u8]) -> Self {
        let store = Self::default();
        store.data.replace(Some(data.to_vec()));
        store
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.borrow().clone()
    }
}

impl ConfigStore for &MemoryStore {
    async fn load(&mut self) -> Result<Vec<u8>, StorageError> {
        self.data
            .borrow()
            .clone()
            .ok_or(StorageError::InvalidMagicHeader)
    }

    async fn store(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::DriverError);
        }
        self.data.replace(Some(data.to_vec()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Display
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rect),
    Text(String, Point, TextSize),
    Flush,
}

#[derive(Default)]
pub struct RecordingPanel {
    pub ops: Vec<DrawOp>,
}

impl RecordingPanel {
    pub fn texts(&self) -> Vec<(&str, Point, TextSize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, point, size) => Some((text.as_str(), *point, *size)),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingPanel {
    fn clear_region(&mut self, region: Rect) -> Result<(), OutputError> {
        self.ops.push(DrawOp::Clear(region));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Point, size: TextSize) -> Result<(), OutputError> {
        self.ops.push(DrawOp::Text(text.to_string(), position, size));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.ops.push(DrawOp::Flush);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Flash
// -----------------------------------------------------------------------------

/// NOR flash in memory. Writes can only clear bits, like the real part.
pub struct MemFlash {
    pub bytes: Vec<u8>,
    /// Bytes the next write gets through before it fails
    pub cut_write_after: Option<usize>,
}

impl MemFlash {
    pub fn new(size: u32) -> Self {
        Self {
            bytes: vec![0xFF; size as usize],
            cut_write_after: None,
        }
    }

    fn range(&self, offset: u32, len: usize) -> Result<std::ops::Range<usize>, NorFlashErrorKind> {
        let start = offset as usize;
        if start % 4 != 0 || len % 4 != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        if start + len > self.bytes.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        Ok(start..start + len)
    }
}

impl ErrorType for MemFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for MemFlash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl NorFlash for MemFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = 4096;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let range = self.range(from, (to - from) as usize)?;
        self.bytes[range].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        let allowed = self
            .cut_write_after
            .take()
            .map_or(bytes.len(), |n| n.min(bytes.len()));
        for (cell, byte) in self.bytes[range].iter_mut().zip(&bytes[..allowed]) {
            *cell &= *byte;
        }
        if allowed < bytes.len() {
            return Err(NorFlashErrorKind::Other);
        }
        Ok(())
    }
}
