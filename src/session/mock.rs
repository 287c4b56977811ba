// src/session/mock.rs

//! Recording bus/timer double shared by the session tests.

extern crate std;

use crate::common::hal_traits::{OemBus, OemTimer};
use std::collections::VecDeque;
use std::vec::Vec;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockBusError;

/// Every call the session made, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    ReadBlock { register: u8, len: usize },
    ReadByte { register: u8 },
    WriteBlock { register: u8, bytes: Vec<u8> },
    WriteByte { register: u8, byte: u8 },
    Delay(u32),
}

#[derive(Debug)]
pub(crate) struct MockInterface {
    pub events: Vec<Event>,
    pub addresses: Vec<u8>,
    responses: VecDeque<Vec<u8>>,
    /// Fail the bus call with this index (delays are not counted).
    fail_at: Option<usize>,
    bus_calls: usize,
}

impl MockInterface {
    pub fn new() -> Self {
        MockInterface {
            events: Vec::new(),
            addresses: Vec::new(),
            responses: VecDeque::new(),
            fail_at: None,
            bus_calls: 0,
        }
    }

    /// Queues the bytes returned by the next read.
    pub fn stage_read(&mut self, data: &[u8]) -> &mut Self {
        self.responses.push_back(data.to_vec());
        self
    }

    pub fn fail_on_call(&mut self, index: usize) -> &mut Self {
        self.fail_at = Some(index);
        self
    }

    /// Events without the delays.
    pub fn bus_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !matches!(e, Event::Delay(_)))
            .cloned()
            .collect()
    }

    pub fn total_delay_ms(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                Event::Delay(ms) => *ms,
                _ => 0,
            })
            .sum()
    }

    fn bus_call(&mut self, address: u8, event: Event) -> Result<(), MockBusError> {
        let index = self.bus_calls;
        self.bus_calls += 1;
        self.addresses.push(address);
        self.events.push(event);
        if self.fail_at == Some(index) {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }

    fn next_response(&mut self, len: usize) -> Vec<u8> {
        let data = self.responses.pop_front().expect("read without staged response");
        assert_eq!(data.len(), len, "staged response has the wrong length");
        data
    }
}

impl OemTimer for MockInterface {
    fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::Delay(ms));
    }
}

impl OemBus for MockInterface {
    type Error = MockBusError;

    fn read_block(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.bus_call(address, Event::ReadBlock { register, len: buffer.len() })?;
        let data = self.next_response(buffer.len());
        buffer.copy_from_slice(&data);
        Ok(())
    }

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        self.bus_call(address, Event::ReadByte { register })?;
        Ok(self.next_response(1)[0])
    }

    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.bus_call(address, Event::WriteBlock { register, bytes: bytes.to_vec() })
    }

    fn write_byte(&mut self, address: u8, register: u8, byte: u8) -> Result<(), Self::Error> {
        self.bus_call(address, Event::WriteByte { register, byte })
    }
}
