//! In-memory model of an AVR TWI controller in master mode.
//!
//! [`SimulatedTwi`] implements [`Registers`] and runs a job as soon as
//! `TWINT` is written with `TWEN` set, completing it instantly. Peers on
//! the simulated bus implement [`Peer`].

use heapless::{Deque, Vec};

use super::{
    registers::{Registers, Twar, Twcr, Twsr},
    Address, Direction, StatusCode,
};

const EVENTS: usize = 32;

/// A target device attached to the simulated bus.
pub trait Peer {
    fn address(&self) -> Address;

    /// Called when the peer's address goes out on the bus. Returning
    /// `false` leaves the address unacknowledged.
    fn select(&mut self, _direction: Direction) -> bool {
        true
    }

    /// Receives a byte from the master. Returns whether it is acknowledged.
    fn write(&mut self, byte: u8) -> bool;

    /// Supplies the next byte requested by the master.
    fn read(&mut self) -> u8;

    fn stop(&mut self) {}
}

/// Something that happened on the simulated wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Address {
        address: Address,
        direction: Direction,
        acked: bool,
    },
    Write {
        byte: u8,
        acked: bool,
    },
    Read {
        byte: u8,
        acked: bool,
    },
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Started,
    Transmit(Option<usize>),
    Receive(Option<usize>),
}

/// Software TWI controller with up to `N` attached peers.
pub struct SimulatedTwi<P: Peer, const N: usize> {
    twbr: u8,
    prescaler: u8,
    status: StatusCode,
    twar: Twar,
    twcr: Twcr,
    twdr: u8,
    phase: Phase,
    stalled: bool,
    fault: Option<(usize, StatusCode)>,
    peers: Vec<P, N>,
    events: Deque<BusEvent, EVENTS>,
}

impl<P: Peer, const N: usize> Default for SimulatedTwi<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Peer, const N: usize> SimulatedTwi<P, N> {
    /// A controller in its reset state: everything zero, status `0xF8`.
    pub fn new() -> Self {
        Self {
            twbr: 0,
            prescaler: 0,
            status: StatusCode::NO_INFO,
            twar: Twar::new(),
            twcr: Twcr::new(),
            twdr: 0xFF,
            phase: Phase::Idle,
            stalled: false,
            fault: None,
            peers: Vec::new(),
            events: Deque::new(),
        }
    }

    /// Attaches a peer, handing it back if the bus is full.
    pub fn attach(&mut self, peer: P) -> Result<(), P> {
        self.peers.push(peer)
    }

    pub fn with_peer(mut self, peer: P) -> Result<Self, P> {
        self.attach(peer)?;
        Ok(self)
    }

    pub fn peers(&self) -> &[P] {
        &self.peers
    }

    pub fn peers_mut(&mut self) -> &mut [P] {
        &mut self.peers
    }

    /// While stalled, jobs are accepted but never complete.
    pub fn set_stalled(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// Lets `jobs` more jobs run normally, then completes the next one with
    /// `status` instead of its usual outcome. Losing arbitration or a bus
    /// error also drops the controller out of master mode. STOP requests do
    /// not count as jobs.
    pub fn fail_after(&mut self, jobs: usize, status: StatusCode) {
        self.fault = Some((jobs, status));
    }

    /// The most recent bus events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &BusEvent> + '_ {
        self.events.iter()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: BusEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        let _ = self.events.push_back(event);
    }

    fn peer_for(&self, address: Address) -> Option<usize> {
        self.peers.iter().position(|peer| peer.address() == address)
    }

    fn stop(&mut self) {
        if let Phase::Transmit(Some(idx)) | Phase::Receive(Some(idx)) = self.phase {
            self.peers[idx].stop();
        }
        self.phase = Phase::Idle;
        self.status = StatusCode::NO_INFO;
        self.twcr.set(Twcr::TWSTO, false);
        self.record(BusEvent::Stop);
    }

    fn start(&mut self) {
        if self.phase == Phase::Idle {
            self.status = StatusCode::START;
            self.record(BusEvent::Start);
        } else {
            self.status = StatusCode::REP_START;
            self.record(BusEvent::RepeatedStart);
        }
        self.phase = Phase::Started;
    }

    fn address(&mut self) {
        let (address, direction) = Address::from_byte(self.twdr);
        let peer = self.peer_for(address);
        let acked = match peer {
            Some(idx) => self.peers[idx].select(direction),
            None => false,
        };
        let peer = peer.filter(|_| acked);

        self.status = match (direction, acked) {
            (Direction::Write, true) => StatusCode::MT_SLA_ACK,
            (Direction::Write, false) => StatusCode::MT_SLA_NACK,
            (Direction::Read, true) => StatusCode::MR_SLA_ACK,
            (Direction::Read, false) => StatusCode::MR_SLA_NACK,
        };
        self.phase = match direction {
            Direction::Write => Phase::Transmit(peer),
            Direction::Read => Phase::Receive(peer),
        };
        self.record(BusEvent::Address {
            address,
            direction,
            acked,
        });
    }

    fn transmit(&mut self, peer: Option<usize>) {
        let byte = self.twdr;
        let acked = match peer {
            Some(idx) => self.peers[idx].write(byte),
            None => false,
        };
        self.status = if acked {
            StatusCode::MT_DATA_ACK
        } else {
            StatusCode::MT_DATA_NACK
        };
        self.record(BusEvent::Write { byte, acked });
    }

    fn receive(&mut self, peer: Option<usize>, ack: bool) {
        // An unanswered bus reads as all ones.
        let byte = match peer {
            Some(idx) => self.peers[idx].read(),
            None => 0xFF,
        };
        self.twdr = byte;
        self.status = if ack {
            StatusCode::MR_DATA_ACK
        } else {
            StatusCode::MR_DATA_NACK
        };
        self.record(BusEvent::Read { byte, acked: ack });
    }

    fn inject(&mut self) -> Option<StatusCode> {
        match self.fault.take()? {
            (0, status) => Some(status),
            (jobs, status) => {
                self.fault = Some((jobs - 1, status));
                None
            }
        }
    }

    fn run(&mut self, job: Twcr) {
        if job.get(Twcr::TWSTO) {
            // No TWINT after a STOP.
            self.stop();
            return;
        }

        if let Some(status) = self.inject() {
            self.status = status;
            if status == StatusCode::ARB_LOST || status == StatusCode::BUS_ERROR {
                self.phase = Phase::Idle;
            }
        } else if job.get(Twcr::TWSTA) {
            self.start();
        } else {
            match self.phase {
                Phase::Started => self.address(),
                Phase::Transmit(peer) => self.transmit(peer),
                Phase::Receive(peer) => self.receive(peer, job.get(Twcr::TWEA)),
                // Data job without owning the bus: reported as a bus error.
                Phase::Idle => self.status = StatusCode::BUS_ERROR,
            }
        }
        self.twcr.set(Twcr::TWINT, true);
    }
}

impl<P: Peer, const N: usize> Registers for SimulatedTwi<P, N> {
    fn twcr(&self) -> Twcr {
        self.twcr
    }

    fn set_twcr(&mut self, value: Twcr) {
        let flag = self.twcr.get(Twcr::TWINT);
        let clear = value.get(Twcr::TWINT);
        self.twcr = value;
        self.twcr.set(Twcr::TWINT, flag && !clear);

        if clear && value.get(Twcr::TWEN) && !self.stalled {
            self.run(value);
        }
    }

    fn twsr(&self) -> Twsr {
        Twsr::from_bits(self.status.bits() | self.prescaler)
    }

    fn set_twsr(&mut self, value: Twsr) {
        self.prescaler = value.get(Twsr::TWPS);
    }

    fn twbr(&self) -> u8 {
        self.twbr
    }

    fn set_twbr(&mut self, value: u8) {
        self.twbr = value;
    }

    fn twar(&self) -> Twar {
        self.twar
    }

    fn set_twar(&mut self, value: Twar) {
        self.twar = value;
    }

    fn twdr(&self) -> u8 {
        self.twdr
    }

    fn set_twdr(&mut self, value: u8) {
        self.twdr = value;
    }
}

/// Register-pointer memory, the way serial EEPROMs and most sensors behave.
///
/// The first byte of a write sets the pointer, the following ones are
/// stored at it. Reads return bytes from the pointer on. The pointer wraps
/// at `SIZE`. A `MemoryPeer<0>` acknowledges its address and the pointer
/// byte, refuses data and reads as `0xFF`.
pub struct MemoryPeer<const SIZE: usize> {
    address: Address,
    memory: [u8; SIZE],
    pointer: usize,
    expect_pointer: bool,
    read_only: bool,
}

impl<const SIZE: usize> MemoryPeer<SIZE> {
    pub fn new(address: Address) -> Self {
        Self::with_contents(address, [0; SIZE])
    }

    pub fn with_contents(address: Address, memory: [u8; SIZE]) -> Self {
        Self {
            address,
            memory,
            pointer: 0,
            expect_pointer: false,
            read_only: false,
        }
    }

    /// Acknowledge the pointer byte but refuse data bytes.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn memory(&self) -> &[u8; SIZE] {
        &self.memory
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }
}

impl<const SIZE: usize> Peer for MemoryPeer<SIZE> {
    fn address(&self) -> Address {
        self.address
    }

    fn select(&mut self, direction: Direction) -> bool {
        self.expect_pointer = direction == Direction::Write;
        true
    }

    fn write(&mut self, byte: u8) -> bool {
        if self.expect_pointer {
            self.expect_pointer = false;
            self.pointer = usize::from(byte).checked_rem(SIZE).unwrap_or(0);
            true
        } else if self.read_only {
            false
        } else if let Some(slot) = self.memory.get_mut(self.pointer) {
            *slot = byte;
            self.pointer = (self.pointer + 1) % SIZE;
            true
        } else {
            // Zero-sized memory: nowhere to store it.
            false
        }
    }

    fn read(&mut self) -> u8 {
        match self.memory.get(self.pointer) {
            Some(&byte) => {
                self.pointer = (self.pointer + 1) % SIZE;
                byte
            }
            None => 0xFF,
        }
    }
}
