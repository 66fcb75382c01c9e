//! Whole transactions built on the single-step operations of [`Twi`].
//!
//! This is where status codes get interpreted: every step is followed by a
//! status check and the first unexpected code aborts the transaction with a
//! STOP. Nothing is retried.

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use log::{debug, trace};

use super::{registers::Registers, Address, Direction, Error, StatusCode, Twi};

impl<R: Registers> Twi<R> {
    /// START, SLA+W, `bytes`, STOP.
    pub fn write_to(&mut self, address: Address, bytes: &[u8]) -> Result<(), Error> {
        let result = self
            .begin(address, Direction::Write)
            .and_then(|()| self.send_bytes(bytes));
        self.finish(result)
    }

    /// START, SLA+R, fill `buf` (last byte NACKed), STOP.
    pub fn read_from(&mut self, address: Address, buf: &mut [u8]) -> Result<(), Error> {
        let result = self
            .begin(address, Direction::Read)
            .and_then(|()| self.recv_bytes(buf, true));
        self.finish(result)
    }

    /// Writes `bytes`, then reads `buf` after a repeated START, without
    /// releasing the bus in between.
    pub fn write_then_read(
        &mut self,
        address: Address,
        bytes: &[u8],
        buf: &mut [u8],
    ) -> Result<(), Error> {
        let result = self
            .begin(address, Direction::Write)
            .and_then(|()| self.send_bytes(bytes))
            .and_then(|()| self.begin(address, Direction::Read))
            .and_then(|()| self.recv_bytes(buf, true));
        self.finish(result)
    }

    fn expect(&self, expected: StatusCode) -> Result<(), Error> {
        let status = self.status();
        if status == expected {
            Ok(())
        } else {
            debug!("twi: expected {}, got {}", expected, status);
            Err(Error::from_status(status))
        }
    }

    fn begin(&mut self, address: Address, direction: Direction) -> Result<(), Error> {
        self.send_start();
        let status = self.status();
        trace!("twi: start -> {}", status);
        if status != StatusCode::START && status != StatusCode::REP_START {
            debug!("twi: start failed with {}", status);
            return Err(Error::from_status(status));
        }

        self.write_byte(address.with_direction(direction));
        trace!("twi: {} {:?} -> {}", address, direction, self.status());
        self.expect(match direction {
            Direction::Write => StatusCode::MT_SLA_ACK,
            Direction::Read => StatusCode::MR_SLA_ACK,
        })
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for &byte in bytes {
            self.write_byte(byte);
            trace!("twi: wrote {:#04x} -> {}", byte, self.status());
            self.expect(StatusCode::MT_DATA_ACK)?;
        }
        Ok(())
    }

    /// With `last` set the final byte is NACKed, telling the peer the read
    /// is over. An empty `buf` still clocks one byte out of the peer, since
    /// the hardware cannot STOP right after SLA+R.
    fn recv_bytes(&mut self, buf: &mut [u8], last: bool) -> Result<(), Error> {
        if buf.is_empty() {
            if last {
                self.read_byte_nack();
                self.expect(StatusCode::MR_DATA_NACK)?;
            }
            return Ok(());
        }

        let end = buf.len() - 1;
        for (idx, slot) in buf.iter_mut().enumerate() {
            if last && idx == end {
                *slot = self.read_byte_nack();
                self.expect(StatusCode::MR_DATA_NACK)?;
            } else {
                *slot = self.read_byte_ack();
                self.expect(StatusCode::MR_DATA_ACK)?;
            }
            trace!("twi: read {:#04x}", *slot);
        }
        Ok(())
    }

    fn finish(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        match result {
            // The controller already dropped back to slave mode.
            Err(Error::ArbitrationLost) => {}
            _ => self.send_stop(),
        }
        result
    }

    fn run(&mut self, address: Address, operations: &mut [Operation<'_>]) -> Result<(), Error> {
        let mut current = None;

        for idx in 0..operations.len() {
            let read_follows = matches!(operations.get(idx + 1), Some(Operation::Read(_)));

            match &mut operations[idx] {
                Operation::Write(bytes) => {
                    if current != Some(Direction::Write) {
                        self.begin(address, Direction::Write)?;
                        current = Some(Direction::Write);
                    }
                    self.send_bytes(bytes)?;
                }
                Operation::Read(buf) => {
                    if current != Some(Direction::Read) {
                        self.begin(address, Direction::Read)?;
                        current = Some(Direction::Read);
                    }
                    self.recv_bytes(buf, !read_follows)?;
                }
            }
        }
        Ok(())
    }
}

impl<R: Registers> ErrorType for Twi<R> {
    type Error = Error;
}

impl<R: Registers> I2c<SevenBitAddress> for Twi<R> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        // Nothing can answer an 8-bit address.
        let address = Address::new(address).map_err(|_| Error::AddressNack)?;
        if operations.is_empty() {
            return Ok(());
        }

        let result = self.run(address, operations);
        self.finish(result)
    }
}
