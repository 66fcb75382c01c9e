//! Polled TWI master.
//!
//! [`Twi`] owns one controller and exposes the bus steps as individual
//! operations: conditions ([`Twi::send_start`], [`Twi::send_stop`]), byte
//! transfers ([`Twi::write_byte`], [`Twi::read_byte_ack`],
//! [`Twi::read_byte_nack`]) and the status decoder ([`Twi::status`]). None
//! of them interpret the outcome; the caller reads the status after every
//! step. The [`transaction`] module is such a caller.

mod address;
mod config;
mod error;
pub mod peripheral;
pub mod registers;
#[cfg(feature = "sim")]
pub mod sim;
mod status;
pub mod transaction;

pub use address::{Address, Direction, InvalidAddress};
pub use config::{AckMode, BusConfiguration, Enable, GeneralCall, InterruptMode, Prescaler};
pub use error::Error;
pub use status::{Status, StatusCode};

use registers::{Registers, Twcr};

/// Handle to a configured TWI controller.
///
/// All transaction state lives in the controller registers; the handle only
/// owns the register block.
pub struct Twi<R: Registers> {
    regs: R,
}

impl<R: Registers> Twi<R> {
    /// Configures the controller and takes ownership of it.
    ///
    /// `TWCR` is written last, so the block is never enabled with a stale
    /// address or bit rate.
    pub fn new(mut regs: R, config: &BusConfiguration) -> Self {
        regs.set_twbr(config.bit_rate);
        regs.set_twsr(config.twsr());
        regs.set_twar(config.twar());
        regs.set_twcr(config.twcr());
        Self { regs }
    }

    /// Decodes the configuration currently held by the registers.
    ///
    /// Only meaningful between transactions: the bus operations rewrite
    /// `TWCR` as a whole.
    pub fn configuration(&self) -> BusConfiguration {
        BusConfiguration::decode(
            self.regs.twbr(),
            self.regs.twsr(),
            self.regs.twar(),
            self.regs.twcr(),
        )
    }

    #[inline(always)]
    pub fn free(self) -> R {
        self.regs
    }

    #[inline(always)]
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Emits a START, or a repeated START inside a transaction, and waits
    /// for it to complete.
    #[inline]
    pub fn send_start(&mut self) {
        self.trigger(Twcr::new().with(Twcr::TWSTA, true));
        self.wait();
    }

    /// Requests a STOP. The hardware does not flag its completion, so this
    /// returns as soon as the request is written.
    #[inline]
    pub fn send_stop(&mut self) {
        self.trigger(Twcr::new().with(Twcr::TWSTO, true));
    }

    /// Shifts out one byte, SLA+R/W or payload, and waits for the ACK slot.
    #[inline]
    pub fn write_byte(&mut self, data: u8) {
        self.load(data);
        self.wait();
    }

    /// Receives one byte and acknowledges it, asking the peer for more.
    #[inline]
    pub fn read_byte_ack(&mut self) -> u8 {
        self.trigger(Twcr::new().with(Twcr::TWEA, true));
        self.wait();
        self.regs.twdr()
    }

    /// Receives one byte without acknowledging it, ending the read.
    #[inline]
    pub fn read_byte_nack(&mut self) -> u8 {
        self.trigger(Twcr::new());
        self.wait();
        self.regs.twdr()
    }

    #[inline]
    pub fn try_send_start(&mut self, max_polls: u32) -> Result<(), Error> {
        self.trigger(Twcr::new().with(Twcr::TWSTA, true));
        self.wait_for(max_polls)
    }

    #[inline]
    pub fn try_write_byte(&mut self, data: u8, max_polls: u32) -> Result<(), Error> {
        self.load(data);
        self.wait_for(max_polls)
    }

    #[inline]
    pub fn try_read_byte_ack(&mut self, max_polls: u32) -> Result<u8, Error> {
        self.trigger(Twcr::new().with(Twcr::TWEA, true));
        self.wait_for(max_polls)?;
        Ok(self.regs.twdr())
    }

    #[inline]
    pub fn try_read_byte_nack(&mut self, max_polls: u32) -> Result<u8, Error> {
        self.trigger(Twcr::new());
        self.wait_for(max_polls)?;
        Ok(self.regs.twdr())
    }

    /// Current protocol status. Reading it has no side effects.
    #[inline(always)]
    pub fn status(&self) -> StatusCode {
        status::decode(&self.regs)
    }

    /// Whether the controller finished its current job.
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.regs.twcr().get(Twcr::TWINT)
    }

    #[inline(always)]
    fn load(&mut self, data: u8) {
        // TWDR must hold the byte before TWINT is cleared.
        self.regs.set_twdr(data);
        self.trigger(Twcr::new());
    }

    #[inline(always)]
    fn trigger(&mut self, twcr: Twcr) {
        self.regs
            .set_twcr(twcr.with(Twcr::TWINT, true).with(Twcr::TWEN, true));
    }

    #[inline(always)]
    fn wait(&self) {
        while !self.is_ready() {
            core::hint::spin_loop();
        }
    }

    fn wait_for(&self, max_polls: u32) -> Result<(), Error> {
        for _ in 0..max_polls {
            if self.is_ready() {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(Error::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registers::{Twar, Twsr};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Write {
        Twcr(u8),
        Twsr(u8),
        Twbr(u8),
        Twar(u8),
        Twdr(u8),
    }

    /// Registers that remember every write, in order.
    #[derive(Default)]
    struct Recorder {
        twcr: u8,
        twsr: u8,
        twbr: u8,
        twar: u8,
        twdr: u8,
        writes: Vec<Write>,
    }

    impl Registers for Recorder {
        fn twcr(&self) -> Twcr {
            Twcr::from_bits(self.twcr)
        }

        fn set_twcr(&mut self, value: Twcr) {
            self.twcr = value.bits();
            self.writes.push(Write::Twcr(value.bits()));
        }

        fn twsr(&self) -> Twsr {
            Twsr::from_bits(self.twsr)
        }

        fn set_twsr(&mut self, value: Twsr) {
            self.twsr = value.bits();
            self.writes.push(Write::Twsr(value.bits()));
        }

        fn twbr(&self) -> u8 {
            self.twbr
        }

        fn set_twbr(&mut self, value: u8) {
            self.twbr = value;
            self.writes.push(Write::Twbr(value));
        }

        fn twar(&self) -> Twar {
            Twar::from_bits(self.twar)
        }

        fn set_twar(&mut self, value: Twar) {
            self.twar = value.bits();
            self.writes.push(Write::Twar(value.bits()));
        }

        fn twdr(&self) -> u8 {
            self.twdr
        }

        fn set_twdr(&mut self, value: u8) {
            self.twdr = value;
            self.writes.push(Write::Twdr(value));
        }
    }

    #[test]
    fn configure_writes_control_register_last() {
        let config = BusConfiguration::new(72, Prescaler::Div4)
            .with_own_address(Address::const_new(0x21));

        let regs = Twi::new(Recorder::default(), &config).free();

        assert_eq!(
            regs.writes[..3],
            [Write::Twbr(72), Write::Twsr(0b01), Write::Twar(0x42)]
        );
        assert_eq!(regs.writes.len(), 4);
        assert!(matches!(regs.writes[3], Write::Twcr(_)));
    }

    #[test]
    fn controller_is_never_enabled_before_its_address() {
        let config = BusConfiguration::new(72, Prescaler::Div1)
            .with_own_address(Address::const_new(0x21));

        let regs = Twi::new(Recorder::default(), &config).free();

        let enabled = regs
            .writes
            .iter()
            .position(|write| {
                matches!(write, Write::Twcr(bits) if Twcr::from_bits(*bits).get(Twcr::TWEN))
            })
            .unwrap();
        let addressed = regs
            .writes
            .iter()
            .position(|write| matches!(write, Write::Twar(_)))
            .unwrap();
        assert!(addressed < enabled);
    }

    #[test]
    fn write_byte_loads_data_before_clearing_twint() {
        // The recorder keeps TWINT as written, so the poll returns at once.
        let mut twi = Twi {
            regs: Recorder::default(),
        };

        twi.write_byte(0xA0);

        assert_eq!(twi.regs.writes, [Write::Twdr(0xA0), Write::Twcr(0x84)]);
    }
}
