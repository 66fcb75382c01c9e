#![no_std]
#![no_main]

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use panic_halt as _;

use twi_hal::{
    clock::MHz16,
    reexports::avr_device::atmega328p::{Peripherals, PORTB},
    twi::{peripheral::HardwareTwi, Address, StatusCode},
    Buzzer,
};

const EEPROM: Address = Address::const_new(0x50);
const SETTINGS: u8 = 0x10;

/// PB0, driving the buzzer transistor.
struct Pb0(PORTB);

impl Pb0 {
    fn new(port: PORTB) -> Self {
        port.ddrb.modify(|r, w| unsafe { w.bits(r.bits() | 1) });
        Self(port)
    }
}

impl ErrorType for Pb0 {
    type Error = Infallible;
}

impl OutputPin for Pb0 {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.portb.modify(|r, w| unsafe { w.bits(r.bits() & !1) });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.portb.modify(|r, w| unsafe { w.bits(r.bits() | 1) });
        Ok(())
    }
}

/// Random read of one byte, checking the status after every step.
fn read_setting(twi: &mut HardwareTwi) -> Option<u8> {
    twi.send_start();
    if twi.status() != StatusCode::START {
        return None;
    }

    let steps = [
        (EEPROM.write_byte(), StatusCode::MT_SLA_ACK),
        (SETTINGS, StatusCode::MT_DATA_ACK),
    ];
    for (byte, expected) in steps {
        twi.write_byte(byte);
        if twi.status() != expected {
            twi.send_stop();
            return None;
        }
    }

    twi.send_start();
    if twi.status() != StatusCode::REP_START {
        twi.send_stop();
        return None;
    }
    twi.write_byte(EEPROM.read_byte());
    if twi.status() != StatusCode::MR_SLA_ACK {
        twi.send_stop();
        return None;
    }

    let value = twi.read_byte_nack();
    let ok = twi.status() == StatusCode::MR_DATA_NACK;
    twi.send_stop();
    ok.then_some(value)
}

#[avr_device::entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    let mut buzzer = Buzzer::new(Pb0::new(dp.PORTB)).unwrap();
    let mut twi = twi_hal::twi!(dp, MHz16, 100_000);

    if read_setting(&mut twi).is_none() {
        buzzer.on().unwrap();
    }

    loop {
        core::hint::spin_loop();
    }
}
