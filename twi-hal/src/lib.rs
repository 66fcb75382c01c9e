#![cfg_attr(not(test), no_std)]

//! Hardware abstraction for the control unit: a polled TWI (I2C) master
//! driver and a buzzer driver.
//!
//! The TWI driver is generic over [`twi::registers::Registers`]. Select a
//! chip feature (`atmega328p`, ...) to drive the on-chip controller through
//! `avr-device`, or use [`twi::sim`] to run the same code on a host.

pub mod buzzer;
pub mod clock;
pub mod twi;

pub use buzzer::Buzzer;
pub use twi::{Address, BusConfiguration, Error, StatusCode, Twi};

pub mod reexports {
    pub mod embedded_hal {
        pub use embedded_hal::*;
    }

    #[cfg(any(
        feature = "atmega1280",
        feature = "atmega168",
        feature = "atmega2560",
        feature = "atmega328p",
        feature = "atmega32u4",
    ))]
    pub mod avr_device {
        pub use avr_device::*;
    }
}
