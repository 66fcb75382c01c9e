#![cfg(feature = "sim")]

use proptest::prelude::*;
use twi_hal::twi::{
    registers::Registers,
    sim::{MemoryPeer, SimulatedTwi},
    AckMode, Address, BusConfiguration, Enable, GeneralCall, InterruptMode, Prescaler, Twi,
};

type Bus = SimulatedTwi<MemoryPeer<1>, 1>;

fn configuration() -> impl Strategy<Value = BusConfiguration> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0..4u8,
        any::<bool>(),
        0..=Address::MAX,
        any::<u8>(),
    )
        .prop_map(
            |(interrupts, ack, enable, prescaler, general_call, address, bit_rate)| {
                BusConfiguration {
                    interrupt_mode: if interrupts {
                        InterruptMode::Enabled
                    } else {
                        InterruptMode::Disabled
                    },
                    ack_mode: if ack { AckMode::On } else { AckMode::Off },
                    enable: if enable {
                        Enable::Enabled
                    } else {
                        Enable::Disabled
                    },
                    prescaler: Prescaler::from_bits(prescaler),
                    general_call: if general_call {
                        GeneralCall::On
                    } else {
                        GeneralCall::Off
                    },
                    own_address: Address::const_new(address),
                    bit_rate,
                }
            },
        )
}

proptest! {
    #[test]
    fn configure_round_trips(config in configuration()) {
        let twi = Twi::new(Bus::new(), &config);

        prop_assert_eq!(twi.configuration(), config);
    }

    #[test]
    fn configure_writes_the_documented_registers(config in configuration()) {
        let bus = Twi::new(Bus::new(), &config).free();

        prop_assert_eq!(bus.twbr(), config.bit_rate);
        prop_assert_eq!(bus.twar().bits() >> 1, config.own_address.get());
        prop_assert_eq!(bus.twsr().bits() & 0b11, config.prescaler.bits());
        // Configuring never starts a bus job.
        prop_assert_eq!(bus.events().count(), 0);
    }
}

#[test]
fn configuration_does_not_start_a_job() {
    let config = BusConfiguration::new(72, Prescaler::Div1);

    let twi = Twi::new(Bus::new(), &config);

    assert!(!twi.is_ready());
    assert_eq!(twi.registers().twcr().bits(), 0x44);
}
