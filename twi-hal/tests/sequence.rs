#![cfg(feature = "sim")]

use twi_hal::{
    clock::MHz16,
    twi::{
        sim::{BusEvent, MemoryPeer, SimulatedTwi},
        AckMode, Address, BusConfiguration, Direction, Error, InterruptMode, StatusCode, Twi,
    },
};

type Bus = SimulatedTwi<MemoryPeer<256>, 2>;

const EEPROM: Address = Address::const_new(0x50);

fn configuration() -> BusConfiguration {
    BusConfiguration::for_speed::<MHz16>(100_000)
        .unwrap()
        .with_own_address(Address::const_new(0x00))
        .with_ack_mode(AckMode::On)
        .with_interrupt_mode(InterruptMode::Disabled)
}

fn twi() -> Twi<Bus> {
    let mut contents = [0; 256];
    contents[0x10] = 0x42;
    contents[0x11] = 0x43;
    let bus = Bus::new()
        .with_peer(MemoryPeer::with_contents(EEPROM, contents))
        .ok()
        .unwrap();
    Twi::new(bus, &configuration())
}

#[test]
fn eeprom_random_read() {
    let mut twi = twi();

    twi.send_start();
    assert_eq!(twi.status(), StatusCode::START);

    twi.write_byte(0xA0);
    assert_eq!(twi.status(), StatusCode::MT_SLA_ACK);

    twi.write_byte(0x10);
    assert_eq!(twi.status(), StatusCode::MT_DATA_ACK);

    twi.send_start();
    assert_eq!(twi.status(), StatusCode::REP_START);

    twi.write_byte(0xA1);
    assert_eq!(twi.status(), StatusCode::MR_SLA_ACK);

    let byte = twi.read_byte_nack();
    assert_eq!(byte, 0x42);
    assert_eq!(twi.status(), StatusCode::MR_DATA_NACK);

    twi.send_stop();

    let bus = twi.free();
    assert_eq!(bus.events().last(), Some(&BusEvent::Stop));
}

#[test]
fn sequential_read_acks_all_but_the_last_byte() {
    let mut twi = twi();
    twi.send_start();
    twi.write_byte(EEPROM.write_byte());
    twi.write_byte(0x10);
    twi.send_start();
    twi.write_byte(EEPROM.read_byte());

    let first = twi.read_byte_ack();
    assert_eq!(twi.status(), StatusCode::MR_DATA_ACK);
    let second = twi.read_byte_nack();
    assert_eq!(twi.status(), StatusCode::MR_DATA_NACK);
    twi.send_stop();

    assert_eq!([first, second], [0x42, 0x43]);
}

#[test]
fn unanswered_address_is_not_acknowledged() {
    let mut twi = twi();

    twi.send_start();
    twi.write_byte(Address::const_new(0x27).with_direction(Direction::Write));

    assert_ne!(twi.status(), StatusCode::MT_SLA_ACK);
    twi.send_stop();
}

#[test]
fn status_reads_are_idempotent() {
    let mut twi = twi();
    assert_eq!(twi.status(), twi.status());

    twi.send_start();
    let first = twi.status();
    let second = twi.status();

    assert_eq!(first, second);
    assert_eq!(first, StatusCode::START);
}

#[test]
fn stop_returns_to_idle() {
    let mut twi = twi();
    twi.send_start();

    twi.send_stop();

    assert_eq!(twi.status(), StatusCode::NO_INFO);
    twi.send_start();
    assert_eq!(twi.status(), StatusCode::START);
}

#[test]
fn bounded_waits_time_out_on_a_stalled_controller() {
    let mut bus = Bus::new();
    bus.set_stalled(true);
    let mut twi = Twi::new(bus, &configuration());

    assert_eq!(twi.try_send_start(100), Err(Error::Timeout));
    assert_eq!(twi.try_write_byte(0xA0, 100), Err(Error::Timeout));
    assert_eq!(twi.try_read_byte_ack(100), Err(Error::Timeout));
    assert_eq!(twi.try_read_byte_nack(0), Err(Error::Timeout));
}

#[test]
fn bounded_waits_complete_like_blocking_ones() {
    let mut twi = twi();

    twi.try_send_start(10).unwrap();
    twi.try_write_byte(0xA0, 10).unwrap();
    twi.try_write_byte(0x11, 10).unwrap();
    twi.try_send_start(10).unwrap();
    twi.try_write_byte(0xA1, 10).unwrap();

    assert_eq!(twi.try_read_byte_nack(10), Ok(0x43));
    assert_eq!(twi.status(), StatusCode::MR_DATA_NACK);
}

#[test]
fn address_write_then_read_through_the_transaction_layer() {
    let mut twi = twi();

    twi.write_to(EEPROM, &[0x80, 1, 2, 3]).unwrap();
    let mut buf = [0; 3];
    twi.write_then_read(EEPROM, &[0x80], &mut buf).unwrap();

    assert_eq!(buf, [1, 2, 3]);
}
