//! CPU clock frequencies the bus speed is derived from.

pub trait Clock {
    const FREQ: u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MHz20;

impl Clock for MHz20 {
    const FREQ: u32 = 20_000_000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MHz16;

impl Clock for MHz16 {
    const FREQ: u32 = 16_000_000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MHz8;

impl Clock for MHz8 {
    const FREQ: u32 = 8_000_000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MHz1;

impl Clock for MHz1 {
    const FREQ: u32 = 1_000_000;
}
