#![cfg(feature = "i2c")]

use anyhow::Context;
use nfcjuke::transport::{I2cBus, Reader, TagReader};
use serial_test::serial;

// These tests require the reader HAT attached on /dev/i2c-1. They are
// marked `#[ignore]` so CI does not attempt to run them. Run manually with:
//
// cargo test -p nfcjuke --test hardware --features i2c -- --ignored

const BUS: u8 = 1;
const ADDRESS: u16 = 0x24;

#[test]
#[ignore]
#[serial]
fn connect_and_poll_once() -> anyhow::Result<()> {
    let bus = I2cBus::open(BUS, ADDRESS).context("opening /dev/i2c-1")?;
    let mut reader = Reader::connect(Box::new(bus)).context("version probe")?;
    let _ = reader.poll()?;
    Ok(())
}

#[test]
#[ignore]
#[serial]
fn reset_leaves_chip_pollable() -> anyhow::Result<()> {
    let bus = I2cBus::open(BUS, ADDRESS).context("opening /dev/i2c-1")?;
    let mut reader = Reader::connect(Box::new(bus)).context("version probe")?;
    reader.reset()?;
    let _ = reader.poll()?;
    Ok(())
}
