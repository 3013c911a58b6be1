// nfcjuke/src/transport/i2c.rs

//! Linux I2C bus implementation for the reader HAT.
//!
//! The HAT speaks a register-less protocol: command frames are written one
//! byte at a time, and responses are read as a length byte followed by that
//! many data bytes.

use std::thread::sleep;
use std::time::{Duration, Instant};

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::info;

use crate::transport::traits::NfcBus;
use crate::{Error, Result};

/// Gap between consecutive byte transfers; the HAT's firmware cannot keep
/// up with back-to-back SMBus traffic.
const INTER_BYTE_DELAY: Duration = Duration::from_millis(1);
/// Grace period after a command before the response length is available.
const PROCESSING_DELAY: Duration = Duration::from_millis(5);

/// I2C bus connection to the reader HAT.
pub struct I2cBus {
    device: LinuxI2CDevice,
    bus: u8,
    address: u16,
}

impl I2cBus {
    /// Open `/dev/i2c-<bus>` at the HAT's 7-bit address.
    pub fn open(bus: u8, address: u16) -> Result<Self> {
        let path = format!("/dev/i2c-{}", bus);
        let device = LinuxI2CDevice::new(&path, address)
            .map_err(|e| Error::HardwareUnavailable(format!("{}: {}", path, e)))?;
        info!("opened i2c bus {} at address {:#04x}", bus, address);
        Ok(Self {
            device,
            bus,
            address,
        })
    }
}

impl NfcBus for I2cBus {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        for byte in data {
            self.device.smbus_write_byte(*byte)?;
            sleep(INTER_BYTE_DELAY);
        }
        Ok(())
    }

    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>> {
        sleep(PROCESSING_DELAY);
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        // The HAT reports 0 until the response is ready.
        let len = loop {
            let len = self.device.smbus_read_byte()?;
            if len > 0 {
                break len as usize;
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout);
            }
            sleep(INTER_BYTE_DELAY);
        };

        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.device.smbus_read_byte()?);
            sleep(INTER_BYTE_DELAY);
        }
        Ok(out)
    }

    fn reset(&mut self) -> Result<()> {
        // Re-open the device node to clear any wedged driver state.
        let path = format!("/dev/i2c-{}", self.bus);
        self.device = LinuxI2CDevice::new(&path, self.address)
            .map_err(|e| Error::HardwareUnavailable(format!("{}: {}", path, e)))?;
        Ok(())
    }
}
