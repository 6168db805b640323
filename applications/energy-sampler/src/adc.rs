use crate::error::AppError;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

/// Raw ADC channel access. The RMS kernel only sees this seam, so it can be
/// driven by synthetic waveforms in tests.
pub trait AdcReader {
    fn read_channel(&mut self, channel: u8) -> Result<u16, AppError>;
}

/// MCP3008 10-bit converter on SPI0/CE0.
pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    pub fn open(clock_hz: u32) -> Result<Self, AppError> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, clock_hz, Mode::Mode0)
            .map_err(|e| AppError::Adc(format!("open SPI bus: {}", e)))?;
        Ok(Self { spi })
    }
}

impl AdcReader for Mcp3008 {
    fn read_channel(&mut self, channel: u8) -> Result<u16, AppError> {
        // Start bit, then single-ended mode + channel in the high nibble,
        // then one pad byte to clock out the low bits of the conversion.
        let tx = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| AppError::Adc(format!("SPI transfer: {}", e)))?;
        Ok(decode_reply(rx))
    }
}

/// The conversion arrives as the low two bits of the second byte followed by
/// the full third byte.
fn decode_reply(rx: [u8; 3]) -> u16 {
    (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2])
}
