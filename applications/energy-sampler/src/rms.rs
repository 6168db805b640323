use crate::adc::AdcReader;
use crate::config::Calibration;
use crate::error::AppError;

/// Midpoint of the 10-bit range; the sensor frontend biases both waveforms
/// to Vref/2, so this constant recenters them. It is an assumption of the
/// hardware, not measured per run.
pub const ADC_MIDPOINT: i32 = 512;
/// ADC reference voltage, volts.
pub const ADC_VREF: f64 = 3.3;
/// 10-bit converter full scale.
pub const ADC_FULL_SCALE: f64 = 1024.0;
/// Current RMS below this is CT-clamp noise with no load present and is
/// reported as exactly zero.
pub const NOISE_GATE_AMPS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsReading {
    /// RMS volts.
    pub voltage: f64,
    /// RMS amps, noise-gated.
    pub current: f64,
    /// Apparent power, watts. V*I with no power-factor correction -- the
    /// deployed hardware never measures phase, so true power is out of reach.
    pub power: f64,
}

/// One acquisition cycle: `sample_count` paired raw samples per channel at
/// the bus's transfer rate, reduced to RMS physical units.
///
/// The batch must span several mains cycles for the estimate to hold
/// (1000 samples at 1.35 MHz covers roughly 12 cycles at 60 Hz). That is a
/// documented deployment assumption; nothing here enforces it.
pub fn measure(
    adc: &mut dyn AdcReader,
    cal: &Calibration,
    sample_count: u32,
    voltage_channel: u8,
    current_channel: u8,
) -> Result<RmsReading, AppError> {
    let mut voltage_sq_sum = 0.0f64;
    let mut current_sq_sum = 0.0f64;

    for _ in 0..sample_count {
        let v = i32::from(adc.read_channel(voltage_channel)?) - ADC_MIDPOINT;
        let c = i32::from(adc.read_channel(current_channel)?) - ADC_MIDPOINT;
        voltage_sq_sum += f64::from(v * v);
        current_sq_sum += f64::from(c * c);
    }

    let n = f64::from(sample_count);
    let to_units = ADC_VREF / ADC_FULL_SCALE;
    let voltage = (voltage_sq_sum / n).sqrt() * to_units * cal.voltage_scale;
    let mut current = (current_sq_sum / n).sqrt() * to_units * cal.current_scale;

    if current < NOISE_GATE_AMPS {
        current = 0.0;
    }

    Ok(RmsReading {
        voltage,
        current,
        power: voltage * current,
    })
}
