//! Global interface bytes: TS, T0, TA1/TB1/TC1 and TA2/TB2/TC2.
//!
//! These interpreters ignore the protocol context; their meaning is fixed by
//! position alone.

use serde::{Deserialize, Serialize};

use super::tables::{self, NOMINAL_CLOCK_HZ, RFU, TB1_CURRENT};
use crate::message::Message;

pub const TS_DIRECT: u8 = 0x3B;
pub const TS_INVERSE: u8 = 0x3F;

/// Transmission parameters derived from TA1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockRate {
    pub fi: u16,
    pub di: u16,
    /// Clock cycles per elementary time unit (Fi/Di).
    pub cycles_per_etu: f64,
    /// Bit rate at [`NOMINAL_CLOCK_HZ`].
    pub bit_rate: u32,
    /// Maximum supported clock frequency for this Fi class.
    pub f_max_mhz: f64,
}

/// Decode TA1 into Fi/Di and the derived rates, `None` if either is RFU.
///
/// # Examples
/// ```
/// use atrlens_core::clock_rate;
///
/// let rate = clock_rate(0x11).unwrap();
/// assert_eq!((rate.fi, rate.di), (372, 1));
/// assert!(clock_rate(0x70).is_none());
/// ```
pub fn clock_rate(ta1: u8) -> Option<ClockRate> {
    let f = ta1 >> 4;
    let d = ta1 & 0x0F;
    let fi = tables::fi(f)?;
    let di = tables::di(d)?;
    let f_max_mhz = tables::f_max(f)?;
    let cycles_per_etu = f64::from(fi) / f64::from(di);
    Some(ClockRate {
        fi,
        di,
        cycles_per_etu,
        bit_rate: (f64::from(NOMINAL_CLOCK_HZ) / cycles_per_etu) as u32,
        f_max_mhz,
    })
}

pub fn ts(value: u8) -> Vec<Message> {
    let text = match value {
        TS_DIRECT => "Direct Convention",
        TS_INVERSE => "Inverse Convention",
        _ => "Invalid TS value",
    };
    vec![Message::new("%s").arg(text)]
}

pub fn t0(value: u8) -> Vec<Message> {
    vec![
        Message::new("Y(1): b%s, K: %d (historical bytes)")
            .arg(format!("{:04b}", value >> 4))
            .arg(value & 0x0F),
    ]
}

pub fn ta1(value: u8) -> Vec<Message> {
    let label = |v: Option<u16>| v.map_or_else(|| RFU.to_string(), |v| v.to_string());
    let fi = label(tables::fi(value >> 4));
    let di = label(tables::di(value & 0x0F));
    match clock_rate(value) {
        Some(rate) => vec![
            Message::new("Fi=%s, Di=%s, %g cycles/ETU")
                .arg(fi)
                .arg(di)
                .arg(rate.cycles_per_etu),
            Message::new("%d bits/s at 4 MHz, fMax for Fi = %g MHz")
                .arg(rate.bit_rate)
                .arg(rate.f_max_mhz),
        ],
        None => vec![Message::new("Fi=%s, Di=%s, INVALID VALUE").arg(fi).arg(di)],
    }
}

pub fn tb1(value: u8) -> Vec<Message> {
    let current = (value >> 5) & 0x03;
    let voltage = value & 0x1F;
    if voltage == 0 {
        return vec![Message::new("VPP is not electrically connected")];
    }
    vec![
        Message::new("Programming Param P: %d Volts, I: %s")
            .arg(voltage)
            .arg(TB1_CURRENT[usize::from(current)]),
    ]
}

pub fn tc1(value: u8) -> Vec<Message> {
    if value == 0xFF {
        return vec![Message::new("Extra guard time: %d (special value)").arg(value)];
    }
    vec![Message::new("Extra guard time: %d").arg(value)]
}

pub fn ta2(value: u8) -> Vec<Message> {
    let f = value >> 4;
    let protocol = value & 0x0F;
    let change = if f & 0x08 != 0 {
        "Unable to change"
    } else {
        "Capable to change"
    };
    let parameters = if f & 0x01 != 0 {
        "implicitly defined"
    } else {
        "defined by interface bytes"
    };
    vec![
        Message::new("Protocol to be used in spec mode: T=%d - %s - %s")
            .arg(protocol)
            .arg(change)
            .arg(parameters),
    ]
}

pub fn tb2(value: u8) -> Vec<Message> {
    if (50..=250).contains(&value) {
        vec![Message::new("Programming param PI2 (PI1 should be ignored): %d (dV)").arg(value)]
    } else {
        vec![Message::new("Programming param PI2 (PI1 should be ignored): %d is RFU").arg(value)]
    }
}

pub fn tc2(value: u8) -> Vec<Message> {
    vec![Message::new("Work waiting time: 960 x %d x (Fi/F)").arg(value)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Arg;

    #[test]
    fn ta1_default_rate() {
        let rate = clock_rate(0x11).unwrap();
        assert_eq!(rate.fi, 372);
        assert_eq!(rate.di, 1);
        assert_eq!(rate.cycles_per_etu, 372.0);
        assert_eq!(rate.f_max_mhz, 5.0);
        assert_eq!(rate.bit_rate, 10752);

        let msgs = ta1(0x11);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].args[2], Arg::Float(372.0));
        assert_eq!(msgs[0].render(), "Fi=372, Di=1, 372 cycles/ETU");
        assert_eq!(msgs[1].render(), "10752 bits/s at 4 MHz, fMax for Fi = 5 MHz");
    }

    #[test]
    fn ta1_reserved_di_is_invalid_without_rate() {
        let msgs = ta1(0x10);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].render(), "Fi=372, Di=RFU, INVALID VALUE");
    }

    #[test]
    fn ta1_reserved_fi_is_invalid() {
        let msgs = ta1(0x81);
        assert_eq!(msgs[0].render(), "Fi=RFU, Di=1, INVALID VALUE");
    }

    #[test]
    fn ta1_fractional_cycles() {
        let rate = clock_rate(0x95).unwrap();
        assert_eq!(rate.fi, 512);
        assert_eq!(rate.di, 16);
        assert_eq!(rate.cycles_per_etu, 32.0);
        assert_eq!(rate.bit_rate, 125000);
        assert_eq!(rate.f_max_mhz, 5.0);
    }

    #[test]
    fn tb1_zero_voltage_means_not_connected() {
        assert_eq!(tb1(0x00)[0].render(), "VPP is not electrically connected");
        assert_eq!(
            tb1(0x25)[0].render(),
            "Programming Param P: 5 Volts, I: 50 milliamperes"
        );
    }

    #[test]
    fn tc1_special_value() {
        assert_eq!(tc1(0xFF)[0].render(), "Extra guard time: 255 (special value)");
        assert_eq!(tc1(2)[0].render(), "Extra guard time: 2");
    }

    #[test]
    fn ta2_capability_bits() {
        assert_eq!(
            ta2(0x81)[0].render(),
            "Protocol to be used in spec mode: T=1 - Unable to change - defined by interface bytes"
        );
        assert_eq!(
            ta2(0x10)[0].render(),
            "Protocol to be used in spec mode: T=0 - Capable to change - implicitly defined"
        );
    }

    #[test]
    fn tb2_range() {
        assert!(tb2(50)[0].render().ends_with("(dV)"));
        assert!(tb2(251)[0].render().ends_with("is RFU"));
    }

    #[test]
    fn ts_and_t0() {
        assert_eq!(ts(0x3B)[0].render(), "Direct Convention");
        assert_eq!(ts(0x3F)[0].render(), "Inverse Convention");
        assert_eq!(ts(0x00)[0].render(), "Invalid TS value");
        assert_eq!(t0(0xA7)[0].render(), "Y(1): b1010, K: 7 (historical bytes)");
    }
}
