//! Field semantic interpreters.
//!
//! Every interpreter is a pure function of (index, value, protocol context).
//! Dispatch is by (letter, index): indices 1 and 2 have dedicated global
//! interpreters, anything beyond falls back to the TAn/TBn/TCn family. TDi is
//! the only interpreter that produces a new [`ProtocolContext`], and
//! [`describe`] threads it explicitly so no state outlives a decode call.

pub mod context;
pub mod global;
pub mod specific;
pub mod tables;

pub use context::ProtocolContext;
pub use global::{ClockRate, clock_rate};

use crate::message::Message;
use crate::{InterfaceByte, InterfaceKind};

/// Interpret one interface byte, updating `ctx` when the byte is a TDi.
pub fn describe(field: InterfaceByte, value: u8, ctx: &mut ProtocolContext) -> Vec<Message> {
    match (field.kind, field.index) {
        (InterfaceKind::A, 1) => global::ta1(value),
        (InterfaceKind::B, 1) => global::tb1(value),
        (InterfaceKind::C, 1) => global::tc1(value),
        (InterfaceKind::A, 2) => global::ta2(value),
        (InterfaceKind::B, 2) => global::tb2(value),
        (InterfaceKind::C, 2) => global::tc2(value),
        (InterfaceKind::A, _) => specific::ta_n(value, ctx),
        (InterfaceKind::B, _) => specific::tb_n(value, ctx),
        (InterfaceKind::C, _) => specific::tc_n(value, ctx),
        (InterfaceKind::D, _) => {
            let (msgs, next) = specific::td_n(value);
            *ctx = next;
            msgs
        }
    }
}
