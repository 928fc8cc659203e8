//! Protocol-specific interface bytes TAi/TBi/TCi (i >= 3) and every TDi.

use super::context::ProtocolContext;
use super::tables::{self, CLASSES, CLOCK_STOP, RFU};
use crate::message::Message;

pub const PROTOCOL_T1: u8 = 1;
pub const PROTOCOL_GLOBAL: u8 = 15;

pub fn ta_n(value: u8, ctx: &ProtocolContext) -> Vec<Message> {
    if ctx.effective() == PROTOCOL_T1 {
        return vec![Message::new("IFSC: %d").arg(value)];
    }
    let clock_stop = CLOCK_STOP[usize::from(value >> 6)];
    let classes = CLASSES
        .iter()
        .filter(|(bit, _)| value & bit != 0)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>();
    let classes = if classes.is_empty() {
        "none".to_string()
    } else {
        classes.join(" ")
    };
    vec![
        Message::new("Clock stop: %s - Class accepted by the card: %s")
            .arg(clock_stop)
            .arg(classes),
    ]
}

pub fn tb_n(value: u8, ctx: &ProtocolContext) -> Vec<Message> {
    match ctx.effective() {
        PROTOCOL_T1 => vec![
            Message::new("Block Waiting Integer: %d - Character Waiting Integer: %d")
                .arg(value >> 4)
                .arg(value & 0x0F),
        ],
        PROTOCOL_GLOBAL => vec![Message::new("%s").arg(tables::global_tb(value))],
        _ => vec![Message::new("%s").arg(RFU)],
    }
}

pub fn tc_n(value: u8, ctx: &ProtocolContext) -> Vec<Message> {
    if ctx.effective() != PROTOCOL_T1 {
        return vec![Message::new("%s").arg(RFU)];
    }
    let code = match value {
        0 => "LRC",
        1 => "CRC",
        _ => RFU,
    };
    vec![Message::new("Error detection code: %s").arg(code)]
}

/// Interpret TDi and return the context it establishes.
pub fn td_n(value: u8) -> (Vec<Message>, ProtocolContext) {
    let next = ProtocolContext::with_protocol(value);
    let protocol = value & 0x0F;
    let mut msgs = vec![
        Message::new("Y(i+1) = b%s, Protocol T=%d")
            .arg(format!("{:04b}", value >> 4))
            .arg(protocol),
    ];
    if protocol == PROTOCOL_GLOBAL {
        msgs.push(Message::new("Global interface bytes following"));
    }
    (msgs, next)
}
