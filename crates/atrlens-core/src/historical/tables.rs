//! ISO/IEC 7816-4 tables for the compact-TLV objects of the historical bytes.

use crate::message::Message;

pub const SELECTION_METHODS: [(u8, &str); 8] = [
    (0x80, "DF selection by full DF name"),
    (0x40, "DF selection by partial DF name"),
    (0x20, "DF selection by path"),
    (0x10, "DF selection by file identifier"),
    (0x08, "Implicit DF selection"),
    (0x04, "Short EF identifier supported"),
    (0x02, "Record number supported"),
    (0x01, "Record identifier supported"),
];

const WRITE_BEHAVIOUR: [&str; 4] = ["one-time write", "proprietary", "write OR", "write AND"];

pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        0x1 => "country code, ISO 3166-1",
        0x2 => "issuer identification number, ISO 7812-1",
        0x3 => "card service data byte",
        0x4 => "initial access data",
        0x5 => "card issuer's data",
        0x6 => "pre-issuing data",
        0x7 => "card capabilities",
        0x8 => "status indicator",
        0xF => "application identifier",
        _ => "unknown",
    }
}

pub fn life_cycle_status(lcs: u8) -> &'static str {
    match lcs {
        0 => "No information given",
        1 => "Creation state",
        3 => "Initialisation state",
        4 | 6 => "Operational state (deactivated)",
        5 | 7 => "Operational state (activated)",
        12..=15 => "Termination state",
        16.. => "Proprietary",
        _ => "Unknown",
    }
}

pub fn card_service(cs: u8) -> Vec<Message> {
    let mut msgs = Vec::new();
    if cs & 0x80 != 0 {
        msgs.push(Message::new("- Application selection: by full DF name"));
    }
    if cs & 0x40 != 0 {
        msgs.push(Message::new("- Application selection: by partial DF name"));
    }
    if cs & 0x20 != 0 {
        msgs.push(Message::new("- BER-TLV data objects available in EF.DIR"));
    }
    if cs & 0x10 != 0 {
        msgs.push(Message::new("- BER-TLV data objects available in EF.ATR"));
    }
    let access = match (cs >> 1) & 0x07 {
        0b100 => "by the READ BINARY command (transparent structure)",
        0b000 => "by the READ RECORD (S) command (record structure)",
        0b010 => "by the GET DATA command (TLV structure)",
        _ => "reserved for future use",
    };
    msgs.push(Message::new("- EF.DIR and EF.ATR access services: %s").arg(access));
    if cs & 0x01 != 0 {
        msgs.push(Message::new("- Card without MF"));
    } else {
        msgs.push(Message::new("- Card with MF"));
    }
    msgs
}

pub fn selection_methods(sm: u8) -> Vec<Message> {
    SELECTION_METHODS
        .iter()
        .filter(|(bit, _)| sm & bit != 0)
        .map(|(_, text)| Message::new("- %s").arg(*text))
        .collect()
}

pub fn data_coding(dc: u8) -> Vec<Message> {
    let mut msgs = Vec::new();
    if dc & 0x80 != 0 {
        msgs.push(Message::new("- EF of TLV structure supported"));
    }
    msgs.push(
        Message::new("- Behaviour of write functions: %s")
            .arg(WRITE_BEHAVIOUR[usize::from((dc >> 5) & 0x03)]),
    );
    let ff_tag = if dc & 0x10 != 0 { "valid" } else { "invalid" };
    msgs.push(Message::new("- Value 'FF' for the first byte of BER-TLV tag fields: %s").arg(ff_tag));
    msgs.push(Message::new("- Data unit in quartets: %d").arg(1u32 << (dc & 0x0F)));
    msgs
}

pub fn command_chaining(cc: u8) -> Vec<Message> {
    let mut msgs = Vec::new();
    if cc & 0x80 != 0 {
        msgs.push(Message::new("- Command chaining"));
    }
    if cc & 0x40 != 0 {
        msgs.push(Message::new("- Extended Lc and Le fields"));
    }
    if cc & 0x20 != 0 {
        msgs.push(Message::new("- Extended Length Information in EF.ATR/INFO"));
    }
    let assignment = match (cc >> 3) & 0x03 {
        0b00 => "No logical channel",
        0b01 => "by the interface device",
        0b10 => "by the card",
        _ => "by the interface device and card",
    };
    msgs.push(Message::new("- Logical channel number assignment: %s").arg(assignment));
    if cc & 0x07 == 0x07 {
        msgs.push(Message::new("- Maximum number of logical channels: 8 or more"));
    } else {
        msgs.push(Message::new("- Maximum number of logical channels: %d").arg((cc & 0x07) + 1));
    }
    msgs
}

pub fn status_word(sw1: u8, sw2: u8) -> Message {
    if (sw1, sw2) == (0x90, 0x00) {
        Message::new("SW: %X %X (Normal processing)").arg(sw1).arg(sw2)
    } else {
        Message::new("SW: %X %X").arg(sw1).arg(sw2)
    }
}

pub fn life_cycle(lcs: u8) -> Message {
    Message::new("Life Cycle Status: %d (%s)")
        .arg(lcs)
        .arg(life_cycle_status(lcs))
}

/// Printable ASCII with `.` for anything outside 0x20..=0x7E.
pub fn ascii_with_dots(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '.' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn life_cycle_ranges() {
        assert_eq!(life_cycle_status(0), "No information given");
        assert_eq!(life_cycle_status(1), "Creation state");
        assert_eq!(life_cycle_status(2), "Unknown");
        assert_eq!(life_cycle_status(3), "Initialisation state");
        assert_eq!(life_cycle_status(6), "Operational state (deactivated)");
        assert_eq!(life_cycle_status(7), "Operational state (activated)");
        assert_eq!(life_cycle_status(9), "Unknown");
        assert_eq!(life_cycle_status(15), "Termination state");
        assert_eq!(life_cycle_status(16), "Proprietary");
    }

    #[test]
    fn card_service_full_df_name_with_mf() {
        let rendered: Vec<String> = card_service(0x80).iter().map(|m| m.render()).collect();
        assert_eq!(
            rendered,
            [
                "- Application selection: by full DF name",
                "- EF.DIR and EF.ATR access services: by the READ RECORD (S) command (record structure)",
                "- Card with MF",
            ]
        );
    }

    #[test]
    fn selection_methods_lists_set_bits() {
        let rendered: Vec<String> = selection_methods(0x81).iter().map(|m| m.render()).collect();
        assert_eq!(
            rendered,
            ["- DF selection by full DF name", "- Record identifier supported"]
        );
    }

    #[test]
    fn data_coding_unit_size() {
        let msgs = data_coding(0x21);
        assert_eq!(msgs[0].render(), "- Behaviour of write functions: proprietary");
        assert_eq!(msgs[2].render(), "- Data unit in quartets: 2");
    }

    #[test]
    fn command_chaining_channels() {
        let msgs = command_chaining(0xC0);
        assert_eq!(msgs[0].render(), "- Command chaining");
        assert_eq!(msgs[1].render(), "- Extended Lc and Le fields");
        assert_eq!(msgs[2].render(), "- Logical channel number assignment: No logical channel");
        assert_eq!(msgs[3].render(), "- Maximum number of logical channels: 1");
    }

    #[test]
    fn ascii_replaces_unprintable() {
        assert_eq!(ascii_with_dots(&[0xA2, 0x08, 0x01, 0x01, 0x52]), "....R");
    }

    #[test]
    fn status_word_normal_processing() {
        assert_eq!(status_word(0x90, 0x00).render(), "SW: 90 00 (Normal processing)");
        assert_eq!(status_word(0x6A, 0x82).render(), "SW: 6A 82");
    }
}
