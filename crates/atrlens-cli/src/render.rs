//! Text and HTML renderers over an already decoded record.

use atrlens_core::{AtrRecord, CardEntry, ChecksumStatus, Field, FieldId, Message, to_hex_string};

pub(crate) fn render_text(record: &AtrRecord, cards: &[&CardEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("ATR: {}\n", record.to_hex_string()));
    for (label, field) in header_fields(record) {
        push_field(&mut out, label, field);
    }
    for (index, bytes) in record.blocks() {
        for (byte, field) in bytes {
            push_field(&mut out, &format!(" {} ({index})", byte), field);
        }
        out.push_str("----\n");
    }
    if !record.hb.value.is_empty() {
        out.push_str(&format!("Historical bytes: {}\n", to_hex_string(&record.hb.value)));
        for msg in &record.hb.description {
            out.push_str(&format!("  {}\n", msg.render()));
        }
    }
    if let Some(field) = record.get(FieldId::Tck) {
        push_field(&mut out, "TCK", field);
    } else if let Some(ChecksumStatus::Missing { expected }) = record.checksum {
        out.push_str(&format!("TCK missing (expected 0x{expected:02X})\n"));
    }
    if let Some(extra) = &record.extra {
        out.push_str(&format!("Extra bytes: {}\n", to_hex_string(extra)));
    }
    for warning in &record.warnings {
        out.push_str(&format!("Warning: {warning}\n"));
    }
    if !cards.is_empty() {
        out.push_str("\nPossibly identified card:\n");
        for card in cards {
            out.push_str(&format!("{}\n", card.atr));
            for line in &card.descriptions {
                out.push_str(&format!("\t{line}\n"));
            }
        }
    }
    out
}

pub(crate) fn render_html(record: &AtrRecord, cards: &[&CardEntry]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>ATR Parsing</title>\n</head>\n<body>\n",
    );
    out.push_str(&format!("<p>ATR: {}</p>\n", html_escape(&record.to_hex_string())));
    out.push_str("<table border=\"1\">\n");
    for (label, field) in header_fields(record) {
        push_row(&mut out, label, field.value, &field.description);
    }
    for (_, bytes) in record.blocks() {
        for (byte, field) in bytes {
            push_row(&mut out, &byte.to_string(), field.value, &field.description);
        }
    }
    if !record.hb.value.is_empty() {
        out.push_str(&format!(
            "<tr><th align=\"right\">Historical bytes</th><td><pre>{}\n{}</pre></td></tr>\n",
            html_escape(&to_hex_string(&record.hb.value)),
            render_messages_html(&record.hb.description)
        ));
    }
    if let Some(field) = record.get(FieldId::Tck) {
        push_row(&mut out, "TCK", field.value, &field.description);
    }
    for warning in &record.warnings {
        out.push_str(&format!(
            "<tr><th align=\"right\">Warning</th><td>{}</td></tr>\n",
            html_escape(warning)
        ));
    }
    out.push_str("</table>\n");
    if !cards.is_empty() {
        out.push_str("<p>Possibly identified card:</p>\n<ul>\n");
        for card in cards {
            out.push_str(&format!(
                "<li>{}</li>\n",
                html_escape(&card.descriptions.join(" / "))
            ));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn header_fields(record: &AtrRecord) -> Vec<(&'static str, &Field)> {
    [("TS", FieldId::Ts), ("T0", FieldId::T0)]
        .into_iter()
        .filter_map(|(label, id)| record.get(id).map(|field| (label, field)))
        .collect()
}

fn push_field(out: &mut String, label: &str, field: &Field) {
    let mut lines = field.description.iter().map(Message::render);
    let first = lines.next().unwrap_or_default();
    out.push_str(&format!("{label} = 0x{:02X} --> {first}\n", field.value));
    for line in lines {
        out.push_str(&format!("    {line}\n"));
    }
}

fn push_row(out: &mut String, label: &str, value: u8, description: &[Message]) {
    out.push_str(&format!(
        "<tr><th align=\"right\">{} = 0x{value:02X}</th><td>{}</td></tr>\n",
        html_escape(label),
        render_messages_html(description)
    ));
}

fn render_messages_html(msgs: &[Message]) -> String {
    msgs.iter()
        .map(|msg| {
            let template = Message {
                template: html_escape(&msg.template),
                args: msg.args.clone(),
            };
            template.render_with(|value| format!("<b>{}</b>", html_escape(value)))
        })
        .collect::<Vec<_>>()
        .join("<br>\n")
}

pub(crate) fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
