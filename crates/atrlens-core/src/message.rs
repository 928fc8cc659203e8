//! Structured field descriptions.
//!
//! A [`Message`] keeps the template text and its substitution values apart so
//! renderers can escape or colorize the values without re-parsing the output.
//! Placeholders are `%s` (text), `%d` (integer), `%g` (float, six significant digits, exponent form outside 1e-4..1e6),
//! `%X` (two-digit uppercase hex) and `%%` for a literal percent sign.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Typed substitution value for a [`Message`] placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Arg {
    fn format(&self, kind: char) -> String {
        match (kind, self) {
            ('X', Arg::Int(v)) => format!("{:02X}", v),
            ('g', Arg::Float(v)) => format_g(*v),
            ('g', Arg::Int(v)) => v.to_string(),
            (_, Arg::Int(v)) => v.to_string(),
            (_, Arg::Float(v)) => format_g(*v),
            (_, Arg::Text(v)) => v.clone(),
        }
    }
}

impl From<u8> for Arg {
    fn from(value: u8) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

/// Template text plus ordered substitution values.
///
/// # Examples
/// ```
/// use atrlens_core::Message;
///
/// let msg = Message::new("Fi=%s, Di=%s, %g cycles/ETU")
///     .arg("372")
///     .arg("1")
///     .arg(372.0);
/// assert_eq!(msg.render(), "Fi=372, Di=1, 372 cycles/ETU");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Template with `%s`/`%d`/`%g`/`%X` placeholders.
    pub template: String,
    /// Values in placeholder order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
}

impl Message {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            args: Vec::new(),
        }
    }

    /// Append the next substitution value.
    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Render with plain substitution.
    pub fn render(&self) -> String {
        self.render_with(|value| value.to_string())
    }

    /// Render, passing every substituted value through `wrap`.
    ///
    /// Template text is emitted as-is; only argument text reaches `wrap`.
    /// Missing arguments render as an empty string.
    pub fn render_with<F>(&self, wrap: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut out = String::with_capacity(self.template.len());
        let mut args = self.args.iter();
        let mut chars = self.template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some(kind @ ('s' | 'd' | 'g' | 'X')) => {
                    chars.next();
                    if let Some(arg) = args.next() {
                        out.push_str(&wrap(&arg.format(kind)));
                    }
                }
                _ => out.push('%'),
            }
        }
        out
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Shortest-form float rendering with six significant digits.
pub(crate) fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    // The exponent is taken after rounding to PRECISION significant digits.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };
    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs());
    }
    let decimals = (PRECISION - 1 - exponent) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
