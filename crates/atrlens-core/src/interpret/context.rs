/// Protocol type negotiated by the most recent TDi, scoped to one decode.
///
/// Starts unknown; interpreters treat unknown as T=0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtocolContext {
    protocol: Option<u8>,
}

impl ProtocolContext {
    pub const fn new() -> Self {
        Self { protocol: None }
    }

    pub const fn with_protocol(protocol: u8) -> Self {
        Self {
            protocol: Some(protocol & 0x0F),
        }
    }

    /// Protocol announced by the last TDi, if any.
    pub const fn protocol(&self) -> Option<u8> {
        self.protocol
    }

    /// Protocol used for interpretation (unknown behaves as T=0).
    pub const fn effective(&self) -> u8 {
        match self.protocol {
            Some(t) => t,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProtocolContext;

    #[test]
    fn unknown_protocol_behaves_as_t0() {
        let ctx = ProtocolContext::new();
        assert_eq!(ctx.protocol(), None);
        assert_eq!(ctx.effective(), 0);
    }

    #[test]
    fn with_protocol_keeps_low_nibble() {
        assert_eq!(ProtocolContext::with_protocol(0x91).protocol(), Some(1));
    }
}
