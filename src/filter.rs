use crate::model::{Message, MessageType, TransmissionType};

/// Selection applied to decoded messages. An empty list accepts anything.
#[derive(Clone, Debug, Default)]
pub struct FilterConfig {
    pub message_types: Vec<MessageType>,
    pub transmission_types: Vec<TransmissionType>,
    pub hex_ids: Vec<String>,
    pub callsigns: Vec<String>,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.message_types.is_empty()
            && self.transmission_types.is_empty()
            && self.hex_ids.is_empty()
            && self.callsigns.is_empty()
    }

    pub fn accept(&self, m: &Message) -> bool {
        if !self.message_types.is_empty() && !self.message_types.contains(&m.message_type) {
            return false;
        }
        if !self.transmission_types.is_empty() {
            // Transmission sub-types only mean something on MSG records.
            if !m.is_transmission() || !self.transmission_types.contains(&m.transmission_type) {
                return false;
            }
        }
        if !self.hex_ids.is_empty()
            && !self.hex_ids.iter().any(|q| q.eq_ignore_ascii_case(&m.hex_id))
        {
            return false;
        }
        if !self.callsigns.is_empty() {
            let cs = m.callsign.trim();
            if !self.callsigns.iter().any(|q| q.trim() == cs) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_line;

    fn msg(line: &str) -> Message {
        decode_line(line).unwrap()
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let f = FilterConfig::default();
        assert!(f.is_empty());
        assert!(f.accept(&msg("CLK,1,,,,,,,,,,,,,,,")));
    }

    #[test]
    fn transmission_filter_rejects_non_msg_records() {
        let f = FilterConfig {
            transmission_types: vec![TransmissionType::IdentAndCategory],
            ..Default::default()
        };
        assert!(f.accept(&msg("MSG,1,,,,,,,,,,,,,,,")));
        assert!(!f.accept(&msg("STA,1,,,,,,,,,,,,,,,")));
        assert!(!f.accept(&msg("MSG,3,,,,,,,,,,,,,,,")));
    }

    #[test]
    fn hex_and_callsign_matching_is_lenient() {
        let f = FilterConfig {
            hex_ids: vec!["4ca2c8".into()],
            callsigns: vec!["BAW123".into()],
            ..Default::default()
        };
        assert!(f.accept(&msg("MSG,1,,,4CA2C8,,,,,,BAW123  ,,,,,,")));
        assert!(!f.accept(&msg("MSG,1,,,4CA2C9,,,,,,BAW123,,,,,,")));
        assert!(!f.accept(&msg("MSG,1,,,4CA2C8,,,,,,EZY1,,,,,,")));
    }

    #[test]
    fn message_type_filter() {
        let f = FilterConfig {
            message_types: vec![MessageType::NewAircraft, MessageType::StatusAircraft],
            ..Default::default()
        };
        assert!(f.accept(&msg("AIR,1,,,,,,,,,,,,,,,")));
        assert!(!f.accept(&msg("SEL,1,,,,,,,,,,,,,,,")));
    }
}
