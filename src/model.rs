use crate::errors::DecodeError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Role of a record, from the three-letter code in field 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    SelectionChange,
    NewId,
    NewAircraft,
    StatusAircraft,
    Click,
    Transmission,
}

impl MessageType {
    pub const ALL: [MessageType; 6] = [
        MessageType::SelectionChange,
        MessageType::NewId,
        MessageType::NewAircraft,
        MessageType::StatusAircraft,
        MessageType::Click,
        MessageType::Transmission,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SEL" => Some(MessageType::SelectionChange),
            "ID" => Some(MessageType::NewId),
            "AIR" => Some(MessageType::NewAircraft),
            "STA" => Some(MessageType::StatusAircraft),
            "CLK" => Some(MessageType::Click),
            "MSG" => Some(MessageType::Transmission),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            MessageType::SelectionChange => "SEL",
            MessageType::NewId => "ID",
            MessageType::NewAircraft => "AIR",
            MessageType::StatusAircraft => "STA",
            MessageType::Click => "CLK",
            MessageType::Transmission => "MSG",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MessageType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::from_code(s).ok_or_else(|| DecodeError::UnknownMessageType {
            index: 0,
            value: s.to_string(),
        })
    }
}

/// Sub-type of a `MSG` record, from the digit in field 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransmissionType {
    IdentAndCategory,
    SurfacePosition,
    AirbornePosition,
    AirborneVelocity,
    SurveillanceAltitude,
    SurveillanceId,
    AirToAir,
    AllCallReply,
}

impl TransmissionType {
    pub const ALL: [TransmissionType; 8] = [
        TransmissionType::IdentAndCategory,
        TransmissionType::SurfacePosition,
        TransmissionType::AirbornePosition,
        TransmissionType::AirborneVelocity,
        TransmissionType::SurveillanceAltitude,
        TransmissionType::SurveillanceId,
        TransmissionType::AirToAir,
        TransmissionType::AllCallReply,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(TransmissionType::IdentAndCategory),
            "2" => Some(TransmissionType::SurfacePosition),
            "3" => Some(TransmissionType::AirbornePosition),
            "4" => Some(TransmissionType::AirborneVelocity),
            "5" => Some(TransmissionType::SurveillanceAltitude),
            "6" => Some(TransmissionType::SurveillanceId),
            "7" => Some(TransmissionType::AirToAir),
            "8" => Some(TransmissionType::AllCallReply),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TransmissionType::IdentAndCategory => "1",
            TransmissionType::SurfacePosition => "2",
            TransmissionType::AirbornePosition => "3",
            TransmissionType::AirborneVelocity => "4",
            TransmissionType::SurveillanceAltitude => "5",
            TransmissionType::SurveillanceId => "6",
            TransmissionType::AirToAir => "7",
            TransmissionType::AllCallReply => "8",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            TransmissionType::IdentAndCategory => "identification and category",
            TransmissionType::SurfacePosition => "surface position",
            TransmissionType::AirbornePosition => "airborne position",
            TransmissionType::AirborneVelocity => "airborne velocity",
            TransmissionType::SurveillanceAltitude => "surveillance altitude",
            TransmissionType::SurveillanceId => "surveillance identity",
            TransmissionType::AirToAir => "air-to-air",
            TransmissionType::AllCallReply => "all-call reply",
        }
    }
}

impl fmt::Display for TransmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransmissionType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransmissionType::from_code(s).ok_or_else(|| DecodeError::UnknownTransmissionType {
            index: 1,
            value: s.to_string(),
        })
    }
}

/// One decoded surveillance event.
///
/// Optional attributes are `None` when their source field was empty.
/// `transmission_type` is always decoded but only meaningful for
/// [`MessageType::Transmission`] records.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_type: MessageType,
    pub transmission_type: TransmissionType,
    pub session_id: String,
    pub aircraft_id: String,
    pub hex_id: String,
    pub flight_id: String,
    pub generated: Option<DateTime<Utc>>,
    pub logged: Option<DateTime<Utc>>,
    pub callsign: String,
    pub altitude: Option<i32>,
    pub ground_speed: Option<i32>,
    pub track: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub vertical_rate: Option<i16>,
    /// Never populated by the decoder; no field position carries it.
    pub squawk: Option<String>,
}

impl Message {
    pub fn is_transmission(&self) -> bool {
        self.message_type == MessageType::Transmission
    }

    /// `(latitude, longitude)` when the record carried a position.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_codes_map_both_ways() {
        for t in MessageType::ALL {
            assert_eq!(MessageType::from_code(t.code()), Some(t));
        }
        assert_eq!(MessageType::from_code("msg"), None);
        assert_eq!(MessageType::from_code(""), None);
    }

    #[test]
    fn transmission_type_codes_map_both_ways() {
        for t in TransmissionType::ALL {
            assert_eq!(TransmissionType::from_code(t.code()), Some(t));
        }
        assert_eq!(TransmissionType::from_code("0"), None);
        assert_eq!(TransmissionType::from_code("9"), None);
        assert_eq!(TransmissionType::from_code(" 3"), None);
    }

    #[test]
    fn from_str_reports_canonical_index() {
        let err = "XYZ".parse::<MessageType>().unwrap_err();
        assert_eq!(err.field_index(), Some(0));
        let err = "".parse::<TransmissionType>().unwrap_err();
        assert_eq!(err.field_index(), Some(1));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        assert_eq!(
            serde_json::to_string(&TransmissionType::AirbornePosition).unwrap(),
            "\"airbornePosition\""
        );
        assert_eq!(serde_json::to_string(&MessageType::NewId).unwrap(), "\"newId\"");
    }
}
