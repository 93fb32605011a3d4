//! Decoder for the SBS-1 "BaseStation" comma-separated aircraft feed.
//!
//! [`decode::Decoder`] turns one split record into a typed [`model::Message`];
//! [`reader::MessageReader`] pulls records off a byte stream and decodes them
//! one by one.

pub mod csv_out;
pub mod decode;
pub mod errors;
pub mod filter;
pub mod model;
pub mod reader;
pub mod splitter;

pub use decode::{decode, decode_line, Decoder, FeedZone};
pub use errors::{AppError, DecodeError, DecodeErrorKind};
pub use model::{Message, MessageType, TransmissionType};
pub use reader::MessageReader;
