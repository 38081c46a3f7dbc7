//! asterix-core: Pure ASTERIX decoding library.
//!
//! No async, no sockets. Buffers come in, decoded records go out through
//! callbacks, along with track, status and strobe reports built from them.
//! The `asterix-feeder` binary is the file/stream front end.

pub mod category;
pub mod config;
pub mod convert;
pub mod cursor;
pub mod decoder;
pub mod format;
pub mod fspec;
pub mod item;
pub mod message;
pub mod property;
pub mod spf;
pub mod types;
pub mod version;

// Re-export commonly used types at crate root
pub use category::Category;
pub use config::{DecoderConfig, RecoveryPolicy, SensorPosition};
pub use convert::{Strobe, TrackFlags, TrackReport, TrackerStatus};
pub use decoder::{DecodeSummary, Decoder};
pub use message::{AsterixMessage, PropertyStore};
pub use property::{Property, PropertyKind, Value};
pub use types::*;
pub use version::{Version, VersionRegistry};
