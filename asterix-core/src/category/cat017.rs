//! CAT017: Mode S surveillance coordination function messages.

use crate::item::*;
use crate::property::Property as P;

/// I017/000 message types.
pub const MSG_NETWORK_INFORMATION: u8 = 0;
pub const MSG_TRACK_DATA: u8 = 10;
pub const MSG_TRACK_DATA_REQUEST: u8 = 20;
pub const MSG_TRACK_DATA_STOP: u8 = 21;
pub const MSG_CANCEL_TRACK_DATA_REQUEST: u8 = 22;
pub const MSG_TRACK_DATA_STOP_ACK: u8 = 23;
pub const MSG_NEW_NODE_FINAL: u8 = 31;
pub const MSG_NEW_NODE_INITIAL_REPLY: u8 = 32;
pub const MSG_NEW_NODE_FINAL_REPLY: u8 = 33;
pub const MSG_MOVE_NODE_TO_NEW_CLUSTER_STATE: u8 = 110;
pub const MSG_MOVE_NODE_TO_NEW_CLUSTER_STATE_ACK: u8 = 111;

/// CAT017 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I017/010", 2, DATA_SOURCE),
    fixed(12, "I017/012", 2, &[f(P::DestSac, 1, Unit::Raw), f(P::DestSic, 1, Unit::Raw)]),
    fixed(0, "I017/000", 1, MESSAGE_TYPE),
    item(350, "I017/350", Shape::Repetitive(2), Decode::Blob(P::ClusterNodeList), &[tag(P::ClusterNodeList, Unit::Blob)]),
    fixed(220, "I017/220", 3, AIRCRAFT_ADDRESS),
    fixed(221, "I017/221", 2, &[f(P::DuplicateAddressRefNum, 2, Unit::Raw)]),
    fixed(140, "I017/140", 3, TIME_OF_DAY),
    // FRN 8-14
    fixed(
        45,
        "I017/045",
        6,
        &[
            f(P::PosLatitude, 3, Unit::Latitude(180.0 / 8388608.0)),
            f(P::PosLongitude, 3, Unit::Longitude(180.0 / 8388608.0)),
        ],
    ),
    fixed(70, "I017/070", 2, MODE_3A),
    fixed(50, "I017/050", 2, &[f(P::FlightLevel, 2, Unit::FlightLevel(0.25))]),
    fixed(
        200,
        "I017/200",
        4,
        &[f(P::CalcSpeed, 2, Unit::Speed(NM / 16384.0)), f(P::CalcHeading, 2, Unit::Angle(360.0 / 65536.0))],
    ),
    fixed(230, "I017/230", 1, &[f(P::TransponderCapability, 1, Unit::Flags)]),
    item(240, "I017/240", Shape::Repetitive(3), Decode::Blob(P::ModeSList), &[tag(P::ModeSList, Unit::Blob)]),
    fixed(210, "I017/210", 1, &[f(P::TrackStatus, 1, Unit::Flags)]),
    // FRN 15
    fixed(360, "I017/360", 1, &[f(P::ClusterState, 1, Unit::Raw)]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};
    use crate::cursor::Cursor;

    #[test]
    fn test_track_data_message() {
        // FRN 1, 2, 3, 5, 7
        let data = [
            0xEA, // FSPEC
            0x01, 0x02, // source
            0x03, 0x04, // destination
            MSG_TRACK_DATA,
            0x3C, 0x4D, 0x5E, // address
            0x00, 0x10, 0x00, // time
        ];
        let ctx = RecordContext::new(Category::Cat017.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat017, &ctx).unwrap().message;
        assert!(cur.is_empty());
        assert_eq!(m.get::<u8>(P::DestSac).unwrap(), 3);
        assert_eq!(m.get::<u8>(P::DestSic).unwrap(), 4);
        assert_eq!(m.get::<u32>(P::AircraftAddress).unwrap(), 0x3C4D5E);
        assert_eq!(m.get::<u32>(P::TimeOfDay).unwrap(), 0x1000);
    }
}
