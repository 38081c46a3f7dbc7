//! CAT008: monoradar derived weather information.

use crate::item::*;
use crate::property::Property as P;

/// I008/000 message types.
pub const MSG_POLAR_VECTOR: u8 = 1;
pub const MSG_CARTESIAN_VECTOR_START_LENGTH: u8 = 2;
pub const MSG_CONTOUR_RECORD: u8 = 3;
pub const MSG_CARTESIAN_VECTOR_START_END: u8 = 4;
pub const MSG_START_OF_PICTURE: u8 = 254;
pub const MSG_END_OF_PICTURE: u8 = 255;

/// CAT008 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I008/010", 2, DATA_SOURCE),
    fixed(0, "I008/000", 1, MESSAGE_TYPE),
    extended(
        20,
        "I008/020",
        &[f(P::VectorQualifier, 1, Unit::Flags), f(P::VectorQualifierExt, 1, Unit::Flags)],
    ),
    item(
        36,
        "I008/036",
        Shape::Repetitive(3),
        Decode::Blob(P::CartesianVectorData),
        &[tag(P::CartesianVectorData, Unit::Blob)],
    ),
    item(34, "I008/034", Shape::Repetitive(4), Decode::Blob(P::PolarVectorData), &[tag(P::PolarVectorData, Unit::Blob)]),
    fixed(40, "I008/040", 2, &[f(P::ContourIdentifier, 2, Unit::Raw)]),
    item(50, "I008/050", Shape::Repetitive(2), Decode::Blob(P::ContourData), &[tag(P::ContourData, Unit::Blob)]),
    // FRN 8-14
    fixed(90, "I008/090", 3, TIME_OF_DAY),
    item(
        100,
        "I008/100",
        Shape::Extended { first: 3, ext: 1 },
        Decode::Fields,
        &[f(P::ProcStatus, 3, Unit::Flags)],
    ),
    item(
        110,
        "I008/110",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::StationConfigStatus, 1, Unit::Flags)],
    ),
    fixed(120, "I008/120", 2, &[f(P::TotalPictureItems, 2, Unit::Raw)]),
    item(
        38,
        "I008/038",
        Shape::Repetitive(4),
        Decode::Blob(P::WeatherVectorData),
        &[tag(P::WeatherVectorData, Unit::Blob)],
    ),
    special_purpose(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};
    use crate::cursor::Cursor;

    #[test]
    fn test_polar_vectors() {
        // FRN 1, 2, 3, 5 (034) with one vector
        let data = [0xE8, 0x01, 0x02, 0x01, 0x40, 0x01, 0x10, 0x20, 0x30, 0x40];
        let ctx = RecordContext::new(Category::Cat008.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat008, &ctx).unwrap().message;
        assert!(cur.is_empty());
        assert_eq!(m.get::<u8>(P::MessageType).unwrap(), MSG_POLAR_VECTOR);
        assert_eq!(m.get::<u8>(P::VectorQualifier).unwrap(), 0x40);
        assert_eq!(m.get_data(P::PolarVectorData).unwrap(), &[0x10, 0x20, 0x30, 0x40]);
    }

    #[test]
    fn test_processing_status_extension_is_bounded() {
        // FRN 1, FX; FRN 9 (100) with one extension octet
        let data = [0x81, 0x40, 0x01, 0x02, 0x00, 0x10, 0x01, 0x00];
        let ctx = RecordContext::new(Category::Cat008.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat008, &ctx).unwrap().message;
        assert!(cur.is_empty());
        assert_eq!(m.get::<u32>(P::ProcStatus).unwrap(), 0x1001);
    }
}
