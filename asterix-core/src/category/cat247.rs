//! CAT247: version number exchange.
//!
//! A sensor announces which edition it uses for each category it sends;
//! the decoder applies those editions to later blocks.

use crate::item::*;
use crate::message::AsterixMessage;
use crate::property::Property as P;
use crate::version::Version;

/// CAT247 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I247/010", 2, DATA_SOURCE),
    fixed(15, "I247/015", 1, &[f(P::ServiceId, 1, Unit::Raw)]),
    fixed(140, "I247/140", 3, TIME_OF_DAY),
    item(550, "I247/550", Shape::Repetitive(3), Decode::Blob(P::Versions), &[tag(P::Versions, Unit::Blob)]),
    None,
    special_purpose(),
    reserved_skip(),
];

/// Category editions reported by a CAT247 message, as (category, version).
pub fn version_reports(msg: &AsterixMessage) -> Vec<(u8, Version)> {
    let Ok(data) = msg.get_data(P::Versions) else {
        return Vec::new();
    };
    data.chunks_exact(3)
        .map(|entry| (entry[0], Version::new(entry[1], entry[2])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};
    use crate::cursor::Cursor;

    #[test]
    fn test_version_reports() {
        // FRN 1, 4: CAT048 1.21 and CAT034 1.27
        let data = [0x90, 0x01, 0x02, 0x02, 48, 1, 21, 34, 1, 27];
        let ctx = RecordContext::new(Category::Cat247.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat247, &ctx).unwrap().message;
        assert!(cur.is_empty());
        assert_eq!(
            version_reports(&m),
            vec![(48, Version::new(1, 21)), (34, Version::new(1, 27))]
        );
    }

    #[test]
    fn test_no_reports_without_item_550() {
        let m = AsterixMessage::new(247, Version::new(1, 3));
        assert!(version_reports(&m).is_empty());
    }
}
