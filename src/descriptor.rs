//! HID report descriptor and the constants of the joystick input report.
//!
//! Report layout (after the report ID byte the host strips):
//! ```text
//! Byte 0: buttons 1..8
//! Byte 1: buttons 9..14, 2 bits padding
//! Byte 2: X axis (signed, -127..127)
//! Byte 3: Y axis (signed, -127..127)
//! ```

/// Report ID prefixed to every input report on the wire.
pub const REPORT_ID: u8 = 0x03;

/// Payload size of one input report, not counting the report ID.
pub const REPORT_SIZE: usize = 4;

/// Number of buttons the descriptor declares usages for.
pub const BUTTON_COUNT: u8 = 14;

/// Joystick application collection: 16 button bits followed by X and Y.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // USAGE_PAGE (Generic Desktop)
    0x09, 0x04, // USAGE (Joystick)
    0xA1, 0x01, // COLLECTION (Application)
    0x85, REPORT_ID, //   REPORT_ID (3)
    //BUTTON SECTION
    0x05, 0x09, //   USAGE_PAGE (Button)
    0x19, 0x01, //   USAGE_MINIMUM (Button 1)
    0x29, BUTTON_COUNT, //   USAGE_MAXIMUM (Button 14)
    0x15, 0x00, //   LOGICAL_MINIMUM (0)
    0x25, 0x01, //   LOGICAL_MAXIMUM (1)
    0x75, 0x01, //   REPORT_SIZE (1)
    0x95, 0x10, //   REPORT_COUNT (16)
    0x55, 0x00, //   UNIT_EXPONENT (0)
    0x65, 0x00, //   UNIT (None)
    0x81, 0x02, //   INPUT (Data,Var,Abs)
    //Axes SECTION
    0x05, 0x01, //   USAGE_PAGE (Generic Desktop)
    0x09, 0x01, //   USAGE (Pointer)
    0x15, 0x81, //   LOGICAL_MINIMUM (-127)
    0x25, 0x7F, //   LOGICAL_MAXIMUM (127)
    0xA1, 0x00, //   COLLECTION (Physical)
    0x09, 0x30, //     USAGE (X)
    0x09, 0x31, //     USAGE (Y)
    0x75, 0x08, //     REPORT_SIZE (8)
    0x95, 0x02, //     REPORT_COUNT (2)
    0x81, 0x02, //     INPUT (Data,Var,Abs)
    0xC0, //   END_COLLECTION
    0xC0, // END_COLLECTION
];

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits the descriptor into (prefix, data) short items.
    fn items(descriptor: &[u8]) -> Vec<(u8, usize)> {
        let mut items = Vec::new();
        let mut i = 0;
        while i < descriptor.len() {
            let prefix = descriptor[i];
            let len = match prefix & 0x03 {
                3 => 4,
                n => n as usize,
            };
            let data = descriptor[i + 1..i + 1 + len]
                .iter()
                .rev()
                .fold(0usize, |acc, b| (acc << 8) | *b as usize);
            items.push((prefix & 0xFC, data));
            i += 1 + len;
        }
        items
    }

    #[test]
    fn declares_report_size() {
        let (mut size, mut count, mut bits) = (0, 0, 0);
        for (tag, data) in items(REPORT_DESCRIPTOR) {
            match tag {
                0x74 => size = data,
                0x94 => count = data,
                0x80 => bits += size * count,
                _ => {}
            }
        }
        assert_eq!(bits, REPORT_SIZE * 8);
    }

    #[test]
    fn collections_are_balanced() {
        let items = items(REPORT_DESCRIPTOR);
        let opened = items.iter().filter(|(tag, _)| *tag == 0xA0).count();
        let closed = items.iter().filter(|(tag, _)| *tag == 0xC0).count();
        assert_eq!(opened, 2);
        assert_eq!(opened, closed);
    }

    #[test]
    fn carries_report_id() {
        assert!(items(REPORT_DESCRIPTOR).contains(&(0x84, REPORT_ID as usize)));
    }

    #[test]
    fn axes_are_signed_bytes() {
        let items = items(REPORT_DESCRIPTOR);
        assert!(items.contains(&(0x14, 0x81)));
        assert!(items.contains(&(0x24, 0x7F)));
    }
}
