//! A small slice of the FIT profile.
//!
//! The codec itself works on numbers only: global message numbers and field numbers. This module
//! names the handful of messages and fields that device-identity editing touches, so callers do
//! not have to spell out magic numbers. It is not a complete profile; anything not listed here is
//! still decoded and written back untouched.
//!
//! # Examples
//!
//! ```rust
//! use fitscope::profile::{label, MesgNum, FILE_ID};
//!
//! assert_eq!(MesgNum::FileId.number(), 0);
//! assert_eq!(MesgNum::from_number(23), Some(MesgNum::DeviceInfo));
//! assert_eq!(label(0, FILE_ID::PRODUCT), Some("product"));
//! assert_eq!(label(0, 200), None);
//! ```

mod retarget;

pub use retarget::{retarget_device, CREATOR_DEVICE_INDEX};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Global message numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
#[repr(u16)]
pub enum MesgNum {
    /// Type, manufacturer, product and creation time of the file
    FileId = 0,
    /// Device capabilities
    Capabilities = 1,
    /// Device settings
    DeviceSettings = 2,
    /// User profile
    UserProfile = 3,
    /// Sport settings
    Sport = 12,
    /// One session of an activity
    Session = 18,
    /// One lap of a session
    Lap = 19,
    /// One sample of the activity stream
    Record = 20,
    /// Timer and other events
    Event = 21,
    /// A device that contributed to the file
    DeviceInfo = 23,
    /// Activity summary
    Activity = 34,
    /// Software and hardware version of the creator
    FileCreator = 49,
    /// Heart rate variability
    Hrv = 78,
    /// Describes one developer field
    FieldDescription = 206,
    /// Registers a developer data index
    DeveloperDataId = 207,
}

impl MesgNum {
    /// The numeric global message number.
    #[must_use]
    pub fn number(self) -> u16 {
        self as u16
    }

    /// Look up a known message by number.
    #[must_use]
    pub fn from_number(number: u16) -> Option<MesgNum> {
        MesgNum::iter().find(|mesg| mesg.number() == number)
    }

    /// Profile name of the message.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MesgNum::FileId => "file_id",
            MesgNum::Capabilities => "capabilities",
            MesgNum::DeviceSettings => "device_settings",
            MesgNum::UserProfile => "user_profile",
            MesgNum::Sport => "sport",
            MesgNum::Session => "session",
            MesgNum::Lap => "lap",
            MesgNum::Record => "record",
            MesgNum::Event => "event",
            MesgNum::DeviceInfo => "device_info",
            MesgNum::Activity => "activity",
            MesgNum::FileCreator => "file_creator",
            MesgNum::Hrv => "hrv",
            MesgNum::FieldDescription => "field_description",
            MesgNum::DeveloperDataId => "developer_data_id",
        }
    }

    /// Number of known messages.
    #[must_use]
    pub fn known() -> usize {
        MesgNum::COUNT
    }
}

impl std::fmt::Display for MesgNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[allow(non_snake_case, dead_code, missing_docs)]
/// Field numbers valid in every message.
pub mod COMMON {
    pub const MESSAGE_INDEX: u8 = 254;
    pub const TIMESTAMP: u8 = 253;
}

#[allow(non_snake_case, dead_code, missing_docs)]
/// Field numbers of `file_id`.
pub mod FILE_ID {
    pub const TYPE: u8 = 0;
    pub const MANUFACTURER: u8 = 1;
    // garmin_product when manufacturer is Garmin
    pub const PRODUCT: u8 = 2;
    pub const SERIAL_NUMBER: u8 = 3;
    pub const TIME_CREATED: u8 = 4;
    pub const NUMBER: u8 = 5;
    pub const PRODUCT_NAME: u8 = 8;
}

#[allow(non_snake_case, dead_code, missing_docs)]
/// Field numbers of `device_info`.
pub mod DEVICE_INFO {
    pub const DEVICE_INDEX: u8 = 0;
    pub const DEVICE_TYPE: u8 = 1;
    pub const MANUFACTURER: u8 = 2;
    pub const SERIAL_NUMBER: u8 = 3;
    pub const PRODUCT: u8 = 4;
    pub const SOFTWARE_VERSION: u8 = 5;
    pub const HARDWARE_VERSION: u8 = 6;
    pub const PRODUCT_NAME: u8 = 27;
}

#[allow(non_snake_case, dead_code, missing_docs)]
/// Field numbers of `file_creator`.
pub mod FILE_CREATOR {
    pub const SOFTWARE_VERSION: u8 = 0;
    pub const HARDWARE_VERSION: u8 = 1;
}

#[allow(non_snake_case, dead_code, missing_docs)]
/// Values of the `manufacturer` type.
pub mod MANUFACTURER {
    pub const GARMIN: u16 = 1;
    pub const ZEPHYR: u16 = 3;
    pub const SRM: u16 = 6;
    pub const QUARQ: u16 = 7;
    pub const DYNASTREAM: u16 = 15;
    pub const SUUNTO: u16 = 23;
    pub const WAHOO_FITNESS: u16 = 32;
    pub const DEVELOPMENT: u16 = 255;
    pub const ZWIFT: u16 = 260;
    pub const STRAVA: u16 = 265;
    pub const COROS: u16 = 294;
}

#[allow(non_snake_case, dead_code, missing_docs)]
/// Values of the `garmin_product` type.
pub mod GARMIN_PRODUCT {
    pub const ENDURO_2: u16 = 4341;
    pub const CONNECT: u16 = 65534;
}

static LABELS: &[(u16, u8, &str)] = &[
    (0, FILE_ID::TYPE, "type"),
    (0, FILE_ID::MANUFACTURER, "manufacturer"),
    (0, FILE_ID::PRODUCT, "product"),
    (0, FILE_ID::SERIAL_NUMBER, "serial_number"),
    (0, FILE_ID::TIME_CREATED, "time_created"),
    (0, FILE_ID::NUMBER, "number"),
    (0, FILE_ID::PRODUCT_NAME, "product_name"),
    (20, 0, "position_lat"),
    (20, 1, "position_long"),
    (20, 2, "altitude"),
    (20, 3, "heart_rate"),
    (20, 4, "cadence"),
    (20, 5, "distance"),
    (20, 6, "speed"),
    (20, 7, "power"),
    (21, 0, "event"),
    (21, 1, "event_type"),
    (23, DEVICE_INFO::DEVICE_INDEX, "device_index"),
    (23, DEVICE_INFO::DEVICE_TYPE, "device_type"),
    (23, DEVICE_INFO::MANUFACTURER, "manufacturer"),
    (23, DEVICE_INFO::SERIAL_NUMBER, "serial_number"),
    (23, DEVICE_INFO::PRODUCT, "product"),
    (23, DEVICE_INFO::SOFTWARE_VERSION, "software_version"),
    (23, DEVICE_INFO::HARDWARE_VERSION, "hardware_version"),
    (23, DEVICE_INFO::PRODUCT_NAME, "product_name"),
    (49, FILE_CREATOR::SOFTWARE_VERSION, "software_version"),
    (49, FILE_CREATOR::HARDWARE_VERSION, "hardware_version"),
];

/// Profile name of field `field` in message `global`, if known.
#[must_use]
pub fn label(global: u16, field: u8) -> Option<&'static str> {
    match field {
        COMMON::TIMESTAMP => return Some("timestamp"),
        COMMON::MESSAGE_INDEX => return Some("message_index"),
        _ => {}
    }

    LABELS
        .iter()
        .find(|(mesg, number, _)| *mesg == global && *number == field)
        .map(|(_, _, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesg_num_lookup() {
        for mesg in MesgNum::iter() {
            assert_eq!(MesgNum::from_number(mesg.number()), Some(mesg));
        }
        assert_eq!(MesgNum::from_number(0xFFFF), None);
        assert_eq!(MesgNum::known(), 15);
        assert_eq!(MesgNum::DeviceInfo.to_string(), "device_info");
    }

    #[test]
    fn labels() {
        assert_eq!(label(0, FILE_ID::MANUFACTURER), Some("manufacturer"));
        assert_eq!(label(23, DEVICE_INFO::PRODUCT), Some("product"));
        assert_eq!(label(20, 3), Some("heart_rate"));
        assert_eq!(label(9999, COMMON::TIMESTAMP), Some("timestamp"));
        assert_eq!(label(0, 6), None);
    }

    #[test]
    fn label_table_has_no_duplicates() {
        for (i, (mesg, field, _)) in LABELS.iter().enumerate() {
            assert!(
                !LABELS[i + 1..]
                    .iter()
                    .any(|(m, f, _)| m == mesg && f == field),
                "duplicate label for ({mesg}, {field})"
            );
        }
    }
}
