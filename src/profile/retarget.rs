//! Rewriting the device identity of a file.
//!
//! Upload services decide which features to offer from the manufacturer and product recorded
//! in `file_id`, and some also look at the creator entry of `device_info`. Rewriting both makes
//! a file look as if it had been recorded on another device. Every other byte stays as it was;
//! the file CRC is refreshed on the next write.

use crate::{
    codec::{record::DataRecord, value::FieldValue},
    profile::{MesgNum, DEVICE_INFO, FILE_ID},
    Error::{FieldNotPresent, WidthMismatch},
    FitFile, Result,
};

/// `device_index` of the device that created the file.
pub const CREATOR_DEVICE_INDEX: u8 = 0;

/// Set manufacturer and product in `file_id` and in the creator's `device_info`.
///
/// Records that do not declare a product field only get the manufacturer. `device_info`
/// records of other devices (sensors, paired head units) are left alone.
///
/// Returns the number of records changed.
///
/// # Errors
/// - [`crate::Error::FieldNotPresent`] if no `file_id` record declares a manufacturer
/// - [`crate::Error::WidthMismatch`] if a target field is not 16 bits wide; nothing is changed
///
/// ```rust,no_run
/// use fitscope::{profile::{retarget_device, GARMIN_PRODUCT, MANUFACTURER}, FitFile};
///
/// let mut fit = FitFile::from_file(std::path::Path::new("activity.fit"))?;
/// retarget_device(&mut fit, MANUFACTURER::GARMIN, GARMIN_PRODUCT::ENDURO_2)?;
/// fit.to_file("activity-enduro2.fit")?;
/// # Ok::<(), fitscope::Error>(())
/// ```
pub fn retarget_device(fit: &mut FitFile, manufacturer: u16, product: u16) -> Result<usize> {
    let file_id = MesgNum::FileId.number();
    if !fit
        .find_records(file_id)
        .any(|record| record.field(FILE_ID::MANUFACTURER).is_ok())
    {
        return Err(FieldNotPresent {
            global: file_id,
            field: FILE_ID::MANUFACTURER,
        });
    }

    let targets = [
        (file_id, FILE_ID::MANUFACTURER, FILE_ID::PRODUCT),
        (
            MesgNum::DeviceInfo.number(),
            DEVICE_INFO::MANUFACTURER,
            DEVICE_INFO::PRODUCT,
        ),
    ];

    for (global, manufacturer_field, product_field) in targets {
        for record in fit.find_records(global).filter(|r| is_target(r)) {
            check_width(record, manufacturer_field)?;
            check_width(record, product_field)?;
        }
    }

    let mut changed = 0;
    for (global, manufacturer_field, product_field) in targets {
        for record in fit.find_records_mut(global).filter(|r| is_target(r)) {
            let mut touched = false;
            for (field, value) in [(manufacturer_field, manufacturer), (product_field, product)] {
                if record.field(field).is_ok() {
                    record.set_field(field, value)?;
                    touched = true;
                }
            }
            if touched {
                changed += 1;
            }
        }
    }

    log::debug!("Retargeted {changed} record(s) to manufacturer {manufacturer}, product {product}");
    Ok(changed)
}

fn is_target(record: &DataRecord) -> bool {
    if record.global() != MesgNum::DeviceInfo.number() {
        return true;
    }

    // device_info without an index describes the creator
    match record.field(DEVICE_INFO::DEVICE_INDEX) {
        Ok(view) => {
            view.value().and_then(|value| value.as_u64()) == Some(u64::from(CREATOR_DEVICE_INDEX))
        }
        Err(_) => true,
    }
}

fn check_width(record: &DataRecord, field: u8) -> Result<()> {
    let Ok(view) = record.field(field) else {
        return Ok(());
    };

    let encoded = FieldValue::UInt16(0).encoded_len();
    if view.raw.len() != encoded {
        return Err(WidthMismatch {
            field,
            expected: view.raw.len(),
            actual: encoded,
        });
    }
    Ok(())
}
