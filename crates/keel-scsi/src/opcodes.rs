//! SCSI operation codes, sense keys, and additional sense codes used by this
//! library. This is a working subset, not the full SPC/SBC catalogue.

pub const INQUIRY: u8 = 0x12;
pub const TEST_UNIT_READY: u8 = 0x00;
pub const REQUEST_SENSE: u8 = 0x03;
pub const READ_CAPACITY_10: u8 = 0x25;
pub const SERVICE_ACTION_IN_16: u8 = 0x9E;
pub const READ_CAPACITY_16_SERVICE_ACTION: u8 = 0x10;
pub const ATA_PASSTHROUGH_12: u8 = 0xA1;
pub const ATA_PASSTHROUGH_16: u8 = 0x85;

// Sense keys (byte 2 low nibble of fixed-format sense).
pub const SENSE_NO_SENSE: u8 = 0x00;
pub const SENSE_RECOVERED_ERROR: u8 = 0x01;
pub const SENSE_NOT_READY: u8 = 0x02;
pub const SENSE_MEDIUM_ERROR: u8 = 0x03;
pub const SENSE_HARDWARE_ERROR: u8 = 0x04;
pub const SENSE_ILLEGAL_REQUEST: u8 = 0x05;
pub const SENSE_UNIT_ATTENTION: u8 = 0x06;
pub const SENSE_DATA_PROTECT: u8 = 0x07;
pub const SENSE_BLANK_CHECK: u8 = 0x08;
pub const SENSE_VENDOR_SPECIFIC: u8 = 0x09;
pub const SENSE_COPY_ABORTED: u8 = 0x0A;
pub const SENSE_ABORTED_COMMAND: u8 = 0x0B;
pub const SENSE_VOLUME_OVERFLOW: u8 = 0x0D;
pub const SENSE_MISCOMPARE: u8 = 0x0E;
pub const SENSE_COMPLETED: u8 = 0x0F;

// Additional sense codes referenced directly by discovery/classification.
pub const ASC_INVALID_COMMAND_OPERATION_CODE: u8 = 0x20;
pub const ASC_LBA_OUT_OF_RANGE: u8 = 0x21;
pub const ASC_INVALID_FIELD_IN_CDB: u8 = 0x24;
pub const ASC_LOGICAL_UNIT_NOT_SUPPORTED: u8 = 0x25;
pub const ASC_INVALID_FIELD_IN_PARAMETER_LIST: u8 = 0x26;
pub const ASC_WRITE_PROTECTED: u8 = 0x27;
pub const ASC_POWER_ON_OR_RESET: u8 = 0x29;
pub const ASC_MEDIUM_NOT_PRESENT: u8 = 0x3A;
pub const ASC_INTERNAL_TARGET_FAILURE: u8 = 0x44;

// Sense response codes (byte 0 bits 6:0).
pub const SENSE_FORMAT_FIXED_CURRENT: u8 = 0x70;
pub const SENSE_FORMAT_FIXED_DEFERRED: u8 = 0x71;
pub const SENSE_FORMAT_DESC_CURRENT: u8 = 0x72;
pub const SENSE_FORMAT_DESC_DEFERRED: u8 = 0x73;
