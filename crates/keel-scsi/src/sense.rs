//! SCSI sense data: classification of (sense key, ASC, ASCQ) tuples into the
//! shared result taxonomy, and structured parsing of fixed- and
//! descriptor-format sense buffers.

use keel_types::{be_u16_at, be_u32_at, be_u64_at, ResultKind};

use crate::opcodes::{
    SENSE_FORMAT_DESC_CURRENT, SENSE_FORMAT_DESC_DEFERRED, SENSE_FORMAT_FIXED_CURRENT,
    SENSE_FORMAT_FIXED_DEFERRED,
};

/// Baseline classification per sense key (low nibble of byte 2). An ASC/ASCQ
/// table entry may override this, or explicitly keep it.
const SENSE_KEY_BASELINE: [(ResultKind, &str); 16] = [
    (ResultKind::Success, "No Sense"),
    (ResultKind::Success, "Recovered Error"),
    (ResultKind::Failure, "Not Ready"),
    (ResultKind::Failure, "Medium Error"),
    (ResultKind::Failure, "Hardware Error"),
    (ResultKind::NotSupported, "Illegal Request"),
    (ResultKind::Failure, "Unit Attention"),
    (ResultKind::AccessDenied, "Data Protect"),
    (ResultKind::Failure, "Blank Check"),
    (ResultKind::Failure, "Vendor Specific"),
    (ResultKind::Failure, "Copy Aborted"),
    (ResultKind::Aborted, "Aborted Command"),
    (ResultKind::Failure, "Reserved"),
    (ResultKind::Failure, "Volume Overflow"),
    (ResultKind::Failure, "Miscompare"),
    (ResultKind::Success, "Completed"),
];

/// One (ASC, ASCQ) table entry. `kind == None` is the "keep existing"
/// sentinel: the entry contributes a description but retains whatever the
/// sense key already implied (used for informational codes like
/// "Power On Occurred" that must not mask the key's classification).
struct AscEntry {
    asc: u8,
    ascq: u8,
    kind: Option<ResultKind>,
    desc: &'static str,
}

const fn e(asc: u8, ascq: u8, kind: ResultKind, desc: &'static str) -> AscEntry {
    AscEntry {
        asc,
        ascq,
        kind: Some(kind),
        desc,
    }
}

const fn keep(asc: u8, ascq: u8, desc: &'static str) -> AscEntry {
    AscEntry {
        asc,
        ascq,
        kind: None,
        desc,
    }
}

/// Strictly ascending on (asc, ascq); retrieval is a binary search.
///
/// This is a working subset of the SPC additional-sense catalogue covering
/// the codes storage passthrough work actually encounters.
const ASC_ASCQ_TABLE: &[AscEntry] = &[
    keep(0x00, 0x00, "No Additional Sense Information"),
    e(0x00, 0x06, ResultKind::Success, "I/O Process Detached"),
    e(0x00, 0x16, ResultKind::InProgress, "Operation In Progress"),
    e(0x00, 0x1D, ResultKind::Success, "ATA Pass Through Information Available"),
    e(0x00, 0x1E, ResultKind::Success, "Conflicting SA Creation Request"),
    e(0x01, 0x00, ResultKind::Failure, "No Index/Sector Signal"),
    e(0x02, 0x00, ResultKind::Failure, "No Seek Complete"),
    e(0x03, 0x00, ResultKind::Failure, "Peripheral Device Write Fault"),
    e(0x04, 0x00, ResultKind::Failure, "Logical Unit Not Ready, Cause Not Reportable"),
    e(0x04, 0x01, ResultKind::InProgress, "Logical Unit Is In Process Of Becoming Ready"),
    e(0x04, 0x02, ResultKind::Failure, "Logical Unit Not Ready, Initializing Command Required"),
    e(0x04, 0x03, ResultKind::Failure, "Logical Unit Not Ready, Manual Intervention Required"),
    e(0x04, 0x04, ResultKind::InProgress, "Logical Unit Not Ready, Format In Progress"),
    e(0x04, 0x07, ResultKind::InProgress, "Logical Unit Not Ready, Operation In Progress"),
    e(0x04, 0x09, ResultKind::InProgress, "Logical Unit Not Ready, Self-Test In Progress"),
    e(0x04, 0x1B, ResultKind::InProgress, "Logical Unit Not Ready, Sanitize In Progress"),
    e(0x04, 0x22, ResultKind::InProgress, "Logical Unit Not Ready, Power Cycle Required"),
    e(0x05, 0x00, ResultKind::Failure, "Logical Unit Does Not Respond To Selection"),
    e(0x06, 0x00, ResultKind::Failure, "No Reference Position Found"),
    e(0x07, 0x00, ResultKind::Failure, "Multiple Peripheral Devices Selected"),
    e(0x08, 0x00, ResultKind::Failure, "Logical Unit Communication Failure"),
    e(0x08, 0x01, ResultKind::Timeout, "Logical Unit Communication Time-Out"),
    e(0x09, 0x00, ResultKind::Failure, "Track Following Error"),
    e(0x0A, 0x00, ResultKind::Failure, "Error Log Overflow"),
    e(0x0B, 0x00, ResultKind::Failure, "Warning"),
    e(0x0B, 0x01, ResultKind::Failure, "Warning - Specified Temperature Exceeded"),
    e(0x0C, 0x00, ResultKind::Failure, "Write Error"),
    e(0x0C, 0x02, ResultKind::Failure, "Write Error - Auto Reallocation Failed"),
    e(0x0E, 0x00, ResultKind::Failure, "Invalid Information Unit"),
    e(0x10, 0x00, ResultKind::Failure, "ID CRC Or ECC Error"),
    e(0x11, 0x00, ResultKind::Failure, "Unrecovered Read Error"),
    e(0x11, 0x01, ResultKind::Failure, "Read Retries Exhausted"),
    e(0x11, 0x02, ResultKind::Failure, "Error Too Long To Correct"),
    e(0x12, 0x00, ResultKind::Failure, "Address Mark Not Found For ID Field"),
    e(0x13, 0x00, ResultKind::Failure, "Address Mark Not Found For Data Field"),
    e(0x14, 0x00, ResultKind::Failure, "Recorded Entity Not Found"),
    e(0x14, 0x01, ResultKind::Failure, "Record Not Found"),
    e(0x15, 0x00, ResultKind::Failure, "Random Positioning Error"),
    e(0x15, 0x01, ResultKind::Failure, "Mechanical Positioning Error"),
    e(0x16, 0x00, ResultKind::Failure, "Data Synchronization Mark Error"),
    e(0x17, 0x00, ResultKind::Success, "Recovered Data With No Error Correction Applied"),
    e(0x18, 0x00, ResultKind::Success, "Recovered Data With Error Correction Applied"),
    e(0x19, 0x00, ResultKind::Failure, "Defect List Error"),
    e(0x1A, 0x00, ResultKind::Failure, "Parameter List Length Error"),
    e(0x1B, 0x00, ResultKind::Failure, "Synchronous Data Transfer Error"),
    e(0x1C, 0x00, ResultKind::Failure, "Defect List Not Found"),
    e(0x1D, 0x00, ResultKind::Failure, "Miscompare During Verify Operation"),
    e(0x1E, 0x00, ResultKind::Success, "Recovered ID With ECC Correction"),
    e(0x20, 0x00, ResultKind::NotSupported, "Invalid Command Operation Code"),
    e(0x21, 0x00, ResultKind::Failure, "Logical Block Address Out Of Range"),
    e(0x21, 0x01, ResultKind::Failure, "Invalid Element Address"),
    e(0x22, 0x00, ResultKind::NotSupported, "Illegal Function"),
    e(0x23, 0x00, ResultKind::Failure, "Invalid Token Operation, Cause Not Reportable"),
    e(0x24, 0x00, ResultKind::NotSupported, "Invalid Field In CDB"),
    e(0x25, 0x00, ResultKind::NotSupported, "Logical Unit Not Supported"),
    e(0x26, 0x00, ResultKind::NotSupported, "Invalid Field In Parameter List"),
    e(0x26, 0x01, ResultKind::NotSupported, "Parameter Not Supported"),
    e(0x26, 0x02, ResultKind::NotSupported, "Parameter Value Invalid"),
    e(0x27, 0x00, ResultKind::AccessDenied, "Write Protected"),
    e(0x27, 0x01, ResultKind::AccessDenied, "Hardware Write Protected"),
    e(0x27, 0x02, ResultKind::AccessDenied, "Logical Unit Software Write Protected"),
    e(0x28, 0x00, ResultKind::Failure, "Not Ready To Ready Change, Medium May Have Changed"),
    keep(0x29, 0x00, "Power On, Reset, Or Bus Device Reset Occurred"),
    keep(0x29, 0x01, "Power On Occurred"),
    keep(0x29, 0x02, "SCSI Bus Reset Occurred"),
    keep(0x29, 0x03, "Bus Device Reset Function Occurred"),
    keep(0x29, 0x04, "Device Internal Reset"),
    e(0x2A, 0x00, ResultKind::Failure, "Parameters Changed"),
    keep(0x2A, 0x01, "Mode Parameters Changed"),
    e(0x2B, 0x00, ResultKind::Failure, "Copy Cannot Execute Since Host Cannot Disconnect"),
    e(0x2C, 0x00, ResultKind::Failure, "Command Sequence Error"),
    e(0x2E, 0x00, ResultKind::Failure, "Insufficient Time For Operation"),
    e(0x2F, 0x00, ResultKind::Aborted, "Commands Cleared By Another Initiator"),
    e(0x30, 0x00, ResultKind::Failure, "Incompatible Medium Installed"),
    e(0x31, 0x00, ResultKind::Failure, "Medium Format Corrupted"),
    e(0x31, 0x01, ResultKind::Failure, "Format Command Failed"),
    e(0x31, 0x03, ResultKind::Failure, "Sanitize Command Failed"),
    e(0x32, 0x00, ResultKind::Failure, "No Defect Spare Location Available"),
    e(0x35, 0x00, ResultKind::Failure, "Enclosure Services Failure"),
    e(0x35, 0x01, ResultKind::NotSupported, "Unsupported Enclosure Function"),
    e(0x37, 0x00, ResultKind::Success, "Rounded Parameter"),
    e(0x39, 0x00, ResultKind::NotSupported, "Saving Parameters Not Supported"),
    e(0x3A, 0x00, ResultKind::Failure, "Medium Not Present"),
    e(0x3A, 0x01, ResultKind::Failure, "Medium Not Present - Tray Closed"),
    e(0x3A, 0x02, ResultKind::Failure, "Medium Not Present - Tray Open"),
    e(0x3D, 0x00, ResultKind::Failure, "Invalid Bits In Identify Message"),
    e(0x3E, 0x00, ResultKind::Failure, "Logical Unit Has Not Self-Configured Yet"),
    e(0x3E, 0x01, ResultKind::Failure, "Logical Unit Failure"),
    e(0x3E, 0x02, ResultKind::Failure, "Timeout On Logical Unit"),
    keep(0x3F, 0x00, "Target Operating Conditions Have Changed"),
    keep(0x3F, 0x01, "Microcode Has Been Changed"),
    keep(0x3F, 0x05, "Device Identifier Changed"),
    e(0x41, 0x00, ResultKind::Failure, "Data Path Failure"),
    e(0x42, 0x00, ResultKind::Failure, "Power-On Or Self-Test Failure"),
    e(0x43, 0x00, ResultKind::Failure, "Message Error"),
    e(0x44, 0x00, ResultKind::Failure, "Internal Target Failure"),
    e(0x44, 0x71, ResultKind::Failure, "ATA Device Failed Set Features"),
    e(0x45, 0x00, ResultKind::Failure, "Select Or Reselect Failure"),
    e(0x46, 0x00, ResultKind::Failure, "Unsuccessful Soft Reset"),
    e(0x47, 0x00, ResultKind::Failure, "SCSI Parity Error"),
    e(0x48, 0x00, ResultKind::Failure, "Initiator Detected Error Message Received"),
    e(0x49, 0x00, ResultKind::Failure, "Invalid Message Error"),
    e(0x4A, 0x00, ResultKind::Failure, "Command Phase Error"),
    e(0x4B, 0x00, ResultKind::Failure, "Data Phase Error"),
    e(0x4C, 0x00, ResultKind::Failure, "Logical Unit Failed Self-Configuration"),
    e(0x4E, 0x00, ResultKind::Aborted, "Overlapped Commands Attempted"),
    e(0x53, 0x00, ResultKind::Failure, "Media Load Or Eject Failed"),
    e(0x53, 0x02, ResultKind::AccessDenied, "Medium Removal Prevented"),
    e(0x55, 0x00, ResultKind::Failure, "System Resource Failure"),
    e(0x55, 0x01, ResultKind::MemoryFailure, "System Buffer Full"),
    e(0x5A, 0x00, ResultKind::Failure, "Operator Request Or State Change Input"),
    keep(0x5D, 0x00, "Failure Prediction Threshold Exceeded"),
    keep(0x5E, 0x00, "Low Power Condition On"),
    e(0x65, 0x00, ResultKind::Failure, "Voltage Fault"),
    e(0x67, 0x0B, ResultKind::NotSupported, "ATA Device Feature Not Enabled"),
    e(0x74, 0x71, ResultKind::AccessDenied, "Logical Unit Access Not Authorized"),
];

fn lookup_asc_ascq(asc: u8, ascq: u8) -> Option<&'static AscEntry> {
    ASC_ASCQ_TABLE
        .binary_search_by(|entry| (entry.asc, entry.ascq).cmp(&(asc, ascq)))
        .ok()
        .map(|i| &ASC_ASCQ_TABLE[i])
}

pub fn describe_sense_key(sense_key: u8) -> &'static str {
    SENSE_KEY_BASELINE
        .get(usize::from(sense_key & 0x0F))
        .map(|(_, d)| *d)
        .unwrap_or("Reserved")
}

pub fn describe_asc_ascq(asc: u8, ascq: u8) -> Option<&'static str> {
    lookup_asc_ascq(asc, ascq).map(|entry| entry.desc)
}

/// Classify a (sense key, ASC, ASCQ) tuple. Never fails; unmatched ASC/ASCQ
/// pairs classify as `Unknown` (ASC >= 0x80 is vendor-specific and equally
/// unknown to us).
pub fn classify(sense_key: u8, asc: u8, ascq: u8) -> ResultKind {
    let baseline = SENSE_KEY_BASELINE[usize::from(sense_key & 0x0F)].0;

    // Multi-meaning ASC values where the ASCQ encodes a parameter rather than
    // selecting a distinct meaning; handled outside the table.
    match asc {
        0x40 => {
            // Diagnostic failure on component NN (ASCQ 0x80..0xFF).
            tracing::debug!(component = ascq, "diagnostic failure on component");
            return ResultKind::Failure;
        }
        0x4D => {
            // Tagged overlapped commands; ASCQ is the task tag.
            tracing::debug!(task_tag = ascq, "tagged overlapped commands");
            return ResultKind::Aborted;
        }
        0x70 => {
            // Decompression exception; ASCQ is the algorithm id.
            tracing::debug!(algorithm = ascq, "decompression exception");
            return ResultKind::Failure;
        }
        _ => {}
    }

    match lookup_asc_ascq(asc, ascq) {
        Some(entry) => entry.kind.unwrap_or(baseline),
        None => ResultKind::Unknown,
    }
}

/// Classify and emit verbose diagnostics for the full sense tuple, including
/// the FRU code. Sense keys outside the 4-bit range are a caller error.
pub fn check_sense_key_asc_ascq_and_fru(
    sense_key: u8,
    asc: u8,
    ascq: u8,
    fru: u8,
) -> ResultKind {
    if sense_key > 0x0F {
        return ResultKind::BadParameter;
    }

    let kind = classify(sense_key, asc, ascq);
    tracing::debug!(
        sense_key,
        asc,
        ascq,
        fru,
        key_desc = describe_sense_key(sense_key),
        asc_desc = describe_asc_ascq(asc, ascq).unwrap_or(if asc >= 0x80 {
            "Vendor Specific"
        } else {
            "Unknown"
        }),
        %kind,
        "sense data",
    );
    kind
}

/// Sense-key-specific field, interpretation selected by the sense key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenseKeySpecific {
    #[default]
    None,
    /// NO SENSE / NOT READY: progress indication (numerator of 65536).
    Progress { indication: u16 },
    /// ILLEGAL REQUEST: pointer to the offending CDB/parameter byte.
    FieldPointer {
        cdb: bool,
        bit_pointer_valid: bool,
        bit_pointer: u8,
        field_pointer: u16,
    },
    /// HARDWARE / MEDIUM / RECOVERED ERROR: actual retry count.
    RetryCount { count: u16 },
    /// COPY ABORTED: segment pointer into the copy parameter list.
    SegmentPointer {
        segment_descriptor: bool,
        bit_pointer_valid: bool,
        bit_pointer: u8,
        field_pointer: u16,
    },
    /// UNIT ATTENTION: condition queue overflow.
    UnitAttention { overflow: bool },
    /// Any other sense key: raw 3-byte payload.
    Unknown { bytes: [u8; 3] },
}

/// ATA Status Return sense descriptor (type 0x09): a register snapshot
/// carried back through SAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtaStatusReturnDescriptor {
    pub extend: bool,
    pub error: u8,
    pub sector_count: u16,
    pub lba: u64,
    pub device: u8,
    pub status: u8,
}

/// Normalized view over fixed- and descriptor-format sense data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SenseData {
    /// False when the buffer was empty or the response code unrecognized; all
    /// other fields are zero-defaulted in that case.
    pub valid_structure: bool,
    pub fixed_format: bool,
    pub deferred: bool,
    pub response_code: u8,

    pub sense_key: u8,
    pub asc: u8,
    pub ascq: u8,
    pub fru: u8,
    pub additional_length: u8,

    pub valid: bool,
    pub filemark: bool,
    pub eom: bool,
    pub ili: bool,
    pub overflow: bool,

    /// 32-bit in fixed format, up to 64-bit in descriptor format.
    pub information: u64,
    pub information_valid: bool,
    pub command_specific: u64,
    pub command_specific_valid: bool,

    pub sksv: bool,
    pub sense_key_specific: SenseKeySpecific,

    pub ata_status_return: Option<AtaStatusReturnDescriptor>,
    /// Microcode Activation descriptor: time until activation, seconds.
    pub microcode_activation_seconds: Option<u16>,

    /// Set when a descriptor of a type we do not decode was present.
    pub additional_data_available: bool,
    /// Offset of the first unrecognized descriptor.
    pub additional_data_offset: Option<usize>,
}

// Descriptor-format sense descriptor types (SPC).
const DESC_INFORMATION: u8 = 0x00;
const DESC_COMMAND_SPECIFIC: u8 = 0x01;
const DESC_SENSE_KEY_SPECIFIC: u8 = 0x02;
const DESC_FRU: u8 = 0x03;
const DESC_STREAM_COMMANDS: u8 = 0x04;
const DESC_BLOCK_COMMANDS: u8 = 0x05;
const DESC_OSD_OBJECT_ID: u8 = 0x06;
const DESC_OSD_RESPONSE_INTEGRITY: u8 = 0x07;
const DESC_OSD_ATTRIBUTE_ID: u8 = 0x08;
const DESC_ATA_STATUS_RETURN: u8 = 0x09;
const DESC_ANOTHER_PROGRESS_INDICATION: u8 = 0x0A;
const DESC_USER_DATA_SEGMENT_REFERRAL: u8 = 0x0B;
const DESC_FORWARDED_SENSE: u8 = 0x0C;
const DESC_DIRECT_ACCESS_BLOCK_DEVICE: u8 = 0x0D;
const DESC_DEVICE_DESIGNATION: u8 = 0x0E;
const DESC_MICROCODE_ACTIVATION: u8 = 0x0F;

impl SenseData {
    /// Parse a sense buffer. Never fails: empty buffers and unknown response
    /// codes yield a zeroed record with `valid_structure == false`.
    pub fn parse(buf: &[u8]) -> SenseData {
        let Some(&byte0) = buf.first() else {
            return SenseData::default();
        };
        let response_code = byte0 & 0x7F;

        match response_code {
            SENSE_FORMAT_FIXED_CURRENT | SENSE_FORMAT_FIXED_DEFERRED => {
                Self::parse_fixed(buf, response_code)
            }
            SENSE_FORMAT_DESC_CURRENT | SENSE_FORMAT_DESC_DEFERRED => {
                Self::parse_descriptor(buf, response_code)
            }
            _ => SenseData {
                response_code,
                ..SenseData::default()
            },
        }
    }

    fn parse_fixed(buf: &[u8], response_code: u8) -> SenseData {
        let mut s = SenseData {
            valid_structure: true,
            fixed_format: true,
            deferred: response_code == SENSE_FORMAT_FIXED_DEFERRED,
            response_code,
            valid: buf[0] & 0x80 != 0,
            ..SenseData::default()
        };

        if let Some(&b2) = buf.get(2) {
            s.filemark = b2 & 0x80 != 0;
            s.eom = b2 & 0x40 != 0;
            s.ili = b2 & 0x20 != 0;
            s.sense_key = b2 & 0x0F;
        }

        // Information is at a fixed offset; read whenever the bytes exist so a
        // short buffer yields zero, never garbage.
        s.information = u64::from(be_u32_at(buf, 3));
        s.information_valid = s.valid;
        s.additional_length = buf.get(7).copied().unwrap_or(0);

        // "Returned length" is the additional length plus the 8 header bytes,
        // clamped to what the transport actually gave us.
        let returned_len = (usize::from(s.additional_length) + 8).min(buf.len());

        if returned_len >= 12 {
            s.command_specific = u64::from(be_u32_at(buf, 8));
            s.command_specific_valid = true;
        }
        if returned_len >= 14 {
            s.asc = buf[12];
            s.ascq = buf[13];
        }
        if returned_len >= 15 {
            s.fru = buf[14];
        }
        if returned_len >= 18 && buf[15] & 0x80 != 0 {
            s.sksv = true;
            s.sense_key_specific = decode_sks(s.sense_key, [buf[15], buf[16], buf[17]]);
            if let SenseKeySpecific::UnitAttention { overflow } = s.sense_key_specific {
                s.overflow = overflow;
            }
        }
        s
    }

    fn parse_descriptor(buf: &[u8], response_code: u8) -> SenseData {
        let mut s = SenseData {
            valid_structure: true,
            fixed_format: false,
            deferred: response_code == SENSE_FORMAT_DESC_DEFERRED,
            response_code,
            sense_key: buf.get(1).copied().unwrap_or(0) & 0x0F,
            asc: buf.get(2).copied().unwrap_or(0),
            ascq: buf.get(3).copied().unwrap_or(0),
            additional_length: buf.get(7).copied().unwrap_or(0),
            ..SenseData::default()
        };

        let end = (8 + usize::from(s.additional_length)).min(buf.len());
        let mut off = 8;
        while off + 2 <= end {
            let desc_type = buf[off];
            let desc_len = usize::from(buf[off + 1]);
            if desc_len == 0 {
                // A zero-length descriptor on malformed data would loop forever.
                break;
            }
            let desc_end = (off + 2 + desc_len).min(end);
            let d = &buf[off..desc_end];
            s.decode_one_descriptor(desc_type, d, off);
            off = desc_end;
        }
        s
    }

    fn decode_one_descriptor(&mut self, desc_type: u8, d: &[u8], offset: usize) {
        match desc_type {
            DESC_INFORMATION => {
                self.information_valid = d.get(2).copied().unwrap_or(0) & 0x80 != 0;
                self.information = be_u64_at(d, 4);
            }
            DESC_COMMAND_SPECIFIC => {
                self.command_specific = be_u64_at(d, 4);
                self.command_specific_valid = true;
            }
            DESC_SENSE_KEY_SPECIFIC => {
                if d.len() >= 7 && d[4] & 0x80 != 0 {
                    self.sksv = true;
                    self.sense_key_specific = decode_sks(self.sense_key, [d[4], d[5], d[6]]);
                    if let SenseKeySpecific::UnitAttention { overflow } = self.sense_key_specific {
                        self.overflow = overflow;
                    }
                }
            }
            DESC_FRU => {
                self.fru = d.get(3).copied().unwrap_or(0);
            }
            DESC_STREAM_COMMANDS => {
                if let Some(&b3) = d.get(3) {
                    self.filemark = b3 & 0x80 != 0;
                    self.eom = b3 & 0x40 != 0;
                    self.ili = b3 & 0x20 != 0;
                }
            }
            DESC_BLOCK_COMMANDS => {
                self.ili = d.get(3).copied().unwrap_or(0) & 0x20 != 0;
            }
            DESC_ATA_STATUS_RETURN => {
                if d.len() >= 14 {
                    self.ata_status_return = Some(AtaStatusReturnDescriptor {
                        extend: d[2] & 0x01 != 0,
                        error: d[3],
                        sector_count: u16::from_be_bytes([d[4], d[5]]),
                        // Registers come back interleaved: (ext, current) per
                        // LBA register pair.
                        lba: u64::from(d[7])
                            | u64::from(d[9]) << 8
                            | u64::from(d[11]) << 16
                            | u64::from(d[6]) << 24
                            | u64::from(d[8]) << 32
                            | u64::from(d[10]) << 40,
                        device: d[12],
                        status: d[13],
                    });
                }
            }
            DESC_MICROCODE_ACTIVATION => {
                self.microcode_activation_seconds = Some(be_u16_at(d, 4));
            }
            DESC_DIRECT_ACCESS_BLOCK_DEVICE => {
                // Combines valid/ili flags with fixed 8-byte information and
                // command-specific fields.
                self.information_valid = d.get(2).copied().unwrap_or(0) & 0x80 != 0;
                self.ili = d.get(4).copied().unwrap_or(0) & 0x20 != 0;
                if d.len() >= 16 {
                    self.information = be_u64_at(d, 8);
                }
                if d.len() >= 24 {
                    self.command_specific = be_u64_at(d, 16);
                    self.command_specific_valid = true;
                }
                if d.len() >= 27 && d[24] & 0x80 != 0 {
                    self.sksv = true;
                    self.sense_key_specific = decode_sks(self.sense_key, [d[24], d[25], d[26]]);
                }
                if let Some(&fru) = d.get(27) {
                    self.fru = fru;
                }
            }
            DESC_OSD_OBJECT_ID
            | DESC_OSD_RESPONSE_INTEGRITY
            | DESC_OSD_ATTRIBUTE_ID
            | DESC_ANOTHER_PROGRESS_INDICATION
            | DESC_USER_DATA_SEGMENT_REFERRAL
            | DESC_FORWARDED_SENSE
            | DESC_DEVICE_DESIGNATION => {
                // Recognized but not decoded into dedicated fields.
            }
            _ => {
                self.additional_data_available = true;
                if self.additional_data_offset.is_none() {
                    self.additional_data_offset = Some(offset);
                }
            }
        }
    }

    /// Classification shorthand for the parsed tuple.
    pub fn classify(&self) -> ResultKind {
        if !self.valid_structure {
            return ResultKind::Unknown;
        }
        classify(self.sense_key, self.asc, self.ascq)
    }
}

fn decode_sks(sense_key: u8, raw: [u8; 3]) -> SenseKeySpecific {
    use crate::opcodes::*;
    match sense_key {
        SENSE_NO_SENSE | SENSE_NOT_READY => SenseKeySpecific::Progress {
            indication: u16::from_be_bytes([raw[1], raw[2]]),
        },
        SENSE_ILLEGAL_REQUEST => SenseKeySpecific::FieldPointer {
            cdb: raw[0] & 0x40 != 0,
            bit_pointer_valid: raw[0] & 0x08 != 0,
            bit_pointer: raw[0] & 0x07,
            field_pointer: u16::from_be_bytes([raw[1], raw[2]]),
        },
        SENSE_HARDWARE_ERROR | SENSE_MEDIUM_ERROR | SENSE_RECOVERED_ERROR => {
            SenseKeySpecific::RetryCount {
                count: u16::from_be_bytes([raw[1], raw[2]]),
            }
        }
        SENSE_COPY_ABORTED => SenseKeySpecific::SegmentPointer {
            segment_descriptor: raw[0] & 0x20 != 0,
            bit_pointer_valid: raw[0] & 0x08 != 0,
            bit_pointer: raw[0] & 0x07,
            field_pointer: u16::from_be_bytes([raw[1], raw[2]]),
        },
        SENSE_UNIT_ATTENTION => SenseKeySpecific::UnitAttention {
            overflow: raw[2] & 0x01 != 0,
        },
        _ => SenseKeySpecific::Unknown { bytes: raw },
    }
}
