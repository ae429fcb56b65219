//! NVMe opcode, feature, and log-page identifiers (NVM Express base spec).

// Admin command set.
pub const ADMIN_DELETE_IO_SQ: u8 = 0x00;
pub const ADMIN_CREATE_IO_SQ: u8 = 0x01;
pub const ADMIN_GET_LOG_PAGE: u8 = 0x02;
pub const ADMIN_DELETE_IO_CQ: u8 = 0x04;
pub const ADMIN_CREATE_IO_CQ: u8 = 0x05;
pub const ADMIN_IDENTIFY: u8 = 0x06;
pub const ADMIN_ABORT: u8 = 0x08;
pub const ADMIN_SET_FEATURES: u8 = 0x09;
pub const ADMIN_GET_FEATURES: u8 = 0x0A;
pub const ADMIN_ASYNC_EVENT_REQUEST: u8 = 0x0C;
pub const ADMIN_FIRMWARE_COMMIT: u8 = 0x10;
pub const ADMIN_FIRMWARE_DOWNLOAD: u8 = 0x11;
pub const ADMIN_FORMAT_NVM: u8 = 0x80;
pub const ADMIN_SECURITY_SEND: u8 = 0x81;
pub const ADMIN_SECURITY_RECEIVE: u8 = 0x82;
pub const ADMIN_SANITIZE: u8 = 0x84;

// NVM command set.
pub const NVM_FLUSH: u8 = 0x00;
pub const NVM_WRITE: u8 = 0x01;
pub const NVM_READ: u8 = 0x02;
pub const NVM_WRITE_UNCORRECTABLE: u8 = 0x04;
pub const NVM_COMPARE: u8 = 0x05;
pub const NVM_WRITE_ZEROES: u8 = 0x08;
pub const NVM_DATASET_MANAGEMENT: u8 = 0x09;
pub const NVM_VERIFY: u8 = 0x0C;
pub const NVM_RESERVATION_REGISTER: u8 = 0x0D;
pub const NVM_RESERVATION_REPORT: u8 = 0x0E;
pub const NVM_RESERVATION_ACQUIRE: u8 = 0x11;
pub const NVM_RESERVATION_RELEASE: u8 = 0x15;

// Identify CNS values.
pub const CNS_NAMESPACE: u8 = 0x00;
pub const CNS_CONTROLLER: u8 = 0x01;
pub const CNS_ACTIVE_NAMESPACE_LIST: u8 = 0x02;

// Log page identifiers.
pub const LOG_ERROR_INFORMATION: u8 = 0x01;
pub const LOG_SMART_HEALTH: u8 = 0x02;
pub const LOG_FIRMWARE_SLOT: u8 = 0x03;
pub const LOG_DEVICE_SELF_TEST: u8 = 0x06;
pub const LOG_TELEMETRY_HOST: u8 = 0x07;
pub const LOG_TELEMETRY_CONTROLLER: u8 = 0x08;
pub const LOG_SANITIZE_STATUS: u8 = 0x81;

// Feature identifiers.
pub const FEAT_ARBITRATION: u8 = 0x01;
pub const FEAT_POWER_MANAGEMENT: u8 = 0x02;
pub const FEAT_TEMPERATURE_THRESHOLD: u8 = 0x04;
pub const FEAT_ERROR_RECOVERY: u8 = 0x05;
pub const FEAT_VOLATILE_WRITE_CACHE: u8 = 0x06;
pub const FEAT_NUMBER_OF_QUEUES: u8 = 0x07;
pub const FEAT_ASYNC_EVENT_CONFIG: u8 = 0x0B;
