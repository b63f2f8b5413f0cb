//! System-wide constants for the certlock escrow.

/// Default protocol name bound into the domain separator.
pub const DEFAULT_PROTOCOL_NAME: &str = "GenericTypedMessage";

/// Default protocol version bound into the domain separator.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1";

/// Default execution-context identifier (local development chain).
pub const DEFAULT_CHAIN_ID: u64 = 31_337;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 86_400;

/// Default lock period: 365 days.
pub const DEFAULT_LOCK_PERIOD_SECS: u64 = 365 * SECS_PER_DAY;

/// Default early-withdrawal period: 30 days.
pub const DEFAULT_EARLY_LOCK_PERIOD_SECS: u64 = 30 * SECS_PER_DAY;

/// Schema of the domain separator struct.
pub const DOMAIN_TYPE_SCHEMA: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Prefix of the final typed digest preimage.
pub const TYPED_DIGEST_PREFIX: [u8; 2] = [0x19, 0x01];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
