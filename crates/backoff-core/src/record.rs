/// Random tag used to recognize an initialized record.
pub const MAGIC: u32 = 0x5d7e_c708;

/// Layout version. Bump on any change to the byte layout so stale records
/// are reset instead of misread.
pub const VERSION: u8 = 1;

pub const RECORD_LEN: usize = 8;

/// Counter state kept in memory that survives sleep and reset.
///
/// Layout is 8 bytes, little-endian: `magic:4`, `version:1`, `reserved:1`,
/// `tries:2`. Any 8 bytes decode into a record; only a matching magic and
/// version make it valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersistentBackoffRecord {
    pub magic: u32,
    pub version: u8,
    pub reserved: u8,
    pub tries: u16,
}

impl PersistentBackoffRecord {
    /// A record that is already valid with a zero counter.
    pub const fn initialized() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            reserved: 0,
            tries: 0,
        }
    }

    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> Self {
        Self {
            magic: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            version: bytes[4],
            reserved: bytes[5],
            tries: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let magic = self.magic.to_le_bytes();
        let tries = self.tries.to_le_bytes();
        [
            magic[0],
            magic[1],
            magic[2],
            magic[3],
            self.version,
            self.reserved,
            tries[0],
            tries[1],
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC && self.version == VERSION
    }

    /// Rewrites the header and clears the counter.
    pub fn heal(&mut self) {
        *self = Self::initialized();
    }
}
