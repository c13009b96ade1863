use crate::error::BackoffError;

/// Default wait times in minutes.
pub const DEFAULT_MINUTES: &[u8] = &[5, 10, 15, 20, 30, 60];

/// Ordered wait times in minutes, indexed by consecutive failures.
///
/// Counts past the end reuse the last entry. A table is never empty and
/// never holds a zero entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffTable<'a> {
    minutes: &'a [u8],
}

impl BackoffTable<'static> {
    pub const DEFAULT: BackoffTable<'static> = BackoffTable {
        minutes: DEFAULT_MINUTES,
    };
}

impl Default for BackoffTable<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'a> BackoffTable<'a> {
    pub fn new(minutes: &'a [u8]) -> Result<Self, BackoffError> {
        if minutes.is_empty() {
            return Err(BackoffError::EmptyTable);
        }
        if let Some(index) = minutes.iter().position(|&value| value == 0) {
            return Err(BackoffError::ZeroMinutes { index });
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> &'a [u8] {
        self.minutes
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_default(&self) -> bool {
        self.minutes == DEFAULT_MINUTES
    }

    pub fn minutes_for(&self, tries: u16) -> u8 {
        let index = usize::from(tries).min(self.minutes.len() - 1);
        self.minutes[index]
    }

    pub fn wait_secs_for(&self, tries: u16) -> u32 {
        u32::from(self.minutes_for(tries)) * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_table() {
        assert_eq!(BackoffTable::new(&[]), Err(BackoffError::EmptyTable));
    }

    #[test]
    fn rejects_zero_entry() {
        assert_eq!(
            BackoffTable::new(&[5, 0, 10]),
            Err(BackoffError::ZeroMinutes { index: 1 })
        );
    }

    #[test]
    fn clamps_to_last_entry() {
        let table = BackoffTable::new(&[1, 2, 4]).unwrap();
        assert_eq!(table.minutes_for(0), 1);
        assert_eq!(table.minutes_for(2), 4);
        assert_eq!(table.minutes_for(3), 4);
        assert_eq!(table.minutes_for(u16::MAX), 4);
    }

    #[test]
    fn largest_entry_fits_in_seconds() {
        let table = BackoffTable::new(&[255]).unwrap();
        assert_eq!(table.wait_secs_for(0), 255 * 60);
    }

    #[test]
    fn default_table_matches_constant() {
        let table = BackoffTable::default();
        assert!(table.is_default());
        assert_eq!(table.minutes(), &[5, 10, 15, 20, 30, 60]);
        assert!(!BackoffTable::new(&[5, 10]).unwrap().is_default());
    }
}
