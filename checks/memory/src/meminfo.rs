//! Reading `/proc/meminfo`.
//!
//! The file is parsed in a single pass into a key/value table; the snapshot
//! then pulls the two figures it needs out of that table and fails loudly if
//! either one is missing.

use hostcheck_rs_core::convert;
use hostcheck_rs_core::error::Result;
use hostcheck_rs_core::CheckError;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Path to the proc meminfo file.
pub const PROC_MEMINFO_PATH: &str = "/proc/meminfo";

const MEM_TOTAL: &str = "MemTotal";
const MEM_AVAILABLE: &str = "MemAvailable";

/// Every numeric field of a meminfo report, keyed by name.
///
/// Values are kept exactly as reported (kB for the fields that carry a unit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemInfo {
    fields: HashMap<String, u64>,
}

impl MemInfo {
    /// Parse `Key:   N kB` lines.
    ///
    /// Blank lines and lines without a value are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::SourceRead`] if a value is not a non-negative
    /// integer.
    pub fn parse(content: &str) -> Result<Self> {
        let mut fields = HashMap::new();

        for line in content.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let Some(raw) = rest.split_whitespace().next() else {
                continue;
            };

            let value = raw.parse::<u64>().map_err(|e| {
                CheckError::source_read_with_source(
                    format!("Failed to parse {key} value '{raw}'"),
                    e,
                )
            })?;
            fields.insert(key.to_owned(), value);
        }

        Ok(Self { fields })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        self.fields.get(key).copied()
    }

    /// Look up a field that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MissingKey`] naming `key` and `source_name`.
    pub fn require(&self, key: &str, source_name: &str) -> Result<u64> {
        self.get(key)
            .ok_or_else(|| CheckError::missing_key(key, source_name))
    }
}

/// Total and available memory at one point in time, in kB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    /// Total usable RAM
    pub total_kb: u64,
    /// Memory available for new allocations without swapping
    pub available_kb: u64,
}

impl MemorySnapshot {
    #[must_use]
    pub const fn new(total_kb: u64, available_kb: u64) -> Self {
        Self {
            total_kb,
            available_kb,
        }
    }

    /// Memory in use; zero if the source reports more available than total.
    #[must_use]
    pub const fn used_kb(&self) -> u64 {
        convert::used_kb(self.total_kb, self.available_kb)
    }

    /// Extract the snapshot from a parsed table.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MissingKey`] if `MemTotal` or `MemAvailable` is
    /// absent. There is no estimate from other fields.
    pub fn from_meminfo(info: &MemInfo, source_name: &str) -> Result<Self> {
        Ok(Self {
            total_kb: info.require(MEM_TOTAL, source_name)?,
            available_kb: info.require(MEM_AVAILABLE, source_name)?,
        })
    }

    /// Read the snapshot from a meminfo file path (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::PermissionDenied`] if the file cannot be opened
    /// for lack of permission, and [`CheckError::SourceRead`] or
    /// [`CheckError::MissingKey`] for any other read or parse failure.
    pub fn from_meminfo_path(path: &Path) -> Result<Self> {
        let source_name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => CheckError::permission_denied(&source_name),
            _ => CheckError::source_read_with_source(
                format!("Failed to read {source_name}: {e}"),
                e,
            ),
        })?;

        let info = MemInfo::parse(&content)?;
        Self::from_meminfo(&info, &source_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
MemTotal:       16384000 kB
MemFree:         4096000 kB
MemAvailable:   12288000 kB
Buffers:         1024000 kB
Cached:          2048000 kB
SwapTotal:       8192000 kB
SwapFree:        6144000 kB
HugePages_Total:       0
"#;

    #[test]
    fn test_meminfo_parsing() {
        let info = MemInfo::parse(SAMPLE).unwrap();

        // Values stay in kB, as reported
        assert_eq!(info.get("MemTotal"), Some(16_384_000));
        assert_eq!(info.get("MemAvailable"), Some(12_288_000));
        assert_eq!(info.get("SwapFree"), Some(6_144_000));
        assert_eq!(info.get("HugePages_Total"), Some(0));
        assert_eq!(info.get("Shmem"), None);
        assert_eq!(info.get("Buffers"), Some(1_024_000));
    }

    #[test]
    fn test_meminfo_skips_lines_without_values() {
        let info = MemInfo::parse("garbage line\nMemTotal:\n\nMemFree: 10 kB\n").unwrap();
        assert_eq!(info.get("MemTotal"), None);
        assert_eq!(info.get("MemFree"), Some(10));
    }

    #[test]
    fn test_meminfo_rejects_bad_numbers() {
        let err = MemInfo::parse("MemTotal: lots kB\n").unwrap_err();
        assert!(matches!(err, CheckError::SourceRead { .. }));
        assert!(err.to_string().contains("MemTotal"));

        assert!(MemInfo::parse("MemTotal: -5 kB\n").is_err());
    }

    #[test]
    fn test_snapshot_from_meminfo() {
        let info = MemInfo::parse(SAMPLE).unwrap();
        let snapshot = MemorySnapshot::from_meminfo(&info, PROC_MEMINFO_PATH).unwrap();

        assert_eq!(snapshot, MemorySnapshot::new(16_384_000, 12_288_000));
        assert_eq!(snapshot.used_kb(), 4_096_000);
    }

    #[test]
    fn test_snapshot_missing_available_is_an_error() {
        // Older kernels without MemAvailable are not estimated.
        let info = MemInfo::parse("MemTotal: 1000 kB\nMemFree: 500 kB\n").unwrap();
        let err = MemorySnapshot::from_meminfo(&info, "fixture").unwrap_err();

        match &err {
            CheckError::MissingKey { key, source_name } => {
                assert_eq!(key, "MemAvailable");
                assert_eq!(source_name, "fixture");
            }
            other => panic!("expected missing key, got {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_missing_total_is_an_error() {
        let info = MemInfo::parse("MemAvailable: 500 kB\n").unwrap();
        let err = MemorySnapshot::from_meminfo(&info, "fixture").unwrap_err();
        assert!(err.to_string().contains("MemTotal"));
    }

    #[test]
    fn test_used_kb_clamps() {
        assert_eq!(MemorySnapshot::new(1_000, 2_000).used_kb(), 0);
        assert_eq!(MemorySnapshot::new(1_000, 1_000).used_kb(), 0);
    }

    #[test]
    fn test_snapshot_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let snapshot = MemorySnapshot::from_meminfo_path(file.path()).unwrap();
        assert_eq!(snapshot.total_kb, 16_384_000);
    }

    #[test]
    fn test_snapshot_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = MemorySnapshot::from_meminfo_path(&dir.path().join("meminfo")).unwrap_err();
        assert!(matches!(err, CheckError::SourceRead { .. }));
    }
}
