// Interpreter version gate.
//
// The embedded interpreter reports a free-form version string whose first
// characters are "<major>.<minor>". Anything that does not start that way
// is treated as unsupported.

use std::fmt;

use lemmatize_core::InitError;

/// Oldest interpreter the pymorphy2 backend runs on.
pub const MIN_PYTHON: PythonVersion = PythonVersion { major: 3, minor: 9 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    /// Parse the leading `major.minor` of a version string such as
    /// `"3.11.4 (main, Jun  7 2023, 00:00:00) [GCC 12.2.0]"`.
    pub fn parse(version: &str) -> Option<Self> {
        let (major, rest) = split_number(version.trim_start())?;
        let (minor, _) = split_number(rest.strip_prefix('.')?)?;
        Some(Self { major, minor })
    }
}

/// Split a leading run of ASCII digits off `s`.
fn split_number(s: &str) -> Option<(u32, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some((s[..digits].parse().ok()?, &s[digits..]))
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Accept `version` if it is at least `minimum`.
pub fn check_version(version: &str, minimum: PythonVersion) -> Result<(), InitError> {
    match PythonVersion::parse(version) {
        Some(found) if found >= minimum => Ok(()),
        _ => Err(InitError::VersionUnsupported {
            found: version.to_string(),
            required: minimum.to_string(),
        }),
    }
}
