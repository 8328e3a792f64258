//! Program lookup types.

use serde::Deserialize;

/// Query string of a download request.
///
/// Missing parameters become empty strings, which never match a published
/// build.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub branch: String,
}

/// Four-part catalog key. Every part is compared exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    pub program_type: String,
    pub os: String,
    pub arch: String,
    pub branch: String,
}

impl ProgramKey {
    pub fn new(
        program_type: impl Into<String>,
        os: impl Into<String>,
        arch: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            program_type: program_type.into(),
            os: os.into(),
            arch: arch.into(),
            branch: branch.into(),
        }
    }

    /// Build a key from the path segment and query string.
    pub fn from_request(program_type: String, query: DownloadQuery) -> Self {
        Self {
            program_type,
            os: query.os,
            arch: query.arch,
            branch: query.branch,
        }
    }
}

impl std::fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.program_type, self.os, self.arch, self.branch
        )
    }
}
