// ── Target selection ──

use std::fmt;

/// How the input file addresses routers. Exactly one mode governs a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetMode {
    /// One router per row, by id.
    DeviceId,
    /// Every router in a group, by group id.
    GroupId,
    /// Every router in a group, by group name.
    GroupName,
}

impl TargetMode {
    /// Column-style label used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeviceId => "router_id",
            Self::GroupId => "group_id",
            Self::GroupName => "group_name",
        }
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::GroupId | Self::GroupName)
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mode plus the identifier read from the row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSelector {
    pub mode: TargetMode,
    pub identifier: String,
}

impl TargetSelector {
    pub fn new(mode: TargetMode, identifier: impl Into<String>) -> Self {
        Self {
            mode,
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}'", self.mode, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_display_quotes_identifier() {
        let sel = TargetSelector::new(TargetMode::GroupName, "West Coast");
        assert_eq!(sel.to_string(), "group_name='West Coast'");
    }

    #[test]
    fn only_group_modes_are_groups() {
        assert!(!TargetMode::DeviceId.is_group());
        assert!(TargetMode::GroupId.is_group());
        assert!(TargetMode::GroupName.is_group());
    }
}
