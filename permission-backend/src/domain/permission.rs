// src/domain/permission.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 付与可能な権限の種類を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Admin,
    CodeViewer,
    IssueAdmin,
    Scan,
    User,
    GateAdmin,
    ProfileAdmin,
    Provisioning,
}

impl PermissionKind {
    /// 文字列からPermissionKindに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "codeviewer" => Some(Self::CodeViewer),
            "issueadmin" => Some(Self::IssueAdmin),
            "scan" => Some(Self::Scan),
            "user" => Some(Self::User),
            "gateadmin" => Some(Self::GateAdmin),
            "profileadmin" => Some(Self::ProfileAdmin),
            "provisioning" => Some(Self::Provisioning),
            _ => None,
        }
    }

    /// PermissionKindを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::CodeViewer => "codeviewer",
            Self::IssueAdmin => "issueadmin",
            Self::Scan => "scan",
            Self::User => "user",
            Self::GateAdmin => "gateadmin",
            Self::ProfileAdmin => "profileadmin",
            Self::Provisioning => "provisioning",
        }
    }

    /// すべての有効な権限種別を取得
    pub fn all() -> Vec<Self> {
        vec![
            Self::Admin,
            Self::CodeViewer,
            Self::IssueAdmin,
            Self::Scan,
            Self::User,
            Self::GateAdmin,
            Self::ProfileAdmin,
            Self::Provisioning,
        ]
    }

    /// プロジェクトスコープで付与できる権限かチェック
    pub fn is_project_permission(&self) -> bool {
        matches!(
            self,
            Self::Admin | Self::CodeViewer | Self::IssueAdmin | Self::Scan | Self::User
        )
    }

    /// グローバルスコープで付与できる権限かチェック
    pub fn is_global_permission(&self) -> bool {
        matches!(
            self,
            Self::Admin | Self::GateAdmin | Self::ProfileAdmin | Self::Provisioning | Self::Scan
        )
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trip() {
        for kind in PermissionKind::all() {
            assert_eq!(PermissionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PermissionKind::from_str("unknown"), None);
    }

    #[test]
    fn test_scope_classification() {
        assert!(PermissionKind::IssueAdmin.is_project_permission());
        assert!(!PermissionKind::IssueAdmin.is_global_permission());
        assert!(PermissionKind::Provisioning.is_global_permission());
        assert!(!PermissionKind::Provisioning.is_project_permission());
        // admin と scan は両方のスコープで有効
        assert!(PermissionKind::Admin.is_project_permission());
        assert!(PermissionKind::Admin.is_global_permission());
    }
}
