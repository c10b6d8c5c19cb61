use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Staff,
    /// Head of a department; decides requests for that department.
    Head,
    Admin,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Staff => "staff",
            StaffRole::Head => "head",
            StaffRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated member of staff behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    pub user_id: String,
    pub name: String,
    pub role: StaffRole,
    pub department: String,
}

impl Staff {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        role: StaffRole,
        department: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role,
            department: normalize_department(&department.into()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }

    pub fn belongs_to(&self, department: &str) -> bool {
        self.department == normalize_department(department)
    }

    pub fn heads(&self, department: &str) -> bool {
        self.role == StaffRole::Head && self.belongs_to(department)
    }
}

/// Departments are free text; only surrounding whitespace is insignificant.
pub fn normalize_department(department: &str) -> String {
    department.trim().to_string()
}
