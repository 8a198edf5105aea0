use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bizlens_core::{DomainError, DomainResult, Entity, RecordId, UserId};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: RecordId,
    pub owner_id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub department: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn from_new(owner_id: UserId, input: NewEmployee, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id: RecordId::new(),
            owner_id,
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            role: input.role.trim().to_string(),
            department: input.department.trim().to_string(),
            salary: input.salary,
            hire_date: input.hire_date,
            status: input.status,
            created_at: now,
        })
    }

    pub fn apply_patch(&mut self, patch: &EmployeePatch) -> DomainResult<()> {
        patch.validate()?;
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            self.email = normalize_email(email);
        }
        if let Some(role) = &patch.role {
            self.role = role.trim().to_string();
        }
        if let Some(department) = &patch.department {
            self.department = department.trim().to_string();
        }
        if let Some(salary) = patch.salary {
            self.salary = salary;
        }
        if let Some(hire_date) = patch.hire_date {
            self.hire_date = hire_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }
}

impl Entity for Employee {
    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub department: String,
    pub salary: f64,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl NewEmployee {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        if self.role.trim().is_empty() {
            return Err(DomainError::validation("role cannot be empty"));
        }
        validate_salary(self.salary)
    }
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
}

impl EmployeePatch {
    pub fn validate(&self) -> DomainResult<()> {
        if self == &Self::default() {
            return Err(DomainError::validation("patch has no fields"));
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(role) = &self.role {
            if role.trim().is_empty() {
                return Err(DomainError::validation("role cannot be empty"));
            }
        }
        if let Some(salary) = self.salary {
            validate_salary(salary)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!("invalid email '{email}'")));
    }
    Ok(())
}

fn validate_salary(salary: f64) -> DomainResult<()> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(DomainError::validation("salary must be a finite non-negative number"));
    }
    Ok(())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewEmployee {
        NewEmployee {
            name: "Ana Souza".to_string(),
            email: " Ana@Example.com ".to_string(),
            role: "Analyst".to_string(),
            department: "Finance".to_string(),
            salary: 5200.0,
            hire_date: NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn new_employees_default_to_active() {
        assert_eq!(EmployeeStatus::default(), EmployeeStatus::Active);
    }

    #[test]
    fn create_normalizes_email() {
        let e = Employee::from_new(UserId::new(), input(), Utc::now()).unwrap();
        assert_eq!(e.email, "ana@example.com");
        assert_eq!(e.status, EmployeeStatus::Active);
    }

    #[test]
    fn rejects_bad_email_and_negative_salary() {
        let mut bad = input();
        bad.email = "ana.example.com".to_string();
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));

        let mut bad = input();
        bad.email = "ana@localhost".to_string();
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.salary = -1.0;
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.salary = f64::NAN;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn patch_updates_selected_fields() {
        let mut e = Employee::from_new(UserId::new(), input(), Utc::now()).unwrap();
        let patch = EmployeePatch {
            status: Some(EmployeeStatus::OnLeave),
            salary: Some(6000.0),
            ..EmployeePatch::default()
        };
        e.apply_patch(&patch).unwrap();
        assert_eq!(e.status, EmployeeStatus::OnLeave);
        assert_eq!(e.salary, 6000.0);
        assert_eq!(e.name, "Ana Souza");
    }

    #[test]
    fn invalid_patch_leaves_record_untouched() {
        let mut e = Employee::from_new(UserId::new(), input(), Utc::now()).unwrap();
        let before = e.clone();
        let patch = EmployeePatch {
            name: Some("Bia".to_string()),
            email: Some("nope".to_string()),
            ..EmployeePatch::default()
        };
        assert!(e.apply_patch(&patch).is_err());
        assert_eq!(e, before);
    }

    #[test]
    fn status_uses_snake_case() {
        assert_eq!(serde_json::to_string(&EmployeeStatus::OnLeave).unwrap(), "\"on_leave\"");
    }
}
