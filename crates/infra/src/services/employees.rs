use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use bizlens_core::{RecordId, UserId};
use bizlens_employees::{Employee, EmployeePatch, NewEmployee};
use bizlens_events::{ChangeKind, Collection, DataChange};

use super::{ChangeBus, publish};
use crate::data_source::{DataResult, DataSource};
use crate::query_cache::{QueryCache, QueryKey};

#[derive(Clone)]
pub struct EmployeeService {
    data: Arc<dyn DataSource>,
    cache: Arc<QueryCache<Vec<Employee>>>,
    bus: ChangeBus,
}

impl EmployeeService {
    pub fn new(data: Arc<dyn DataSource>, cache: Arc<QueryCache<Vec<Employee>>>, bus: ChangeBus) -> Self {
        Self { data, cache, bus }
    }

    pub async fn list(&self, user: UserId) -> Vec<Employee> {
        let key = QueryKey::owned(Collection::Employees.as_str(), user);
        match self.cache.get_or_fetch(key, || self.data.list_employees(user)).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(user_id = %user, error = %err, "failed to load employees");
                Vec::new()
            }
        }
    }

    pub async fn get(&self, user: UserId, id: RecordId) -> DataResult<Employee> {
        self.data.get_employee(user, id).await
    }

    pub async fn create(&self, user: UserId, input: NewEmployee) -> DataResult<Employee> {
        let employee = Employee::from_new(user, input, Utc::now())?;
        let stored = self.data.insert_employee(employee).await?;
        self.changed(user, ChangeKind::Insert, stored.id);
        Ok(stored)
    }

    pub async fn update(&self, user: UserId, id: RecordId, patch: EmployeePatch) -> DataResult<Employee> {
        patch.validate()?;
        let mut employee = self.data.get_employee(user, id).await?;
        employee.apply_patch(&patch)?;
        let stored = self.data.update_employee(employee).await?;
        self.changed(user, ChangeKind::Update, id);
        Ok(stored)
    }

    pub async fn delete(&self, user: UserId, id: RecordId) -> DataResult<()> {
        self.data.delete_employee(user, id).await?;
        self.changed(user, ChangeKind::Delete, id);
        Ok(())
    }

    fn changed(&self, user: UserId, kind: ChangeKind, id: RecordId) {
        self.cache.invalidate_owner(Collection::Employees.as_str(), user);
        publish(&self.bus, DataChange::new(user, Collection::Employees, kind, Some(id)));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use bizlens_employees::EmployeeStatus;

    use crate::services::test_support::seeded;

    use super::*;

    fn ana() -> NewEmployee {
        NewEmployee {
            name: "Ana Souza".to_string(),
            email: "Ana@Empresa.com.br".to_string(),
            role: "Analista".to_string(),
            department: "Financeiro".to_string(),
            salary: 5200.0,
            hire_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let (services, _, owner) = seeded();
        let created = services.employees.create(owner, ana()).await.unwrap();
        assert_eq!(services.employees.list(owner).await.len(), 1);

        let patch = EmployeePatch {
            status: Some(EmployeeStatus::OnLeave),
            ..EmployeePatch::default()
        };
        let updated = services.employees.update(owner, created.id, patch).await.unwrap();
        assert_eq!(updated.status, EmployeeStatus::OnLeave);
        assert_eq!(services.employees.list(owner).await[0].status, EmployeeStatus::OnLeave);

        services.employees.delete(owner, created.id).await.unwrap();
        assert!(services.employees.list(owner).await.is_empty());
        assert!(services.employees.get(owner, created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn rejects_bad_email_and_negative_salary() {
        let (services, _, owner) = seeded();

        let mut bad = ana();
        bad.email = "ana-at-empresa".to_string();
        assert!(services.employees.create(owner, bad).await.is_err());

        let mut bad = ana();
        bad.salary = -1.0;
        assert!(services.employees.create(owner, bad).await.is_err());
        assert!(services.employees.list(owner).await.is_empty());
    }
}
