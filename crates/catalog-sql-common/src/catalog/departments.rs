use async_trait::async_trait;
use catalog_common::database::{DepartmentsDatabase, Error};
use catalog_common::{Department, Employee, EntityId, NewDepartment, WriteOutcome};
use tracing::instrument;

use super::{SQLCatalogDatabase, Table};
use crate::flatten::RowFlattener;
use crate::pool::DatabasePool;
use crate::stmt::{query, Column};
use crate::{
    column_as_bool, column_as_nullable_number, column_as_number, column_as_string, unpack_into,
};

const DEPARTMENT_WITH_EMPLOYEES: &str = r#"
    SELECT
        d.id,
        d.name,
        d.budget,
        e.id,
        e.first_name,
        e.last_name,
        e.department_id,
        e.computer_id,
        e.is_supervisor,
        e.email
    FROM
        department d
    LEFT JOIN employee e ON e.department_id = d.id
"#;

fn sql_row_to_department(row: Vec<Column>) -> Result<Department, Error> {
    unpack_into!(let (id, name, budget) = row);

    Ok(Department {
        id: column_as_number!(id),
        name: column_as_string!(name),
        budget: column_as_number!(budget),
        employees: Vec::new(),
    })
}

/// Folds `DEPARTMENT_WITH_EMPLOYEES` rows into departments
fn sql_rows_to_departments_with_employees(rows: Vec<Vec<Column>>) -> Result<Vec<Department>, Error> {
    let mut flattener = RowFlattener::new();

    for row in rows {
        unpack_into!(
            let (
                id,
                name,
                budget,
                employee_id,
                first_name,
                last_name,
                department_id,
                computer_id,
                is_supervisor,
                email
            ) = row
        );

        let key: EntityId = column_as_number!(id);
        let employee_id: Option<EntityId> = column_as_nullable_number!(employee_id);
        let employee = match employee_id {
            Some(employee_id) => Some(Employee {
                id: employee_id,
                first_name: column_as_string!(first_name),
                last_name: column_as_string!(last_name),
                department_id: column_as_number!(department_id),
                computer_id: column_as_number!(computer_id),
                is_supervisor: column_as_bool!(is_supervisor),
                email: column_as_string!(email),
            }),
            None => None,
        };

        flattener.push(
            key,
            || {
                Ok(Department {
                    id: key,
                    name: column_as_string!(name),
                    budget: column_as_number!(budget),
                    employees: Vec::new(),
                })
            },
            employee,
        )?;
    }

    Ok(flattener.finish())
}

#[async_trait]
impl<RM> DepartmentsDatabase for SQLCatalogDatabase<RM>
where
    RM: DatabasePool + 'static,
{
    #[instrument(skip(self))]
    async fn list_departments(&self, include_employees: bool) -> Result<Vec<Department>, Error> {
        let conn = self.conn()?;

        if include_employees {
            let rows = query(&format!("{} ORDER BY d.id, e.id", DEPARTMENT_WITH_EMPLOYEES))?
                .fetch_all(&*conn)
                .await?;
            sql_rows_to_departments_with_employees(rows)
        } else {
            query(r#"SELECT id, name, budget FROM department ORDER BY id"#)?
                .fetch_all(&*conn)
                .await?
                .into_iter()
                .map(sql_row_to_department)
                .collect()
        }
    }

    #[instrument(skip(self))]
    async fn get_department(&self, id: EntityId) -> Result<Option<Department>, Error> {
        let conn = self.conn()?;

        query(r#"SELECT id, name, budget FROM department WHERE id = :id"#)?
            .bind("id", id)
            .fetch_one(&*conn)
            .await?
            .map(sql_row_to_department)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn get_department_with_employees(
        &self,
        id: EntityId,
    ) -> Result<Option<Department>, Error> {
        let conn = self.conn()?;

        let rows = query(&format!(
            "{} WHERE d.id = :id ORDER BY e.id",
            DEPARTMENT_WITH_EMPLOYEES
        ))?
        .bind("id", id)
        .fetch_all(&*conn)
        .await?;

        Ok(sql_rows_to_departments_with_employees(rows)?
            .into_iter()
            .next())
    }

    #[instrument(skip(self))]
    async fn add_department(&self, department: NewDepartment) -> Result<Department, Error> {
        let conn = self.conn()?;

        let id = query(r#"INSERT INTO department (name, budget) VALUES (:name, :budget) RETURNING id"#)?
            .bind("name", department.name.clone())
            .bind("budget", department.budget)
            .pluck(&*conn)
            .await?
            .ok_or(Error::InvalidDbResponse)?;

        Ok(Department::from_payload(column_as_number!(id), department))
    }

    #[instrument(skip(self))]
    async fn update_department(
        &self,
        id: EntityId,
        department: NewDepartment,
    ) -> Result<WriteOutcome, Error> {
        let statement =
            query(r#"UPDATE department SET name = :name, budget = :budget WHERE id = :id"#)?
                .bind("name", department.name)
                .bind("budget", department.budget)
                .bind("id", id);

        self.guarded_write(Table::Department, id, statement).await
    }

    #[instrument(skip(self))]
    async fn remove_department(&self, id: EntityId) -> Result<WriteOutcome, Error> {
        let statement = query(r#"DELETE FROM department WHERE id = :id"#)?.bind("id", id);

        self.guarded_write(Table::Department, id, statement).await
    }
}
