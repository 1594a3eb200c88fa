use async_trait::async_trait;
use catalog_common::database::{EmployeesDatabase, Error};
use catalog_common::{Employee, EntityId, NewEmployee};
use tracing::instrument;

use super::SQLCatalogDatabase;
use crate::pool::DatabasePool;
use crate::stmt::{query, Column};
use crate::{column_as_bool, column_as_number, column_as_string, unpack_into};

fn sql_row_to_employee(row: Vec<Column>) -> Result<Employee, Error> {
    unpack_into!(
        let (
            id,
            first_name,
            last_name,
            department_id,
            computer_id,
            is_supervisor,
            email
        ) = row
    );

    Ok(Employee {
        id: column_as_number!(id),
        first_name: column_as_string!(first_name),
        last_name: column_as_string!(last_name),
        department_id: column_as_number!(department_id),
        computer_id: column_as_number!(computer_id),
        is_supervisor: column_as_bool!(is_supervisor),
        email: column_as_string!(email),
    })
}

#[async_trait]
impl<RM> EmployeesDatabase for SQLCatalogDatabase<RM>
where
    RM: DatabasePool + 'static,
{
    #[instrument(skip(self))]
    async fn get_employee(&self, id: EntityId) -> Result<Option<Employee>, Error> {
        let conn = self.conn()?;

        query(
            r#"
            SELECT
                id,
                first_name,
                last_name,
                department_id,
                computer_id,
                is_supervisor,
                email
            FROM
                employee
            WHERE
                id = :id
            "#,
        )?
        .bind("id", id)
        .fetch_one(&*conn)
        .await?
        .map(sql_row_to_employee)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn add_employee(&self, employee: NewEmployee) -> Result<Employee, Error> {
        let conn = self.conn()?;

        let id = query(
            r#"
            INSERT INTO employee
            (first_name, last_name, department_id, computer_id, is_supervisor, email)
            VALUES
            (:first_name, :last_name, :department_id, :computer_id, :is_supervisor, :email)
            RETURNING id
            "#,
        )?
        .bind("first_name", employee.first_name.clone())
        .bind("last_name", employee.last_name.clone())
        .bind("department_id", employee.department_id)
        .bind("computer_id", employee.computer_id)
        .bind("is_supervisor", employee.is_supervisor)
        .bind("email", employee.email.clone())
        .pluck(&*conn)
        .await?
        .ok_or(Error::InvalidDbResponse)?;

        Ok(Employee::from_payload(column_as_number!(id), employee))
    }
}
