//! Catalog entities
//!
//! These are transfer objects: they are materialized from the store for a single request and
//! dropped once the response is produced.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store assigned identifier
pub type EntityId = i64;

/// Department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department id
    pub id: EntityId,
    /// Department name
    pub name: String,
    /// Yearly budget
    pub budget: i64,
    /// Employees working in the department, only populated when explicitly requested
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl Department {
    /// Builds a department from a payload and the id assigned by the store
    pub fn from_payload(id: EntityId, payload: NewDepartment) -> Self {
        Self {
            id,
            name: payload.name,
            budget: payload.budget,
            employees: Vec::new(),
        }
    }
}

/// Department payload, used to create or replace a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    /// Department name
    pub name: String,
    /// Yearly budget
    pub budget: i64,
}

/// Employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee id
    pub id: EntityId,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Department the employee belongs to
    pub department_id: EntityId,
    /// Computer assigned to the employee
    pub computer_id: EntityId,
    /// Whether the employee supervises the department
    pub is_supervisor: bool,
    /// Work email
    pub email: String,
}

impl Employee {
    /// Builds an employee from a payload and the id assigned by the store
    pub fn from_payload(id: EntityId, payload: NewEmployee) -> Self {
        Self {
            id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            department_id: payload.department_id,
            computer_id: payload.computer_id,
            is_supervisor: payload.is_supervisor,
            email: payload.email,
        }
    }
}

/// Employee payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Department the employee belongs to
    pub department_id: EntityId,
    /// Computer assigned to the employee
    pub computer_id: EntityId,
    /// Whether the employee supervises the department
    #[serde(default)]
    pub is_supervisor: bool,
    /// Work email
    pub email: String,
}

/// Product offered by a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: EntityId,
    /// Product type
    pub product_type_id: EntityId,
    /// Customer selling the product
    pub customer_id: EntityId,
    /// Unit price
    pub price: Decimal,
    /// Long description
    pub description: String,
    /// Title
    pub title: String,
    /// Unix timestamp of when the product was listed
    pub date_added: u64,
    /// Number of order lines referencing the product
    #[serde(default)]
    pub popularity_index: u64,
}

/// Product payload used on creation
///
/// The listing timestamp is always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Product type
    pub product_type_id: EntityId,
    /// Customer selling the product
    pub customer_id: EntityId,
    /// Unit price
    pub price: Decimal,
    /// Long description
    pub description: String,
    /// Title
    pub title: String,
}

/// Replacement payload for an existing product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// Product type
    pub product_type_id: EntityId,
    /// Customer selling the product
    pub customer_id: EntityId,
    /// Unit price
    pub price: Decimal,
    /// Long description
    pub description: String,
    /// Title
    pub title: String,
    /// New listing timestamp, the stored one is kept when absent
    #[serde(default)]
    pub date_added: Option<u64>,
}

impl From<NewProduct> for ProductUpdate {
    fn from(value: NewProduct) -> Self {
        Self {
            product_type_id: value.product_type_id,
            customer_id: value.customer_id,
            price: value.price,
            description: value.description,
            title: value.title,
            date_added: None,
        }
    }
}
