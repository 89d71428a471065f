/// Tools for managing prospective puppy buyers
///
/// This module implements the customer_add, customer_update and
/// customer_list MCP tools.

use serde::{Deserialize, Serialize};

use crate::domain::{Customer, CustomerId};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for adding a customer
#[derive(Debug, Deserialize)]
pub struct AddCustomerParams {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
}

/// Response from adding a customer
#[derive(Debug, Serialize)]
pub struct AddCustomerResponse {
    pub success: bool,
    pub customer_id: Option<String>,
    pub message: String,
}

/// Parameters for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerParams {
    pub customer_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Response from updating a customer
#[derive(Debug, Serialize)]
pub struct UpdateCustomerResponse {
    pub success: bool,
    pub message: String,
}

/// Parameters for listing customers
#[derive(Debug, Deserialize)]
pub struct ListCustomersParams {
    pub include_inactive: Option<bool>,
}

/// One customer in a listing response
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
}

/// Response from listing customers
#[derive(Debug, Serialize)]
pub struct ListCustomersResponse {
    pub customers: Vec<CustomerSummary>,
    pub total_count: usize,
}

/// Add a customer using the provided storage
pub fn add_customer<S: KennelStorage>(
    storage: &S,
    params: AddCustomerParams,
) -> Result<AddCustomerResponse, StorageError> {
    let customer = Customer::new(
        params.name.clone(),
        params.email,
        params.phone,
        params.city,
        params.notes,
    )?;

    let customer_id = customer.id.to_string();
    storage.create_customer(&customer)?;

    Ok(AddCustomerResponse {
        success: true,
        customer_id: Some(customer_id),
        message: format!("Added customer {}", params.name),
    })
}

/// Update an existing customer using the provided storage
pub fn update_customer<S: KennelStorage>(
    storage: &S,
    params: UpdateCustomerParams,
) -> Result<UpdateCustomerResponse, StorageError> {
    let customer_id = CustomerId::from_string(&params.customer_id).map_err(|_| {
        StorageError::CustomerNotFound {
            customer_id: params.customer_id.clone(),
        }
    })?;

    let mut customer = storage.get_customer(&customer_id)?;

    customer.update(
        params.name,
        params.email.map(Some),
        params.phone.map(Some),
        params.city.map(Some),
        params.notes.map(Some),
        params.is_active,
    )?;

    storage.update_customer(&customer)?;

    let message = match params.is_active {
        Some(false) => format!("Archived customer {}", customer.name),
        Some(true) => format!("Reactivated customer {}", customer.name),
        None => format!("Updated customer {}", customer.name),
    };

    Ok(UpdateCustomerResponse {
        success: true,
        message,
    })
}

/// List customers using the provided storage
pub fn list_customers<S: KennelStorage>(
    storage: &S,
    params: ListCustomersParams,
) -> Result<ListCustomersResponse, StorageError> {
    let active_only = !params.include_inactive.unwrap_or(false);
    let customers = storage.list_customers(active_only)?;

    let summaries: Vec<CustomerSummary> = customers
        .into_iter()
        .map(|customer| CustomerSummary {
            customer_id: customer.id.to_string(),
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            city: customer.city,
            is_active: customer.is_active,
        })
        .collect();

    let total_count = summaries.len();

    Ok(ListCustomersResponse {
        customers: summaries,
        total_count,
    })
}
