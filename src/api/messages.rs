// Response messages returned as plain text bodies

pub const SAVE_SUCCESS: &str = "Customer details saved successfully";

pub const UPDATE_SUCCESS: &str = "Customer details updated successfully";

pub const RECORD_NOT_FOUND: &str = "No customer records found";

pub fn customer_deleted(id: i32) -> String {
    format!("Customer deleted successfully with id: {id}")
}

pub fn all_customers_deleted(count: u64) -> String {
    format!("All customer records deleted successfully, count: {count}")
}
