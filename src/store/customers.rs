//! Customer table: customer id -> [`Customer`] in a [`ChainedHashMap`].

use crate::error::ValidationError;
use crate::index::ChainedHashMap;
use crate::persist::codec::{decode_customer, encode_customer};
use crate::types::Customer;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct CustomerTable {
    table: ChainedHashMap<String, Customer>,
}

impl CustomerTable {
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            table: ChainedHashMap::with_buckets(bucket_count),
        }
    }

    /// Check a new customer before insert.
    ///
    /// Rules: id present, no commas, numeric, not already taken; name and
    /// email present and free of commas.
    pub fn validate_new(&self, customer: &Customer) -> Result<(), ValidationError> {
        let id = customer.id.as_str();
        if id.is_empty() {
            return Err(ValidationError::Required {
                field: "customer id".to_string(),
            });
        }
        if id.contains(',') {
            return Err(ValidationError::ContainsDelimiter {
                field: "customer id".to_string(),
            });
        }
        if self.table.contains_key(id) {
            return Err(ValidationError::Duplicate {
                field: "customer id".to_string(),
                value: id.to_string(),
            });
        }
        if customer.name.is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }
        if customer.email.is_empty() {
            return Err(ValidationError::Required {
                field: "email".to_string(),
            });
        }
        for (field, value) in [("name", &customer.name), ("email", &customer.email)] {
            if value.contains(',') {
                return Err(ValidationError::ContainsDelimiter {
                    field: field.to_string(),
                });
            }
        }
        if id.parse::<i64>().is_err() {
            return Err(ValidationError::NotNumeric {
                field: "customer id".to_string(),
                value: id.to_string(),
            });
        }
        Ok(())
    }

    /// Validate and insert
    pub fn add(&mut self, customer: Customer) -> Result<(), ValidationError> {
        self.validate_new(&customer)?;
        self.table.insert(customer.id.clone(), customer);
        Ok(())
    }

    /// Insert without validation (load path); overwrites an equal id
    pub fn insert(&mut self, customer: Customer) {
        self.table.insert(customer.id.clone(), customer);
    }

    pub fn find(&self, id: &str) -> Option<&Customer> {
        self.table.find(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.table.remove(id)
    }

    /// Customers in bucket order
    pub fn list(&self) -> Vec<Customer> {
        self.table.values().cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn load_lines(&mut self, lines: &[String]) {
        for line in lines {
            match decode_customer(line) {
                Ok(customer) => self.insert(customer),
                Err(err) => warn!(line = %line, error = %err, "Skipping malformed customer record"),
            }
        }
    }

    pub fn encode_lines(&self) -> Vec<String> {
        self.table.values().map(encode_customer).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
