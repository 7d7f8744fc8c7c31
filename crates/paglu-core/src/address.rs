//! # Address Book
//!
//! Saved shipping addresses. Checkout offers to save the address it ships
//! to; an address equal field-for-field to a saved one is not saved twice.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::{Address, SavedAddress};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddressBook {
    pub addresses: Vec<SavedAddress>,
}

impl AddressBook {
    pub fn new(addresses: Vec<SavedAddress>) -> Self {
        AddressBook { addresses }
    }

    /// True when an identical address is already saved.
    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.iter().any(|saved| &saved.address == address)
    }

    /// Saves `address` unless an identical one exists.
    ///
    /// Returns the new entry, or `None` for a duplicate.
    pub fn save_if_new(&mut self, address: Address) -> Option<&SavedAddress> {
        if self.contains(&address) {
            return None;
        }
        self.addresses.push(SavedAddress {
            id: Uuid::new_v4().to_string(),
            address,
        });
        self.addresses.last()
    }

    /// Deletes a saved address by id. Returns `false` if not found.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.addresses.len();
        self.addresses.retain(|saved| saved.id != id);
        self.addresses.len() != before
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Address {
        Address {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip_code: "411001".to_string(),
        }
    }

    #[test]
    fn test_save_if_new_skips_duplicates() {
        let mut book = AddressBook::default();

        assert!(book.save_if_new(home()).is_some());
        assert!(book.save_if_new(home()).is_none());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_any_field_difference_is_new() {
        let mut book = AddressBook::default();
        book.save_if_new(home());

        let mut office = home();
        office.zip_code = "411002".to_string();

        assert!(book.save_if_new(office).is_some());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut book = AddressBook::default();
        let id = book.save_if_new(home()).map(|s| s.id.clone()).unwrap();

        assert!(book.remove(&id));
        assert!(!book.remove(&id));
        assert!(book.is_empty());
    }
}
