//! Form validation shared by registration and the admin user forms.
//!
//! Each check yields the single message shown above the re-rendered form.

use std::collections::{BTreeSet, HashSet};

use crate::db::models::{
    USER_FULL_NAME_MAX_LENGTH, USER_PASSWORD_MAX_LENGTH, USER_USERNAME_MAX_LENGTH,
};

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    if full_name.is_empty() {
        Err("Full name is required.")
    } else if too_long(full_name, USER_FULL_NAME_MAX_LENGTH) {
        Err("Full name is too long.")
    } else {
        Ok(())
    }
}

/// Checks run in field order and stop at the first failure.
pub fn validate_new_user(username: &str, password: &str, full_name: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("Username is required.");
    }
    if too_long(username, USER_USERNAME_MAX_LENGTH) {
        return Err("Username is too long.");
    }
    if password.is_empty() {
        return Err("Password is required.");
    }
    if too_long(password, USER_PASSWORD_MAX_LENGTH) {
        return Err("Password is too long.");
    }
    validate_full_name(full_name)
}

/// Parses submitted group ids and checks each against the existing ids.
///
/// Duplicates collapse; the result is sorted.
pub fn parse_group_selection(raw: &[String], existing: &HashSet<i32>) -> Result<Vec<i32>, &'static str> {
    let mut selected = BTreeSet::new();
    for value in raw {
        let id: i32 = value.trim().parse().map_err(|_| "Invalid group selection.")?;
        if !existing.contains(&id) {
            return Err("Invalid group selection.");
        }
        selected.insert(id);
    }
    Ok(selected.into_iter().collect())
}
