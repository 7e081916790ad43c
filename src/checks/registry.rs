//! Check registry
//!
//! Central registry of all available checks. New checks should be registered here.
//!
//! ## Check Ordering
//!
//! Checks run in registration order:
//! 1. **Superhero checks** start with creation, since every later check
//!    builds on heroes it creates itself.
//! 2. **Pet-store checks** follow. They share no data with the superhero
//!    service.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::traits::Check;
use super::{
    SuperheroCreateCheck, SuperheroDeleteCheck, SuperheroReadCheck, SuperheroRoutingCheck,
    SuperheroUpdateCheck, UserCreateCheck, UserLifecycleCheck,
};

/// Global registry of all available checks
///
/// Uses IndexMap to preserve insertion order, so checks run in a
/// deterministic sequence.
pub static CHECKS: Lazy<IndexMap<&'static str, Arc<dyn Check>>> = Lazy::new(|| {
    let mut m: IndexMap<&'static str, Arc<dyn Check>> = IndexMap::new();

    m.insert("superhero-create", Arc::new(SuperheroCreateCheck));
    m.insert("superhero-read", Arc::new(SuperheroReadCheck));
    m.insert("superhero-update", Arc::new(SuperheroUpdateCheck));
    m.insert("superhero-delete", Arc::new(SuperheroDeleteCheck));
    m.insert("superhero-routing", Arc::new(SuperheroRoutingCheck));

    m.insert("user-create", Arc::new(UserCreateCheck));
    m.insert("user-lifecycle", Arc::new(UserLifecycleCheck));

    m
});

/// Get a check by name
pub fn get_check(name: &str) -> Option<Arc<dyn Check>> {
    CHECKS.get(name).cloned()
}

/// List all available check names
pub fn list_checks() -> Vec<&'static str> {
    let mut names: Vec<_> = CHECKS.keys().copied().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superhero_checks_registered() {
        assert!(CHECKS.contains_key("superhero-create"));
        assert!(CHECKS.contains_key("superhero-read"));
        assert!(CHECKS.contains_key("superhero-update"));
        assert!(CHECKS.contains_key("superhero-delete"));
        assert!(CHECKS.contains_key("superhero-routing"));
    }

    #[test]
    fn test_user_checks_registered() {
        assert!(CHECKS.contains_key("user-create"));
        assert!(CHECKS.contains_key("user-lifecycle"));
    }

    #[test]
    fn test_registry_keys_match_check_names() {
        for (key, check) in CHECKS.iter() {
            assert_eq!(*key, check.name());
        }
    }

    #[test]
    fn test_run_order() {
        let order: Vec<_> = CHECKS.keys().copied().collect();
        assert_eq!(order.first(), Some(&"superhero-create"));
        assert_eq!(order.last(), Some(&"user-lifecycle"));
    }

    #[test]
    fn test_get_check() {
        let check = get_check("user-create");
        assert!(check.is_some());
        assert_eq!(check.unwrap().name(), "user-create");

        assert!(get_check("pingpong").is_none());
    }

    #[test]
    fn test_list_checks_sorted() {
        let names = list_checks();
        assert_eq!(names.len(), 7);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
