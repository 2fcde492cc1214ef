// Integration tests for the tab registry

use cppad::tabs::{TabError, TabField, TabId, TabRegistry, TabStatus, STARTER_CODE};
use std::collections::HashSet;

/// Small deterministic generator so failures replay exactly
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn assert_invariants(registry: &TabRegistry) {
    assert!(registry.len() >= 1, "registry must never be empty");
    assert!(
        registry.contains(registry.active_id()),
        "active tab {} is not in the registry",
        registry.active_id()
    );
    let ids: HashSet<TabId> = registry.tabs().iter().map(|t| t.id()).collect();
    assert_eq!(ids.len(), registry.len(), "tab ids must be unique");
}

#[test]
fn test_generated_create_close_sequences() {
    for seed in 0..50 {
        let mut rng = Lcg(seed);
        let mut registry = TabRegistry::new();
        let mut seen: HashSet<TabId> = registry.tabs().iter().map(|t| t.id()).collect();

        for _ in 0..200 {
            match rng.next() % 4 {
                0 | 1 => {
                    let id = registry.create_tab();
                    assert!(seen.insert(id), "id {} was reused", id);
                    assert_eq!(registry.active_id(), id);
                }
                2 => {
                    let index = (rng.next() as usize) % registry.len();
                    let id = registry.tabs()[index].id();
                    let was_active = registry.active_id() == id;
                    let before = registry.len();
                    match registry.close_tab(id) {
                        Ok(()) => {
                            assert_eq!(registry.len(), before - 1);
                            if was_active {
                                assert_eq!(registry.active_id(), registry.tabs()[0].id());
                            }
                        }
                        Err(TabError::LastTab) => assert_eq!(before, 1),
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                _ => {
                    let index = (rng.next() as usize) % registry.len();
                    let id = registry.tabs()[index].id();
                    registry.set_active_tab(id).unwrap();
                }
            }
            assert_invariants(&registry);
        }
    }
}

#[test]
fn test_close_non_active_keeps_active() {
    let mut registry = TabRegistry::new();
    let first = registry.active_id();
    let second = registry.create_tab();
    let third = registry.create_tab();

    registry.close_tab(second).unwrap();
    assert_eq!(registry.active_id(), third);
    let ids: Vec<TabId> = registry.tabs().iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![first, third]);
}

#[test]
fn test_close_active_selects_first_remaining() {
    let mut registry = TabRegistry::new();
    let first = registry.active_id();
    registry.create_tab();
    let third = registry.create_tab();

    registry.close_tab(third).unwrap();
    assert_eq!(registry.active_id(), first);
}

#[test]
fn test_close_unknown_tab() {
    let mut registry = TabRegistry::new();
    assert!(matches!(
        registry.close_tab(TabId(99)),
        Err(TabError::NotFound(TabId(99)))
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_last_tab_cannot_be_closed() {
    let mut registry = TabRegistry::new();
    let only = registry.active_id();
    assert!(matches!(registry.close_tab(only), Err(TabError::LastTab)));
    assert_eq!(registry.active_id(), only);
}

#[test]
fn test_rename_rejects_blank_and_whitespace() {
    let mut registry = TabRegistry::new();
    let id = registry.active_id();

    assert!(!registry.rename_tab(id, ""));
    assert!(!registry.rename_tab(id, "   \t "));
    assert_eq!(registry.active().name(), "Tab 1");

    assert!(registry.rename_tab(id, "  vectors  "));
    assert_eq!(registry.active().name(), "vectors");
}

#[test]
fn test_new_tab_defaults() {
    let mut registry = TabRegistry::new();
    let id = registry.create_tab();
    let tab = registry.get(id).unwrap();

    assert_eq!(tab.name(), format!("Tab {}", id.0));
    assert_eq!(tab.code(), STARTER_CODE);
    assert_eq!(tab.input(), "");
    assert_eq!(tab.output(), "");
    assert_eq!(tab.error(), "");
    assert_eq!(tab.status(), TabStatus::Idle);
    assert!(!tab.show_input());
}

#[test]
fn test_code_update_recomputes_show_input() {
    let mut registry = TabRegistry::new();
    let id = registry.active_id();

    assert!(registry.update_tab_field(
        id,
        TabField::Code,
        "#include <iostream>\nint main() { int n; std::cin >> n; }\n",
    ));
    assert!(registry.active().show_input());

    assert!(registry.update_tab_field(id, TabField::Code, STARTER_CODE));
    assert!(!registry.active().show_input());
}

#[test]
fn test_update_unknown_tab_is_noop() {
    let mut registry = TabRegistry::new();
    assert!(!registry.update_tab_field(TabId(42), TabField::Input, "1 2"));
}

#[test]
fn test_name_field_update_follows_rename_rules() {
    let mut registry = TabRegistry::new();
    let id = registry.active_id();

    assert!(!registry.update_tab_field(id, TabField::Name, "   "));
    assert!(!registry.update_tab_field(id, TabField::Name, ""));
    assert_eq!(registry.active().name(), "Tab 1");

    assert!(registry.update_tab_field(id, TabField::Name, " sort.cpp "));
    assert_eq!(registry.active().name(), "sort.cpp");
}
