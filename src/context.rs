//! OpenGL context settings and named context storage.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// OpenGL context profile, as in `SDL_GL_CONTEXT_PROFILE_MASK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Core,
    Compatibility,
    Es,
}

impl Profile {
    /// The SDL profile mask value.
    pub fn mask(self) -> i32 {
        match self {
            Profile::Core => 0x0001,
            Profile::Compatibility => 0x0002,
            Profile::Es => 0x0004,
        }
    }
}

bitflags! {
    /// OpenGL context flags, as in `SDL_GL_CONTEXT_FLAGS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ContextFlags: u32 {
        const DEBUG = 0x0001;
        const FORWARD_COMPATIBLE = 0x0002;
        const ROBUST_ACCESS = 0x0004;
        const RESET_ISOLATION = 0x0008;
    }
}

/// Parameters of a new OpenGL context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// The version as three digits, e.g. `450` for OpenGL 4.5.
    pub version: u32,
    pub profile: Profile,
    pub flags: ContextFlags,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            version: 450,
            profile: Profile::Core,
            flags: ContextFlags::empty(),
        }
    }
}

impl ContextSettings {
    pub fn new(version: u32, profile: Profile, flags: ContextFlags) -> Self {
        Self {
            version,
            profile,
            flags,
        }
    }

    pub fn major(&self) -> u32 {
        self.version / 100
    }

    pub fn minor(&self) -> u32 {
        (self.version % 100) / 10
    }
}

/// Contexts stored by name. A context may be shared by several tables and is
/// dropped together with its last reference.
pub struct ContextTable<C> {
    contexts: RefCell<BTreeMap<String, Rc<C>>>,
}

impl<C> ContextTable<C> {
    pub fn new() -> Self {
        Self {
            contexts: RefCell::new(BTreeMap::new()),
        }
    }

    /// Stores `context` under `name` and returns the context it replaced.
    pub fn insert(&self, name: impl Into<String>, context: C) -> Option<Rc<C>> {
        self.insert_shared(name, Rc::new(context))
    }

    pub fn insert_shared(&self, name: impl Into<String>, context: Rc<C>) -> Option<Rc<C>> {
        self.contexts.borrow_mut().insert(name.into(), context)
    }

    /// Stores `other`'s context `other_name` under `name` in this table.
    pub fn share_from(&self, name: impl Into<String>, other: &ContextTable<C>, other_name: &str) {
        let context = other
            .get(other_name)
            .unwrap_or_else(|| panic!("no context named \"{other_name}\" to share"));
        self.insert_shared(name, context);
    }

    pub fn get(&self, name: &str) -> Option<Rc<C>> {
        self.contexts.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contexts.borrow().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Rc<C>> {
        self.contexts.borrow_mut().remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.contexts.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.contexts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.borrow().is_empty()
    }

    /// Drops this table's reference to every context.
    pub fn clear(&self) {
        // Take the map first so context destructors never run under the borrow.
        let contexts = std::mem::take(&mut *self.contexts.borrow_mut());
        drop(contexts);
    }
}

impl<C> Default for ContextTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Probe {
        id: u32,
        drops: Rc<Cell<u32>>,
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn probe(id: u32, drops: &Rc<Cell<u32>>) -> Probe {
        Probe {
            id,
            drops: Rc::clone(drops),
        }
    }

    #[test]
    fn test_version_split() {
        let settings = ContextSettings::default();
        assert_eq!((settings.major(), settings.minor()), (4, 5));
        let settings = ContextSettings::new(330, Profile::Es, ContextFlags::DEBUG);
        assert_eq!((settings.major(), settings.minor()), (3, 3));
        assert_eq!(settings.profile.mask(), 4);
    }

    #[test]
    fn test_flags_deserialize() {
        let settings: ContextSettings =
            serde_json::from_str(r#"{ "flags": "DEBUG | ROBUST_ACCESS", "profile": "compatibility" }"#)
                .unwrap();
        assert_eq!(settings.flags, ContextFlags::DEBUG | ContextFlags::ROBUST_ACCESS);
        assert_eq!(settings.flags.bits(), 0x5);
        assert_eq!(settings.profile, Profile::Compatibility);
        assert_eq!(settings.version, 450);
    }

    #[test]
    fn test_same_name_replaces_and_releases() {
        let drops = Rc::new(Cell::new(0));
        let table = ContextTable::new();
        assert!(table.insert("context", probe(1, &drops)).is_none());
        let replaced = table.insert("context", probe(2, &drops));
        assert_eq!(replaced.as_ref().map(|p| p.id), Some(1));
        assert_eq!(drops.get(), 0);
        drop(replaced);
        assert_eq!(drops.get(), 1);
        assert_eq!(table.get("context").map(|p| p.id), Some(2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_shared_context_lives_until_last_holder() {
        let drops = Rc::new(Cell::new(0));
        let first = ContextTable::new();
        let second = ContextTable::new();
        first.insert("context", probe(1, &drops));
        second.share_from("borrowed", &first, "context");

        first.clear();
        assert_eq!(drops.get(), 0);
        assert_eq!(second.get("borrowed").map(|p| p.id), Some(1));

        second.clear();
        assert_eq!(drops.get(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_share_within_one_table() {
        let drops = Rc::new(Cell::new(0));
        let table = ContextTable::new();
        table.insert("a", probe(1, &drops));
        table.share_from("b", &table, "a");
        assert_eq!(table.names(), vec!["a".to_string(), "b".to_string()]);
        table.remove("a");
        assert_eq!(drops.get(), 0);
        table.remove("b");
        assert_eq!(drops.get(), 1);
    }

    #[test]
    #[should_panic(expected = "no context named \"missing\"")]
    fn test_share_missing_context_panics() {
        let first: ContextTable<Probe> = ContextTable::new();
        let second = ContextTable::new();
        second.share_from("borrowed", &first, "missing");
    }
}
