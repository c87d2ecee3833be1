// src/names.rs
//
// Shared name interning. Every identifier and symbol literal in the program
// is uniqued to a small NameRef handle; equality is handle equality.

use hashbrown::HashMap;

/// Interned name handle. `NameRef::NONE` (index 0) means "no name".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameRef(u32);

impl NameRef {
    pub const NONE: NameRef = NameRef(0);

    pub fn exists(self) -> bool {
        self.0 != 0
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Discriminator for synthetic names. The kind partitions the synthetic
/// namespace; the numeric payload keeps repeated derivations distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueNameKind {
    /// Name of a lazily created singleton class, derived from the class name.
    Singleton,
    /// Temporaries allocated by the namer via `Symbol::unique_counter`.
    Namer,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NameData {
    Utf8(String),
    Unique {
        kind: UniqueNameKind,
        original: NameRef,
        num: u32,
    },
}

/// Interns strings and synthetic names to unique NameRef handles.
#[derive(Debug, Clone)]
pub struct NameTable {
    names: Vec<NameData>,
    utf8_lookup: HashMap<String, NameRef>,
    unique_lookup: HashMap<(UniqueNameKind, NameRef, u32), NameRef>,
}

impl NameTable {
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::new(),
            utf8_lookup: HashMap::new(),
            unique_lookup: HashMap::new(),
        };
        // Index 0 is the reserved "no name" slot.
        table.names.push(NameData::Utf8(String::new()));
        table
    }

    pub fn intern(&mut self, s: &str) -> NameRef {
        if let Some(&name) = self.utf8_lookup.get(s) {
            return name;
        }
        let name = NameRef(self.names.len() as u32);
        self.names.push(NameData::Utf8(s.to_string()));
        self.utf8_lookup.insert(s.to_string(), name);
        name
    }

    /// Look up an already interned string without creating it.
    pub fn lookup(&self, s: &str) -> Option<NameRef> {
        self.utf8_lookup.get(s).copied()
    }

    /// Intern a synthetic name derived from `original`.
    pub fn unique(&mut self, kind: UniqueNameKind, original: NameRef, num: u32) -> NameRef {
        let key = (kind, original, num);
        if let Some(&name) = self.unique_lookup.get(&key) {
            return name;
        }
        let name = NameRef(self.names.len() as u32);
        self.names.push(NameData::Unique {
            kind,
            original,
            num,
        });
        self.unique_lookup.insert(key, name);
        name
    }

    /// Look up a synthetic name without creating it.
    pub fn lookup_unique(
        &self,
        kind: UniqueNameKind,
        original: NameRef,
        num: u32,
    ) -> Option<NameRef> {
        self.unique_lookup.get(&(kind, original, num)).copied()
    }

    /// The UTF-8 payload of an identifier name. Synthetic names have none.
    pub fn str_of(&self, name: NameRef) -> Option<&str> {
        match &self.names[name.0 as usize] {
            NameData::Utf8(s) => Some(s.as_str()),
            NameData::Unique { .. } => None,
        }
    }

    pub fn is_unique(&self, name: NameRef) -> bool {
        matches!(self.names[name.0 as usize], NameData::Unique { .. })
    }

    pub fn unique_kind(&self, name: NameRef) -> Option<UniqueNameKind> {
        match self.names[name.0 as usize] {
            NameData::Unique { kind, .. } => Some(kind),
            NameData::Utf8(_) => None,
        }
    }

    /// Constant names start with an uppercase letter; fuzzy search keeps the
    /// constant and identifier namespaces separate.
    pub fn is_constant_name(&self, name: NameRef) -> bool {
        match self.str_of(name) {
            Some(s) => s.chars().next().is_some_and(|c| c.is_uppercase()),
            None => false,
        }
    }

    /// Human-readable rendering. Synthetic names render as
    /// `<original$num>` so they stand out in diagnostics and dumps.
    pub fn show(&self, name: NameRef) -> String {
        match &self.names[name.0 as usize] {
            NameData::Utf8(s) => s.clone(),
            NameData::Unique {
                kind,
                original,
                num,
            } => {
                let base = self.show(*original);
                match kind {
                    UniqueNameKind::Singleton => format!("<Class:{base}>"),
                    UniqueNameKind::Namer => format!("<{base}${num}>"),
                }
            }
        }
    }

    /// Number of interned names, including the reserved slot 0.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        // Slot 0 is always present; "empty" means nothing user-visible.
        self.names.len() <= 1
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}
