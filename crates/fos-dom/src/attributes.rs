//! Element Attributes
//!
//! Elements carry a handful of attributes, so lookups are a linear scan
//! over a vector kept in source order.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attribute collection of one element. Names are stored as given;
/// [`ElementData`](crate::ElementData) lowercases them before they get here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedNodeMap(Vec<Attr>);

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|attr| attr.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert or overwrite; an existing attribute keeps its slot.
    /// Returns the previous value.
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        match self.position(name) {
            Some(index) => Some(std::mem::replace(&mut self.0[index].value, value.to_string())),
            None => {
                self.0.push(Attr::new(name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        self.position(name).map(|index| self.0.remove(index))
    }

    /// Names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|attr| attr.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.0.iter()
    }
}
