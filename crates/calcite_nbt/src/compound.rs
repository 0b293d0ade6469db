use std::collections::btree_map::{self, BTreeMap};
use std::ops::Index;

use crate::list::List;
use crate::value::Value;

/// A map of string names to NBT values.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Compound {
    map: BTreeMap<String, Value>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.map.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.map.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.map.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.map.iter()
    }

    /// Typed accessors for the lookups the client actually performs on
    /// registry and chunk NBT. Each returns `None` when the name is absent
    /// or holds a different type.
    pub fn get_byte(&self, name: &str) -> Option<i8> {
        match self.get(name) {
            Some(Value::Byte(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Long(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name) {
            Some(Value::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::String(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_compound(&self, name: &str) -> Option<&Compound> {
        match self.get(name) {
            Some(Value::Compound(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Option<&List> {
        match self.get(name) {
            Some(Value::List(v)) => Some(v),
            _ => None,
        }
    }
}

impl Index<&str> for Compound {
    type Output = Value;

    fn index(&self, name: &str) -> &Self::Output {
        &self.map[name]
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Compound {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
