use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::{ArgValue, Value};

/// Parsed values keyed by argument name.
///
/// Names keep the order in which they were first added. Adding under a name
/// that is already present appends, so options matched several times keep
/// every instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: IndexMap<String, Vec<ArgValue>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, value: ArgValue) {
        match self.entries.get_mut(name) {
            Some(values) => values.push(value),
            None => {
                self.entries.insert(name.to_string(), vec![value]);
            }
        }
    }

    /// The most recently added value for `name`.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries.get(name).and_then(|v| v.last())
    }

    /// Every value added for `name`, oldest first.
    pub fn get_all(&self, name: &str) -> Option<&[ArgValue]> {
        self.entries.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// How many times a value was added under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, Vec::len)
    }

    /// The last scalar value for `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(ArgValue::as_scalar)
    }

    /// The last sequence value for `name`.
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(ArgValue::as_sequence)
    }

    /// Whether the last value for `name` is boolean `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.value(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ArgValue])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Names added once serialize to their value; names added several times
/// serialize to an array of every instance.
impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            match values.as_slice() {
                [single] => map.serialize_entry(name, single)?,
                many => map.serialize_entry(name, many)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_adds_accumulate() {
        let mut results = ResultSet::new();
        results.add("define", ArgValue::from("a=1"));
        results.add("verbose", ArgValue::from(true));
        results.add("define", ArgValue::from("b=2"));

        assert_eq!(results.len(), 2);
        assert_eq!(results.count("define"), 2);
        assert_eq!(results.value("define").and_then(Value::as_str), Some("b=2"));
        let all: Vec<_> = results
            .get_all("define")
            .unwrap()
            .iter()
            .filter_map(|v| v.as_scalar().and_then(Value::as_str))
            .collect();
        assert_eq!(all, ["a=1", "b=2"]);
    }

    #[test]
    fn names_keep_first_insertion_order() {
        let mut results = ResultSet::new();
        results.add("b", ArgValue::from(1i64));
        results.add("a", ArgValue::from(2i64));
        results.add("b", ArgValue::from(3i64));
        assert_eq!(results.names().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn missing_names_read_as_absent() {
        let results = ResultSet::new();
        assert!(results.get("nope").is_none());
        assert!(results.get_all("nope").is_none());
        assert_eq!(results.count("nope"), 0);
        assert!(!results.flag("nope"));
    }

    #[test]
    fn serializes_single_and_repeated_entries() {
        let mut results = ResultSet::new();
        results.add("pair", ArgValue::Sequence(vec![Value::Int(3), Value::Int(4)]));
        results.add("tag", ArgValue::from("x"));
        results.add("tag", ArgValue::from("y"));
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(json, r#"{"pair":[3,4],"tag":["x","y"]}"#);
    }
}
