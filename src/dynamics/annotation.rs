use crate::error::Error;
use serde_json::Value;
use std::fmt;
use std::ops::Index;

/// An ordered list of short classification labels on one Morse-graph vertex.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    labels: Vec<String>,
}

impl Annotation {
    pub fn new() -> Annotation {
        Annotation::default()
    }

    pub fn append(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Text form `["label",...]`.
    pub fn stringify(&self) -> String {
        serde_json::to_string(&self.labels).expect("labels serialize")
    }

    /// Parse the [`stringify`](Annotation::stringify) text form.
    pub fn parse(text: &str) -> Result<Annotation, Error> {
        let value: Value = serde_json::from_str(text)?;
        Annotation::from_value(&value)
    }

    pub(crate) fn from_value(value: &Value) -> Result<Annotation, Error> {
        let labels: Vec<String> = serde_json::from_value(value.clone())?;
        Ok(Annotation { labels })
    }
}

impl Index<usize> for Annotation {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        &self.labels[i]
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}
