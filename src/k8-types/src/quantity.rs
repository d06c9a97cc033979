use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";

/// Resource quantity in its canonical string form, e.g. `10m` or `56Mi`.
/// The value is passed through to the API server untouched.
#[derive(Deserialize, Serialize, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct Quantity(String);

impl Quantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// resource name to quantity
pub type ResourceList = BTreeMap<String, Quantity>;
