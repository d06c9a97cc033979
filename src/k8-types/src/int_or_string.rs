use serde::Deserialize;
use serde::Serialize;

/// See: https://github.com/kubernetes/apimachinery/blob/master/pkg/util/intstr/intstr.go
/// Holds either a 32-bit integer or a string, and (de)serializes as the inner value.
/// Ports use it so a probe can target `8080` or a named port such as `"metrics"`.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(untagged)]
pub enum Int32OrString {
    Int(i32),
    String(String),
}

impl Default for Int32OrString {
    fn default() -> Self {
        Int32OrString::Int(0)
    }
}

impl From<i32> for Int32OrString {
    fn from(value: i32) -> Self {
        Int32OrString::Int(value)
    }
}

impl From<&str> for Int32OrString {
    fn from(value: &str) -> Self {
        Int32OrString::String(value.to_owned())
    }
}
