use serde::Deserialize;
use serde::Serialize;

/// allows a pod to schedule onto nodes with a matching taint
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Toleration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<TolerationOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<TaintEffect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

impl Toleration {
    /// tolerate taint `key=value` with given effect
    pub fn equal<T: Into<String>>(key: T, value: T, effect: TaintEffect) -> Self {
        Self {
            key: Some(key.into()),
            operator: Some(TolerationOperator::Equal),
            value: Some(value.into()),
            effect: Some(effect),
            toleration_seconds: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TolerationOperator {
    Exists,
    Equal,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::{TaintEffect, Toleration};

    #[test]
    fn test_equal_toleration() {
        let toleration = Toleration::equal("dedicated", "infra", TaintEffect::NoSchedule);
        assert_eq!(
            serde_json::to_value(&toleration).expect("serialize"),
            json!({
                "key": "dedicated",
                "operator": "Equal",
                "value": "infra",
                "effect": "NoSchedule"
            })
        );
    }
}
