use std::collections::BTreeMap;

use k8_types::core::affinity::Affinity;
use k8_types::core::pod::PodSpec;
use k8_types::core::toleration::Toleration;

/// Where pods of a deployment may run. Applying it replaces the
/// corresponding pod spec fields wholesale.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scheduling {
    pub affinity: Option<Affinity>,
    pub tolerations: Vec<Toleration>,
    pub priority_class: Option<String>,
    pub node_selector: BTreeMap<String, String>,
}

impl Scheduling {
    pub fn affinity_mut(&mut self) -> &mut Affinity {
        self.affinity.get_or_insert_with(Affinity::default)
    }

    pub fn apply_to(&self, spec: &mut PodSpec) {
        spec.affinity = self.affinity.clone();
        spec.tolerations = self.tolerations.clone();
        spec.priority_class_name = self.priority_class.clone();
        spec.node_selector = self.node_selector.clone();
    }
}
