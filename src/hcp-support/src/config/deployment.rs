use std::collections::BTreeMap;

use tracing::debug;

use k8_types::app::deployment::DeploymentSpec;
use k8_types::app::deployment::DeploymentStrategyType;
use k8_types::app::deployment::RollingUpdateDeployment;
use k8_types::core::affinity::NodeAffinity;
use k8_types::core::affinity::PodAffinity;
use k8_types::core::affinity::PodAffinityTerm;
use k8_types::core::affinity::PreferredSchedulingTerm;
use k8_types::core::affinity::WeightedPodAffinityTerm;
use k8_types::core::affinity::LABEL_HOSTNAME;
use k8_types::core::pod::PodSecurityContext;
use k8_types::core::toleration::TaintEffect;
use k8_types::core::toleration::Toleration;
use k8_types::K8Obj;
use k8_types::LabelSelector;
use k8_types::ObjectMeta;

use crate::hosted_control_plane::cluster_key;
use crate::hosted_control_plane::RESTART_DATE_ANNOTATION;
use crate::HostedControlPlane;

use super::containers::{
    apply_liveness_probes, apply_readiness_probes, apply_resources, apply_security_contexts,
    apply_startup_probes,
};
use super::{
    LivenessProbes, ReadinessProbes, ResourcesSpec, Scheduling, SecurityContextSpec,
    StartupProbes, CLUSTER_LABEL, COLOCATION_LABEL_KEY, CONTROL_PLANE_LABEL,
    DEFAULT_SECURITY_CONTEXT_USER,
};

const ROLLING_MAX_SURGE: i32 = 3;
const ROLLING_MAX_UNAVAILABLE: i32 = 1;

/// Configuration every control plane deployment shares: replicas,
/// scheduling, extra pod metadata and per-container probes, resources and
/// security contexts. Components fill it in and then call [`DeploymentConfig::apply_to`]
/// once their own fields are set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub replicas: i32,
    pub scheduling: Scheduling,
    pub additional_labels: BTreeMap<String, String>,
    pub additional_annotations: BTreeMap<String, String>,
    pub security_contexts: SecurityContextSpec,
    pub set_default_security_context: bool,
    pub liveness_probes: LivenessProbes,
    pub readiness_probes: ReadinessProbes,
    pub startup_probes: StartupProbes,
    pub resources: ResourcesSpec,
}

impl DeploymentConfig {
    /// Prefer nodes already running pods of the same control plane, and label
    /// pods so other components can find them.
    pub fn set_colocation(&mut self, hcp: &HostedControlPlane) {
        let cluster = cluster_key(hcp);
        let affinity = self.scheduling.affinity_mut();
        affinity.pod_affinity.get_or_insert_with(PodAffinity::default).preferred =
            vec![WeightedPodAffinityTerm {
                weight: 100,
                pod_affinity_term: PodAffinityTerm {
                    label_selector: Some(LabelSelector::new_labels(vec![(
                        COLOCATION_LABEL_KEY,
                        cluster,
                    )])),
                    namespaces: vec![],
                    topology_key: LABEL_HOSTNAME.to_owned(),
                },
            }];
        self.additional_labels
            .insert(COLOCATION_LABEL_KEY.to_owned(), cluster.to_owned());
    }

    /// carry a restart request on the control plane over to the pod template
    pub fn set_restart_annotation(&mut self, metadata: &ObjectMeta) {
        if let Some(restart_date) = metadata.annotations.get(RESTART_DATE_ANNOTATION) {
            self.additional_annotations
                .insert(RESTART_DATE_ANNOTATION.to_owned(), restart_date.clone());
        }
    }

    /// Tolerate the taints of dedicated control plane nodes and prefer nodes
    /// dedicated to this control plane.
    pub fn set_control_plane_isolation(&mut self, hcp: &HostedControlPlane) {
        let cluster = cluster_key(hcp);
        self.scheduling.tolerations = vec![
            Toleration::equal(CONTROL_PLANE_LABEL, "true", TaintEffect::NoSchedule),
            Toleration::equal(CLUSTER_LABEL, cluster, TaintEffect::NoSchedule),
        ];
        let affinity = self.scheduling.affinity_mut();
        affinity
            .node_affinity
            .get_or_insert_with(NodeAffinity::default)
            .preferred = vec![
            PreferredSchedulingTerm::key_in(50, CONTROL_PLANE_LABEL, vec!["true"]),
            PreferredSchedulingTerm::key_in(100, CLUSTER_LABEL, vec![cluster]),
        ];
    }

    pub fn apply_to(&self, deployment: &mut K8Obj<DeploymentSpec>) {
        debug!(
            name = %deployment.metadata.name,
            namespace = %deployment.metadata.namespace,
            replicas = self.replicas,
            "applying deployment config"
        );
        let spec = &mut deployment.spec;
        self.apply_replicas(spec);

        let pod_spec = &mut spec.template.spec;
        self.scheduling.apply_to(pod_spec);
        apply_security_contexts(&self.security_contexts, pod_spec);
        apply_liveness_probes(&self.liveness_probes, pod_spec);
        apply_readiness_probes(&self.readiness_probes, pod_spec);
        apply_startup_probes(&self.startup_probes, pod_spec);
        apply_resources(&self.resources, pod_spec);

        if self.set_default_security_context {
            let security_context = pod_spec
                .security_context
                .get_or_insert_with(PodSecurityContext::default);
            if security_context.run_as_user.is_none() {
                security_context.run_as_user = Some(DEFAULT_SECURITY_CONTEXT_USER);
            }
        }

        let template_meta = spec.template.metadata_mut();
        template_meta.labels.extend(
            self.additional_labels
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        template_meta.annotations.extend(
            self.additional_annotations
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    fn apply_replicas(&self, spec: &mut DeploymentSpec) {
        spec.replicas = Some(self.replicas);
        if self.replicas > 1 && spec.strategy_type() != Some(DeploymentStrategyType::Recreate) {
            let strategy = spec.strategy_mut();
            strategy.type_ = Some(DeploymentStrategyType::RollingUpdate);
            strategy.rolling_update = Some(RollingUpdateDeployment {
                max_surge: Some(ROLLING_MAX_SURGE.into()),
                max_unavailable: Some(ROLLING_MAX_UNAVAILABLE.into()),
            });
        }
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_types::app::deployment::DeploymentSpec;
    use k8_types::app::deployment::DeploymentStrategyType;
    use k8_types::core::pod::ContainerSpec;
    use k8_types::core::pod::PodSecurityContext;
    use k8_types::core::pod::ResourceRequirements;
    use k8_types::core::pod::SecurityContext;
    use k8_types::Int32OrString;
    use k8_types::K8Obj;
    use k8_types::ObjectMeta;

    use super::DeploymentConfig;
    use crate::{HostedControlPlane, HostedControlPlaneSpec};

    fn hcp() -> HostedControlPlane {
        K8Obj::new("demo", HostedControlPlaneSpec::default()).set_namespace("clusters-demo")
    }

    fn new_deployment() -> K8Obj<DeploymentSpec> {
        let mut deployment =
            K8Obj::new("app", DeploymentSpec::default()).set_namespace("clusters-demo");
        deployment.spec.template.spec.containers = vec![ContainerSpec {
            name: "app".to_owned(),
            ..Default::default()
        }];
        deployment
    }

    #[test]
    fn test_colocation() {
        let mut config = DeploymentConfig::default();
        config.set_colocation(&hcp());

        assert_eq!(
            config
                .additional_labels
                .get("hypershift.openshift.io/hosted-control-plane")
                .unwrap(),
            "clusters-demo"
        );
        let affinity = config.scheduling.affinity.as_ref().expect("affinity");
        assert_eq!(
            serde_json::to_value(affinity).expect("serialize"),
            json!({
                "podAffinity": {
                    "preferredDuringSchedulingIgnoredDuringExecution": [{
                        "weight": 100,
                        "podAffinityTerm": {
                            "labelSelector": {
                                "matchLabels": {
                                    "hypershift.openshift.io/hosted-control-plane": "clusters-demo"
                                }
                            },
                            "topologyKey": "kubernetes.io/hostname"
                        }
                    }]
                }
            })
        );
    }

    #[test]
    fn test_control_plane_isolation() {
        let mut config = DeploymentConfig::default();
        config.set_colocation(&hcp());
        config.set_control_plane_isolation(&hcp());

        assert_eq!(
            serde_json::to_value(&config.scheduling.tolerations).expect("serialize"),
            json!([
                {
                    "key": "hypershift.openshift.io/control-plane",
                    "operator": "Equal",
                    "value": "true",
                    "effect": "NoSchedule"
                },
                {
                    "key": "hypershift.openshift.io/cluster",
                    "operator": "Equal",
                    "value": "clusters-demo",
                    "effect": "NoSchedule"
                }
            ])
        );

        let affinity = config.scheduling.affinity.as_ref().expect("affinity");
        // colocation survives isolation
        assert!(affinity.pod_affinity.is_some());
        let preferred = &affinity.node_affinity.as_ref().expect("node affinity").preferred;
        assert_eq!(preferred.len(), 2);
        assert_eq!(preferred[0].weight, 50);
        assert_eq!(
            preferred[1].preference.match_expressions[0].values,
            vec!["clusters-demo".to_owned()]
        );
    }

    #[test]
    fn test_restart_annotation() {
        let mut config = DeploymentConfig::default();
        config.set_restart_annotation(&ObjectMeta::default());
        assert!(config.additional_annotations.is_empty());

        let mut metadata = ObjectMeta::default();
        metadata.annotations.insert(
            "hypershift.openshift.io/restart-date".to_owned(),
            "2021-10-01".to_owned(),
        );
        config.set_restart_annotation(&metadata);

        let mut deployment = new_deployment();
        config.apply_to(&mut deployment);
        let template_meta = deployment.spec.template.metadata.expect("template metadata");
        assert_eq!(
            template_meta
                .annotations
                .get("hypershift.openshift.io/restart-date")
                .unwrap(),
            "2021-10-01"
        );
    }

    #[test]
    fn test_apply_single_replica_keeps_strategy() {
        let config = DeploymentConfig {
            replicas: 1,
            ..Default::default()
        };
        let mut deployment = new_deployment();
        config.apply_to(&mut deployment);

        assert_eq!(deployment.spec.replicas, Some(1));
        assert!(deployment.spec.strategy.is_none());
    }

    #[test]
    fn test_apply_multiple_replicas_rolls() {
        let config = DeploymentConfig {
            replicas: 3,
            ..Default::default()
        };
        let mut deployment = new_deployment();
        config.apply_to(&mut deployment);

        let strategy = deployment.spec.strategy.expect("strategy");
        assert_eq!(strategy.type_, Some(DeploymentStrategyType::RollingUpdate));
        let rolling = strategy.rolling_update.expect("rolling update");
        assert_eq!(rolling.max_surge, Some(Int32OrString::Int(3)));
        assert_eq!(rolling.max_unavailable, Some(Int32OrString::Int(1)));
    }

    #[test]
    fn test_apply_multiple_replicas_keeps_recreate() {
        let config = DeploymentConfig {
            replicas: 2,
            ..Default::default()
        };
        let mut deployment = new_deployment();
        deployment.spec.strategy_mut().type_ = Some(DeploymentStrategyType::Recreate);
        config.apply_to(&mut deployment);

        assert_eq!(deployment.spec.replicas, Some(2));
        assert_eq!(
            deployment.spec.strategy_type(),
            Some(DeploymentStrategyType::Recreate)
        );
        assert!(deployment.spec.strategy.unwrap().rolling_update.is_none());
    }

    #[test]
    fn test_default_security_context() {
        let config = DeploymentConfig {
            set_default_security_context: true,
            ..Default::default()
        };

        let mut deployment = new_deployment();
        config.apply_to(&mut deployment);
        assert_eq!(
            deployment.spec.template.spec.security_context,
            Some(PodSecurityContext {
                run_as_user: Some(1001),
                ..Default::default()
            })
        );

        let mut deployment = new_deployment();
        deployment.spec.template.spec.security_context = Some(PodSecurityContext {
            run_as_user: Some(2000),
            ..Default::default()
        });
        config.apply_to(&mut deployment);
        let context = deployment.spec.template.spec.security_context.unwrap();
        assert_eq!(context.run_as_user, Some(2000));
    }

    #[test]
    fn test_container_settings_applied() {
        let mut config = DeploymentConfig::default();
        config.resources.insert(
            "app",
            ResourceRequirements::requests(vec![("memory", "64Mi")]),
        );
        config.security_contexts.insert(
            "app",
            SecurityContext {
                run_as_non_root: Some(true),
                ..Default::default()
            },
        );

        let mut deployment = new_deployment();
        config.apply_to(&mut deployment);

        let container = &deployment.spec.template.spec.containers[0];
        assert_eq!(
            container
                .resources
                .as_ref()
                .and_then(|resources| resources.requests.get("memory"))
                .map(|quantity| quantity.as_str()),
            Some("64Mi")
        );
        assert_eq!(
            container
                .security_context
                .as_ref()
                .and_then(|context| context.run_as_non_root),
            Some(true)
        );
    }
}
