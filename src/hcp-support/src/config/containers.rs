use std::collections::BTreeMap;

use k8_types::core::pod::ContainerSpec;
use k8_types::core::pod::PodSpec;
use k8_types::core::pod::Probe;
use k8_types::core::pod::ResourceRequirements;
use k8_types::core::pod::SecurityContext;

/// Settings keyed by container name. Names without a matching container are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSettings<T>(BTreeMap<String, T>);

impl<T> Default for ContainerSettings<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> ContainerSettings<T> {
    pub fn insert<N: Into<String>>(&mut self, container: N, value: T) -> Option<T> {
        self.0.insert(container.into(), value)
    }

    pub fn get(&self, container: &str) -> Option<&T> {
        self.0.get(container)
    }
}

impl<T: Clone> ContainerSettings<T> {
    fn apply_to<'a, I, F>(&self, containers: I, mut set: F)
    where
        I: IntoIterator<Item = &'a mut ContainerSpec>,
        F: FnMut(&mut ContainerSpec, T),
    {
        if self.0.is_empty() {
            return;
        }
        for container in containers {
            if let Some(value) = self.0.get(&container.name) {
                set(container, value.clone());
            }
        }
    }
}

impl<N: Into<String>, T> FromIterator<(N, T)> for ContainerSettings<T> {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

// probes only reach regular containers, init containers may not carry them
pub type LivenessProbes = ContainerSettings<Probe>;
pub type ReadinessProbes = ContainerSettings<Probe>;
pub type StartupProbes = ContainerSettings<Probe>;
pub type ResourcesSpec = ContainerSettings<ResourceRequirements>;
pub type SecurityContextSpec = ContainerSettings<SecurityContext>;

pub(crate) fn apply_liveness_probes(probes: &LivenessProbes, spec: &mut PodSpec) {
    probes.apply_to(&mut spec.containers, |container, probe| {
        container.liveness_probe = Some(probe)
    });
}

pub(crate) fn apply_readiness_probes(probes: &ReadinessProbes, spec: &mut PodSpec) {
    probes.apply_to(&mut spec.containers, |container, probe| {
        container.readiness_probe = Some(probe)
    });
}

pub(crate) fn apply_startup_probes(probes: &StartupProbes, spec: &mut PodSpec) {
    probes.apply_to(&mut spec.containers, |container, probe| {
        container.startup_probe = Some(probe)
    });
}

pub(crate) fn apply_resources(resources: &ResourcesSpec, spec: &mut PodSpec) {
    resources.apply_to(spec.all_containers_mut(), |container, requirements| {
        container.resources = Some(requirements)
    });
}

pub(crate) fn apply_security_contexts(contexts: &SecurityContextSpec, spec: &mut PodSpec) {
    contexts.apply_to(spec.all_containers_mut(), |container, context| {
        container.security_context = Some(context)
    });
}

#[cfg(test)]
mod test {

    use k8_types::core::pod::ContainerSpec;
    use k8_types::core::pod::HttpGetAction;
    use k8_types::core::pod::PodSpec;
    use k8_types::core::pod::Probe;
    use k8_types::core::pod::ResourceRequirements;
    use k8_types::core::pod::UriScheme;

    use super::{
        apply_liveness_probes, apply_readiness_probes, apply_resources, apply_startup_probes,
        LivenessProbes, ResourcesSpec,
    };

    fn pod_spec() -> PodSpec {
        PodSpec {
            init_containers: vec![ContainerSpec {
                name: "availability-prober".to_owned(),
                ..Default::default()
            }],
            containers: vec![
                ContainerSpec {
                    name: "app".to_owned(),
                    ..Default::default()
                },
                ContainerSpec {
                    name: "sidecar".to_owned(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_probes_match_container_name() {
        let probe = Probe::http_get(HttpGetAction::new("/healthz", 8080, UriScheme::HTTPS));
        let probes: LivenessProbes = vec![("app", probe.clone()), ("missing", probe.clone())]
            .into_iter()
            .collect();

        let mut spec = pod_spec();
        apply_liveness_probes(&probes, &mut spec);

        assert_eq!(spec.containers[0].liveness_probe, Some(probe));
        assert!(spec.containers[1].liveness_probe.is_none());
        assert!(spec.init_containers[0].liveness_probe.is_none());
    }

    #[test]
    fn test_resources_reach_init_containers() {
        let requirements = ResourceRequirements::requests(vec![("cpu", "5m")]);
        let mut resources = ResourcesSpec::default();
        resources.insert("availability-prober", requirements.clone());

        let mut spec = pod_spec();
        apply_resources(&resources, &mut spec);

        assert_eq!(spec.init_containers[0].resources, Some(requirements));
        assert!(spec.containers[0].resources.is_none());
    }

    #[test]
    fn test_probes_skip_init_containers() {
        let probe = Probe::http_get(HttpGetAction::new("/ready", 8080, UriScheme::HTTP));
        let probes: LivenessProbes = vec![("availability-prober", probe.clone()), ("app", probe)]
            .into_iter()
            .collect();

        let mut spec = pod_spec();
        apply_liveness_probes(&probes, &mut spec);
        apply_readiness_probes(&probes, &mut spec);
        apply_startup_probes(&probes, &mut spec);

        let init = &spec.init_containers[0];
        assert!(init.liveness_probe.is_none());
        assert!(init.readiness_probe.is_none());
        assert!(init.startup_probe.is_none());

        let app = &spec.containers[0];
        assert!(app.liveness_probe.is_some());
        assert!(app.readiness_probe.is_some());
        assert!(app.startup_probe.is_some());
    }
}
