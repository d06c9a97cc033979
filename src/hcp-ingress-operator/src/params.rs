use std::collections::BTreeMap;

use tracing::warn;

use hcp_support::availability_prober::AVAILABILITY_PROBER_IMAGE_NAME;
use hcp_support::config::DeploymentConfig;
use hcp_support::config::DEFAULT_PRIORITY_CLASS;
use hcp_support::HostedControlPlane;
use k8_types::core::pod::HttpGetAction;
use k8_types::core::pod::Probe;
use k8_types::core::pod::UriScheme;

use crate::deployment::INGRESS_OPERATOR_CONTAINER_NAME;
use crate::deployment::INGRESS_OPERATOR_METRICS_PORT;

const INGRESS_OPERATOR_IMAGE_NAME: &str = "cluster-ingress-operator";
const HAPROXY_ROUTER_IMAGE_NAME: &str = "haproxy-router";
const TOKEN_MINTER_IMAGE_NAME: &str = "token-minter";

/// Inputs of the ingress operator deployment
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params {
    pub ingress_operator_image: String,
    pub haproxy_router_image: String,
    pub kube_rbac_proxy_image: String,
    pub release_version: String,
    pub token_minter_image: String,
    pub availability_prober_image: String,
    pub deployment_config: DeploymentConfig,
}

impl Params {
    /// `images` maps release component names to image references. A missing
    /// component renders as an empty image.
    pub fn new(
        hcp: &HostedControlPlane,
        version: &str,
        images: &BTreeMap<String, String>,
        set_default_security_context: bool,
    ) -> Self {
        let mut params = Self {
            ingress_operator_image: lookup_image(images, INGRESS_OPERATOR_IMAGE_NAME),
            haproxy_router_image: lookup_image(images, HAPROXY_ROUTER_IMAGE_NAME),
            release_version: version.to_owned(),
            token_minter_image: lookup_image(images, TOKEN_MINTER_IMAGE_NAME),
            availability_prober_image: lookup_image(images, AVAILABILITY_PROBER_IMAGE_NAME),
            ..Default::default()
        };

        let config = &mut params.deployment_config;
        config.scheduling.priority_class = Some(DEFAULT_PRIORITY_CLASS.to_owned());
        config.set_colocation(hcp);
        config.set_restart_annotation(&hcp.metadata);
        config.set_control_plane_isolation(hcp);
        config.replicas = 1;
        config.set_default_security_context = set_default_security_context;
        config.readiness_probes.insert(
            INGRESS_OPERATOR_CONTAINER_NAME,
            Probe {
                initial_delay_seconds: Some(15),
                period_seconds: Some(60),
                success_threshold: Some(1),
                failure_threshold: Some(3),
                timeout_seconds: Some(5),
                ..Probe::http_get(metrics_endpoint())
            },
        );
        config.liveness_probes.insert(
            INGRESS_OPERATOR_CONTAINER_NAME,
            Probe {
                initial_delay_seconds: Some(60),
                period_seconds: Some(60),
                success_threshold: Some(1),
                failure_threshold: Some(5),
                timeout_seconds: Some(5),
                ..Probe::http_get(metrics_endpoint())
            },
        );

        params
    }
}

fn metrics_endpoint() -> HttpGetAction {
    HttpGetAction::new("/metrics", INGRESS_OPERATOR_METRICS_PORT, UriScheme::HTTP)
}

fn lookup_image(images: &BTreeMap<String, String>, name: &str) -> String {
    match images.get(name) {
        Some(image) => image.clone(),
        None => {
            warn!(image = name, "image not found in release");
            String::new()
        }
    }
}

#[cfg(test)]
mod test {

    use std::collections::BTreeMap;

    use hcp_support::HostedControlPlane;
    use hcp_support::HostedControlPlaneSpec;
    use k8_types::core::pod::UriScheme;
    use k8_types::Int32OrString;
    use k8_types::K8Obj;

    use super::Params;

    fn hcp() -> HostedControlPlane {
        K8Obj::new("demo", HostedControlPlaneSpec::default()).set_namespace("clusters-demo")
    }

    fn images() -> BTreeMap<String, String> {
        vec![
            ("cluster-ingress-operator", "quay.io/ocp/ingress-operator:4.9"),
            ("haproxy-router", "quay.io/ocp/haproxy-router:4.9"),
            ("token-minter", "quay.io/ocp/token-minter:4.9"),
            ("availability-prober", "quay.io/ocp/availability-prober:4.9"),
        ]
        .into_iter()
        .map(|(name, image)| (name.to_owned(), image.to_owned()))
        .collect()
    }

    #[test]
    fn test_images_from_release() {
        let params = Params::new(&hcp(), "4.9.0", &images(), false);
        assert_eq!(params.ingress_operator_image, "quay.io/ocp/ingress-operator:4.9");
        assert_eq!(params.haproxy_router_image, "quay.io/ocp/haproxy-router:4.9");
        assert_eq!(params.token_minter_image, "quay.io/ocp/token-minter:4.9");
        assert_eq!(
            params.availability_prober_image,
            "quay.io/ocp/availability-prober:4.9"
        );
        assert_eq!(params.release_version, "4.9.0");
        assert!(params.kube_rbac_proxy_image.is_empty());
    }

    #[test]
    fn test_missing_image_is_empty() {
        let mut images = images();
        images.remove("haproxy-router");
        let params = Params::new(&hcp(), "4.9.0", &images, false);
        assert_eq!(params.haproxy_router_image, "");
        assert_eq!(params.ingress_operator_image, "quay.io/ocp/ingress-operator:4.9");
    }

    #[test]
    fn test_deployment_config_defaults() {
        let params = Params::new(&hcp(), "4.9.0", &images(), true);
        let config = &params.deployment_config;

        assert_eq!(config.replicas, 1);
        assert!(config.set_default_security_context);
        assert_eq!(
            config.scheduling.priority_class.as_deref(),
            Some("hypershift-control-plane")
        );
        assert_eq!(config.scheduling.tolerations.len(), 2);
        assert_eq!(
            config
                .additional_labels
                .get("hypershift.openshift.io/hosted-control-plane")
                .unwrap(),
            "clusters-demo"
        );
    }

    #[test]
    fn test_probes() {
        let params = Params::new(&hcp(), "4.9.0", &images(), false);
        let config = &params.deployment_config;

        let readiness = config
            .readiness_probes
            .get("ingress-operator")
            .expect("readiness probe");
        let http = readiness.http_get.as_ref().expect("http probe");
        assert_eq!(http.path.as_deref(), Some("/metrics"));
        assert_eq!(http.port, Int32OrString::Int(60000));
        assert_eq!(http.scheme, Some(UriScheme::HTTP));
        assert_eq!(readiness.initial_delay_seconds, Some(15));
        assert_eq!(readiness.failure_threshold, Some(3));

        let liveness = config
            .liveness_probes
            .get("ingress-operator")
            .expect("liveness probe");
        assert_eq!(liveness.http_get, readiness.http_get);
        assert_eq!(liveness.initial_delay_seconds, Some(60));
        assert_eq!(liveness.period_seconds, Some(60));
        assert_eq!(liveness.success_threshold, Some(1));
        assert_eq!(liveness.failure_threshold, Some(5));
        assert_eq!(liveness.timeout_seconds, Some(5));
    }
}
