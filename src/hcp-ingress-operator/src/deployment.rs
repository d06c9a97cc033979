use tracing::debug;

use hcp_support::availability_prober::availability_prober;
use hcp_support::availability_prober::AvailabilityProberOpts;
use hcp_support::kas::in_cluster_kas_ready_url;
use hcp_support::manifests;
use k8_types::app::deployment::DeploymentSpec;
use k8_types::app::deployment::DeploymentStrategyType;
use k8_types::core::pod::ContainerSpec;
use k8_types::core::pod::ImagePullPolicy;
use k8_types::core::pod::ResourceRequirements;
use k8_types::core::pod::TerminationMessagePolicy;
use k8_types::core::pod::VolumeMount;
use k8_types::core::pod::VolumeSpec;
use k8_types::Env;
use k8_types::GroupVersionKind;
use k8_types::K8Obj;
use k8_types::LabelSelector;
use k8_types::RESOURCE_CPU;
use k8_types::RESOURCE_MEMORY;

use crate::Params;

pub const INGRESS_OPERATOR_CONTAINER_NAME: &str = "ingress-operator";
pub const INGRESS_OPERATOR_METRICS_PORT: i32 = 60000;

const TOKEN_MINTER_CONTAINER_NAME: &str = "token-minter";
const OPERATOR_NAMESPACE: &str = "openshift-ingress-operator";
const WORKLOAD_MANAGEMENT_ANNOTATION: &str = "target.workload.openshift.io/management";
const WORKLOAD_MANAGEMENT_PREFERRED: &str = r#"{"effect": "PreferredDuringScheduling"}"#;

const KUBECONFIG_DIR: &str = "/etc/kubernetes";
const KUBECONFIG_PATH: &str = "/etc/kubernetes/kubeconfig";
const SERVICE_ACCOUNT_TOKEN_DIR: &str = "/var/run/secrets/openshift/serviceaccount";

const SERVICE_ACCOUNT_TOKEN_VOLUME: &str = "serviceaccount-token";
const ADMIN_KUBECONFIG_VOLUME: &str = "admin-kubeconfig";
const INGRESS_OPERATOR_KUBECONFIG_VOLUME: &str = "ingress-operator-kubeconfig";

/// Overwrites `dep` with the ingress operator deployment, then hands it to the
/// availability prober and the shared deployment config. Labels and
/// annotations already on the pod template are kept.
pub fn reconcile_deployment(dep: &mut K8Obj<DeploymentSpec>, params: &Params, api_port: Option<i32>) {
    debug!(
        namespace = %dep.metadata.namespace,
        release_version = %params.release_version,
        "reconciling ingress operator deployment"
    );

    let spec = &mut dep.spec;
    spec.replicas = Some(1);
    spec.selector = LabelSelector::new_labels(vec![("name", INGRESS_OPERATOR_CONTAINER_NAME)]);
    spec.strategy_mut().type_ = Some(DeploymentStrategyType::Recreate);

    let template_meta = spec.template.metadata_mut();
    template_meta.annotations.insert(
        WORKLOAD_MANAGEMENT_ANNOTATION.to_owned(),
        WORKLOAD_MANAGEMENT_PREFERRED.to_owned(),
    );
    template_meta
        .labels
        .insert("name".to_owned(), INGRESS_OPERATOR_CONTAINER_NAME.to_owned());

    let pod_spec = &mut spec.template.spec;
    pod_spec.automount_service_account_token = Some(false);
    pod_spec.containers = vec![ingress_operator_container(params), token_minter_container(params)];
    pod_spec.volumes = vec![
        VolumeSpec::empty_dir(SERVICE_ACCOUNT_TOKEN_VOLUME),
        VolumeSpec::secret(
            ADMIN_KUBECONFIG_VOLUME.to_owned(),
            manifests::service_network_admin_kubeconfig("").name,
        ),
        VolumeSpec::secret(
            INGRESS_OPERATOR_KUBECONFIG_VOLUME.to_owned(),
            manifests::ingress_operator_kubeconfig("").name,
        ),
    ];

    availability_prober(
        &in_cluster_kas_ready_url(&dep.metadata.namespace, api_port),
        &params.availability_prober_image,
        &mut dep.spec.template.spec,
        &AvailabilityProberOpts {
            kubeconfig_volume_name: Some(INGRESS_OPERATOR_KUBECONFIG_VOLUME.to_owned()),
            required_apis: vec![GroupVersionKind::new("route.openshift.io", "v1", "Route")],
        },
    );

    params.deployment_config.apply_to(dep);
}

fn ingress_operator_container(params: &Params) -> ContainerSpec {
    let metrics_listen_addr = format!("0.0.0.0:{INGRESS_OPERATOR_METRICS_PORT}");
    ContainerSpec {
        name: INGRESS_OPERATOR_CONTAINER_NAME.to_owned(),
        image: Some(params.ingress_operator_image.clone()),
        image_pull_policy: Some(ImagePullPolicy::IfNotPresent),
        command: [
            "ingress-operator",
            "start",
            "--namespace",
            OPERATOR_NAMESPACE,
            "--image",
            "$(IMAGE)",
            "--canary-image",
            "$(CANARY_IMAGE)",
            "--release-version",
            "$(RELEASE_VERSION)",
            "--metrics-listen-addr",
            metrics_listen_addr.as_str(),
        ]
        .iter()
        .map(|arg| arg.to_string())
        .collect(),
        // the operator deploys routers from IMAGE and its canary from CANARY_IMAGE
        env: vec![
            Env::key_value("RELEASE_VERSION", params.release_version.as_str()),
            Env::key_value("IMAGE", params.haproxy_router_image.as_str()),
            Env::key_value("CANARY_IMAGE", params.ingress_operator_image.as_str()),
            Env::key_value("KUBECONFIG", KUBECONFIG_PATH),
        ],
        resources: Some(ResourceRequirements::requests(vec![
            (RESOURCE_CPU, "10m"),
            (RESOURCE_MEMORY, "56Mi"),
        ])),
        termination_message_policy: Some(TerminationMessagePolicy::FallbackToLogsOnError),
        volume_mounts: vec![
            VolumeMount::new(INGRESS_OPERATOR_KUBECONFIG_VOLUME, KUBECONFIG_DIR),
            VolumeMount::new(SERVICE_ACCOUNT_TOKEN_VOLUME, SERVICE_ACCOUNT_TOKEN_DIR),
        ],
        ..Default::default()
    }
}

/// keeps a guest cluster service account token fresh for the operator
fn token_minter_container(params: &Params) -> ContainerSpec {
    ContainerSpec {
        name: TOKEN_MINTER_CONTAINER_NAME.to_owned(),
        image: Some(params.token_minter_image.clone()),
        command: vec!["/usr/bin/token-minter".to_owned()],
        args: vec![
            format!("-service-account-namespace={OPERATOR_NAMESPACE}"),
            format!("-service-account-name={INGRESS_OPERATOR_CONTAINER_NAME}"),
            format!("-token-file={SERVICE_ACCOUNT_TOKEN_DIR}/token"),
            format!("-kubeconfig={KUBECONFIG_PATH}"),
        ],
        volume_mounts: vec![
            VolumeMount::new(SERVICE_ACCOUNT_TOKEN_VOLUME, SERVICE_ACCOUNT_TOKEN_DIR),
            VolumeMount::new(ADMIN_KUBECONFIG_VOLUME, KUBECONFIG_DIR),
        ],
        ..Default::default()
    }
}
