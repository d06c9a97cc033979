use serde::Deserialize;
use serde::Serialize;

use k8_types::Crd;
use k8_types::CrdNames;
use k8_types::K8Obj;
use k8_types::Spec;
use k8_types::Status;

pub const GROUP: &str = "hypershift.openshift.io";
pub const V1ALPHA1: &str = "v1alpha1";

/// setting this annotation on the control plane rolls every component deployment
pub const RESTART_DATE_ANNOTATION: &str = "hypershift.openshift.io/restart-date";

const HOSTED_CONTROL_PLANE_API: Crd = Crd {
    group: GROUP,
    version: V1ALPHA1,
    names: CrdNames {
        kind: "HostedControlPlane",
        plural: "hostedcontrolplanes",
        singular: "hostedcontrolplane",
    },
};

pub type HostedControlPlane = K8Obj<HostedControlPlaneSpec>;

#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HostedControlPlaneSpec {
    pub release_image: String,
}

impl Spec for HostedControlPlaneSpec {
    type Status = HostedControlPlaneStatus;

    fn metadata() -> &'static Crd {
        &HOSTED_CONTROL_PLANE_API
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HostedControlPlaneStatus {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_image: Option<String>,
}

impl Status for HostedControlPlaneStatus {}

/// Key used to group every component of one control plane. Components of a
/// control plane share its namespace, so the namespace identifies it.
pub fn cluster_key(hcp: &HostedControlPlane) -> &str {
    &hcp.metadata.namespace
}
