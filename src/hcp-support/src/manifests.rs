//! Names of the objects a control plane component refers to.

use k8_types::app::deployment::DeploymentSpec;
use k8_types::ItemMeta;
use k8_types::K8Obj;

pub fn kube_apiserver_service(namespace: &str) -> ItemMeta {
    ItemMeta::new("kube-apiserver", namespace)
}

pub fn ingress_operator_kubeconfig(namespace: &str) -> ItemMeta {
    ItemMeta::new("ingress-operator-kubeconfig", namespace)
}

pub fn service_network_admin_kubeconfig(namespace: &str) -> ItemMeta {
    ItemMeta::new("service-network-admin-kubeconfig", namespace)
}

/// empty ingress operator deployment, ready to be reconciled
pub fn ingress_operator_deployment(namespace: &str) -> K8Obj<DeploymentSpec> {
    K8Obj::new("ingress-operator", DeploymentSpec::default()).set_namespace(namespace)
}
