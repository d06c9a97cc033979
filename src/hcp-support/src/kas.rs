use crate::manifests;

/// port the kube-apiserver service listens on unless the control plane overrides it
pub const DEFAULT_API_SERVER_PORT: i32 = 6443;

/// Readiness endpoint of the control plane's kube-apiserver, as reached from
/// pods running in the control plane namespace.
pub fn in_cluster_kas_ready_url(namespace: &str, api_port: Option<i32>) -> String {
    let service = manifests::kube_apiserver_service(namespace);
    format!(
        "https://{}:{}/readyz",
        service.name,
        api_port.unwrap_or(DEFAULT_API_SERVER_PORT)
    )
}
