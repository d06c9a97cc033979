mod containers;
mod deployment;
mod scheduling;

pub use self::containers::*;
pub use self::deployment::*;
pub use self::scheduling::*;

/// priority class of control plane components
pub const DEFAULT_PRIORITY_CLASS: &str = "hypershift-control-plane";
/// user pods run as when a default security context is requested
pub const DEFAULT_SECURITY_CONTEXT_USER: i64 = 1001;

/// pod label carrying the control plane a pod belongs to
pub const COLOCATION_LABEL_KEY: &str = "hypershift.openshift.io/hosted-control-plane";
/// node label and taint marking nodes dedicated to control planes
pub const CONTROL_PLANE_LABEL: &str = "hypershift.openshift.io/control-plane";
/// node label and taint marking nodes dedicated to a single control plane
pub const CLUSTER_LABEL: &str = "hypershift.openshift.io/cluster";
