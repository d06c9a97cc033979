//! Support code shared by hosted control plane components: the
//! `HostedControlPlane` resource, the deployment configuration applied to every
//! control plane deployment, the availability prober init container and
//! well known manifest names.

pub mod availability_prober;
pub mod config;
pub mod hosted_control_plane;
pub mod kas;
pub mod manifests;

pub use self::hosted_control_plane::HostedControlPlane;
pub use self::hosted_control_plane::HostedControlPlaneSpec;
