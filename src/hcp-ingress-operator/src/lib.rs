//! Cluster ingress operator component of a hosted control plane.
//!
//! [`Params::new`] collects images, probes and scheduling from the control
//! plane, and [`reconcile_deployment`] writes the operator deployment from them.

mod deployment;
mod params;
pub mod render_config;

pub use self::deployment::reconcile_deployment;
pub use self::deployment::INGRESS_OPERATOR_CONTAINER_NAME;
pub use self::deployment::INGRESS_OPERATOR_METRICS_PORT;
pub use self::params::Params;
pub use self::render_config::RenderConfig;
pub use self::render_config::RenderConfigError;
