use std::collections::BTreeMap;
use std::fs::File;
use std::io::Error as IoError;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;
use tracing::debug;

use hcp_support::manifests::ingress_operator_deployment;
use hcp_support::HostedControlPlane;
use hcp_support::HostedControlPlaneSpec;
use k8_types::app::deployment::DeploymentSpec;
use k8_types::K8Obj;

use crate::reconcile_deployment;
use crate::Params;

#[derive(Error, Debug)]
pub enum RenderConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("Yaml error: {0}")]
    SerdeError(#[from] SerdeYamlError),
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("hosted control plane {0} has no namespace")]
    MissingNamespace(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Everything needed to render the ingress operator outside of a controller
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub release_version: String,
    /// release component name to image reference
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    #[serde(default)]
    pub set_default_security_context: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<i32>,
    pub hosted_control_plane: HostedControlPlane,
}

impl RenderConfig {
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, RenderConfigError> {
        debug!(path = %path.as_ref().display(), "loading render config");
        let file = File::open(path.as_ref())?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Reconciles a fresh deployment in the control plane namespace, owned by
    /// the control plane.
    pub fn render(&self) -> Result<K8Obj<DeploymentSpec>, RenderConfigError> {
        let hcp = &self.hosted_control_plane;
        if hcp.metadata.namespace.is_empty() {
            return Err(RenderConfigError::MissingNamespace(
                hcp.metadata.name.clone(),
            ));
        }

        let params = Params::new(
            hcp,
            &self.release_version,
            &self.images,
            self.set_default_security_context,
        );
        let mut deployment = ingress_operator_deployment(&hcp.metadata.namespace);
        deployment.metadata.owner_references =
            vec![hcp.metadata.make_owner_reference::<HostedControlPlaneSpec>()];
        reconcile_deployment(&mut deployment, &params, self.api_port);
        Ok(deployment)
    }

    pub fn render_manifest(&self, format: OutputFormat) -> Result<String, RenderConfigError> {
        let deployment = self.render()?;
        Ok(match format {
            OutputFormat::Yaml => serde_yaml::to_string(&deployment)?,
            OutputFormat::Json => serde_json::to_string_pretty(&deployment)?,
        })
    }
}
