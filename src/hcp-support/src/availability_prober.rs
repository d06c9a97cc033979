use tracing::trace;

use k8_types::core::pod::ContainerSpec;
use k8_types::core::pod::ImagePullPolicy;
use k8_types::core::pod::PodSpec;
use k8_types::core::pod::VolumeMount;
use k8_types::GroupVersionKind;

/// key of the prober image in the release image map
pub const AVAILABILITY_PROBER_IMAGE_NAME: &str = "availability-prober";

const CONTAINER_NAME: &str = "availability-prober";
const COMMAND: &str = "/usr/bin/availability-prober";
const KUBECONFIG_MOUNT_PATH: &str = "/var/kubeconfig";

#[derive(Debug, Default, Clone)]
pub struct AvailabilityProberOpts {
    /// volume holding a kubeconfig for the guest cluster. Required for `required_apis`
    pub kubeconfig_volume_name: Option<String>,
    /// APIs the guest cluster must serve before the pod starts
    pub required_apis: Vec<GroupVersionKind>,
}

/// Makes the first init container of `spec` an availability prober that blocks
/// until `target` answers. An existing prober in that position is replaced, so
/// calling this repeatedly leaves exactly one prober.
pub fn availability_prober(
    target: &str,
    image: &str,
    spec: &mut PodSpec,
    opts: &AvailabilityProberOpts,
) {
    let mut prober = ContainerSpec {
        name: CONTAINER_NAME.to_owned(),
        image: Some(image.to_owned()),
        image_pull_policy: Some(ImagePullPolicy::IfNotPresent),
        command: vec![COMMAND.to_owned(), "--target".to_owned(), target.to_owned()],
        ..Default::default()
    };

    if let Some(volume) = &opts.kubeconfig_volume_name {
        prober
            .volume_mounts
            .push(VolumeMount::new(volume.as_str(), KUBECONFIG_MOUNT_PATH));
        prober
            .command
            .push(format!("--kubeconfig={KUBECONFIG_MOUNT_PATH}/kubeconfig"));
        for api in &opts.required_apis {
            prober.command.push(format!(
                "--required-api={},{},{}",
                api.group, api.version, api.kind
            ));
        }
    }

    let has_prober = spec
        .init_containers
        .first()
        .map(|container| container.name == CONTAINER_NAME)
        .unwrap_or(false);

    if has_prober {
        if spec.init_containers[0] != prober {
            trace!(url = target, "updating availability prober");
            spec.init_containers[0] = prober;
        }
    } else {
        trace!(url = target, "adding availability prober");
        spec.init_containers.insert(0, prober);
    }
}
