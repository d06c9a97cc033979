mod crd;
mod int_or_string;
mod metadata;
mod quantity;
#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "app")]
pub mod app;

pub use self::crd::*;
pub use self::int_or_string::*;
pub use self::metadata::*;
pub use self::quantity::*;
pub use self::spec_def::*;

mod spec_def {

    use std::fmt::Debug;

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use super::Crd;

    pub trait Status:
        Sized + Debug + Clone + Default + Serialize + DeserializeOwned + Send + Sync
    {
    }

    /// Kubernetes Spec
    pub trait Spec:
        Sized + Debug + Clone + Default + Serialize + DeserializeOwned + Send + Sync
    {
        type Status: Status;

        /// group, version and names of the resource
        fn metadata() -> &'static Crd;

        fn api_version() -> String {
            let metadata = Self::metadata();
            if metadata.group == "core" {
                return metadata.version.to_owned();
            }
            format!("{}/{}", metadata.group, metadata.version)
        }

        fn kind() -> String {
            Self::metadata().names.kind.to_owned()
        }
    }
}
