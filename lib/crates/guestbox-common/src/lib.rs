pub mod labels;
pub mod target;
pub mod types;

pub use labels::{
    LOCAL_RUNNER_ID, REPOSITORY_URL_LABEL, TARGET_ID_LABEL, TOOLBOX_HOST_PORT_LABEL,
    WORKSPACE_ID_LABEL,
};
pub use target::{TargetConfigOptions, TargetOptionsError};
pub use types::*;
