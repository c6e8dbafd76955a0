//! Authentication materialization: pipeline auth blocks, bearer header
//! injection values, and scanner hook scripts.

mod artifact;
mod hooks;

pub use artifact::{
    materialize, AuthArtifact, AuthBlock, Authentication, BrowserParams, Credentials,
    SessionManagement, User, Verification,
};
pub use hooks::{bearer_hook_script, hook_script, render_template, HOOK_SCRIPT_NAME};
