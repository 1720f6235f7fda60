//! Version command implementation

use anyhow::Result;

use crate::cli::Output;

/// Execute the version command
pub fn execute(output: &Output) -> Result<()> {
    output.header("🔢 Primeshard Version Information");
    output.key_value(
        "Version:",
        &format!("{} v{}", crate::PKG_NAME, crate::VERSION),
    );
    output.key_value("Description:", crate::PKG_DESCRIPTION);
    output.key_value("Target:", std::env::consts::ARCH);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    );
    Ok(())
}
