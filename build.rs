//! Retrieves information about the version of the crate from Git and the build
//! environment. The interactive driver prints it on startup.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
