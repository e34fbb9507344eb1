use shadow_rs::ShadowBuilder;

fn main() -> shadow_rs::SdResult<()> {
    // Exposes PKG_VERSION and CLAP_LONG_VERSION through `shadow!(build)`
    ShadowBuilder::builder().build()?;
    Ok(())
}
