use anyhow::Result;
use vergen::EmitBuilder;

// Stamps the binary with the commit it was built from; `--version` reads
// VERGEN_GIT_SHA and VERGEN_GIT_COMMIT_DATE back out.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .emit()?;
    Ok(())
}
