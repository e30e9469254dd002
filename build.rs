use std::fs;

const VERSION_FILE: &str = "VERSION";

/// Release number recorded in `VERSION`, first non-empty line only.
fn release_version() -> Result<String, String> {
    let contents = fs::read_to_string(VERSION_FILE)
        .map_err(|e| format!("cannot read {}: {}", VERSION_FILE, e))?;

    contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("{} is empty", VERSION_FILE))
}

fn main() {
    println!("cargo:rerun-if-changed={}", VERSION_FILE);

    let package = env!("CARGO_PKG_VERSION");
    let release = match release_version() {
        Ok(release) => release,
        Err(e) => panic!("cache-outcome release check: {}", e),
    };

    if release != package {
        panic!(
            "cache-outcome release check: {} says {} but the package is {}",
            VERSION_FILE, release, package
        );
    }

    println!("cargo:rustc-env=CACHE_OUTCOME_RELEASE={}", release);
}
