// README-to-rustdoc rendering shared by every crate's build.rs.
// Include it with: include!("../build_common.rs");
//
// The including file must import:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Render `README.md` into `$OUT_DIR/README_GENERATED.md` for `#![doc]`.
///
/// Link rewrites:
/// - `](src/speech/mod.rs)` and `](src/speech/task.rs)` become intra-doc
///   module paths (`speech`, `speech::task`)
/// - `](../../README.md)` becomes the workspace `repository` URL
///
/// A crate without a README gets an empty page.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = fs::read_to_string(&readme_path).unwrap_or_default();

    let mut rendered = rewrite_source_links(&content);
    if let Some(url) = workspace_repo_url(crate_dir) {
        rendered = rendered.replace("](../../README.md", &format!("]({url}"));
    }

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");
    fs::write(dest_path, rendered).expect("OUT_DIR is writable");
}

/// Turn every `](src/<path>.rs)` link target into a module path.
fn rewrite_source_links(content: &str) -> String {
    const PREFIX: &str = "](src/";

    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find(PREFIX) {
        out.push_str(&rest[..start]);
        let target_start = start + PREFIX.len();
        let Some(len) = rest[target_start..].find(')') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let target = &rest[target_start..target_start + len];
        out.push_str("](");
        out.push_str(&module_path(target));
        out.push(')');
        rest = &rest[target_start + len + 1..];
    }
    out.push_str(rest);
    out
}

/// `speech/mod.rs` -> `speech`, `process/shutdown/child.rs` -> `process::shutdown::child`.
fn module_path(file: &str) -> String {
    let stem = file.strip_suffix(".rs").unwrap_or(file);
    let stem = stem.strip_suffix("/mod").unwrap_or(stem);
    match stem {
        "lib" | "main" => "crate".to_string(),
        other => other.replace('/', "::"),
    }
}

/// The `repository` value from the workspace Cargo.toml, if any.
fn workspace_repo_url(crate_dir: &str) -> Option<String> {
    let workspace_toml = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(workspace_toml).ok()?;

    content.lines().map(str::trim).find_map(|line| {
        let value = line.strip_prefix("repository")?.trim_start().strip_prefix('=')?;
        let value = value.trim().strip_prefix('"')?;
        let end = value.find('"')?;
        Some(value[..end].to_string())
    })
}
