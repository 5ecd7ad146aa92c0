use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use permgraph_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// The `demos/` directory at the workspace root
fn demos_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos"))
}

fn args_for(input: &Path, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        pretty: false,
    }
}

#[test]
fn smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_json_files(demos_dir());

    assert!(!demos.is_empty(), "No demo graphs found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let output_path = temp_dir
            .path()
            .join(format!("{}.layout.json", demo.file_stem().unwrap().to_string_lossy()));

        match run(&args_for(demo, output_path.clone())) {
            Ok(_) => {
                let written = fs::read_to_string(&output_path).expect("Output file missing");
                let value: serde_json::Value =
                    serde_json::from_str(&written).expect("Output is not valid JSON");
                assert!(value["nodes"].is_array(), "{}: no nodes array", demo.display());
                assert!(value["edges"].is_array(), "{}: no edges array", demo.display());
            }
            Err(e) => failed.push((demo.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo graphs that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo graph(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_json_files(demos_dir().join("errors"));

    assert!(!demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo in &demos {
        let output_path = temp_dir
            .path()
            .join(format!("error_{}.json", demo.file_stem().unwrap().to_string_lossy()));

        if run(&args_for(demo, output_path)).is_ok() {
            unexpectedly_succeeded.push(demo.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn pretty_flag_and_explicit_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[layout]\nrank_separation = 40.0\n\n[style]\nresource_color = \"#000000\"\n",
    )
    .unwrap();

    let input = demos_dir().join("document_access.json");
    let output = temp_dir.path().join("out.json");
    let mut args = args_for(&input, output.clone());
    args.config = Some(config_path.to_string_lossy().to_string());
    args.pretty = true;

    let summary = run(&args).expect("Layout failed");
    assert_eq!(summary.back_edges, 0);
    assert!(summary.ranks > 1);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\n  \"nodes\""));

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    let resource = nodes
        .iter()
        .find(|node| node["category"] == "resource")
        .expect("demo has a resource node");
    assert_eq!(resource["color"], "#000000");
}
