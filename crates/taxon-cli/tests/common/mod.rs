#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};

/// Run the CLI binary against an isolated store directory.
pub fn run_cli(args: &[&str], store: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_taxon"));
    cmd.args(args);
    cmd.env("TAXON_STORE", store);
    cmd.env_remove("TAXON_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str], store: &Path) -> String {
    let output = run_cli(args, store);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure.
pub fn run_cli_failure(args: &[&str], store: &Path) -> String {
    let output = run_cli(args, store);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

fn species(id: &str, en: &str, scientific: &str, class_id: &str) -> Value {
    json!({
        "id": id,
        "classId": class_id,
        "name": { "en": en },
        "nameTokens": { "en": tokens(en) },
        "family": { "en": "Dogs", "scientific": "Canidae" },
        "scientificName": scientific,
        "scientificNameToken": tokens(scientific),
        "imageURL": [format!("{id}.jpg")],
        "summary": { "en": format!("About {en}.") },
    })
}

/// Write fixture files and import them into the store.
pub fn seed_store(dir: &Path, store: &Path) {
    let species_file = dir.join("species.json");
    let docs = json!([
        species("fox", "Red fox", "Vulpes vulpes", "MAMMALIA"),
        species("arctic", "Arctic fox", "Vulpes lagopus", "MAMMALIA"),
        species("deer", "Red deer", "Cervus elaphus", "MAMMALIA"),
        species("wolf", "Grey wolf", "Canis lupus", "MAMMALIA"),
        species("egret", "Reddish egret", "Egretta rufescens", "AVES"),
        species("owl", "Barn owl", "Tyto alba", "AVES"),
    ]);
    std::fs::write(&species_file, docs.to_string()).unwrap();

    let classes_file = dir.join("classes.json");
    let classes = json!([
        { "id": "MAMMALIA", "name": { "en": "Mammals" } },
        { "id": "AVES", "name": { "en": "Birds" } },
    ]);
    std::fs::write(&classes_file, classes.to_string()).unwrap();

    run_cli_success(
        &[
            "species",
            "import",
            "--collection",
            "species",
            species_file.to_str().unwrap(),
        ],
        store,
    );
    run_cli_success(
        &[
            "species",
            "import",
            "--collection",
            "speciesClass",
            classes_file.to_str().unwrap(),
        ],
        store,
    );
}
