// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CRD YAML Generator
//!
//! Generates the Kubernetes CRD YAML from the Rust types defined in src/crd.rs.
//! This keeps the YAML in deploy/crds/ in sync with the Rust code.
//!
//! Usage:
//!   cargo run --bin crdgen
//!
//! The generated file is written to deploy/crds/ with a license header.

use desec_dns_operator::crd::ManagedDomain;
use kube::CustomResourceExt;
use std::fs;
use std::path::Path;

const COPYRIGHT_HEADER: &str = "# Copyright (c) 2025 Erick Bourgeois, firestoned
# SPDX-License-Identifier: MIT
#
# This file is AUTO-GENERATED from src/crd.rs
# DO NOT EDIT MANUALLY - Run `cargo run --bin crdgen` to regenerate
#
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("deploy/crds");

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    println!("Generating CRD YAML from src/crd.rs...");

    generate_crd::<ManagedDomain>("manageddomains.crd.yaml", output_dir)?;

    println!("✓ Successfully generated CRD YAML in deploy/crds/");
    println!("\nNext steps:");
    println!("  1. Review the generated file");
    println!("  2. Deploy with: kubectl apply -f deploy/crds/");

    Ok(())
}

fn generate_crd<T>(filename: &str, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>>
where
    T: CustomResourceExt,
{
    let yaml = serde_yaml::to_string(&T::crd())?;
    let content = format!("{COPYRIGHT_HEADER}{yaml}");

    let output_path = output_dir.join(filename);
    fs::write(&output_path, content)?;

    println!("  ✓ Generated {}", output_path.display());

    Ok(())
}
