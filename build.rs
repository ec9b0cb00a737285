// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

fn main() {
    #[cfg(feature = "slurm")]
    slurm_bindings();
}

/// Generate Rust bindings for the parts of libslurm the module calls.
#[cfg(feature = "slurm")]
fn slurm_bindings() {
    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());

    println!("cargo:rustc-link-lib=slurm");
    println!("cargo:rerun-if-changed=build.rs");

    bindgen::Builder::default()
        .header_contents("wrapper.h", "#include <slurm/slurm.h>\n#include <slurm/slurm_errno.h>\n")
        .allowlist_function("slurm_load_node_single")
        .allowlist_function("slurm_free_node_info_msg")
        .allowlist_function("slurm_strerror")
        .allowlist_type("node_info_msg_t")
        .allowlist_var("SHOW_ALL")
        .allowlist_var("NODE_STATE_BASE")
        .allowlist_var("NODE_STATE_DRAIN")
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .generate()
        .expect("failed to generate slurm bindings")
        .write_to_file(out_dir.join("slurm_bindings.rs"))
        .expect("failed to write slurm bindings");
}
