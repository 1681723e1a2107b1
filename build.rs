fn main() {
    // Bindings come from uniffi::setup_scaffolding!(), there is no UDL file.
    // Rebuild when the exported types or functions change.
    for path in ["src/uniffi_bindings.rs", "src/model.rs", "build.rs"] {
        println!("cargo:rerun-if-changed={}", path);
    }
}
