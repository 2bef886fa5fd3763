use prism_crate_tools::resource::PrismPath;
use prism_layout_schema::{LayoutRules, LayoutSchema};
use prism_shader_gen::{EmitContext, RustEmitter, ShaderEmitter};

fn gen_rust_binding() -> anyhow::Result<()> {
    let schema_path = PrismPath::shader_schema_path();
    println!("cargo:rerun-if-changed={}", schema_path.display());

    let schema_source = std::fs::read_to_string(&schema_path)?;
    let contract = LayoutSchema::from_toml_str(&schema_source)?.validate()?;
    // host 只有一份结构体，Metal 和 WGSL 两边的布局必须一致
    contract.check_portability(&[LayoutRules::Metal, LayoutRules::Wgsl])?;

    let cx = EmitContext {
        contract: &contract,
        schema_name: "layout.toml",
        schema_source: Some(&schema_source),
    };
    let bindings = RustEmitter::new().emit(&cx)?;

    // Write the bindings to the $OUT_DIR/_shader_bindings.rs file.
    let out_path = std::path::PathBuf::from(std::env::var("OUT_DIR")?).join("_shader_bindings.rs");
    std::fs::write(out_path, bindings)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    gen_rust_binding()
}
