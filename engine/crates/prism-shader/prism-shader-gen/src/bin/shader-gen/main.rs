//! 布局代码生成工具
//!
//! ```text
//! shader-gen [config.toml] [--check]
//! ```
//!
//! 从 `layout.toml` 生成 MSL 头文件和 WGSL 声明。`--check` 只比较，不写盘，
//! 有过期文件时返回非零退出码。

use anyhow::Context;
use clap::Parser;
use prism_crate_tools::init_log::init_log;
use prism_crate_tools::resource::PrismPath;
use prism_layout_schema::LayoutSchema;
use prism_shader_gen::config::ShaderGenConfig;
use prism_shader_gen::{EmitContext, EmitTarget, compile, generate};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shader-gen", about = "Generate shader layout declarations from layout.toml")]
struct Args {
    /// 配置文件，默认为工作区根目录下的 shader-gen.toml
    config: Option<PathBuf>,

    /// 只检查生成文件是否过期，不写盘
    #[arg(long)]
    check: bool,
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ShaderGenConfig::load(&PrismPath::resolve(path))?,
        None => ShaderGenConfig::load_or_default(&PrismPath::shader_gen_config_path())?,
    };

    log::info!("Schema: {:?}", config.schema);
    let schema_source =
        std::fs::read_to_string(&config.schema).with_context(|| format!("failed to read {}", config.schema.display()))?;
    let contract = LayoutSchema::from_toml_str(&schema_source)?.validate()?;
    log::info!(
        "Contract `{}`: {} slots, {} blocks, {} vertex layouts",
        contract.name(),
        contract.all_slots().len(),
        contract.blocks().len(),
        contract.vertex_layouts().len()
    );

    // host 的规则 + 所有输出目标的规则下布局必须一致
    let mut rules = vec![contract.host_rules()];
    for target in config.targets() {
        let r = target.rules(&contract);
        if !rules.contains(&r) {
            rules.push(r);
        }
    }
    contract.check_portability(&rules)?;
    log::info!(
        "Layouts are identical under {}",
        rules.iter().map(|r| r.name()).collect::<Vec<_>>().join(", ")
    );

    let schema_name = config
        .schema
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("layout.toml");
    let cx = EmitContext {
        contract: &contract,
        schema_name,
        schema_source: Some(&schema_source),
    };
    let files = generate::emit_all(&cx, &config.outputs)?;
    generate::verify_outputs(&contract, &files)?;

    if args.check {
        let stale = generate::check_all(&files);
        for path in &stale {
            log::error!("out of date: {}", path.display());
        }
        anyhow::ensure!(stale.is_empty(), "{} generated file(s) are out of date, run shader-gen", stale.len());
        log::info!("All generated files are up to date.");
        return Ok(());
    }

    generate::write_all(&files)?;

    if config.metal.compile {
        // 生成的头文件所在目录都加入 include 路径
        let include_dirs: Vec<_> = files
            .iter()
            .filter(|f| f.target == EmitTarget::Msl)
            .filter_map(|f| f.path.parent().map(PathBuf::from))
            .collect();
        let count = compile::compile_metal(&config.metal, include_dirs)?;
        log::info!("Compiled {count} Metal shader(s).");
    }

    log::info!("Shader generation completed.");
    Ok(())
}

fn main() {
    init_log();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
