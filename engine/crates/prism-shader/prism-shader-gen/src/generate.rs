use crate::config::OutputConfig;
use crate::emitter::{EmitContext, EmitTarget};
use crate::verify::verify_wgsl;
use anyhow::Context;
use prism_layout_schema::LayoutContract;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 一个生成好、还没写盘的文件
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub target: EmitTarget,
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    /// 磁盘上的内容是否与生成结果一致
    pub fn is_up_to_date(&self) -> bool {
        std::fs::read_to_string(&self.path).is_ok_and(|on_disk| on_disk == self.content)
    }
}

/// 并行生成所有输出
pub fn emit_all(cx: &EmitContext, outputs: &[OutputConfig]) -> anyhow::Result<Vec<GeneratedFile>> {
    outputs
        .par_iter()
        .map(|output| {
            let content = output
                .target
                .emitter()
                .emit(cx)
                .with_context(|| format!("failed to emit {} for {}", output.target, output.path.display()))?;
            Ok(GeneratedFile {
                target: output.target,
                path: output.path.clone(),
                content,
            })
        })
        .collect()
}

/// 生成结果写盘前的校验，目前只有 WGSL 可以在进程内重新解析
pub fn verify_outputs(contract: &LayoutContract, files: &[GeneratedFile]) -> anyhow::Result<()> {
    for file in files.iter().filter(|f| f.target == EmitTarget::Wgsl) {
        verify_wgsl(contract, &file.content).with_context(|| format!("{} failed verification", file.path.display()))?;
        log::info!("verified {} with naga", file.path.display());
    }
    Ok(())
}

/// 写盘，内容没有变化的文件不动，避免触发不必要的重新编译
///
/// 返回实际写入的文件
pub fn write_all(files: &[GeneratedFile]) -> anyhow::Result<Vec<&Path>> {
    let mut written = Vec::new();
    for file in files {
        if file.is_up_to_date() {
            log::info!("unchanged: {}", file.path.display());
            continue;
        }
        if let Some(parent) = file.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&file.path, &file.content).with_context(|| format!("failed to write {}", file.path.display()))?;
        log::info!("generated: {}", file.path.display());
        written.push(file.path.as_path());
    }
    Ok(written)
}

/// 与磁盘比较，返回过期的文件
pub fn check_all(files: &[GeneratedFile]) -> Vec<&Path> {
    files.iter().filter(|f| !f.is_up_to_date()).map(|f| f.path.as_path()).collect()
}
