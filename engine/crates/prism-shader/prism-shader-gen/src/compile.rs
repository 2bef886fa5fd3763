//! Metal 着色器编译检查
//!
//! 生成的头文件里有 `static_assert`，只要 include 它的 `.metal` 能编译通过，
//! shader 一侧对布局的理解就与 schema 一致。

use crate::config::MetalConfig;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 一个具体的编译任务
#[derive(Debug)]
pub struct ShaderCompileTask {
    pub shader_path: PathBuf,
    pub output_path: PathBuf,
}

impl ShaderCompileTask {
    /// 从目录项创建编译任务，不是 `.metal` 文件时返回 None
    ///
    /// 输出路径保持源文件相对 `src_dir` 的目录结构，扩展名为 `.air`
    pub fn new(entry: &walkdir::DirEntry, src_dir: &Path, build_dir: &Path) -> Option<Self> {
        let shader_path = entry.path();
        if shader_path.extension()? != "metal" {
            return None;
        }
        let relative_path = shader_path.strip_prefix(src_dir).ok()?;
        let output_path = build_dir.join(relative_path).with_extension("air");

        Some(Self {
            shader_path: shader_path.to_path_buf(),
            output_path,
        })
    }
}

/// 着色器编译器 Trait
pub trait ShaderCompiler: Send + Sync {
    fn name(&self) -> &str;

    /// 编译器是否可用，不可用时跳过编译检查
    fn is_available(&self) -> bool;

    fn compile(&self, task: &ShaderCompileTask) -> anyhow::Result<()>;

    /// 根据 cmd 执行的结果，处理输出信息
    fn process_cmd_output(&self, task: &ShaderCompileTask, output: std::process::Output) -> anyhow::Result<()> {
        if !output.stdout.is_empty() {
            log::info!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
            log::error!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        }
        anyhow::ensure!(
            output.status.success(),
            "{} failed to compile {}",
            self.name(),
            task.shader_path.display()
        );
        Ok(())
    }
}

/// 使用 `xcrun -sdk <sdk> metal` 编译 `.metal` 文件
#[derive(Debug)]
pub struct MetalCompiler {
    sdk: String,
    include_dirs: Vec<PathBuf>,
}

impl MetalCompiler {
    pub fn new(sdk: impl Into<String>, include_dirs: Vec<PathBuf>) -> Self {
        Self {
            sdk: sdk.into(),
            include_dirs,
        }
    }
}

impl ShaderCompiler for MetalCompiler {
    fn name(&self) -> &str {
        "metal"
    }

    fn is_available(&self) -> bool {
        std::process::Command::new("xcrun")
            .args(["-sdk", &self.sdk, "--find", "metal"])
            .output()
            .is_ok_and(|output| output.status.success())
    }

    fn compile(&self, task: &ShaderCompileTask) -> anyhow::Result<()> {
        let mut cmd = std::process::Command::new("xcrun");
        cmd.args(["-sdk", &self.sdk, "metal", "-c"]);
        for dir in &self.include_dirs {
            cmd.arg("-I").arg(dir);
        }
        cmd.arg("-o").arg(&task.output_path).arg(&task.shader_path);

        let output = cmd.output()?;
        self.process_cmd_output(task, output)
    }
}

/// 找出 `src_dir` 下所有的编译任务
pub fn collect_tasks(src_dir: &Path, build_dir: &Path) -> Vec<ShaderCompileTask> {
    walkdir::WalkDir::new(src_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| ShaderCompileTask::new(&entry, src_dir, build_dir))
        .collect()
}

/// 并行编译，返回编译的文件数；编译器不可用时返回 0
pub fn compile_all(compiler: &dyn ShaderCompiler, src_dir: &Path, build_dir: &Path) -> anyhow::Result<usize> {
    if !compiler.is_available() {
        log::warn!("{} compiler not found, skip shader compile check", compiler.name());
        return Ok(0);
    }

    let tasks = collect_tasks(src_dir, build_dir);
    tasks.par_iter().try_for_each(|task| {
        log::info!("Compiling shader: {:?}", task.shader_path);

        // 确保输出目录存在
        if let Some(parent) = task.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        compiler.compile(task)
    })?;
    Ok(tasks.len())
}

/// 按配置编译 Metal 源码，生成的头文件所在目录加入 include 路径
pub fn compile_metal(config: &MetalConfig, include_dirs: Vec<PathBuf>) -> anyhow::Result<usize> {
    let compiler = MetalCompiler::new(config.sdk.clone(), include_dirs);
    compile_all(&compiler, &config.src_dir, &config.build_dir)
}
