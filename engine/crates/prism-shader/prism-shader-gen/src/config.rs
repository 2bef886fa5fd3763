//! `shader-gen.toml`
//!
//! ```toml
//! schema = "engine/shader/layout.toml"
//!
//! [[outputs]]
//! target = "msl"
//! path = "engine/shader/include/ShaderTypes.h"
//!
//! [metal]
//! compile = true
//! ```
//!
//! 相对路径都基于工作区根目录。

use crate::emitter::EmitTarget;
use anyhow::Context;
use prism_crate_tools::resource::PrismPath;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub target: EmitTarget,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetalConfig {
    /// 生成之后是否用 xcrun 编译 `.metal` 源码
    pub compile: bool,
    pub sdk: String,
    pub src_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl Default for MetalConfig {
    fn default() -> Self {
        Self {
            compile: false,
            sdk: "macosx".to_string(),
            src_dir: PrismPath::shader_src_path(),
            build_dir: PrismPath::shader_build_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShaderGenConfig {
    pub schema: PathBuf,
    pub outputs: Vec<OutputConfig>,
    pub metal: MetalConfig,
}

impl Default for ShaderGenConfig {
    fn default() -> Self {
        Self {
            schema: PrismPath::shader_schema_path(),
            outputs: vec![
                OutputConfig {
                    target: EmitTarget::Msl,
                    path: PrismPath::shader_include_path().join("ShaderTypes.h"),
                },
                OutputConfig {
                    target: EmitTarget::Wgsl,
                    path: PrismPath::shader_include_path().join("shader_types.wgsl"),
                },
            ],
            metal: MetalConfig::default(),
        }
    }
}

impl ShaderGenConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(source).context("invalid shader-gen config")?;
        config.resolve_paths();
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
    }

    /// 配置文件不存在时使用默认配置
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("{} not found, using default outputs", path.display());
            Ok(Self::default())
        }
    }

    fn resolve_paths(&mut self) {
        self.schema = PrismPath::resolve(&self.schema);
        for output in &mut self.outputs {
            output.path = PrismPath::resolve(&output.path);
        }
        self.metal.src_dir = PrismPath::resolve(&self.metal.src_dir);
        self.metal.build_dir = PrismPath::resolve(&self.metal.build_dir);
    }

    /// 所有输出目标（去重），用于检查布局在这些规则下是否一致
    pub fn targets(&self) -> Vec<EmitTarget> {
        let mut targets: Vec<_> = Vec::new();
        for output in &self.outputs {
            if !targets.contains(&output.target) {
                targets.push(output.target);
            }
        }
        targets
    }
}
