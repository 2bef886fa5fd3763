use prism_layout_schema::{LayoutContract, LayoutRules};
use serde::Deserialize;
use std::fmt;

/// 生成目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitTarget {
    Msl,
    Wgsl,
    Rust,
}

impl EmitTarget {
    /// 该目标使用的对齐规则，Rust 跟随契约中的 host 规则
    pub fn rules(self, contract: &LayoutContract) -> LayoutRules {
        match self {
            EmitTarget::Msl => LayoutRules::Metal,
            EmitTarget::Wgsl => LayoutRules::Wgsl,
            EmitTarget::Rust => contract.host_rules(),
        }
    }

    pub fn emitter(self) -> Box<dyn ShaderEmitter> {
        match self {
            EmitTarget::Msl => Box::new(crate::MslEmitter::new()),
            EmitTarget::Wgsl => Box::new(crate::WgslEmitter::new()),
            EmitTarget::Rust => Box::new(crate::RustEmitter::new()),
        }
    }
}

impl fmt::Display for EmitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmitTarget::Msl => "msl",
            EmitTarget::Wgsl => "wgsl",
            EmitTarget::Rust => "rust",
        };
        f.write_str(name)
    }
}

/// 生成时需要的全部输入
pub struct EmitContext<'a> {
    pub contract: &'a LayoutContract,
    /// 写进 banner 的 schema 文件名
    pub schema_name: &'a str,
    /// schema 原文，Rust 绑定会把它嵌进去以便运行时校验
    pub schema_source: Option<&'a str>,
}

impl EmitContext<'_> {
    /// 生成文件的首行注释，`comment` 为目标语言的行注释前缀
    pub fn banner(&self, comment: &str) -> String {
        format!(
            "{comment} This file is generated from {} by shader-gen. Do not edit manually.\n{comment} Contract: {}\n",
            self.schema_name,
            self.contract.name()
        )
    }
}

/// 代码生成器 Trait
pub trait ShaderEmitter: Send + Sync {
    fn target(&self) -> EmitTarget;

    fn emit(&self, cx: &EmitContext) -> anyhow::Result<String>;
}
