//! Shader 布局代码生成
//!
//! 从唯一的 `layout.toml` 生成三份声明：
//! - MSL 头文件：Metal shader 和 host 端 C 代码共用，带 `static_assert`
//! - WGSL 模块：binding 常量和结构体，生成后用 naga 重新解析并校验 offset
//! - Rust 绑定：`#[repr(C)]` + `bytemuck::Pod`，带 `offset_of!` 编译期断言
//!
//! `shader-gen` binary 负责把 MSL / WGSL 写到磁盘；Rust 绑定由
//! prism-shader-binding 的 build.rs 直接调用 [`RustEmitter`] 生成。

pub mod compile;
pub mod config;
pub mod emitter;
pub mod generate;
pub mod msl;
pub mod rust;
pub mod verify;
pub mod wgsl;

pub use prism_layout_schema::naming;

pub use emitter::{EmitContext, EmitTarget, ShaderEmitter};
pub use msl::MslEmitter;
pub use rust::RustEmitter;
pub use verify::{verify_wgsl, wgsl_struct_layouts};
pub use wgsl::WgslEmitter;
