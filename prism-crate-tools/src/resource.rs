use std::path::{Path, PathBuf};

/// 统一资源路径管理
///
/// 所有路径基于工作区根目录（通过 `CARGO_MANIFEST_DIR` 推导）。
/// build.rs 和 `shader-gen` 都通过这里找到 schema 以及生成文件的位置。
///
/// # 使用示例
/// ```ignore
/// let schema = PrismPath::shader_schema_path();        // engine/shader/layout.toml
/// let header = PrismPath::shader_include_path();       // engine/shader/include
/// let config = PrismPath::shader_gen_config_path();    // shader-gen.toml
/// ```
pub struct PrismPath {}
// 核心路径
impl PrismPath {
    /// 获取工作区根目录
    pub fn workspace_path() -> PathBuf {
        // 本 crate 位于工作区根目录下一层
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
    }

    /// 将配置文件中的相对路径解析为基于工作区的绝对路径
    pub fn resolve(path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() { path.to_path_buf() } else { Self::workspace_path().join(path) }
    }

    pub fn shader_gen_config_path() -> PathBuf {
        Self::workspace_path().join("shader-gen.toml")
    }
}
// engine 目录下
impl PrismPath {
    pub fn engine_path() -> PathBuf {
        Self::workspace_path().join("engine")
    }

    pub fn shader_root_path() -> PathBuf {
        Self::engine_path().join("shader")
    }

    /// 唯一的布局契约来源
    pub fn shader_schema_path() -> PathBuf {
        Self::shader_root_path().join("layout.toml")
    }

    /// 生成的 MSL / WGSL 声明所在目录
    pub fn shader_include_path() -> PathBuf {
        Self::shader_root_path().join("include")
    }

    /// Metal 着色器源码
    pub fn shader_src_path() -> PathBuf {
        Self::shader_root_path().join("src")
    }

    /// 编译 shader 的输出路径
    pub fn shader_build_path() -> PathBuf {
        Self::shader_root_path().join(".build")
    }
}
