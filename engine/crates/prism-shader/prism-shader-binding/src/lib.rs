//! shader 数据块对应的 Rust 结构体
//!
//! 结构体和 binding 序号由 build.rs 从 `engine/shader/layout.toml` 生成，
//! 生成的代码中带有 `size_of` / `offset_of!` 的编译期断言。
//! 运行时还可以用 [`verify_all`] 把 rustc 的布局与嵌入的 schema 再比较一次。

mod types;

pub use prism_argument_layout_trait::BindingIndex;
pub use types::*;

include!(concat!(env!("OUT_DIR"), "/_shader_bindings.rs"));

use prism_layout_schema::{
    BindingClass, FieldType, LayoutContract, LayoutError, LayoutMismatch, LayoutSchema, ObservedLayout,
};

const HOST_SIDE: &str = "host (rustc)";

/// 跨越 host / shader 边界的数据块
pub trait ShaderBlock: bytemuck::Pod {
    /// schema 中的数据块名
    const NAME: &'static str;
    /// 每个字段的名字和 rustc 给出的 offset，不含 padding
    const FIELDS: &'static [(&'static str, usize)];

    fn observed_layout() -> ObservedLayout {
        ObservedLayout::new(Self::NAME, size_of::<Self>(), Self::FIELDS.iter().copied())
    }

    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// 绑定在某个 buffer 槽位上的数据块
pub trait BoundBlock: ShaderBlock {
    const SLOT: BufferIndex;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub location: u32,
    pub format: FieldType,
    pub offset: usize,
}

/// 顶点 buffer 中的一个元素
pub trait VertexInput: bytemuck::Pod {
    const NAME: &'static str;
    const SLOT: BufferIndex;
    const STRIDE: usize;
    const ATTRIBUTES: &'static [VertexAttribute];
}

/// 解析生成时嵌入的 schema
pub fn contract() -> Result<LayoutContract, LayoutError> {
    LayoutSchema::from_toml_str(SCHEMA_SOURCE)?.validate()
}

/// 比较一个数据块的 rustc 布局和槽位与契约是否一致
pub fn verify_block<T: BoundBlock>(contract: &LayoutContract) -> Result<(), LayoutError> {
    let block = contract
        .block(T::NAME)
        .ok_or_else(|| LayoutError::mismatch(HOST_SIDE, LayoutMismatch::MissingBlock { block: T::NAME.to_string() }))?;

    block
        .layout(contract.host_rules())
        .compare(&T::observed_layout())
        .map_err(|m| LayoutError::mismatch(HOST_SIDE, m))?;

    let slot = contract
        .slot(BindingClass::Buffer, &block.slot)
        .ok_or_else(|| LayoutError::UnknownSlot {
            owner: block.name.clone(),
            slot: block.slot.clone(),
        })?;
    if slot.index != T::SLOT.index() || slot.name != T::SLOT.name() {
        return Err(LayoutError::mismatch(
            HOST_SIDE,
            LayoutMismatch::BindingIndex {
                class: BindingClass::Buffer,
                name: format!("{} ({})", block.slot, T::NAME),
                expected: slot.index,
                found: T::SLOT.index(),
            },
        ));
    }
    Ok(())
}

/// 比较一个顶点布局的 stride 和属性 offset
pub fn verify_vertex<T: VertexInput>(contract: &LayoutContract) -> Result<(), LayoutError> {
    let desc = contract
        .vertex_layouts()
        .iter()
        .find(|v| v.name == T::NAME)
        .ok_or_else(|| LayoutError::mismatch(HOST_SIDE, LayoutMismatch::MissingBlock { block: T::NAME.to_string() }))?;
    let layout = desc.layout();

    if layout.stride != T::STRIDE || size_of::<T>() != T::STRIDE {
        return Err(LayoutError::mismatch(
            HOST_SIDE,
            LayoutMismatch::Size {
                block: T::NAME.to_string(),
                expected: layout.stride,
                found: size_of::<T>(),
            },
        ));
    }
    if layout.attributes.len() != T::ATTRIBUTES.len() {
        return Err(LayoutError::mismatch(
            HOST_SIDE,
            LayoutMismatch::FieldCount {
                block: T::NAME.to_string(),
                expected: layout.attributes.len(),
                found: T::ATTRIBUTES.len(),
            },
        ));
    }
    for (expected, found) in layout.attributes.iter().zip(T::ATTRIBUTES) {
        if expected.offset != found.offset || expected.location != found.location {
            return Err(LayoutError::mismatch(
                HOST_SIDE,
                LayoutMismatch::Offset {
                    block: T::NAME.to_string(),
                    field: expected.name.clone(),
                    expected: expected.offset,
                    found: found.offset,
                },
            ));
        }
    }
    Ok(())
}

fn verify_indices<I: BindingIndex>(contract: &LayoutContract) -> Result<(), LayoutError> {
    contract.check_binding_indices(I::CLASS, I::ALL.iter().map(|i| (i.name(), i.index())), HOST_SIDE)
}

/// 所有数据块、顶点布局和 binding 序号
///
/// 生成的代码已经在编译期断言过一次，这里用于在加载时确认二进制与 schema 来自同一版本。
pub fn verify_all(contract: &LayoutContract) -> Result<(), LayoutError> {
    verify_indices::<BufferIndex>(contract)?;
    verify_indices::<TextureIndex>(contract)?;
    verify_indices::<SamplerIndex>(contract)?;

    macro_rules! verify_blocks {
        ($($block:ident),*) => {
            $( verify_block::<$block>(contract)?; )*
        };
    }
    for_each_shader_block!(verify_blocks);

    macro_rules! verify_vertices {
        ($($vertex:ident),*) => {
            $( verify_vertex::<$vertex>(contract)?; )*
        };
    }
    for_each_vertex_input!(verify_vertices);

    log::debug!("host layouts match contract `{}`", contract.name());
    Ok(())
}
