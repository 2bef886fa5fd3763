//! 布局契约 schema
//!
//! host（Rust）和 shader（MSL / WGSL）分别独立编译，只能通过约定来保证
//! binding 序号和数据块布局一致。这个 crate 把约定写成一份 schema：
//!
//! - [`LayoutSchema`]：从 `layout.toml` 反序列化得到的原始描述
//! - [`LayoutContract`]：校验通过的契约，所有生成器都只消费它
//! - [`BlockLayout`]：某个数据块在某套对齐规则 ([`LayoutRules`]) 下的具体 offset
//!
//! 布局不一致统一表现为 [`LayoutError::Mismatch`]，而不是渲染错误。

mod contract;
mod error;
mod field_type;
mod layout;
pub mod naming;
mod reflect;
mod schema;

pub use contract::{BindingClass, BindingSlot, BlockDesc, FieldDesc, LayoutContract, SlotKind, VertexAttributeDesc, VertexLayoutDesc};
pub use error::{LayoutError, LayoutMismatch};
pub use field_type::{FieldType, LayoutRules};
pub use layout::{BlockLayout, FieldLayout, ObservedField, ObservedLayout, VertexAttributeLayout, VertexLayout};
pub use reflect::FieldValue;
pub use schema::LayoutSchema;
