use crate::error::{LayoutError, LayoutMismatch};
use crate::field_type::{FieldType, LayoutRules};
use crate::layout::{BlockLayout, VertexLayout};
use std::fmt;

/// binding 的类别，每个类别独立编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingClass {
    Buffer,
    Texture,
    Sampler,
}

impl BindingClass {
    pub const ALL: [BindingClass; 3] = [BindingClass::Buffer, BindingClass::Texture, BindingClass::Sampler];

    pub fn name(self) -> &'static str {
        match self {
            BindingClass::Buffer => "buffer",
            BindingClass::Texture => "texture",
            BindingClass::Sampler => "sampler",
        }
    }
}

impl fmt::Display for BindingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// buffer 槽位里放的是什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// texture / sampler
    Resource,
    /// 一个或多个数据块
    Block,
    /// 单个标量，例如光源数量
    Scalar(FieldType),
    /// 顶点 buffer
    Vertex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSlot {
    pub name: String,
    pub class: BindingClass,
    pub index: u32,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDesc {
    pub name: String,
    pub ty: FieldType,
}

/// 一个跨越 host / shader 边界的数据块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDesc {
    pub name: String,
    /// 所在的 buffer 槽位
    pub slot: String,
    pub fields: Vec<FieldDesc>,
}

impl BlockDesc {
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn layout(&self, rules: LayoutRules) -> BlockLayout {
        BlockLayout::compute(self, rules)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttributeDesc {
    pub name: String,
    pub format: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayoutDesc {
    pub name: String,
    pub slot: String,
    /// 未指定时使用紧密排列的大小
    pub stride: Option<usize>,
    pub attributes: Vec<VertexAttributeDesc>,
}

impl VertexLayoutDesc {
    pub fn layout(&self) -> VertexLayout {
        VertexLayout::compute(self)
    }
}

/// 校验通过的布局契约
///
/// 只能通过 [`crate::LayoutSchema::validate`] 得到，所有生成器只消费这个类型。
#[derive(Debug, Clone)]
pub struct LayoutContract {
    pub(crate) name: String,
    pub(crate) host_rules: LayoutRules,
    /// 按 (class, index) 排序
    pub(crate) slots: Vec<BindingSlot>,
    pub(crate) blocks: Vec<BlockDesc>,
    pub(crate) vertex_layouts: Vec<VertexLayoutDesc>,
}

// getter
impl LayoutContract {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// host 端生成 Rust 结构体时使用的对齐规则
    #[inline]
    pub fn host_rules(&self) -> LayoutRules {
        self.host_rules
    }

    #[inline]
    pub fn all_slots(&self) -> &[BindingSlot] {
        &self.slots
    }

    pub fn slots(&self, class: BindingClass) -> impl Iterator<Item = &BindingSlot> {
        self.slots.iter().filter(move |s| s.class == class)
    }

    pub fn slot(&self, class: BindingClass, name: &str) -> Option<&BindingSlot> {
        self.slots(class).find(|s| s.name == name)
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockDesc] {
        &self.blocks
    }

    pub fn block(&self, name: &str) -> Option<&BlockDesc> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn blocks_in_slot<'a>(&'a self, slot: &'a str) -> impl Iterator<Item = &'a BlockDesc> + 'a {
        self.blocks.iter().filter(move |b| b.slot == slot)
    }

    #[inline]
    pub fn vertex_layouts(&self) -> &[VertexLayoutDesc] {
        &self.vertex_layouts
    }
}

// layout
impl LayoutContract {
    pub fn block_layout(&self, name: &str, rules: LayoutRules) -> Result<BlockLayout, LayoutError> {
        self.block(name)
            .map(|b| b.layout(rules))
            .ok_or_else(|| LayoutError::UnknownBlock(name.to_string()))
    }

    /// 所有数据块在 host 规则下的布局
    pub fn host_layouts(&self) -> Vec<BlockLayout> {
        self.blocks.iter().map(|b| b.layout(self.host_rules)).collect()
    }

    /// 检查每个数据块在给定的几套规则下布局完全一致
    ///
    /// 同时面向 Metal 和 WGSL 时，host 只有一份 Rust 结构体，两边必须一致。
    pub fn check_portability(&self, rules: &[LayoutRules]) -> Result<(), LayoutError> {
        let Some((&first, rest)) = rules.split_first() else {
            return Ok(());
        };
        for block in &self.blocks {
            let expected = block.layout(first);
            for &other in rest {
                let observed = block.layout(other).observed();
                expected
                    .compare(&observed)
                    .map_err(|m| LayoutError::mismatch(format!("{first} rules vs {other} rules"), m))?;
            }
        }
        Ok(())
    }

    /// 检查外部声明的 binding 序号和契约一致
    pub fn check_binding_indices<'a>(
        &self,
        class: BindingClass,
        observed: impl IntoIterator<Item = (&'a str, u32)>,
        side: &str,
    ) -> Result<(), LayoutError> {
        let mut seen = 0;
        for (name, index) in observed {
            seen += 1;
            let slot = self.slot(class, name).ok_or_else(|| LayoutError::UnknownSlot {
                owner: side.to_string(),
                slot: name.to_string(),
            })?;
            if slot.index != index {
                return Err(LayoutError::mismatch(
                    side,
                    LayoutMismatch::BindingIndex {
                        class,
                        name: name.to_string(),
                        expected: slot.index,
                        found: index,
                    },
                ));
            }
        }
        let expected = self.slots(class).count();
        if seen != expected {
            return Err(LayoutError::mismatch(
                side,
                LayoutMismatch::FieldCount {
                    block: format!("{class} bindings"),
                    expected,
                    found: seen,
                },
            ));
        }
        Ok(())
    }
}
