pub use prism_layout_schema::BindingClass;
use prism_layout_schema::{LayoutContract, LayoutError};
use std::ops::Range;

bitflags::bitflags! {
    /// 资源在哪些着色器阶段中可见
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStages: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
        const COMPUTE = 1 << 2;
    }
}

/// 某个类别中的 binding 序号
///
/// 由 prism-shader-binding 中生成的 `BufferIndex` / `TextureIndex` / `SamplerIndex` 实现。
pub trait BindingIndex: Copy + 'static {
    const CLASS: BindingClass;
    const ALL: &'static [Self];

    fn index(self) -> u32;

    /// schema 中的槽位名
    fn name(self) -> &'static str;
}

/// 参数表中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentItem {
    /// 字段名，去掉了首尾的下划线
    pub name: &'static str,
    /// 属性声明的类别
    pub class: BindingClass,
    /// 序号实际所属的类别
    pub index_class: BindingClass,
    pub index: u32,
    /// 对应的 schema 槽位名
    pub slot: &'static str,
    pub stages: ShaderStages,
    pub count: u32,
}

impl ArgumentItem {
    pub fn new<I: BindingIndex>(name: &'static str, class: BindingClass, index: I, stages: ShaderStages, count: u32) -> Self {
        Self {
            name,
            class,
            index_class: I::CLASS,
            index: index.index(),
            slot: index.name(),
            stages,
            count,
        }
    }

    /// 占用的序号范围 `[index, index + count)`，溢出时为 `None`
    pub fn index_range(&self) -> Option<Range<u32>> {
        self.index.checked_add(self.count).map(|end| self.index..end)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArgumentLayoutError {
    #[error("`{name}` is declared as a {class} but bound with a {index_class} index")]
    WrongClass {
        name: &'static str,
        class: BindingClass,
        index_class: BindingClass,
    },

    #[error("`{first}` and `{second}` share {class} index {index}")]
    SharedIndex {
        class: BindingClass,
        index: u32,
        first: &'static str,
        second: &'static str,
    },

    #[error("`{name}` has an array count of 0")]
    EmptyArray { name: &'static str },

    #[error("`{name}` at index {index} with count {count} overflows the index space")]
    IndexOverflow { name: &'static str, index: u32, count: u32 },

    #[error("`{name}` is visible to no shader stage")]
    NoStage { name: &'static str },

    #[error(transparent)]
    Contract(#[from] LayoutError),
}

/// pass 的参数表
///
/// 通过 `#[derive(ArgumentLayout)]` 自动实现，不需要手动实现。
pub trait ArgumentLayout {
    /// 所有参数，顺序与字段声明顺序一致
    fn argument_items() -> Vec<ArgumentItem>;

    /// 某个着色器阶段可见的参数
    fn stage_items(stage: ShaderStages) -> Vec<ArgumentItem> {
        Self::argument_items().into_iter().filter(|item| item.stages.intersects(stage)).collect()
    }

    /// 同一个类别中任意两项占用的序号范围不能重叠
    ///
    /// 数组参数占用 `[index, index + count)`。
    fn validate() -> Result<(), ArgumentLayoutError> {
        let items = Self::argument_items();
        let mut ranges: Vec<(&ArgumentItem, Range<u32>)> = Vec::with_capacity(items.len());
        for item in &items {
            if item.class != item.index_class {
                return Err(ArgumentLayoutError::WrongClass {
                    name: item.name,
                    class: item.class,
                    index_class: item.index_class,
                });
            }
            if item.stages.is_empty() {
                return Err(ArgumentLayoutError::NoStage { name: item.name });
            }
            if item.count == 0 {
                return Err(ArgumentLayoutError::EmptyArray { name: item.name });
            }
            let range = item.index_range().ok_or(ArgumentLayoutError::IndexOverflow {
                name: item.name,
                index: item.index,
                count: item.count,
            })?;
            let overlap = ranges
                .iter()
                .find(|(prev, r)| prev.class == item.class && r.start < range.end && range.start < r.end);
            if let Some((prev, r)) = overlap {
                return Err(ArgumentLayoutError::SharedIndex {
                    class: item.class,
                    index: r.start.max(range.start),
                    first: prev.name,
                    second: item.name,
                });
            }
            ranges.push((item, range));
        }
        Ok(())
    }

    /// 检查每一项的序号与契约中同名槽位一致
    fn check_contract(contract: &LayoutContract) -> Result<(), ArgumentLayoutError> {
        for item in Self::argument_items() {
            let slot = contract.slot(item.class, item.slot).ok_or_else(|| LayoutError::UnknownSlot {
                owner: item.name.to_string(),
                slot: item.slot.to_string(),
            })?;
            if slot.index != item.index {
                return Err(LayoutError::mismatch(
                    format!("argument `{}`", item.name),
                    prism_layout_schema::LayoutMismatch::BindingIndex {
                        class: item.class,
                        name: item.slot.to_string(),
                        expected: slot.index,
                        found: item.index,
                    },
                )
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum TestBuffer {
        Frame,
        Light,
    }

    impl BindingIndex for TestBuffer {
        const CLASS: BindingClass = BindingClass::Buffer;
        const ALL: &'static [Self] = &[TestBuffer::Frame, TestBuffer::Light];

        fn index(self) -> u32 {
            self as u32
        }

        fn name(self) -> &'static str {
            match self {
                TestBuffer::Frame => "frame",
                TestBuffer::Light => "light",
            }
        }
    }

    struct Good;
    impl ArgumentLayout for Good {
        fn argument_items() -> Vec<ArgumentItem> {
            vec![
                ArgumentItem::new("frame", BindingClass::Buffer, TestBuffer::Frame, ShaderStages::VERTEX, 1),
                ArgumentItem::new("light", BindingClass::Buffer, TestBuffer::Light, ShaderStages::FRAGMENT, 1),
            ]
        }
    }

    struct Shared;
    impl ArgumentLayout for Shared {
        fn argument_items() -> Vec<ArgumentItem> {
            vec![
                ArgumentItem::new("a", BindingClass::Buffer, TestBuffer::Light, ShaderStages::VERTEX, 1),
                ArgumentItem::new("b", BindingClass::Buffer, TestBuffer::Light, ShaderStages::VERTEX, 1),
            ]
        }
    }

    struct Mislabeled;
    impl ArgumentLayout for Mislabeled {
        fn argument_items() -> Vec<ArgumentItem> {
            vec![ArgumentItem::new("t", BindingClass::Texture, TestBuffer::Frame, ShaderStages::FRAGMENT, 1)]
        }
    }

    #[test]
    fn test_validate() {
        Good::validate().unwrap();
        assert!(matches!(
            Shared::validate(),
            Err(ArgumentLayoutError::SharedIndex { index: 1, first: "a", second: "b", .. })
        ));
        assert!(matches!(Mislabeled::validate(), Err(ArgumentLayoutError::WrongClass { .. })));
    }

    struct OverlappingArray;
    impl ArgumentLayout for OverlappingArray {
        fn argument_items() -> Vec<ArgumentItem> {
            vec![
                ArgumentItem::new("lights", BindingClass::Buffer, TestBuffer::Frame, ShaderStages::FRAGMENT, 2),
                ArgumentItem::new("light", BindingClass::Buffer, TestBuffer::Light, ShaderStages::FRAGMENT, 1),
            ]
        }
    }

    struct EmptyArray;
    impl ArgumentLayout for EmptyArray {
        fn argument_items() -> Vec<ArgumentItem> {
            vec![ArgumentItem::new("frame", BindingClass::Buffer, TestBuffer::Frame, ShaderStages::VERTEX, 0)]
        }
    }

    struct Overflowing;
    impl ArgumentLayout for Overflowing {
        fn argument_items() -> Vec<ArgumentItem> {
            vec![ArgumentItem::new("light", BindingClass::Buffer, TestBuffer::Light, ShaderStages::VERTEX, u32::MAX)]
        }
    }

    #[test]
    fn test_array_ranges() {
        assert!(matches!(
            OverlappingArray::validate(),
            Err(ArgumentLayoutError::SharedIndex { index: 1, first: "lights", second: "light", .. })
        ));
        assert!(matches!(EmptyArray::validate(), Err(ArgumentLayoutError::EmptyArray { name: "frame" })));
        assert!(matches!(
            Overflowing::validate(),
            Err(ArgumentLayoutError::IndexOverflow { index: 1, count: u32::MAX, .. })
        ));

        let item = ArgumentItem::new("lights", BindingClass::Buffer, TestBuffer::Light, ShaderStages::FRAGMENT, 4);
        assert_eq!(item.index_range(), Some(1..5));
    }

    #[test]
    fn test_stage_items() {
        let vertex = Good::stage_items(ShaderStages::VERTEX);
        assert_eq!(vertex.len(), 1);
        assert_eq!(vertex[0].slot, "frame");
        assert_eq!(Good::stage_items(ShaderStages::VERTEX | ShaderStages::FRAGMENT).len(), 2);
        assert!(Good::stage_items(ShaderStages::COMPUTE).is_empty());
    }
}
