use crate::contract::{BlockDesc, VertexLayoutDesc};
use crate::error::LayoutMismatch;
use crate::field_type::{FieldType, LayoutRules};

#[inline]
fn align_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub ty: FieldType,
    pub offset: usize,
    pub size: usize,
}

impl FieldLayout {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// 某个数据块在某套对齐规则下的布局
///
/// - field offset：上一个字段的结尾向上对齐到该字段的 align
/// - block align：所有字段 align 的最大值
/// - block size：最后一个字段的结尾向上对齐到 block align，也就是数组中的 stride
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    pub name: String,
    pub rules: LayoutRules,
    pub fields: Vec<FieldLayout>,
    pub size: usize,
    pub align: usize,
}

impl BlockLayout {
    pub fn compute(block: &BlockDesc, rules: LayoutRules) -> Self {
        let mut cursor = 0;
        let mut block_align = 1;
        let fields = block
            .fields
            .iter()
            .map(|field| {
                let (size, align) = field.ty.size_align(rules);
                let offset = align_up(cursor, align);
                cursor = offset + size;
                block_align = block_align.max(align);
                FieldLayout {
                    name: field.name.clone(),
                    ty: field.ty,
                    offset,
                    size,
                }
            })
            .collect();

        Self {
            name: block.name.clone(),
            rules,
            fields,
            size: align_up(cursor, block_align),
            align: block_align,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 作为数组元素时的步长
    #[inline]
    pub fn stride(&self) -> usize {
        self.size
    }

    /// 只保留可以从编译器一侧观测到的信息
    pub fn observed(&self) -> ObservedLayout {
        ObservedLayout {
            block: self.name.clone(),
            size: self.size,
            fields: self
                .fields
                .iter()
                .map(|f| ObservedField {
                    name: f.name.clone(),
                    offset: f.offset,
                })
                .collect(),
        }
    }

    /// 和另一侧实际编译出来的布局逐字段比较
    pub fn compare(&self, observed: &ObservedLayout) -> Result<(), LayoutMismatch> {
        if observed.fields.len() != self.fields.len() {
            return Err(LayoutMismatch::FieldCount {
                block: self.name.clone(),
                expected: self.fields.len(),
                found: observed.fields.len(),
            });
        }

        for (position, (expected, found)) in self.fields.iter().zip(&observed.fields).enumerate() {
            if expected.name != found.name {
                return Err(LayoutMismatch::FieldName {
                    block: self.name.clone(),
                    position,
                    expected: expected.name.clone(),
                    found: found.name.clone(),
                });
            }
            if expected.offset != found.offset {
                return Err(LayoutMismatch::Offset {
                    block: self.name.clone(),
                    field: expected.name.clone(),
                    expected: expected.offset,
                    found: found.offset,
                });
            }
        }

        if observed.size != self.size {
            return Err(LayoutMismatch::Size {
                block: self.name.clone(),
                expected: self.size,
                found: observed.size,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedField {
    pub name: String,
    pub offset: usize,
}

/// 从 rustc、naga 等编译器一侧得到的布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedLayout {
    pub block: String,
    pub size: usize,
    pub fields: Vec<ObservedField>,
}

impl ObservedLayout {
    pub fn new<'a>(block: &str, size: usize, fields: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        Self {
            block: block.to_string(),
            size,
            fields: fields
                .into_iter()
                .map(|(name, offset)| ObservedField {
                    name: name.to_string(),
                    offset,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttributeLayout {
    pub name: String,
    pub format: FieldType,
    pub location: u32,
    pub offset: usize,
}

/// 顶点属性紧密排列，和数据块的对齐规则无关
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub name: String,
    pub attributes: Vec<VertexAttributeLayout>,
    pub packed_size: usize,
    pub stride: usize,
}

impl VertexLayout {
    pub fn compute(desc: &VertexLayoutDesc) -> Self {
        let mut cursor = 0;
        let attributes = desc
            .attributes
            .iter()
            .enumerate()
            .map(|(location, attr)| {
                let offset = cursor;
                cursor += attr.format.packed_size();
                VertexAttributeLayout {
                    name: attr.name.clone(),
                    format: attr.format,
                    location: location as u32,
                    offset,
                }
            })
            .collect();

        Self {
            name: desc.name.clone(),
            attributes,
            packed_size: cursor,
            stride: desc.stride.unwrap_or(cursor),
        }
    }
}
