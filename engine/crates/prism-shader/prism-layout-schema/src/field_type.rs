use serde::{Deserialize, Serialize};
use std::fmt;

/// 数据块中允许出现的字段类型
///
/// 全部由 32 位分量组成，不存在 half / double，避免两端对宽度的理解不一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Float,
    Int,
    Uint,
    Float2,
    Float3,
    Float4,
    Int2,
    Int4,
    Uint2,
    Uint4,
    Float3x3,
    Float4x4,
}

/// 对齐规则
///
/// 同一个数据块在不同 shader 语言下的布局可能不同，目前唯一的差异是 3 分量向量：
/// Metal 的 `simd_float3` 占 16 字节，WGSL 的 `vec3<f32>` 占 12 字节（对齐仍为 16）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutRules {
    /// Apple simd / Metal Shading Language
    Metal,
    /// WGSL 的 host-shareable 布局
    Wgsl,
}

impl FieldType {
    pub const ALL: [FieldType; 12] = [
        FieldType::Float,
        FieldType::Int,
        FieldType::Uint,
        FieldType::Float2,
        FieldType::Float3,
        FieldType::Float4,
        FieldType::Int2,
        FieldType::Int4,
        FieldType::Uint2,
        FieldType::Uint4,
        FieldType::Float3x3,
        FieldType::Float4x4,
    ];

    /// schema 中使用的名字
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Float => "float",
            FieldType::Int => "int",
            FieldType::Uint => "uint",
            FieldType::Float2 => "float2",
            FieldType::Float3 => "float3",
            FieldType::Float4 => "float4",
            FieldType::Int2 => "int2",
            FieldType::Int4 => "int4",
            FieldType::Uint2 => "uint2",
            FieldType::Uint4 => "uint4",
            FieldType::Float3x3 => "float3x3",
            FieldType::Float4x4 => "float4x4",
        }
    }

    pub fn is_matrix(self) -> bool {
        matches!(self, FieldType::Float3x3 | FieldType::Float4x4)
    }

    /// 列数，向量和标量为 1
    pub fn columns(self) -> usize {
        match self {
            FieldType::Float3x3 => 3,
            FieldType::Float4x4 => 4,
            _ => 1,
        }
    }

    /// 每一列的分量数
    pub fn rows(self) -> usize {
        match self {
            FieldType::Float | FieldType::Int | FieldType::Uint => 1,
            FieldType::Float2 | FieldType::Int2 | FieldType::Uint2 => 2,
            FieldType::Float3 | FieldType::Float3x3 => 3,
            FieldType::Float4 | FieldType::Int4 | FieldType::Uint4 | FieldType::Float4x4 => 4,
        }
    }

    /// 按某套规则计算 (size, align)
    pub fn size_align(self, rules: LayoutRules) -> (usize, usize) {
        match self {
            FieldType::Float | FieldType::Int | FieldType::Uint => (4, 4),
            FieldType::Float2 | FieldType::Int2 | FieldType::Uint2 => (8, 8),
            FieldType::Float3 => match rules {
                LayoutRules::Metal => (16, 16),
                LayoutRules::Wgsl => (12, 16),
            },
            FieldType::Float4 | FieldType::Int4 | FieldType::Uint4 => (16, 16),
            // 矩阵按列存储，每列按 4 分量向量对齐
            FieldType::Float3x3 => (48, 16),
            FieldType::Float4x4 => (64, 16),
        }
    }

    /// 矩阵相邻两列之间的字节数
    pub fn column_stride(self) -> usize {
        if self.is_matrix() { 16 } else { 0 }
    }

    /// 每个 32 位分量相对字段起点的偏移，按列主序排列
    pub fn component_offsets(self) -> Vec<usize> {
        let stride = self.column_stride();
        (0..self.columns())
            .flat_map(|col| (0..self.rows()).map(move |row| col * stride + row * 4))
            .collect()
    }

    /// 紧密排列时的大小，用于顶点属性
    pub fn packed_size(self) -> usize {
        self.columns() * self.rows() * 4
    }

    /// prism-shader-binding 中对应 host 类型的 `size_of`
    ///
    /// host 类型全部按 4 字节对齐，缺口由生成器插入显式 padding。
    pub fn host_size(self) -> usize {
        match self {
            FieldType::Float3x3 => 48,
            _ => self.packed_size(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl LayoutRules {
    pub fn name(self) -> &'static str {
        match self {
            LayoutRules::Metal => "metal",
            LayoutRules::Wgsl => "wgsl",
        }
    }
}

impl fmt::Display for LayoutRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float3_differs_between_rules() {
        assert_eq!(FieldType::Float3.size_align(LayoutRules::Metal), (16, 16));
        assert_eq!(FieldType::Float3.size_align(LayoutRules::Wgsl), (12, 16));
    }

    #[test]
    fn test_matrix_component_offsets_skip_column_padding() {
        let offsets = FieldType::Float3x3.component_offsets();
        assert_eq!(offsets, vec![0, 4, 8, 16, 20, 24, 32, 36, 40]);
        assert_eq!(FieldType::Float4x4.component_offsets().len(), 16);
    }

    #[test]
    fn test_host_size_never_exceeds_rule_size() {
        for ty in FieldType::ALL {
            for rules in [LayoutRules::Metal, LayoutRules::Wgsl] {
                assert!(ty.host_size() <= ty.size_align(rules).0, "{ty} under {rules}");
            }
        }
    }
}
