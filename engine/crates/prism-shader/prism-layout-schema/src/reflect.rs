//! 按照 [`BlockLayout`] 的 offset 读写原始字节
//!
//! 相当于用 shader 一侧的结构体定义去解释 host 写入的内存，用来验证往返一致。
//! GPU 可见内存统一按小端解释。

use crate::error::LayoutError;
use crate::field_type::FieldType;
use crate::layout::{BlockLayout, FieldLayout};

/// 一个字段的值，矩阵按列存储
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f32),
    Int(i32),
    Uint(u32),
    Float2([f32; 2]),
    Float3([f32; 3]),
    Float4([f32; 4]),
    Int2([i32; 2]),
    Int4([i32; 4]),
    Uint2([u32; 2]),
    Uint4([u32; 4]),
    Float3x3([[f32; 3]; 3]),
    Float4x4([[f32; 4]; 4]),
}

impl FieldValue {
    pub fn ty(&self) -> FieldType {
        match self {
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Uint(_) => FieldType::Uint,
            FieldValue::Float2(_) => FieldType::Float2,
            FieldValue::Float3(_) => FieldType::Float3,
            FieldValue::Float4(_) => FieldType::Float4,
            FieldValue::Int2(_) => FieldType::Int2,
            FieldValue::Int4(_) => FieldType::Int4,
            FieldValue::Uint2(_) => FieldType::Uint2,
            FieldValue::Uint4(_) => FieldType::Uint4,
            FieldValue::Float3x3(_) => FieldType::Float3x3,
            FieldValue::Float4x4(_) => FieldType::Float4x4,
        }
    }

    /// 所有分量的位模式，顺序与 [`FieldType::component_offsets`] 一致
    fn to_words(self) -> Vec<u32> {
        match self {
            FieldValue::Float(v) => vec![v.to_bits()],
            FieldValue::Int(v) => vec![v as u32],
            FieldValue::Uint(v) => vec![v],
            FieldValue::Float2(v) => v.map(f32::to_bits).to_vec(),
            FieldValue::Float3(v) => v.map(f32::to_bits).to_vec(),
            FieldValue::Float4(v) => v.map(f32::to_bits).to_vec(),
            FieldValue::Int2(v) => v.map(|x| x as u32).to_vec(),
            FieldValue::Int4(v) => v.map(|x| x as u32).to_vec(),
            FieldValue::Uint2(v) => v.to_vec(),
            FieldValue::Uint4(v) => v.to_vec(),
            FieldValue::Float3x3(m) => m.iter().flatten().map(|x| x.to_bits()).collect(),
            FieldValue::Float4x4(m) => m.iter().flatten().map(|x| x.to_bits()).collect(),
        }
    }

    fn from_words(ty: FieldType, words: &[u32]) -> Self {
        let f = |i: usize| f32::from_bits(words[i]);
        let i = |n: usize| words[n] as i32;
        match ty {
            FieldType::Float => FieldValue::Float(f(0)),
            FieldType::Int => FieldValue::Int(i(0)),
            FieldType::Uint => FieldValue::Uint(words[0]),
            FieldType::Float2 => FieldValue::Float2([f(0), f(1)]),
            FieldType::Float3 => FieldValue::Float3([f(0), f(1), f(2)]),
            FieldType::Float4 => FieldValue::Float4([f(0), f(1), f(2), f(3)]),
            FieldType::Int2 => FieldValue::Int2([i(0), i(1)]),
            FieldType::Int4 => FieldValue::Int4([i(0), i(1), i(2), i(3)]),
            FieldType::Uint2 => FieldValue::Uint2([words[0], words[1]]),
            FieldType::Uint4 => FieldValue::Uint4([words[0], words[1], words[2], words[3]]),
            FieldType::Float3x3 => FieldValue::Float3x3(std::array::from_fn(|c| std::array::from_fn(|r| f(c * 3 + r)))),
            FieldType::Float4x4 => FieldValue::Float4x4(std::array::from_fn(|c| std::array::from_fn(|r| f(c * 4 + r)))),
        }
    }
}

impl BlockLayout {
    fn field_or_err(&self, name: &str) -> Result<&FieldLayout, LayoutError> {
        self.field(name).ok_or_else(|| LayoutError::UnknownField {
            block: self.name.clone(),
            field: name.to_string(),
        })
    }

    fn check_len(&self, len: usize) -> Result<(), LayoutError> {
        if len < self.size {
            return Err(LayoutError::BufferTooSmall {
                block: self.name.clone(),
                expected: self.size,
                found: len,
            });
        }
        Ok(())
    }

    pub fn read_field(&self, bytes: &[u8], name: &str) -> Result<FieldValue, LayoutError> {
        self.check_len(bytes.len())?;
        let field = self.field_or_err(name)?;
        let words: Vec<u32> = field
            .ty
            .component_offsets()
            .into_iter()
            .map(|rel| {
                let at = field.offset + rel;
                u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
            })
            .collect();
        Ok(FieldValue::from_words(field.ty, &words))
    }

    /// 写入单个字段，padding 保持不变
    pub fn write_field(&self, bytes: &mut [u8], name: &str, value: FieldValue) -> Result<(), LayoutError> {
        self.check_len(bytes.len())?;
        let field = self.field_or_err(name)?;
        if value.ty() != field.ty {
            return Err(LayoutError::TypeMismatch {
                block: self.name.clone(),
                field: name.to_string(),
                expected: field.ty,
                found: value.ty(),
            });
        }
        for (rel, word) in field.ty.component_offsets().into_iter().zip(value.to_words()) {
            let at = field.offset + rel;
            bytes[at..at + 4].copy_from_slice(&word.to_le_bytes());
        }
        Ok(())
    }

    /// 读取数组中第 `element` 个元素的字段
    pub fn read_element_field(&self, bytes: &[u8], element: usize, name: &str) -> Result<FieldValue, LayoutError> {
        let start = element * self.stride();
        let slice = bytes.get(start..).ok_or_else(|| LayoutError::BufferTooSmall {
            block: self.name.clone(),
            expected: start + self.size,
            found: bytes.len(),
        })?;
        self.read_field(slice, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutSchema;
    use crate::field_type::LayoutRules;

    const IDENTITY: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    fn frame_layout() -> BlockLayout {
        let contract = LayoutSchema::from_toml_str(include_str!("../../../../shader/layout.toml"))
            .unwrap()
            .validate()
            .unwrap();
        contract.block_layout("FrameUniforms", LayoutRules::Metal).unwrap()
    }

    #[test]
    fn test_identity_and_viewport_round_trip() {
        let layout = frame_layout();
        let mut bytes = vec![0u8; layout.size];
        layout.write_field(&mut bytes, "view", FieldValue::Float4x4(IDENTITY)).unwrap();
        layout.write_field(&mut bytes, "viewport_size", FieldValue::Float2([1920.0, 1080.0])).unwrap();

        assert_eq!(layout.read_field(&bytes, "view").unwrap(), FieldValue::Float4x4(IDENTITY));
        assert_eq!(layout.read_field(&bytes, "viewport_size").unwrap(), FieldValue::Float2([1920.0, 1080.0]));
        // 未写入的字段保持为 0
        assert_eq!(layout.read_field(&bytes, "camera_position").unwrap(), FieldValue::Float4([0.0; 4]));
        // viewport_size 之后是 8 字节的尾部 padding
        assert_eq!(&bytes[272..276], &1920.0f32.to_le_bytes());
        assert!(bytes[280..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_float3x3_skips_column_padding() {
        let block = crate::BlockDesc {
            name: "N".to_string(),
            slot: "s".to_string(),
            fields: vec![crate::FieldDesc {
                name: "m".to_string(),
                ty: FieldType::Float3x3,
            }],
        };
        let layout = block.layout(LayoutRules::Metal);
        let mut bytes = vec![0xffu8; layout.size];
        let m = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        layout.write_field(&mut bytes, "m", FieldValue::Float3x3(m)).unwrap();
        assert_eq!(layout.read_field(&bytes, "m").unwrap(), FieldValue::Float3x3(m));
        // 每列最后 4 字节是 padding，不会被覆盖
        assert_eq!(&bytes[12..16], &[0xff; 4]);
    }

    #[test]
    fn test_type_mismatch_and_short_buffer() {
        let layout = frame_layout();
        let mut bytes = vec![0u8; layout.size];
        let err = layout.write_field(&mut bytes, "viewport_size", FieldValue::Float(1.0)).unwrap_err();
        assert!(matches!(err, LayoutError::TypeMismatch { .. }));

        let err = layout.read_field(&bytes[..100], "view").unwrap_err();
        assert!(matches!(err, LayoutError::BufferTooSmall { expected: 288, found: 100, .. }));

        let err = layout.read_field(&bytes, "viewport").unwrap_err();
        assert!(matches!(err, LayoutError::UnknownField { .. }));
    }
}
