//! 数据块中使用的 host 类型
//!
//! 全部只由 32 位分量组成、按 4 字节对齐。shader 一侧需要的对齐由生成的结构体
//! 中的 `_padN` 字段保证，这里的类型本身不带任何对齐要求。

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Float2 {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Float3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Float4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Int2 {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Int4 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Uint2 {
    pub x: u32,
    pub y: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Uint4 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub w: u32,
}

/// 列主序，每列占 16 字节
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Float3x3 {
    pub col0: Float3,
    pub _pad0: u32,
    pub col1: Float3,
    pub _pad1: u32,
    pub col2: Float3,
    pub _pad2: u32,
}

/// 列主序
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Float4x4 {
    pub col0: Float4,
    pub col1: Float4,
    pub col2: Float4,
    pub col3: Float4,
}

impl Float3x3 {
    pub fn from_cols(col0: Float3, col1: Float3, col2: Float3) -> Self {
        Self {
            col0,
            col1,
            col2,
            ..Default::default()
        }
    }
}

impl Float4x4 {
    pub const IDENTITY: Self = Self {
        col0: Float4 {
            x: 1.0,
            y: 0.0,
            z: 0.0,
            w: 0.0,
        },
        col1: Float4 {
            x: 0.0,
            y: 1.0,
            z: 0.0,
            w: 0.0,
        },
        col2: Float4 {
            x: 0.0,
            y: 0.0,
            z: 1.0,
            w: 0.0,
        },
        col3: Float4 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        },
    };
}

impl From<glam::Vec2> for Float2 {
    fn from(value: glam::Vec2) -> Self {
        Float2 { x: value.x, y: value.y }
    }
}

impl From<glam::Vec3> for Float3 {
    fn from(value: glam::Vec3) -> Self {
        Float3 {
            x: value.x,
            y: value.y,
            z: value.z,
        }
    }
}

impl From<glam::Vec4> for Float4 {
    fn from(value: glam::Vec4) -> Self {
        Float4 {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}

impl From<glam::IVec2> for Int2 {
    fn from(value: glam::IVec2) -> Self {
        Int2 { x: value.x, y: value.y }
    }
}

impl From<glam::IVec4> for Int4 {
    fn from(value: glam::IVec4) -> Self {
        Int4 {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}

impl From<glam::UVec2> for Uint2 {
    fn from(value: glam::UVec2) -> Self {
        Uint2 { x: value.x, y: value.y }
    }
}

impl From<glam::UVec4> for Uint4 {
    fn from(value: glam::UVec4) -> Self {
        Uint4 {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}

impl From<glam::Mat3> for Float3x3 {
    fn from(value: glam::Mat3) -> Self {
        Float3x3::from_cols(value.x_axis.into(), value.y_axis.into(), value.z_axis.into())
    }
}

impl From<glam::Mat4> for Float4x4 {
    fn from(value: glam::Mat4) -> Self {
        Float4x4 {
            col0: Float4::from(value.x_axis),
            col1: Float4::from(value.y_axis),
            col2: Float4::from(value.z_axis),
            col3: Float4::from(value.w_axis),
        }
    }
}

impl From<[f32; 2]> for Float2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Float2 { x, y }
    }
}

impl From<[f32; 3]> for Float3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Float3 { x, y, z }
    }
}

impl From<[f32; 4]> for Float4 {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Float4 { x, y, z, w }
    }
}

impl From<[[f32; 4]; 4]> for Float4x4 {
    fn from(cols: [[f32; 4]; 4]) -> Self {
        Float4x4 {
            col0: cols[0].into(),
            col1: cols[1].into(),
            col2: cols[2].into(),
            col3: cols[3].into(),
        }
    }
}
