//! WGSL 声明生成
//!
//! 只生成 binding 常量和结构体，不生成 `var<uniform>` 等全局变量：
//! WGSL 中 buffer / texture / sampler 共用同一个 group 的编号空间，
//! 怎么映射到 bind group 由使用方决定。

use crate::emitter::{EmitContext, EmitTarget, ShaderEmitter};
use crate::naming::{to_pascal_case, to_shouty_snake_case};
use prism_layout_schema::{BindingClass, FieldType, LayoutRules, SlotKind};
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct WgslEmitter;

impl WgslEmitter {
    pub const fn new() -> Self {
        Self
    }

    fn wgsl_type(ty: FieldType) -> &'static str {
        match ty {
            FieldType::Float => "f32",
            FieldType::Int => "i32",
            FieldType::Uint => "u32",
            FieldType::Float2 => "vec2<f32>",
            FieldType::Float3 => "vec3<f32>",
            FieldType::Float4 => "vec4<f32>",
            FieldType::Int2 => "vec2<i32>",
            FieldType::Int4 => "vec4<i32>",
            FieldType::Uint2 => "vec2<u32>",
            FieldType::Uint4 => "vec4<u32>",
            FieldType::Float3x3 => "mat3x3<f32>",
            FieldType::Float4x4 => "mat4x4<f32>",
        }
    }
}

impl ShaderEmitter for WgslEmitter {
    fn target(&self) -> EmitTarget {
        EmitTarget::Wgsl
    }

    fn emit(&self, cx: &EmitContext) -> anyhow::Result<String> {
        let contract = cx.contract;
        let mut out = cx.banner("//");
        writeln!(out)?;

        for class in BindingClass::ALL {
            let prefix = to_shouty_snake_case(class.name());
            let mut any = false;
            for slot in contract.slots(class) {
                writeln!(out, "const {prefix}_{}: u32 = {}u;", to_shouty_snake_case(&slot.name), slot.index)?;
                any = true;
            }
            if any {
                writeln!(out)?;
            }
        }

        for slot in contract.slots(BindingClass::Buffer) {
            if let SlotKind::Scalar(ty) = slot.kind {
                writeln!(out, "alias {} = {};", to_pascal_case(&slot.name), Self::wgsl_type(ty))?;
                writeln!(out)?;
            }
        }

        for block in contract.blocks() {
            let layout = block.layout(LayoutRules::Wgsl);
            writeln!(out, "// {} bytes", layout.size)?;
            writeln!(out, "struct {} {{", block.name)?;
            for field in &layout.fields {
                writeln!(out, "    {}: {}, // offset {}", field.name, Self::wgsl_type(field.ty), field.offset)?;
            }
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        for vertex in contract.vertex_layouts() {
            let layout = vertex.layout();
            writeln!(out, "// stride {}", layout.stride)?;
            writeln!(out, "struct {} {{", vertex.name)?;
            for attr in &layout.attributes {
                writeln!(out, "    @location({}) {}: {},", attr.location, attr.name, Self::wgsl_type(attr.format))?;
            }
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_layout_schema::LayoutSchema;

    #[test]
    fn test_constants_and_structs() {
        let source = include_str!("../../../../shader/layout.toml");
        let contract = LayoutSchema::from_toml_str(source).unwrap().validate().unwrap();
        let cx = EmitContext {
            contract: &contract,
            schema_name: "layout.toml",
            schema_source: None,
        };
        let wgsl = WgslEmitter::new().emit(&cx).unwrap();

        assert!(wgsl.contains("const BUFFER_FRAME_UNIFORMS: u32 = 1u;"));
        assert!(wgsl.contains("const BUFFER_POINT_LIGHT_COUNT: u32 = 6u;"));
        assert!(wgsl.contains("const TEXTURE_BASE_TEXTURE: u32 = 1u;"));
        assert!(wgsl.contains("const SAMPLER_SHADOW_SAMPLER: u32 = 1u;"));
        assert!(wgsl.contains("alias PointLightCount = u32;"));
        assert!(wgsl.contains("struct InstanceData {\n    model: mat4x4<f32>, // offset 0\n    normal_matrix: mat3x3<f32>, // offset 64\n}"));
        assert!(wgsl.contains("    @location(2) texcoord: vec2<f32>,"));
    }
}
