//! MSL 头文件生成
//!
//! 头文件同时被 Metal shader 和 host 端 C / Objective-C 代码 include，
//! 所以数据块只使用 `<simd/simd.h>` 中两边都有的类型。

use crate::emitter::{EmitContext, EmitTarget, ShaderEmitter};
use crate::naming::{to_camel_case, to_pascal_case, to_shouty_snake_case};
use prism_layout_schema::{BindingClass, FieldType, LayoutRules, SlotKind};
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct MslEmitter;

impl MslEmitter {
    pub const fn new() -> Self {
        Self
    }

    /// host 与 shader 共用的类型名
    fn shared_type(ty: FieldType) -> &'static str {
        match ty {
            FieldType::Float => "float",
            FieldType::Int => "int",
            FieldType::Uint => "unsigned int",
            FieldType::Float2 => "simd_float2",
            FieldType::Float3 => "simd_float3",
            FieldType::Float4 => "simd_float4",
            FieldType::Int2 => "simd_int2",
            FieldType::Int4 => "simd_int4",
            FieldType::Uint2 => "simd_uint2",
            FieldType::Uint4 => "simd_uint4",
            FieldType::Float3x3 => "matrix_float3x3",
            FieldType::Float4x4 => "matrix_float4x4",
        }
    }

    /// 顶点输入只在 Metal 中出现，直接用 MSL 的类型
    fn vertex_type(ty: FieldType) -> &'static str {
        match ty {
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

    fn class_enum_name(class: BindingClass) -> &'static str {
        match class {
            BindingClass::Buffer => "BufferIndex",
            BindingClass::Texture => "TextureIndex",
            BindingClass::Sampler => "SamplerIndex",
        }
    }

    fn write_enum(out: &mut String, name: &str, cases: &[(String, usize)]) -> std::fmt::Result {
        // C 不允许空枚举
        if cases.is_empty() {
            return Ok(());
        }
        writeln!(out, "typedef enum {name} : unsigned int {{")?;
        for (i, (case, value)) in cases.iter().enumerate() {
            let comma = if i + 1 < cases.len() { "," } else { "" };
            writeln!(out, "    {case} = {value}{comma}")?;
        }
        writeln!(out, "}} {name};")?;
        writeln!(out)
    }
}

impl ShaderEmitter for MslEmitter {
    fn target(&self) -> EmitTarget {
        EmitTarget::Msl
    }

    fn emit(&self, cx: &EmitContext) -> anyhow::Result<String> {
        let contract = cx.contract;
        let guard = format!("{}_SHADER_TYPES_H", to_shouty_snake_case(contract.name()));
        let assert_macro = format!("{}_LAYOUT_ASSERT", to_shouty_snake_case(contract.name()));

        let mut out = cx.banner("//");
        writeln!(out, "#ifndef {guard}")?;
        writeln!(out, "#define {guard}")?;
        writeln!(out)?;
        writeln!(out, "#include <simd/simd.h>")?;
        writeln!(out)?;
        writeln!(out, "#ifdef __METAL_VERSION__")?;
        writeln!(out, "#define {assert_macro}(cond, msg) static_assert(cond, msg)")?;
        writeln!(out, "#else")?;
        writeln!(out, "#define {assert_macro}(cond, msg) _Static_assert(cond, msg)")?;
        writeln!(out, "#endif")?;
        writeln!(out)?;

        // binding 序号，每个类别一个枚举
        for class in BindingClass::ALL {
            let enum_name = Self::class_enum_name(class);
            let cases: Vec<_> = contract
                .slots(class)
                .map(|s| (format!("{enum_name}{}", to_pascal_case(&s.name)), s.index as usize))
                .collect();
            Self::write_enum(&mut out, enum_name, &cases)?;
        }

        // 标量槽位
        for slot in contract.slots(BindingClass::Buffer) {
            if let SlotKind::Scalar(ty) = slot.kind {
                writeln!(out, "typedef {} {};", Self::shared_type(ty), to_pascal_case(&slot.name))?;
                writeln!(out)?;
            }
        }

        // 数据块
        for block in contract.blocks() {
            let layout = block.layout(LayoutRules::Metal);
            writeln!(out, "// BufferIndex{}, {} bytes", to_pascal_case(&block.slot), layout.size)?;
            writeln!(out, "typedef struct {} {{", block.name)?;
            for field in &block.fields {
                writeln!(out, "    {} {};", Self::shared_type(field.ty), to_camel_case(&field.name))?;
            }
            writeln!(out, "}} {};", block.name)?;
            writeln!(out)?;

            writeln!(
                out,
                "{assert_macro}(sizeof({0}) == {1}, \"{0} size diverged from {2}\");",
                block.name, layout.size, cx.schema_name
            )?;
            for field in &layout.fields {
                writeln!(
                    out,
                    "{assert_macro}(__builtin_offsetof({0}, {1}) == {2}, \"{0}.{1} offset diverged from {3}\");",
                    block.name,
                    to_camel_case(&field.name),
                    field.offset,
                    cx.schema_name
                )?;
            }
            writeln!(out)?;
        }

        // 顶点布局：属性序号和 offset 两边都要，结构体只在 Metal 中有效
        for vertex in contract.vertex_layouts() {
            let layout = vertex.layout();
            let attribute_enum = format!("{}Attribute", vertex.name);
            let attributes: Vec<_> = layout
                .attributes
                .iter()
                .map(|a| (format!("{attribute_enum}{}", to_pascal_case(&a.name)), a.location as usize))
                .collect();
            Self::write_enum(&mut out, &attribute_enum, &attributes)?;

            let layout_enum = format!("{}Layout", vertex.name);
            let mut offsets: Vec<_> = layout
                .attributes
                .iter()
                .map(|a| (format!("{layout_enum}{}Offset", to_pascal_case(&a.name)), a.offset))
                .collect();
            offsets.push((format!("{layout_enum}Stride"), layout.stride));
            Self::write_enum(&mut out, &layout_enum, &offsets)?;

            writeln!(out, "#ifdef __METAL_VERSION__")?;
            writeln!(out, "typedef struct {} {{", vertex.name)?;
            for (attr, (case, _)) in layout.attributes.iter().zip(&attributes) {
                writeln!(
                    out,
                    "    {} {} [[attribute({case})]];",
                    Self::vertex_type(attr.format),
                    to_camel_case(&attr.name)
                )?;
            }
            writeln!(out, "}} {};", vertex.name)?;
            writeln!(out, "#endif")?;
            writeln!(out)?;
        }

        writeln!(out, "#endif /* {guard} */")?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_layout_schema::LayoutSchema;

    fn emit() -> String {
        let source = include_str!("../../../../shader/layout.toml");
        let contract = LayoutSchema::from_toml_str(source).unwrap().validate().unwrap();
        let cx = EmitContext {
            contract: &contract,
            schema_name: "layout.toml",
            schema_source: None,
        };
        MslEmitter::new().emit(&cx).unwrap()
    }

    #[test]
    fn test_binding_enums_follow_schema() {
        let header = emit();
        assert!(header.contains("typedef enum BufferIndex : unsigned int {"));
        assert!(header.contains("    BufferIndexFrameUniforms = 1,"));
        assert!(header.contains("    BufferIndexLightData = 2,"));
        assert!(header.contains("    BufferIndexPointLightCount = 6\n"));
        assert!(header.contains("    TextureIndexShadowAtlas = 0,"));
        assert!(header.contains("    SamplerIndexShadowSampler = 1\n"));
        assert!(header.contains("typedef unsigned int PointLightCount;"));
    }

    #[test]
    fn test_block_declarations_and_asserts() {
        let header = emit();
        assert!(header.contains("typedef struct FrameUniforms {\n    matrix_float4x4 view;"));
        assert!(header.contains("    simd_float2 viewportSize;\n} FrameUniforms;"));
        assert!(header.contains("PRISM_LAYOUT_ASSERT(sizeof(FrameUniforms) == 288,"));
        assert!(header.contains("PRISM_LAYOUT_ASSERT(__builtin_offsetof(FrameUniforms, viewportSize) == 272,"));
        assert!(header.contains("PRISM_LAYOUT_ASSERT(__builtin_offsetof(InstanceData, normalMatrix) == 64,"));
        assert!(header.contains("PRISM_LAYOUT_ASSERT(sizeof(PointLight) == 48,"));
    }

    #[test]
    fn test_vertex_layout() {
        let header = emit();
        assert!(header.contains("    MeshVertexAttributeNormal = 1,"));
        assert!(header.contains("    MeshVertexLayoutTexcoordOffset = 24,"));
        assert!(header.contains("    MeshVertexLayoutStride = 32\n"));
        assert!(header.contains("    float3 position [[attribute(MeshVertexAttributePosition)]];"));
    }

    #[test]
    fn test_banner_and_guard() {
        let header = emit();
        assert!(header.starts_with("// This file is generated from layout.toml by shader-gen."));
        assert!(header.contains("#ifndef PRISM_SHADER_TYPES_H"));
        assert!(header.trim_end().ends_with("#endif /* PRISM_SHADER_TYPES_H */"));
    }
}
