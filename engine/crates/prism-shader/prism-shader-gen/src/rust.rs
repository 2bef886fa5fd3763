//! Rust host 端绑定生成
//!
//! 生成的代码会被 prism-shader-binding 通过 `include!` 放在 crate 根下，
//! 所以其中的 `crate::` 路径都指向 prism-shader-binding。
//!
//! host 类型（`Float4`、`Float4x4` 等）全部按 4 字节对齐，字段之间和结尾的缺口
//! 由显式的 `_padN` 字段补齐，因此 `#[repr(C)]` 的布局完全由这里决定，
//! 不依赖 rustc 的对齐规则，也不会有隐式 padding（`bytemuck::Pod` 的要求）。

use crate::emitter::{EmitContext, EmitTarget, ShaderEmitter};
use crate::naming::to_pascal_case;
use itertools::Itertools;
use prism_layout_schema::{BindingClass, FieldType, SlotKind};
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct RustEmitter;

/// 生成结构体中的一个成员
enum Member {
    Field { name: String, ty: FieldType },
    Padding { name: String, words: usize },
}

impl RustEmitter {
    pub const fn new() -> Self {
        Self
    }

    fn host_type(ty: FieldType) -> &'static str {
        match ty {
            FieldType::Float => "f32",
            FieldType::Int => "i32",
            FieldType::Uint => "u32",
            FieldType::Float2 => "crate::Float2",
            FieldType::Float3 => "crate::Float3",
            FieldType::Float4 => "crate::Float4",
            FieldType::Int2 => "crate::Int2",
            FieldType::Int4 => "crate::Int4",
            FieldType::Uint2 => "crate::Uint2",
            FieldType::Uint4 => "crate::Uint4",
            FieldType::Float3x3 => "crate::Float3x3",
            FieldType::Float4x4 => "crate::Float4x4",
        }
    }

    fn field_type_path(ty: FieldType) -> String {
        format!("::prism_layout_schema::FieldType::{ty:?}")
    }

    fn class_enum_name(class: BindingClass) -> &'static str {
        match class {
            BindingClass::Buffer => "BufferIndex",
            BindingClass::Texture => "TextureIndex",
            BindingClass::Sampler => "SamplerIndex",
        }
    }

    /// 按 (name, ty, offset) 排列成员，缺口插入 padding，结尾补到 `size`
    fn members(fields: impl IntoIterator<Item = (String, FieldType, usize)>, size: usize) -> anyhow::Result<Vec<Member>> {
        let mut members = Vec::new();
        let mut cursor = 0;
        let mut pad_count = 0;
        let mut pad = |members: &mut Vec<Member>, bytes: usize| {
            members.push(Member::Padding {
                name: format!("_pad{pad_count}"),
                words: bytes / 4,
            });
            pad_count += 1;
        };

        for (name, ty, offset) in fields {
            anyhow::ensure!(offset >= cursor, "field `{name}` at {offset} overlaps the previous field ending at {cursor}");
            if offset > cursor {
                pad(&mut members, offset - cursor);
            }
            members.push(Member::Field { name, ty });
            cursor = offset + ty.host_size();
        }
        anyhow::ensure!(size >= cursor, "size {size} is smaller than the fields ({cursor} bytes)");
        if size > cursor {
            pad(&mut members, size - cursor);
        }
        Ok(members)
    }

    fn write_struct(out: &mut String, doc: &str, name: &str, members: &[Member]) -> std::fmt::Result {
        writeln!(out, "/// {doc}")?;
        writeln!(out, "#[repr(C)]")?;
        writeln!(
            out,
            "#[derive(Debug, Clone, Copy, PartialEq, ::bytemuck::Pod, ::bytemuck::Zeroable)]"
        )?;
        writeln!(out, "pub struct {name} {{")?;
        for member in members {
            match member {
                Member::Field { name, ty } => writeln!(out, "    pub {name}: {},", Self::host_type(*ty))?,
                Member::Padding { name, words } => writeln!(out, "    pub {name}: [u32; {words}],")?,
            }
        }
        writeln!(out, "}}")?;
        writeln!(out)
    }

    /// 除 padding 以外的字段都作为参数，参数接受任何可以转换为 host 类型的值（例如 glam 类型）
    fn write_constructor(out: &mut String, name: &str, members: &[Member]) -> std::fmt::Result {
        let params = members
            .iter()
            .filter_map(|m| match m {
                Member::Field { name, ty } => Some(format!("{name}: impl Into<{}>", Self::host_type(*ty))),
                Member::Padding { .. } => None,
            })
            .join(", ");

        writeln!(out, "impl {name} {{")?;
        writeln!(out, "    #[allow(clippy::too_many_arguments)]")?;
        writeln!(out, "    pub fn new({params}) -> Self {{")?;
        writeln!(out, "        Self {{")?;
        for member in members {
            match member {
                Member::Field { name, .. } => writeln!(out, "            {name}: {name}.into(),")?,
                Member::Padding { name, words } => writeln!(out, "            {name}: [0; {words}],")?,
            }
        }
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)
    }

    fn write_asserts(out: &mut String, name: &str, size: usize, offsets: &[(String, usize)]) -> std::fmt::Result {
        writeln!(out, "const _: () = {{")?;
        writeln!(out, "    assert!(::core::mem::size_of::<{name}>() == {size});")?;
        for (field, offset) in offsets {
            writeln!(out, "    assert!(::core::mem::offset_of!({name}, {field}) == {offset});")?;
        }
        writeln!(out, "}};")?;
        writeln!(out)
    }

    /// `$f!(A, B, C)`，用于对所有生成的类型做同样的检查
    fn write_list_macro(out: &mut String, macro_name: &str, what: &str, names: &str) -> std::fmt::Result {
        writeln!(out, "/// 对所有{what}执行 `$f`")?;
        writeln!(out, "#[allow(unused_macros)]")?;
        writeln!(out, "macro_rules! {macro_name} {{")?;
        writeln!(out, "    ($f:ident) => {{")?;
        writeln!(out, "        $f!({names});")?;
        writeln!(out, "    }};")?;
        writeln!(out, "}}")?;
        writeln!(out)
    }

    fn write_binding_enum(out: &mut String, class: BindingClass, cx: &EmitContext) -> std::fmt::Result {
        let enum_name = Self::class_enum_name(class);
        let slots: Vec<_> = cx.contract.slots(class).collect();

        writeln!(out, "/// {} 类别的 binding 序号", class.name())?;
        // 空枚举不能指定 repr
        if !slots.is_empty() {
            writeln!(out, "#[repr(u32)]")?;
        }
        writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
        writeln!(out, "pub enum {enum_name} {{")?;
        for slot in &slots {
            writeln!(out, "    {} = {},", to_pascal_case(&slot.name), slot.index)?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "impl {enum_name} {{")?;
        writeln!(
            out,
            "    pub const ALL: [{enum_name}; {}] = [{}];",
            slots.len(),
            slots.iter().map(|s| format!("{enum_name}::{}", to_pascal_case(&s.name))).join(", ")
        )?;
        writeln!(out)?;
        writeln!(out, "    #[inline]")?;
        writeln!(out, "    pub const fn index(self) -> u32 {{")?;
        writeln!(out, "        match self {{")?;
        for slot in &slots {
            writeln!(out, "            {enum_name}::{} => {},", to_pascal_case(&slot.name), slot.index)?;
        }
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    pub const fn name(self) -> &'static str {{")?;
        writeln!(out, "        match self {{")?;
        for slot in &slots {
            writeln!(out, "            {enum_name}::{} => \"{}\",", to_pascal_case(&slot.name), slot.name)?;
        }
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "impl crate::BindingIndex for {enum_name} {{")?;
        writeln!(
            out,
            "    const CLASS: ::prism_layout_schema::BindingClass = ::prism_layout_schema::BindingClass::{:?};",
            class
        )?;
        writeln!(out, "    const ALL: &'static [Self] = &{enum_name}::ALL;")?;
        writeln!(out)?;
        writeln!(out, "    fn index(self) -> u32 {{")?;
        writeln!(out, "        {enum_name}::index(self)")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    fn name(self) -> &'static str {{")?;
        writeln!(out, "        {enum_name}::name(self)")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)
    }
}

impl ShaderEmitter for RustEmitter {
    fn target(&self) -> EmitTarget {
        EmitTarget::Rust
    }

    fn emit(&self, cx: &EmitContext) -> anyhow::Result<String> {
        let contract = cx.contract;
        let rules = self.target().rules(contract);
        let mut out = cx.banner("//");
        writeln!(out)?;

        if let Some(source) = cx.schema_source {
            writeln!(out, "/// 生成时使用的 `{}` 原文", cx.schema_name)?;
            writeln!(out, "pub const SCHEMA_SOURCE: &str = {source:?};")?;
            writeln!(out)?;
        }
        writeln!(
            out,
            "/// host 端结构体使用的对齐规则\npub const HOST_RULES: ::prism_layout_schema::LayoutRules = ::prism_layout_schema::LayoutRules::{:?};",
            rules
        )?;
        writeln!(out)?;

        for class in BindingClass::ALL {
            Self::write_binding_enum(&mut out, class, cx)?;
        }

        for slot in contract.slots(BindingClass::Buffer) {
            if let SlotKind::Scalar(ty) = slot.kind {
                writeln!(out, "/// `{}` 槽位中的标量", slot.name)?;
                writeln!(out, "pub type {} = {};", to_pascal_case(&slot.name), Self::host_type(ty))?;
                writeln!(out)?;
            }
        }

        for block in contract.blocks() {
            let layout = block.layout(rules);
            let members = Self::members(
                layout.fields.iter().map(|f| (f.name.clone(), f.ty, f.offset)),
                layout.size,
            )?;
            let offsets: Vec<_> = layout.fields.iter().map(|f| (f.name.clone(), f.offset)).collect();
            let slot = to_pascal_case(&block.slot);

            Self::write_struct(
                &mut out,
                &format!("`BufferIndex::{slot}` 中的数据块，{} 字节", layout.size),
                &block.name,
                &members,
            )?;
            Self::write_constructor(&mut out, &block.name, &members)?;
            Self::write_asserts(&mut out, &block.name, layout.size, &offsets)?;

            writeln!(out, "impl crate::ShaderBlock for {} {{", block.name)?;
            writeln!(out, "    const NAME: &'static str = \"{}\";", block.name)?;
            writeln!(out, "    const FIELDS: &'static [(&'static str, usize)] = &[")?;
            for field in &layout.fields {
                writeln!(
                    out,
                    "        (\"{0}\", ::core::mem::offset_of!({1}, {0})),",
                    field.name, block.name
                )?;
            }
            writeln!(out, "    ];")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
            writeln!(out, "impl crate::BoundBlock for {} {{", block.name)?;
            writeln!(out, "    const SLOT: BufferIndex = BufferIndex::{slot};")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        for vertex in contract.vertex_layouts() {
            let layout = vertex.layout();
            let members = Self::members(
                layout.attributes.iter().map(|a| (a.name.clone(), a.format, a.offset)),
                layout.stride,
            )?;
            let offsets: Vec<_> = layout.attributes.iter().map(|a| (a.name.clone(), a.offset)).collect();

            Self::write_struct(&mut out, &format!("顶点布局，stride {}", layout.stride), &vertex.name, &members)?;
            Self::write_constructor(&mut out, &vertex.name, &members)?;
            Self::write_asserts(&mut out, &vertex.name, layout.stride, &offsets)?;

            writeln!(out, "impl crate::VertexInput for {} {{", vertex.name)?;
            writeln!(out, "    const NAME: &'static str = \"{}\";", vertex.name)?;
            writeln!(out, "    const SLOT: BufferIndex = BufferIndex::{};", to_pascal_case(&vertex.slot))?;
            writeln!(out, "    const STRIDE: usize = {};", layout.stride)?;
            writeln!(out, "    const ATTRIBUTES: &'static [crate::VertexAttribute] = &[")?;
            for attr in &layout.attributes {
                writeln!(
                    out,
                    "        crate::VertexAttribute {{ name: \"{}\", location: {}, format: {}, offset: {} }},",
                    attr.name,
                    attr.location,
                    Self::field_type_path(attr.format),
                    attr.offset
                )?;
            }
            writeln!(out, "    ];")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        let block_names = contract.blocks().iter().map(|b| b.name.as_str()).join(", ");
        Self::write_list_macro(&mut out, "for_each_shader_block", "数据块", &block_names)?;
        let vertex_names = contract.vertex_layouts().iter().map(|v| v.name.as_str()).join(", ");
        Self::write_list_macro(&mut out, "for_each_vertex_input", "顶点布局", &vertex_names)?;

        Ok(out)
    }
}
