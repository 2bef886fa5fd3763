//! `layout.toml` 的原始结构，以及到 [`LayoutContract`] 的校验

use crate::contract::{
    BindingClass, BindingSlot, BlockDesc, FieldDesc, LayoutContract, SlotKind, VertexAttributeDesc, VertexLayoutDesc,
};
use crate::error::LayoutError;
use crate::field_type::{FieldType, LayoutRules};
use crate::naming::{is_reserved, to_camel_case, to_pascal_case, to_shouty_snake_case};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ContractSection {
    pub name: String,
    #[serde(default = "default_host_rules")]
    pub host_rules: LayoutRules,
}

fn default_host_rules() -> LayoutRules {
    LayoutRules::Metal
}

/// binding 条目：只写名字时，序号等于其在列表中的位置
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlotEntry {
    Name(String),
    Detailed {
        name: String,
        index: Option<u32>,
        scalar: Option<FieldType>,
        #[serde(default)]
        vertex: bool,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BindingsSection {
    #[serde(default)]
    pub buffers: Vec<SlotEntry>,
    #[serde(default)]
    pub textures: Vec<SlotEntry>,
    #[serde(default)]
    pub samplers: Vec<SlotEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockEntry {
    pub name: String,
    pub slot: String,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VertexAttributeEntry {
    pub name: String,
    pub format: FieldType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VertexLayoutEntry {
    pub name: String,
    pub slot: String,
    pub stride: Option<usize>,
    pub attributes: Vec<VertexAttributeEntry>,
}

/// 从 TOML 反序列化得到、尚未校验的 schema
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSchema {
    pub contract: ContractSection,
    #[serde(default)]
    pub bindings: BindingsSection,
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
    #[serde(default)]
    pub vertex_layouts: Vec<VertexLayoutEntry>,
}

// 加载
impl LayoutSchema {
    pub fn from_toml_str(source: &str) -> Result<Self, LayoutError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

/// 名字本身和转换后的写法都要能在三种目标语言中直接使用
///
/// `__` 开头在 WGSL 和 C++ 中保留，`_pad` 开头留给生成的 padding 字段。
fn check_identifier(name: &str) -> Result<(), LayoutError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("__")
        && !name.starts_with("_pad");
    if !valid {
        return Err(LayoutError::InvalidIdentifier(name.to_string()));
    }

    let pascal = to_pascal_case(name);
    if pascal.is_empty() || [name, pascal.as_str(), to_camel_case(name).as_str()].into_iter().any(is_reserved) {
        return Err(LayoutError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// 记录生成代码中的名字，两个 schema 名转换后相同时报错
fn insert_rendered(rendered: &mut HashSet<String>, kind: &'static str, name: String) -> Result<(), LayoutError> {
    if rendered.insert(name.clone()) {
        Ok(())
    } else {
        Err(LayoutError::DuplicateName { kind, name })
    }
}

/// 0 到最大序号之间没有被占用的区间
fn unused_ranges(slots: &[BindingSlot]) -> Vec<Range<u32>> {
    let mut used: Vec<u32> = slots.iter().map(|s| s.index).collect();
    used.sort_unstable();

    let mut gaps = Vec::new();
    let mut next = 0;
    for index in used {
        if index > next {
            gaps.push(next..index);
        }
        next = index.saturating_add(1);
    }
    gaps
}

// 校验
impl LayoutSchema {
    /// 校验 schema 并生成契约
    ///
    /// 同一类别内序号重复、引用不存在的槽位、空数据块等都会直接报错；
    /// 序号不连续只打印警告。
    pub fn validate(&self) -> Result<LayoutContract, LayoutError> {
        check_identifier(&self.contract.name)?;

        let mut slots = Vec::new();
        for (class, entries) in [
            (BindingClass::Buffer, &self.bindings.buffers),
            (BindingClass::Texture, &self.bindings.textures),
            (BindingClass::Sampler, &self.bindings.samplers),
        ] {
            slots.extend(Self::validate_slots(class, entries)?);
        }
        slots.sort_by_key(|s| (s.class, s.index));

        let buffers: HashMap<&str, &BindingSlot> = slots
            .iter()
            .filter(|s| s.class == BindingClass::Buffer)
            .map(|s| (s.name.as_str(), s))
            .collect();

        // 生成代码里已经占用的类型名：序号枚举、host 向量类型、标量槽位的别名
        let mut type_names: HashSet<String> = BindingClass::ALL
            .iter()
            .map(|class| format!("{}Index", to_pascal_case(class.name())))
            .chain(FieldType::ALL.iter().map(|ty| to_pascal_case(ty.name())))
            .chain(
                slots
                    .iter()
                    .filter(|s| matches!(s.kind, SlotKind::Scalar(_)))
                    .map(|s| to_pascal_case(&s.name)),
            )
            .collect();

        let blocks = self
            .blocks
            .iter()
            .map(|entry| {
                insert_rendered(&mut type_names, "type", entry.name.clone())?;
                Self::validate_block(entry, &buffers)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let vertex_layouts = self
            .vertex_layouts
            .iter()
            .map(|entry| {
                insert_rendered(&mut type_names, "type", entry.name.clone())?;
                // MSL 中额外生成的属性序号和 offset 枚举
                insert_rendered(&mut type_names, "type", format!("{}Attribute", entry.name))?;
                insert_rendered(&mut type_names, "type", format!("{}Layout", entry.name))?;
                Self::validate_vertex_layout(entry, &buffers)
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "contract `{}`: {} slots, {} blocks, {} vertex layouts",
            self.contract.name,
            slots.len(),
            blocks.len(),
            vertex_layouts.len()
        );

        Ok(LayoutContract {
            name: self.contract.name.clone(),
            host_rules: self.contract.host_rules,
            slots,
            blocks,
            vertex_layouts,
        })
    }

    fn validate_slots(class: BindingClass, entries: &[SlotEntry]) -> Result<Vec<BindingSlot>, LayoutError> {
        let mut by_index: HashMap<u32, &str> = HashMap::new();
        let mut names = HashSet::new();
        // Rust / MSL 的枚举成员和 WGSL 的常量
        let mut pascal_names = HashSet::new();
        let mut shouty_names = HashSet::new();
        let mut slots = Vec::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let (name, index, kind) = match entry {
                SlotEntry::Name(name) => (name, position as u32, Self::default_kind(class)),
                SlotEntry::Detailed {
                    name,
                    index,
                    scalar,
                    vertex,
                } => {
                    let kind = match (class, *scalar, *vertex) {
                        (BindingClass::Buffer, Some(_), true) => {
                            return Err(LayoutError::SlotKindMismatch {
                                owner: name.clone(),
                                slot: name.clone(),
                                reason: "a slot is either scalar or vertex",
                            });
                        }
                        (BindingClass::Buffer, Some(ty), false) => SlotKind::Scalar(ty),
                        (BindingClass::Buffer, None, true) => SlotKind::Vertex,
                        (BindingClass::Buffer, None, false) => SlotKind::Block,
                        (_, None, false) => SlotKind::Resource,
                        (_, _, _) => {
                            return Err(LayoutError::SlotKindMismatch {
                                owner: name.clone(),
                                slot: name.clone(),
                                reason: "only buffer slots carry scalar or vertex data",
                            });
                        }
                    };
                    (name, index.unwrap_or(position as u32), kind)
                }
            };

            check_identifier(name)?;
            if !names.insert(name.as_str()) {
                return Err(LayoutError::DuplicateName {
                    kind: class.name(),
                    name: name.clone(),
                });
            }
            insert_rendered(&mut pascal_names, class.name(), to_pascal_case(name))?;
            insert_rendered(&mut shouty_names, class.name(), to_shouty_snake_case(name))?;
            if let Some(first) = by_index.insert(index, name) {
                return Err(LayoutError::DuplicateIndex {
                    class,
                    index,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }

            slots.push(BindingSlot {
                name: name.clone(),
                class,
                index,
                kind,
            });
        }

        // 约定从 0 开始连续编号，中间有空洞多半是删过槽位
        for gap in unused_ranges(&slots) {
            if gap.len() == 1 {
                log::warn!("{class} index {} is unused, numbering is not contiguous", gap.start);
            } else {
                log::warn!("{class} indices {}..{} are unused, numbering is not contiguous", gap.start, gap.end);
            }
        }

        Ok(slots)
    }

    fn default_kind(class: BindingClass) -> SlotKind {
        match class {
            BindingClass::Buffer => SlotKind::Block,
            BindingClass::Texture | BindingClass::Sampler => SlotKind::Resource,
        }
    }

    fn buffer_slot<'a>(
        owner: &str,
        slot: &str,
        buffers: &HashMap<&str, &'a BindingSlot>,
    ) -> Result<&'a BindingSlot, LayoutError> {
        buffers.get(slot).copied().ok_or_else(|| LayoutError::UnknownSlot {
            owner: owner.to_string(),
            slot: slot.to_string(),
        })
    }

    fn validate_block(entry: &BlockEntry, buffers: &HashMap<&str, &BindingSlot>) -> Result<BlockDesc, LayoutError> {
        check_identifier(&entry.name)?;
        let slot = Self::buffer_slot(&entry.name, &entry.slot, buffers)?;
        if slot.kind != SlotKind::Block {
            return Err(LayoutError::SlotKindMismatch {
                owner: entry.name.clone(),
                slot: entry.slot.clone(),
                reason: "blocks can only live in block slots",
            });
        }
        if entry.fields.is_empty() {
            return Err(LayoutError::EmptyBlock(entry.name.clone()));
        }

        let mut names = HashSet::new();
        let mut camel_names = HashSet::new();
        let fields = entry
            .fields
            .iter()
            .map(|f| {
                check_identifier(&f.name)?;
                if !names.insert(f.name.as_str()) {
                    return Err(LayoutError::DuplicateName {
                        kind: "field",
                        name: format!("{}.{}", entry.name, f.name),
                    });
                }
                // MSL 中的字段名
                insert_rendered(&mut camel_names, "field", format!("{}.{}", entry.name, to_camel_case(&f.name)))?;
                Ok(FieldDesc {
                    name: f.name.clone(),
                    ty: f.ty,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        Ok(BlockDesc {
            name: entry.name.clone(),
            slot: entry.slot.clone(),
            fields,
        })
    }

    fn validate_vertex_layout(
        entry: &VertexLayoutEntry,
        buffers: &HashMap<&str, &BindingSlot>,
    ) -> Result<VertexLayoutDesc, LayoutError> {
        check_identifier(&entry.name)?;
        let invalid = |reason: String| LayoutError::InvalidVertexLayout {
            layout: entry.name.clone(),
            reason,
        };

        let slot = Self::buffer_slot(&entry.name, &entry.slot, buffers)?;
        if slot.kind != SlotKind::Vertex {
            return Err(LayoutError::SlotKindMismatch {
                owner: entry.name.clone(),
                slot: entry.slot.clone(),
                reason: "vertex layouts need a slot declared with `vertex = true`",
            });
        }
        if entry.attributes.is_empty() {
            return Err(invalid("no attributes".to_string()));
        }

        let mut names = HashSet::new();
        let mut camel_names = HashSet::new();
        let mut pascal_names = HashSet::new();
        let mut packed = 0;
        let mut attributes = Vec::with_capacity(entry.attributes.len());
        for attr in &entry.attributes {
            check_identifier(&attr.name)?;
            if !names.insert(attr.name.as_str()) {
                return Err(invalid(format!("duplicate attribute `{}`", attr.name)));
            }
            // MSL 的字段名和属性枚举成员
            insert_rendered(&mut camel_names, "attribute", format!("{}.{}", entry.name, to_camel_case(&attr.name)))?;
            insert_rendered(&mut pascal_names, "attribute", format!("{}Attribute{}", entry.name, to_pascal_case(&attr.name)))?;
            if attr.format.is_matrix() {
                return Err(invalid(format!("attribute `{}` cannot be a matrix", attr.name)));
            }
            packed += attr.format.packed_size();
            attributes.push(VertexAttributeDesc {
                name: attr.name.clone(),
                format: attr.format,
            });
        }

        if let Some(stride) = entry.stride {
            if stride < packed {
                return Err(invalid(format!("stride {stride} is smaller than the packed size {packed}")));
            }
            if stride % 4 != 0 {
                return Err(invalid(format!("stride {stride} is not a multiple of 4")));
            }
        }

        Ok(VertexLayoutDesc {
            name: entry.name.clone(),
            slot: entry.slot.clone(),
            stride: entry.stride,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutMismatch;

    const PRISM_SCHEMA: &str = include_str!("../../../../shader/layout.toml");

    fn validate(source: &str) -> Result<LayoutContract, LayoutError> {
        LayoutSchema::from_toml_str(source)?.validate()
    }

    #[test]
    fn test_prism_schema_is_valid() {
        let contract = validate(PRISM_SCHEMA).unwrap();
        assert_eq!(contract.name(), "Prism");
        assert_eq!(contract.host_rules(), LayoutRules::Metal);

        let buffers: Vec<_> = contract.slots(BindingClass::Buffer).map(|s| (s.name.as_str(), s.index)).collect();
        assert_eq!(
            buffers,
            vec![
                ("vertex_buffer", 0),
                ("frame_uniforms", 1),
                ("light_data", 2),
                ("instance_data", 3),
                ("material_data", 4),
                ("pipeline_uniforms", 5),
                ("point_light_count", 6),
            ]
        );
        assert_eq!(contract.slot(BindingClass::Texture, "shadow_atlas").map(|s| s.index), Some(0));
        assert_eq!(contract.slot(BindingClass::Sampler, "shadow_sampler").map(|s| s.index), Some(1));
        assert_eq!(
            contract.slot(BindingClass::Buffer, "point_light_count").map(|s| s.kind),
            Some(SlotKind::Scalar(FieldType::Uint))
        );
        assert_eq!(contract.blocks_in_slot("pipeline_uniforms").count(), 5);
    }

    #[test]
    fn test_prism_schema_is_portable() {
        let contract = validate(PRISM_SCHEMA).unwrap();
        contract.check_portability(&[LayoutRules::Metal, LayoutRules::Wgsl]).unwrap();

        let sizes: Vec<_> = contract.host_layouts().iter().map(|l| (l.name.clone(), l.size)).collect();
        assert!(sizes.contains(&("FrameUniforms".to_string(), 288)));
        assert!(sizes.contains(&("InstanceData".to_string(), 112)));
        assert!(sizes.contains(&("PointLight".to_string(), 48)));
        assert!(sizes.contains(&("MaterialData".to_string(), 48)));
        assert!(sizes.contains(&("ShadowUniforms".to_string(), 160)));
        assert!(sizes.contains(&("MaskUniforms".to_string(), 128)));
        assert!(sizes.contains(&("CircleUniforms".to_string(), 48)));
    }

    #[test]
    fn test_float3_followed_by_scalar_is_not_portable() {
        let circle = validate(PRISM_SCHEMA).unwrap().block_layout("CircleUniforms", LayoutRules::Wgsl).unwrap();
        assert_eq!(circle.field("color").map(|f| f.offset), Some(16));
        assert_eq!(circle.field("center").map(|f| f.offset), Some(32));

        let reordered = PRISM_SCHEMA.replacen(
            "    { name = \"thickness\", type = \"float\" },\n    { name = \"color\", type = \"float3\" },",
            "    { name = \"color\", type = \"float3\" },\n    { name = \"thickness\", type = \"float\" },",
            1,
        );
        assert_ne!(reordered, PRISM_SCHEMA);
        let err = validate(&reordered)
            .unwrap()
            .check_portability(&[LayoutRules::Metal, LayoutRules::Wgsl])
            .unwrap_err();
        assert_eq!(
            err.as_mismatch(),
            Some(&LayoutMismatch::Offset {
                block: "CircleUniforms".to_string(),
                field: "thickness".to_string(),
                expected: 32,
                found: 28,
            })
        );
    }

    #[test]
    fn test_explicit_index_collision() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["light_data", { name = "light_buffer", index = 0 }]
            "#,
        )
        .unwrap_err();
        match err {
            LayoutError::DuplicateIndex {
                class, index, first, second,
            } => {
                assert_eq!(class, BindingClass::Buffer);
                assert_eq!(index, 0);
                assert_eq!(first, "light_data");
                assert_eq!(second, "light_buffer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classes_are_numbered_independently() {
        let contract = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["frame_uniforms"]
            textures = ["shadow_atlas"]
            samplers = ["sampler"]
            "#,
        )
        .unwrap();
        assert!(contract.all_slots().iter().all(|s| s.index == 0));
    }

    #[test]
    fn test_gap_is_allowed() {
        let contract = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            textures = ["base_texture", { name = "shadow_atlas", index = 5 }]
            "#,
        )
        .unwrap();
        assert_eq!(contract.slot(BindingClass::Texture, "shadow_atlas").map(|s| s.index), Some(5));
    }

    #[test]
    fn test_unused_ranges_cover_every_gap() {
        let slot = |index| BindingSlot {
            name: format!("t{index}"),
            class: BindingClass::Texture,
            index,
            kind: SlotKind::Resource,
        };
        assert_eq!(unused_ranges(&[slot(0), slot(5)]), vec![1..5]);
        assert_eq!(unused_ranges(&[slot(3), slot(1)]), vec![0..1, 2..3]);
        assert!(unused_ranges(&[slot(0), slot(1)]).is_empty());
        assert!(unused_ranges(&[]).is_empty());
    }

    #[test]
    fn test_block_needs_known_slot() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["frame_uniforms"]
            [[blocks]]
            name = "FrameUniforms"
            slot = "frame_data"
            fields = [{ name = "view", type = "float4x4" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSlot { .. }));
    }

    #[test]
    fn test_block_cannot_use_scalar_slot() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = [{ name = "count", scalar = "uint" }]
            [[blocks]]
            name = "Counts"
            slot = "count"
            fields = [{ name = "n", type = "uint" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::SlotKindMismatch { .. }));
    }

    #[test]
    fn test_duplicate_field_and_empty_block() {
        let dup = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["b"]
            [[blocks]]
            name = "B"
            slot = "b"
            fields = [{ name = "x", type = "float" }, { name = "x", type = "float4" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(dup, LayoutError::DuplicateName { kind: "field", .. }));

        let empty = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["b"]
            [[blocks]]
            name = "B"
            slot = "b"
            fields = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(empty, LayoutError::EmptyBlock(_)));
    }

    #[test]
    fn test_invalid_identifier() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            samplers = ["shadow sampler"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_vertex_stride_too_small() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = [{ name = "vertex_buffer", vertex = true }]
            [[vertex_layouts]]
            name = "V"
            slot = "vertex_buffer"
            stride = 16
            attributes = [{ name = "position", format = "float3" }, { name = "normal", format = "float3" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidVertexLayout { .. }));
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let err = LayoutSchema::from_toml_str(
            r#"
            [contract]
            name = "T"
            [[blocks]]
            name = "B"
            slot = "b"
            fields = [{ name = "x", type = "double" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::Parse(_)));
    }

    #[test]
    fn test_slot_names_colliding_after_renaming() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["light_data", "LightData"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateName { kind: "buffer", ref name } if name == "LightData"));

        // WGSL 常量是 TEXTURE_A_1 和 TEXTURE_A1，但枚举成员都是 A1
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            textures = ["a_1", "a1"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateName { kind: "texture", .. }));

        // 不同类别之间互不影响
        validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["shadow_atlas"]
            textures = ["ShadowAtlas"]
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_field_names_colliding_after_renaming() {
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["b"]
            [[blocks]]
            name = "B"
            slot = "b"
            fields = [{ name = "base_color", type = "float4" }, { name = "baseColor", type = "float4" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateName { kind: "field", ref name } if name == "B.baseColor"));

        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = [{ name = "vertex_buffer", vertex = true }]
            [[vertex_layouts]]
            name = "V"
            slot = "vertex_buffer"
            attributes = [{ name = "tex_coord", format = "float2" }, { name = "texCoord", format = "float2" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateName { kind: "attribute", .. }));
    }

    #[test]
    fn test_reserved_words_are_rejected() {
        let block_with_field = |field: &str| {
            format!(
                r#"
                [contract]
                name = "T"
                [bindings]
                buffers = ["b"]
                [[blocks]]
                name = "B"
                slot = "b"
                fields = [{{ name = "{field}", type = "float" }}]
                "#
            )
        };
        for field in ["type", "loop", "struct", "constant", "self"] {
            let err = validate(&block_with_field(field)).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidIdentifier(ref name) if name == field), "{field}: {err}");
        }
        validate(&block_with_field("radius")).unwrap();

        // 枚举成员 `BufferIndex::Self`
        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["Self"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidIdentifier(_)));

        let err = validate(
            r#"
            [contract]
            name = "T"
            [bindings]
            buffers = ["b"]
            [[blocks]]
            name = "while"
            slot = "b"
            fields = [{ name = "x", type = "float" }]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_padding_prefix_is_rejected() {
        for field in ["_pad0", "_padding", "__x", "_"] {
            let err = validate(&format!(
                r#"
                [contract]
                name = "T"
                [bindings]
                buffers = ["b"]
                [[blocks]]
                name = "B"
                slot = "b"
                fields = [{{ name = "x", type = "float" }}, {{ name = "{field}", type = "float2" }}]
                "#
            ))
            .unwrap_err();
            assert!(matches!(err, LayoutError::InvalidIdentifier(ref name) if name == field), "{field}: {err}");
        }
    }

    #[test]
    fn test_generated_type_names_are_taken() {
        for block in ["Float4", "BufferIndex", "PointLightCount"] {
            let err = validate(&format!(
                r#"
                [contract]
                name = "T"
                [bindings]
                buffers = ["b", {{ name = "point_light_count", scalar = "uint" }}]
                [[blocks]]
                name = "{block}"
                slot = "b"
                fields = [{{ name = "x", type = "float" }}]
                "#
            ))
            .unwrap_err();
            assert!(matches!(err, LayoutError::DuplicateName { kind: "type", ref name } if name == block), "{block}: {err}");
        }
    }
}
