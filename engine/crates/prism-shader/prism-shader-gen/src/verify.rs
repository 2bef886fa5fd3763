//! 用 naga 解析生成的 WGSL，再与 schema 计算出的布局比较
//!
//! naga 计算 offset 的方式与 WebGPU 实现一致，比对通过说明 WGSL 一侧的理解与 schema 相同。

use prism_layout_schema::{LayoutContract, LayoutError, LayoutMismatch, LayoutRules, ObservedLayout};
use std::collections::HashMap;

pub const WGSL_SIDE: &str = "wgsl (naga)";

/// 解析 WGSL，取出所有具名结构体的布局
pub fn wgsl_struct_layouts(source: &str) -> Result<HashMap<String, ObservedLayout>, LayoutError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| LayoutError::ShaderParse {
        target: "wgsl",
        message: e.emit_to_string(source),
    })?;

    let layouts = module
        .types
        .iter()
        .filter_map(|(_, ty)| {
            let name = ty.name.as_ref()?;
            match &ty.inner {
                naga::TypeInner::Struct { members, span } => {
                    let fields = members
                        .iter()
                        .map(|m| (m.name.as_deref().unwrap_or_default(), m.offset as usize));
                    Some((name.clone(), ObservedLayout::new(name, *span as usize, fields)))
                }
                _ => None,
            }
        })
        .collect();
    Ok(layouts)
}

/// 检查 WGSL 中每个数据块的 size 和 offset 都与 schema 一致
pub fn verify_wgsl(contract: &LayoutContract, source: &str) -> Result<(), LayoutError> {
    let observed = wgsl_struct_layouts(source)?;
    for block in contract.blocks() {
        let found = observed.get(&block.name).ok_or_else(|| {
            LayoutError::mismatch(
                WGSL_SIDE,
                LayoutMismatch::MissingBlock {
                    block: block.name.clone(),
                },
            )
        })?;
        block
            .layout(LayoutRules::Wgsl)
            .compare(found)
            .map_err(|m| LayoutError::mismatch(WGSL_SIDE, m))?;
        log::debug!("{} matches naga layout ({} bytes)", block.name, found.size);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{EmitContext, ShaderEmitter};
    use crate::wgsl::WgslEmitter;
    use prism_layout_schema::LayoutSchema;

    fn contract() -> LayoutContract {
        LayoutSchema::from_toml_str(include_str!("../../../../shader/layout.toml"))
            .unwrap()
            .validate()
            .unwrap()
    }

    fn emit(contract: &LayoutContract) -> String {
        let cx = EmitContext {
            contract,
            schema_name: "layout.toml",
            schema_source: None,
        };
        WgslEmitter::new().emit(&cx).unwrap()
    }

    #[test]
    fn test_generated_wgsl_matches_schema() {
        let contract = contract();
        let wgsl = emit(&contract);
        verify_wgsl(&contract, &wgsl).unwrap();

        let layouts = wgsl_struct_layouts(&wgsl).unwrap();
        assert_eq!(layouts["FrameUniforms"].size, 288);
        assert_eq!(layouts["PointLight"].size, 48);
    }

    #[test]
    fn test_reordered_field_is_reported() {
        let contract = contract();
        let wgsl = emit(&contract).replace(
            "    position: vec4<f32>, // offset 0\n    color: vec4<f32>, // offset 16\n",
            "    color: vec4<f32>, // offset 0\n    position: vec4<f32>, // offset 16\n",
        );
        let err = verify_wgsl(&contract, &wgsl).unwrap_err();
        assert!(matches!(
            err.as_mismatch(),
            Some(LayoutMismatch::FieldName { block, position: 0, .. }) if block == "PointLight"
        ));
        assert!(err.to_string().contains("wgsl (naga)"));
    }

    #[test]
    fn test_changed_type_is_reported() {
        let contract = contract();
        let wgsl = emit(&contract).replace(
            "    camera_position: vec4<f32>, // offset 256\n",
            "    camera_position: f32, // offset 256\n",
        );
        let err = verify_wgsl(&contract, &wgsl).unwrap_err();
        assert_eq!(
            err.as_mismatch(),
            Some(&LayoutMismatch::Offset {
                block: "FrameUniforms".to_string(),
                field: "viewport_size".to_string(),
                expected: 272,
                found: 264,
            })
        );
    }

    #[test]
    fn test_invalid_wgsl_is_a_parse_error() {
        let err = verify_wgsl(&contract(), "struct Broken { x: }").unwrap_err();
        assert!(matches!(err, LayoutError::ShaderParse { target: "wgsl", .. }));
    }
}
