//! schema 中统一使用 snake_case（数据块名为 PascalCase），各个目标语言按自己的习惯转换
//!
//! 校验和代码生成共用这里的转换，两个不同的名字转换后撞在一起时校验阶段就能发现。

/// 按 `_` 和小写到大写的边界拆分单词
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// `frame_uniforms` -> `FrameUniforms`
pub fn to_pascal_case(name: &str) -> String {
    split_words(name).iter().map(|w| capitalize(w)).collect()
}

/// `inverse_view` -> `inverseView`
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `MeshVertex` -> `MESH_VERTEX`
pub fn to_shouty_snake_case(name: &str) -> String {
    split_words(name).iter().map(|w| w.to_ascii_uppercase()).collect::<Vec<_>>().join("_")
}

/// Rust、WGSL、MSL（C++14）中不能用作标识符的词，按字典序排列
const RESERVED_WORDS: &[&str] = &[
    "Self", "abstract", "alignas", "alignof", "and", "as", "asm", "async", "auto", "await", "become", "bitcast",
    "bool", "box", "break", "case", "catch", "char", "class", "const", "const_assert", "const_cast", "constant",
    "constexpr", "continue", "continuing", "crate", "default", "delete", "device", "diagnostic", "discard", "do",
    "double", "dyn", "else", "enable", "enum", "explicit", "export", "extern", "f16", "f32", "f64", "false",
    "final", "fn", "for", "friend", "goto", "half", "i32", "i64", "if", "impl", "in", "inline", "int", "kernel",
    "let", "long", "loop", "macro", "match", "mod", "move", "mut", "namespace", "new", "not", "or", "override",
    "priv", "private", "protected", "ptr", "pub", "ref", "register", "requires", "return", "self", "short",
    "signed", "sizeof", "static", "static_assert", "struct", "super", "switch", "template", "this", "thread",
    "threadgroup", "throw", "trait", "true", "try", "type", "typedef", "typename", "typeof", "u32", "u64",
    "union", "unsafe", "unsigned", "unsized", "use", "using", "var", "vertex", "virtual", "void", "volatile",
    "where", "while", "yield",
];

/// 是否是某个目标语言的关键字或保留字
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.binary_search(&word).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_pascal_case("frame_uniforms"), "FrameUniforms");
        assert_eq!(to_pascal_case("FrameUniforms"), "FrameUniforms");
        assert_eq!(to_camel_case("inverse_projection"), "inverseProjection");
        assert_eq!(to_camel_case("view"), "view");
        assert_eq!(to_shouty_snake_case("MeshVertex"), "MESH_VERTEX");
        assert_eq!(to_shouty_snake_case("point_light_count"), "POINT_LIGHT_COUNT");
        assert_eq!(to_pascal_case("shadow_atlas2"), "ShadowAtlas2");
        assert_eq!(to_pascal_case("light_data"), to_pascal_case("LightData"));
    }

    #[test]
    fn test_reserved_words() {
        assert!(RESERVED_WORDS.windows(2).all(|w| w[0] < w[1]), "reserved words must stay sorted");
        assert!(is_reserved("type"));
        assert!(is_reserved("loop"));
        assert!(is_reserved("Self"));
        assert!(!is_reserved("radius"));
        assert!(!is_reserved("sampler"));
    }
}
