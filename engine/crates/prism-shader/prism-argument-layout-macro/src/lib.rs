use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Meta, parse_macro_input};

/// 为结构体实现 ArgumentLayout 派生宏
///
/// 支持的属性：
/// - buffer / texture / sampler: 指定类别和序号，例如 `#[buffer(BufferIndex::FrameUniforms)]`
/// - stage: 指定着色器阶段，例如 `#[stage = "VERTEX | FRAGMENT"]`
/// - count: 指定数组长度
///
/// 没有类别属性的字段会被忽略。
#[proc_macro_derive(ArgumentLayout, attributes(buffer, texture, sampler, stage, count))]
pub fn derive_argument_layout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}

struct ArgumentField {
    method: syn::Ident,
    name: String,
    class: syn::Ident,
    index: syn::Expr,
    stages: proc_macro2::TokenStream,
    count: syn::Expr,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // 只处理结构体，且只支持具名字段
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(syn::Error::new_spanned(struct_name, "Only named fields are supported")),
        },
        _ => return Err(syn::Error::new_spanned(struct_name, "Only structs are supported")),
    };

    let mut items = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let Some((class, index)) = get_class_and_index(&field.attrs)? else {
            continue;
        };

        // 去掉首尾下划线，`_sampler` 这类字段名可以避开关键字或未使用警告
        let name = field_name.to_string().trim_matches('_').to_string();
        items.push(ArgumentField {
            method: format_ident!("{}", name, span = field_name.span()),
            name,
            class,
            index,
            stages: get_stage_value(&field.attrs)?,
            count: get_count_value(&field.attrs),
        });
    }

    let methods = items.iter().map(|item| {
        let ArgumentField {
            method,
            name,
            class,
            index,
            stages,
            count,
        } = item;
        quote! {
            pub fn #method() -> ::prism_argument_layout_trait::ArgumentItem {
                ::prism_argument_layout_trait::ArgumentItem::new(
                    #name,
                    ::prism_argument_layout_trait::BindingClass::#class,
                    #index,
                    #stages,
                    #count,
                )
            }
        }
    });
    let method_names = items.iter().map(|item| &item.method);

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#methods)*
        }

        impl #impl_generics ::prism_argument_layout_trait::ArgumentLayout for #struct_name #ty_generics #where_clause {
            fn argument_items() -> Vec<::prism_argument_layout_trait::ArgumentItem> {
                vec![#(Self::#method_names()),*]
            }
        }
    })
}

/// 属性格式示例：#[buffer(BufferIndex::FrameUniforms)]
fn get_class_and_index(attrs: &[Attribute]) -> syn::Result<Option<(syn::Ident, syn::Expr)>> {
    let mut found: Option<(syn::Ident, syn::Expr)> = None;
    for attr in attrs {
        let class = match () {
            _ if attr.path().is_ident("buffer") => "Buffer",
            _ if attr.path().is_ident("texture") => "Texture",
            _ if attr.path().is_ident("sampler") => "Sampler",
            _ => continue,
        };
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "a field can only have one binding class"));
        }
        let index: syn::Expr = attr.parse_args()?;
        found = Some((format_ident!("{}", class), index));
    }
    Ok(found)
}

/// 属性格式示例：#[stage = "VERTEX | FRAGMENT"]
fn get_stage_value(attrs: &[Attribute]) -> syn::Result<proc_macro2::TokenStream> {
    for attr in attrs {
        if attr.path().is_ident("stage")
            && let Meta::NameValue(meta) = &attr.meta
            && let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit_str),
                ..
            }) = &meta.value
        {
            let stages = lit_str
                .value()
                .split('|')
                .map(|s| syn::parse_str::<syn::Ident>(s.trim()))
                .collect::<syn::Result<Vec<_>>>()
                .map_err(|e| syn::Error::new_spanned(lit_str, format!("invalid stage: {e}")))?;
            return Ok(quote! {
                ::prism_argument_layout_trait::ShaderStages::empty()
                    #(| ::prism_argument_layout_trait::ShaderStages::#stages)*
            });
        }
    }

    // 默认值：顶点和片段着色器
    Ok(quote! {
        ::prism_argument_layout_trait::ShaderStages::VERTEX | ::prism_argument_layout_trait::ShaderStages::FRAGMENT
    })
}

/// 属性格式示例：#[count = 4]
fn get_count_value(attrs: &[Attribute]) -> syn::Expr {
    for attr in attrs {
        if attr.path().is_ident("count")
            && let Meta::NameValue(meta) = &attr.meta
        {
            return meta.value.clone();
        }
    }
    // 默认值：1
    syn::parse_quote!(1)
}
