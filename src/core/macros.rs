//! 核心宏定义

/// 以字段列表为结构体实现 `Default`
///
/// 使用示例:
/// ```rust
/// use particle_fx::impl_default;
///
/// struct Margins {
///     top: f32,
///     bottom: f32,
/// }
///
/// impl_default!(Margins {
///     top: 4.0,
///     bottom: 4.0,
/// });
///
/// assert_eq!(Margins::default().top, 4.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
